use super::models::{AnnotationRecord, ANNOTATION_COLUMNS};
use crate::error::{Error, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Ordered annotations of one video, bound to the file they persist to.
///
/// Every mutation rewrites the whole file before returning.
#[derive(Debug, Clone)]
pub struct AnnotationCollection {
    path: PathBuf,
    records: Vec<AnnotationRecord>,
}

impl AnnotationCollection {
    /// Load the collection at `path`, or start an empty one if the file does not exist yet.
    ///
    /// The header must match [`ANNOTATION_COLUMNS`] byte for byte, and every
    /// row must satisfy `start_time_s <= stop_time_s`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No annotation file at {}, starting empty", path.display());
            return Ok(Self {
                path: path.to_path_buf(),
                records: Vec::new(),
            });
        }

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| Error::Data(format!("{}: {}", path.display(), e)))?;

        let headers = rdr
            .headers()
            .map_err(|e| Error::Data(format!("{}: {}", path.display(), e)))?;
        if !headers.iter().eq(ANNOTATION_COLUMNS.iter().copied()) {
            return Err(Error::Data(format!(
                "{}: header [{}] does not match expected [{}]",
                path.display(),
                headers.iter().collect::<Vec<_>>().join(", "),
                ANNOTATION_COLUMNS.join(", ")
            )));
        }

        let mut records = Vec::new();
        for (row, result) in rdr.deserialize::<AnnotationRecord>().enumerate() {
            let record = result
                .map_err(|e| Error::Data(format!("{} row {}: {}", path.display(), row, e)))?;
            if record.start_time_seconds > record.stop_time_seconds {
                return Err(Error::Data(format!(
                    "{} row {}: start {}s is after stop {}s",
                    path.display(),
                    row,
                    record.start_time_seconds,
                    record.stop_time_seconds
                )));
            }
            records.push(record);
        }

        debug!("Loaded {} annotations from {}", records.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[AnnotationRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&AnnotationRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add `record` at the end and persist. The in-memory list is left as it
    /// was if the write fails.
    pub fn append(&mut self, record: AnnotationRecord) -> Result<()> {
        if record.start_time_seconds > record.stop_time_seconds {
            return Err(Error::State(format!(
                "start {}s is after stop {}s",
                record.start_time_seconds, record.stop_time_seconds
            )));
        }

        self.records.push(record);
        if let Err(e) = self.persist() {
            self.records.pop();
            return Err(e);
        }

        info!(
            "Appended annotation #{} to {}",
            self.records.len() - 1,
            self.path.display()
        );
        Ok(())
    }

    /// Remove the record at `index` and persist, returning it.
    pub fn delete(&mut self, index: usize) -> Result<AnnotationRecord> {
        if index >= self.records.len() {
            return Err(Error::Range {
                index,
                len: self.records.len(),
            });
        }

        let removed = self.records.remove(index);
        if let Err(e) = self.persist() {
            self.records.insert(index, removed);
            return Err(e);
        }

        info!("Deleted annotation #{} from {}", index, self.path.display());
        Ok(removed)
    }

    pub fn display_strings(&self) -> Vec<String> {
        self.records.iter().map(|r| r.display_string()).collect()
    }

    /// Serialize into a sibling temp file, then rename it over the target.
    fn persist(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = match fs::metadata(&self.path) {
            Ok(meta) => {
                let tmp = NamedTempFile::new_in(dir)?;
                tmp.as_file().set_permissions(meta.permissions())?;
                tmp
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => new_temp_file(dir)?,
            Err(e) => return Err(e.into()),
        };
        {
            // Header is written by hand so an empty collection still carries it.
            let mut wtr = WriterBuilder::new()
                .has_headers(false)
                .from_writer(tmp.as_file_mut());
            wtr.write_record(ANNOTATION_COLUMNS)?;
            for record in &self.records {
                wtr.serialize(record)?;
            }
            wtr.flush()?;
        }

        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        debug!(
            "Wrote {} annotations to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Temp file for a target that does not exist yet, created with the mode a
/// plain `File::create` would get.
#[cfg(unix)]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}
