use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const VIDEOS_TRACKED_DIR: &str = "videos_tracked";
pub const ANNOTATIONS_DIR: &str = "annotations";
pub const VIDEO_EXTENSION: &str = "mp4";
pub const TRACKING_EXTENSION: &str = "txt";
pub const ANNOTATION_EXTENSION: &str = "csv";

/// Directory tree of an annotation dataset:
///
/// ```text
/// <root>/videos_tracked/<stem>/<stem>.mp4
/// <root>/videos_tracked/<stem>/<stem>.txt
/// <root>/annotations/<stem>.csv
/// ```
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    pub fn open(root: &Path) -> Result<Self> {
        for dir in [VIDEOS_TRACKED_DIR, ANNOTATIONS_DIR] {
            if !root.join(dir).is_dir() {
                return Err(Error::Data(format!(
                    "invalid directory chosen: {} has no {}/ directory",
                    root.display(),
                    dir
                )));
            }
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Video stems: directories directly under `videos_tracked/` with no `.` in
    /// their name, sorted.
    pub fn videos(&self) -> Result<Vec<String>> {
        let tracked_dir = self.root.join(VIDEOS_TRACKED_DIR);
        let mut stems = Vec::new();

        for entry in WalkDir::new(&tracked_dir).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", tracked_dir.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.contains('.') {
                stems.push(name);
            }
        }

        stems.sort();
        debug!("Found {} videos under {}", stems.len(), tracked_dir.display());
        Ok(stems)
    }

    /// Value persisted in the `vidname` column.
    pub fn video_file_name(stem: &str) -> String {
        format!("{}.{}", stem, VIDEO_EXTENSION)
    }

    pub fn video_path(&self, stem: &str) -> PathBuf {
        self.root
            .join(VIDEOS_TRACKED_DIR)
            .join(stem)
            .join(Self::video_file_name(stem))
    }

    pub fn tracking_path(&self, stem: &str) -> PathBuf {
        self.root
            .join(VIDEOS_TRACKED_DIR)
            .join(stem)
            .join(format!("{}.{}", stem, TRACKING_EXTENSION))
    }

    pub fn annotations_path(&self, stem: &str) -> PathBuf {
        self.root
            .join(ANNOTATIONS_DIR)
            .join(format!("{}.{}", stem, ANNOTATION_EXTENSION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let layout = DatasetLayout {
            root: PathBuf::from("/data"),
        };
        assert_eq!(
            layout.video_path("game1"),
            PathBuf::from("/data/videos_tracked/game1/game1.mp4")
        );
        assert_eq!(
            layout.tracking_path("game1"),
            PathBuf::from("/data/videos_tracked/game1/game1.txt")
        );
        assert_eq!(
            layout.annotations_path("game1"),
            PathBuf::from("/data/annotations/game1.csv")
        );
        assert_eq!(DatasetLayout::video_file_name("game1"), "game1.mp4");
    }
}
