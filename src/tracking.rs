use crate::error::{Error, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, trace};

/// Per-frame identifier of a tracked person.
pub type SubjectId = i64;

/// Number of leading tracking columns the index needs:
/// frame_index, subject_id, x, y, width, height.
const REQUIRED_COLUMNS: usize = 6;

/// One tracked bounding box in source-video pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedBox {
    pub frame_index: u64,
    pub subject_id: SubjectId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A point expressed as a fraction of the display region, both axes in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl TrackedBox {
    /// Box corners `(x1, y1, x2, y2)` divided by the video dimensions.
    fn normalized(&self, video_width: f64, video_height: f64) -> (f64, f64, f64, f64) {
        (
            self.x / video_width,
            self.y / video_height,
            (self.x + self.width) / video_width,
            (self.y + self.height) / video_height,
        )
    }

    /// Strict containment: a point on an edge is outside.
    fn contains(&self, point: NormalizedPoint, video_width: f64, video_height: f64) -> bool {
        let (x1, y1, x2, y2) = self.normalized(video_width, video_height);
        x1 < point.x && point.x < x2 && y1 < point.y && point.y < y2
    }
}

/// Tracking table for a single video, kept in file order.
#[derive(Debug, Clone, Default)]
pub struct TrackingIndex {
    boxes: Vec<TrackedBox>,
}

impl TrackingIndex {
    pub fn new(boxes: Vec<TrackedBox>) -> Result<Self> {
        for (row, b) in boxes.iter().enumerate() {
            if !(b.width > 0.0 && b.height > 0.0) {
                return Err(Error::Data(format!(
                    "tracking row {}: box for subject {} has non-positive size {}x{}",
                    row, b.subject_id, b.width, b.height
                )));
            }
        }
        Ok(Self { boxes })
    }

    /// Load `<stem>.txt`. A missing file is reported as a data error since the
    /// video cannot be annotated without it.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            Error::Data(format!("cannot open tracking table {}: {}", path.display(), e))
        })?;
        let index = Self::from_reader(file)?;
        debug!(
            "Loaded {} tracked boxes from {}",
            index.len(),
            path.display()
        );
        Ok(index)
    }

    /// Parse a tracking table with a header row. The first six columns are
    /// read by position; anything after them is ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| Error::Data(format!("tracking table header: {}", e)))?;
        if headers.len() < REQUIRED_COLUMNS {
            return Err(Error::Data(format!(
                "tracking table has {} column(s), expected at least {}",
                headers.len(),
                REQUIRED_COLUMNS
            )));
        }

        let mut boxes = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record =
                result.map_err(|e| Error::Data(format!("tracking row {}: {}", row, e)))?;
            boxes.push(parse_row(row, &record)?);
        }

        Self::new(boxes)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Boxes recorded for `frame_index`, in table order.
    pub fn boxes_at(&self, frame_index: u64) -> impl Iterator<Item = &TrackedBox> {
        self.boxes
            .iter()
            .filter(move |b| b.frame_index == frame_index)
    }

    /// Subject whose box strictly contains `point` at `frame_index`.
    ///
    /// Overlapping boxes are resolved by table order: the first match wins.
    pub fn hit_test(
        &self,
        point: NormalizedPoint,
        frame_index: u64,
        video_width: f64,
        video_height: f64,
    ) -> Option<SubjectId> {
        let hit = self
            .boxes_at(frame_index)
            .find(|b| b.contains(point, video_width, video_height))
            .map(|b| b.subject_id);
        trace!(
            "hit_test frame={} point=({:.4}, {:.4}) -> {:?}",
            frame_index,
            point.x,
            point.y,
            hit
        );
        hit
    }
}

fn parse_row(row: usize, record: &StringRecord) -> Result<TrackedBox> {
    if record.len() < REQUIRED_COLUMNS {
        return Err(Error::Data(format!(
            "tracking row {}: {} field(s), expected at least {}",
            row,
            record.len(),
            REQUIRED_COLUMNS
        )));
    }

    let number = |col: usize, name: &str| -> Result<f64> {
        let text = &record[col];
        text.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                Error::Data(format!("tracking row {}: {} '{}' is not numeric", row, name, text))
            })
    };

    // Trackers commonly write ids and frame numbers as floats ("10.0").
    let integer = |col: usize, name: &str| -> Result<f64> {
        let value = number(col, name)?;
        if value.fract() != 0.0 {
            return Err(Error::Data(format!(
                "tracking row {}: {} '{}' is not an integer",
                row, name, &record[col]
            )));
        }
        Ok(value)
    };

    let frame = integer(0, "frame_index")?;
    if frame < 0.0 {
        return Err(Error::Data(format!(
            "tracking row {}: negative frame_index {}",
            row, frame
        )));
    }
    // `as` saturates; both upper bounds round up to a power of two.
    if frame >= u64::MAX as f64 {
        return Err(Error::Data(format!(
            "tracking row {}: frame_index '{}' is out of range",
            row, &record[0]
        )));
    }

    let subject = integer(1, "subject_id")?;
    if subject < SubjectId::MIN as f64 || subject >= SubjectId::MAX as f64 {
        return Err(Error::Data(format!(
            "tracking row {}: subject_id '{}' is out of range",
            row, &record[1]
        )));
    }

    Ok(TrackedBox {
        frame_index: frame as u64,
        subject_id: subject as SubjectId,
        x: number(2, "x")?,
        y: number(3, "y")?,
        width: number(4, "width")?,
        height: number(5, "height")?,
    })
}
