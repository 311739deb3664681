use crate::error::{Error, Result};
use crate::store::{AnnotationRecord, ClickProvenance};
use crate::time_codec;
use crate::tracking::SubjectId;

const UNSET_TIME_TEXT: &str = "XX:XX";
const UNSET_SUBJECT_TEXT: &str = "XX";
const MISSED_SUBJECT_TEXT: &str = "-1";

/// A start or stop mark. Seconds and frame always come from the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeMark {
    pub seconds: u64,
    pub frame: u64,
}

impl TimeMark {
    fn at(position_ms: u64, fps: f64) -> Self {
        Self {
            seconds: position_ms / 1000,
            frame: time_codec::frame_of(position_ms, fps),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubjectSelection {
    #[default]
    Unset,
    /// The last click hit no tracked box.
    Missed,
    Picked(SubjectId),
}

/// Text shown in the draft panel for each field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftView {
    pub start: String,
    pub stop: String,
    pub subject: String,
    pub label: String,
}

/// The annotation being built before it is added to the collection.
#[derive(Debug, Clone)]
pub struct AnnotationDraft {
    classes: Vec<String>,
    label_index: usize,
    start: Option<TimeMark>,
    stop: Option<TimeMark>,
    subject: SubjectSelection,
    click: Option<ClickProvenance>,
}

impl AnnotationDraft {
    pub fn new(classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            return Err(Error::State(
                "at least one action class is required".to_string(),
            ));
        }
        Ok(Self {
            classes,
            label_index: 0,
            start: None,
            stop: None,
            subject: SubjectSelection::Unset,
            click: None,
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn start(&self) -> Option<TimeMark> {
        self.start
    }

    pub fn stop(&self) -> Option<TimeMark> {
        self.stop
    }

    pub fn subject(&self) -> SubjectSelection {
        self.subject
    }

    pub fn click(&self) -> Option<ClickProvenance> {
        self.click
    }

    pub fn label(&self) -> &str {
        &self.classes[self.label_index]
    }

    pub fn label_index(&self) -> usize {
        self.label_index
    }

    pub fn set_start(&mut self, position_ms: u64, fps: f64) {
        self.start = Some(TimeMark::at(position_ms, fps));
    }

    pub fn set_stop(&mut self, position_ms: u64, fps: f64) {
        self.stop = Some(TimeMark::at(position_ms, fps));
    }

    /// Store a hit-test result; `None` records a miss, which blocks commit.
    pub fn set_subject(&mut self, subject: Option<SubjectId>) {
        self.subject = match subject {
            Some(id) => SubjectSelection::Picked(id),
            None => SubjectSelection::Missed,
        };
    }

    pub fn record_click(&mut self, click: ClickProvenance) {
        self.click = Some(click);
    }

    pub fn set_label(&mut self, label: &str) -> Result<()> {
        match self.classes.iter().position(|c| c == label) {
            Some(index) => {
                self.label_index = index;
                Ok(())
            }
            None => Err(Error::State(format!("'{}' is not a configured class", label))),
        }
    }

    pub fn select_label(&mut self, index: usize) -> Result<()> {
        if index >= self.classes.len() {
            return Err(Error::Range {
                index,
                len: self.classes.len(),
            });
        }
        self.label_index = index;
        Ok(())
    }

    pub fn is_committable(&self) -> bool {
        match (self.start, self.stop, self.subject) {
            (Some(start), Some(stop), SubjectSelection::Picked(_)) => {
                start.seconds <= stop.seconds
            }
            _ => false,
        }
    }

    /// True until any of start, stop or subject has been entered.
    pub fn is_pristine(&self) -> bool {
        self.start.is_none() && self.stop.is_none() && self.subject == SubjectSelection::Unset
    }

    /// Snapshot the draft as a record without resetting it.
    pub fn to_record(&self, video_name: &str) -> Result<AnnotationRecord> {
        let (start, stop, subject_id) = match (self.start, self.stop, self.subject) {
            (Some(start), Some(stop), SubjectSelection::Picked(id))
                if start.seconds <= stop.seconds =>
            {
                (start, stop, id)
            }
            _ => return Err(Error::State(self.incomplete_reason())),
        };

        let click = self.click.unwrap_or_default();
        Ok(AnnotationRecord {
            video_name: video_name.to_string(),
            action_label: self.label().to_string(),
            subject_id,
            start_time_seconds: start.seconds,
            stop_time_seconds: stop.seconds,
            start_frame: start.frame,
            stop_frame: stop.frame,
            click_frame_geometry: click.region.to_string(),
            click_x: click.x,
            click_y: click.y,
        })
    }

    /// Produce the record and clear the draft. A failed commit changes nothing.
    pub fn commit(&mut self, video_name: &str) -> Result<AnnotationRecord> {
        let record = self.to_record(video_name)?;
        self.reset();
        Ok(record)
    }

    pub fn reset(&mut self) {
        self.label_index = 0;
        self.start = None;
        self.stop = None;
        self.subject = SubjectSelection::Unset;
        self.click = None;
    }

    pub fn view(&self) -> DraftView {
        let time_text = |mark: Option<TimeMark>| match mark {
            Some(m) => time_codec::to_display(m.seconds * 1000),
            None => UNSET_TIME_TEXT.to_string(),
        };
        DraftView {
            start: time_text(self.start),
            stop: time_text(self.stop),
            subject: match self.subject {
                SubjectSelection::Unset => UNSET_SUBJECT_TEXT.to_string(),
                SubjectSelection::Missed => MISSED_SUBJECT_TEXT.to_string(),
                SubjectSelection::Picked(id) => id.to_string(),
            },
            label: self.label().to_string(),
        }
    }

    fn incomplete_reason(&self) -> String {
        match (self.start, self.stop, self.subject) {
            (None, _, _) => "start time is not set".to_string(),
            (_, None, _) => "stop time is not set".to_string(),
            (Some(start), Some(stop), _) if start.seconds > stop.seconds => format!(
                "start {} is after stop {}",
                time_codec::to_display(start.seconds * 1000),
                time_codec::to_display(stop.seconds * 1000)
            ),
            (_, _, SubjectSelection::Unset) => "no subject picked".to_string(),
            (_, _, SubjectSelection::Missed) => "no tracked subject at the click".to_string(),
            _ => "draft is incomplete".to_string(),
        }
    }
}
