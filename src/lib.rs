pub mod config;
pub mod draft;
pub mod error;
pub mod layout;
pub mod media;
pub mod session;
pub mod store;
pub mod time_codec;
pub mod tracking;

pub use crate::config::AppConfig;
pub use draft::{AnnotationDraft, DraftView, SubjectSelection, TimeMark};
pub use error::{Error, Result};
pub use layout::DatasetLayout;
pub use media::{FixedProbe, Playback, StaticPlayback, VideoProbe, VideoProperties};
pub use session::{Controls, SessionController, Status};
pub use store::{AnnotationCollection, AnnotationRecord, ClickProvenance, DisplayRegion};
pub use tracking::{NormalizedPoint, SubjectId, TrackedBox, TrackingIndex};
