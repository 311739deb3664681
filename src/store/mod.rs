pub mod collection;
pub mod models;

pub use collection::AnnotationCollection;
pub use models::{AnnotationRecord, ClickProvenance, DisplayRegion, ANNOTATION_COLUMNS};
