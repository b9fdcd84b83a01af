//! Error types for record and store operations.

use crate::jsonl::JsonlError;
use crate::record::RecordKey;
use crate::validation::ValidationError;

/// Recoverable failures raised by the record layer.
///
/// Structural corruption of the tree is not represented here: it panics,
/// because nothing downstream can continue once ordering is broken.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record key already exists: {0}")]
    DuplicateKey(RecordKey),

    #[error("record not found: {0}")]
    RecordNotFound(RecordKey),

    #[error("course {course} already registered for record {key}")]
    DuplicateCourse { key: RecordKey, course: String },

    #[error("course {course} not registered for record {key}")]
    CourseNotFound { key: RecordKey, course: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Jsonl(#[from] JsonlError),
}
