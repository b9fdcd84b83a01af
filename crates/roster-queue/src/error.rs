//! Error types for queue, journal and snapshot operations.

use roster_store::JsonlError;

use crate::request::RequestId;

/// Recoverable conditions reported to queue callers.
///
/// `NothingToUndo` and `NothingToRedo` are the empty-state signals of the
/// journal; like `EmptyQueue` they leave every structure untouched.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("request queue is empty")]
    EmptyQueue,

    #[error("request not found: {0}")]
    RequestNotFound(RequestId),

    #[error("request id already queued: {0}")]
    DuplicateRequestId(RequestId),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error(transparent)]
    Storage(#[from] JsonlError),
}
