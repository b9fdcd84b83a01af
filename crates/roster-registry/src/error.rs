use roster_queue::QueueError;
use roster_store::{JsonlError, StoreError, ValidationError};

use crate::config::ConfigError;

/// Every failure a registry operation can report.
///
/// Absent records surface as `Store(StoreError::RecordNotFound)`, absent
/// requests and an empty queue as the matching `Queue` variants.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] JsonlError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
