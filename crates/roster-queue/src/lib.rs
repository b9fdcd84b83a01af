//! # roster-queue
//!
//! Request layer for the roster.
//!
//! - `PriorityQueue`: binary min-heap ordered by `(priority, created_at,
//!   sequence)`, with removal by request id or by owning record
//! - `MutationLog`: undo/redo over enqueue and dequeue
//! - JSON snapshot export/import
//!
//! Queue and journal are plain owned values. The caller pairs them; every
//! mutation that should be undoable goes through the log.

pub mod error;
mod heap;
pub mod journal;
pub mod queue;
pub mod request;
pub mod snapshot;

pub use error::QueueError;
pub use journal::{Mutation, MutationKind, MutationLog};
pub use queue::{PriorityQueue, QueueEntry};
pub use request::{Request, RequestId, RequestIds};
pub use snapshot::{export_json, import_json, load_queue, save_queue};
