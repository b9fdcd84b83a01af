//! Undo/redo journal over queue mutations.
//!
//! Enqueues and dequeues made through [`MutationLog`] are recorded with the
//! full queue entry, sequence number included. Undo applies the exact
//! inverse and redo re-applies the original:
//!
//! ```text
//!              undo                      redo
//! Enqueued     remove that request id    reinstate the same entry
//! Dequeued     reinstate the same entry  remove that request id
//! ```
//!
//! Because reinstated entries keep their sequence, undo is a structural
//! inverse: tie-break order against requests queued in the meantime is the
//! same as if the undone action never happened.

use roster_store::RecordKey;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::QueueError;
use crate::queue::{PriorityQueue, QueueEntry};
use crate::request::{Request, RequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Enqueued,
    Dequeued,
}

impl MutationKind {
    pub fn as_str(&self) -> &str {
        match self {
            MutationKind::Enqueued => "enqueued",
            MutationKind::Dequeued => "dequeued",
        }
    }
}

/// One recorded queue mutation.
#[derive(Debug, Clone)]
pub struct Mutation {
    pub kind: MutationKind,
    pub entry: QueueEntry,
}

impl Mutation {
    pub fn request_id(&self) -> RequestId {
        self.entry.request().id()
    }
}

/// Two unbounded stacks of mutations.
#[derive(Debug, Clone, Default)]
pub struct MutationLog {
    undo: Vec<Mutation>,
    redo: Vec<Mutation>,
}

impl MutationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Enqueue through the journal.
    pub fn enqueue(&mut self, queue: &mut PriorityQueue, request: Request) -> Result<u64, QueueError> {
        let snapshot = request.clone();
        let sequence = queue.enqueue(request)?;
        self.commit(Mutation {
            kind: MutationKind::Enqueued,
            entry: QueueEntry::new(snapshot, sequence),
        });
        Ok(sequence)
    }

    /// Dequeue through the journal. `None` when the queue is empty, in
    /// which case nothing is recorded.
    pub fn dequeue(&mut self, queue: &mut PriorityQueue) -> Option<Request> {
        let entry = queue.dequeue_entry()?;
        let request = entry.request().clone();
        self.commit(Mutation {
            kind: MutationKind::Dequeued,
            entry,
        });
        Some(request)
    }

    fn commit(&mut self, mutation: Mutation) {
        self.undo.push(mutation);
        self.redo.clear();
    }

    /// Reverse the most recent mutation.
    ///
    /// If the queue no longer matches the journal (the request was removed
    /// or re-added behind its back) the entry is discarded and the mismatch
    /// reported.
    pub fn undo(&mut self, queue: &mut PriorityQueue) -> Result<Mutation, QueueError> {
        let mutation = self.undo.pop().ok_or(QueueError::NothingToUndo)?;
        let id = mutation.request_id();
        match mutation.kind {
            MutationKind::Enqueued => {
                if queue.take_entry(id).is_none() {
                    warn!(request_id = %id, "undo target no longer queued");
                    return Err(QueueError::RequestNotFound(id));
                }
            }
            MutationKind::Dequeued => {
                if let Err(error) = queue.reinstate(mutation.entry.clone()) {
                    warn!(request_id = %id, %error, "undo target could not be requeued");
                    return Err(error);
                }
            }
        }
        info!(request_id = %id, action = mutation.kind.as_str(), "mutation undone");
        self.redo.push(mutation.clone());
        Ok(mutation)
    }

    /// Re-apply the most recently undone mutation.
    pub fn redo(&mut self, queue: &mut PriorityQueue) -> Result<Mutation, QueueError> {
        let mutation = self.redo.pop().ok_or(QueueError::NothingToRedo)?;
        let id = mutation.request_id();
        match mutation.kind {
            MutationKind::Enqueued => {
                if let Err(error) = queue.reinstate(mutation.entry.clone()) {
                    warn!(request_id = %id, %error, "redo target could not be requeued");
                    return Err(error);
                }
            }
            MutationKind::Dequeued => {
                if queue.take_entry(id).is_none() {
                    warn!(request_id = %id, "redo target no longer queued");
                    return Err(QueueError::RequestNotFound(id));
                }
            }
        }
        info!(request_id = %id, action = mutation.kind.as_str(), "mutation redone");
        self.undo.push(mutation.clone());
        Ok(mutation)
    }

    /// Drop every recorded mutation that mentions `id`.
    ///
    /// Call this when a request leaves the queue outside the journal so no
    /// later undo or redo tries to act on it.
    pub fn forget(&mut self, id: RequestId) -> usize {
        let before = self.undo.len() + self.redo.len();
        self.undo.retain(|mutation| mutation.request_id() != id);
        self.redo.retain(|mutation| mutation.request_id() != id);
        before - (self.undo.len() + self.redo.len())
    }

    /// Drop every recorded mutation for requests owned by `key`, served or
    /// not.
    pub fn forget_record(&mut self, key: RecordKey) -> usize {
        let before = self.undo.len() + self.redo.len();
        self.undo.retain(|mutation| mutation.entry.request().record_key != key);
        self.redo.retain(|mutation| mutation.entry.request().record_key != key);
        before - (self.undo.len() + self.redo.len())
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
