//! Priority queue of requests.
//!
//! Entries order by `(priority, created_at, sequence)`. The sequence is a
//! per-queue counter stamped at enqueue time, so two requests with equal
//! priority and timestamp leave in the order they arrived.

use chrono::{DateTime, Utc};
use roster_store::RecordKey;
use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::debug;

use crate::error::QueueError;
use crate::heap::MinHeap;
use crate::request::{Request, RequestId};

/// One heap slot: the comparison key plus the request it carries.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    priority: i32,
    created_at: DateTime<Utc>,
    sequence: u64,
    request: Request,
}

impl QueueEntry {
    pub(crate) fn new(request: Request, sequence: u64) -> Self {
        Self {
            priority: request.priority,
            created_at: request.created_at,
            sequence,
            request,
        }
    }

    pub fn sort_key(&self) -> (i32, DateTime<Utc>, u64) {
        (self.priority, self.created_at, self.sequence)
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn into_request(self) -> Request {
        self.request
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// Min-priority queue owning every live request.
///
/// Enqueue, dequeue and peek are O(log n) / O(1). Removal by request id or
/// by owning record is a linear filter followed by a heap rebuild.
#[derive(Debug, Clone, Default)]
pub struct PriorityQueue {
    heap: MinHeap<QueueEntry>,
    live: HashSet<RequestId>,
    next_sequence: u64,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, id: RequestId) -> bool {
        self.live.contains(&id)
    }

    /// Queue `request`, returning the sequence number it was stamped with.
    pub fn enqueue(&mut self, request: Request) -> Result<u64, QueueError> {
        let sequence = self.next_sequence;
        self.push_entry(QueueEntry::new(request, sequence))?;
        self.next_sequence += 1;
        Ok(sequence)
    }

    pub fn bulk_enqueue(
        &mut self,
        requests: impl IntoIterator<Item = Request>,
    ) -> Result<usize, QueueError> {
        let mut count = 0;
        for request in requests {
            self.enqueue(request)?;
            count += 1;
        }
        Ok(count)
    }

    /// Put back an entry with the sequence it already carries.
    pub(crate) fn reinstate(&mut self, entry: QueueEntry) -> Result<(), QueueError> {
        let sequence = entry.sequence;
        self.push_entry(entry)?;
        self.next_sequence = self.next_sequence.max(sequence + 1);
        Ok(())
    }

    fn push_entry(&mut self, entry: QueueEntry) -> Result<(), QueueError> {
        let id = entry.request.id();
        if !self.live.insert(id) {
            return Err(QueueError::DuplicateRequestId(id));
        }
        debug!(
            request_id = %id,
            priority = entry.priority,
            sequence = entry.sequence,
            "request queued"
        );
        self.heap.push(entry);
        Ok(())
    }

    pub fn dequeue(&mut self) -> Option<Request> {
        self.dequeue_entry().map(QueueEntry::into_request)
    }

    pub fn dequeue_entry(&mut self) -> Option<QueueEntry> {
        let entry = self.heap.pop()?;
        self.live.remove(&entry.request.id());
        debug!(request_id = %entry.request.id(), "request dequeued");
        Some(entry)
    }

    pub fn peek(&self) -> Option<&Request> {
        self.heap.peek().map(QueueEntry::request)
    }

    pub fn get(&self, id: RequestId) -> Option<&Request> {
        if !self.contains(id) {
            return None;
        }
        self.heap
            .iter()
            .map(QueueEntry::request)
            .find(|request| request.id() == id)
    }

    /// Remove exactly the request with `id`. O(n).
    pub fn remove_by_request_id(&mut self, id: RequestId) -> Option<Request> {
        self.take_entry(id).map(QueueEntry::into_request)
    }

    pub(crate) fn take_entry(&mut self, id: RequestId) -> Option<QueueEntry> {
        if !self.live.remove(&id) {
            return None;
        }
        let removed = self.heap.retain_collect(|entry| entry.request.id() != id);
        debug!(request_id = %id, "request removed");
        removed.into_iter().next()
    }

    /// Remove every request owned by `key`, returned in queue order. O(n).
    pub fn remove_by_record_key(&mut self, key: RecordKey) -> Vec<Request> {
        let mut removed = self
            .heap
            .retain_collect(|entry| entry.request.record_key != key);
        removed.sort();
        for entry in &removed {
            self.live.remove(&entry.request.id());
        }
        if !removed.is_empty() {
            debug!(record_key = key, removed = removed.len(), "requests removed for record");
        }
        removed.into_iter().map(QueueEntry::into_request).collect()
    }

    /// Every request in full `(priority, created_at, sequence)` order.
    pub fn list_all(&self) -> Vec<&Request> {
        self.heap.sorted().into_iter().map(QueueEntry::request).collect()
    }

    pub fn entries(&self) -> Vec<&QueueEntry> {
        self.heap.sorted()
    }
}
