//! Request type and the id allocator that hands out request identities.

use chrono::{DateTime, Utc};
use roster_store::RecordKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a request; the only handle used for arbitrary removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic request-id source. Ids are never handed out twice, including
/// ids that entered the process through a snapshot import.
#[derive(Debug, Clone)]
pub struct RequestIds {
    next: u64,
}

impl Default for RequestIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl RequestIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestId {
        let id = RequestId(self.next);
        self.next += 1;
        id
    }

    /// Make sure `id` can never be issued from here on.
    pub fn observe(&mut self, id: RequestId) {
        if id.0 >= self.next {
            self.next = id.0 + 1;
        }
    }

    pub fn peek_next(&self) -> RequestId {
        RequestId(self.next)
    }
}

/// A pending action against a record. Lower priority values are served
/// first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(rename = "request_id")]
    id: RequestId,
    pub record_key: RecordKey,
    #[serde(rename = "request_type")]
    pub kind: String,
    pub priority: i32,
    #[serde(default)]
    pub details: String,
    pub created_at: DateTime<Utc>,
}

impl Request {
    pub fn new(
        id: RequestId,
        record_key: RecordKey,
        kind: impl Into<String>,
        priority: i32,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id,
            record_key,
            kind: kind.into(),
            priority,
            details: details.into(),
            created_at: Utc::now(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn id(&self) -> RequestId {
        self.id
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Req {:>3}]  Record:{:<6}  Type:{:<15}  Prio:{:<2}  Time:{}",
            self.id.0,
            self.record_key,
            self.kind,
            self.priority,
            self.created_at.format("%Y-%m-%d %H:%M:%S")
        )
    }
}
