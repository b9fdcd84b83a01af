//! Content digests for records and whole-store snapshots.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::tree::OrderedStore;

pub const STORE_SNAPSHOT_REF_PREFIX: &str = "roster.store.v1:";

/// Hex SHA-256 over a stable field sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    pub fn builder() -> ContentHashBuilder {
        ContentHashBuilder {
            hasher: Sha256::new(),
        }
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Feeds `name:value\n` lines into one hasher.
pub struct ContentHashBuilder {
    hasher: Sha256,
}

impl ContentHashBuilder {
    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.hasher.update(name.as_bytes());
        self.hasher.update(b":");
        self.hasher.update(value.as_bytes());
        self.hasher.update(b"\n");
        self
    }

    pub fn field_int(self, name: &str, value: i64) -> Self {
        self.field(name, &value.to_string())
    }

    pub fn field_bool(self, name: &str, value: bool) -> Self {
        self.field(name, if value { "true" } else { "false" })
    }

    pub fn finish(self) -> ContentHash {
        let hash = self.hasher.finalize();
        ContentHash(format!("{hash:x}"))
    }
}

/// Deterministic reference for the store's current content.
///
/// Depends on the set of records and their attributes, not on tree shape:
/// two stores holding equal records produce the same reference regardless
/// of insertion order.
pub fn store_snapshot_ref(store: &OrderedStore) -> String {
    let mut builder = ContentHash::builder().field_int("count", store.len() as i64);
    for record in store.in_order() {
        builder = builder.field("record", &record.content_hash().0);
    }
    format!("{STORE_SNAPSHOT_REF_PREFIX}{}", builder.finish())
}
