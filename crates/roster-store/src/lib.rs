//! # roster-store
//!
//! Record layer for the roster.
//!
//! This crate provides:
//! - `Record` and its append-only `CourseHistory`
//! - `OrderedStore`, an unbalanced arena-backed BST keyed by record key
//! - JSONL read/write (portable persistence, pre-order so shape survives)
//! - attribute validation, content digests and an integrity check
//!
//! ## Data model
//!
//! ```text
//! JSONL (on disk, one line per record, pre-order)
//!     ↕  load_store / save_store
//! OrderedStore (arena of nodes, left < key < right)
//!     └── Record ── CourseHistory (newest first)
//! ```

pub mod digest;
pub mod error;
pub mod history;
pub mod integrity;
pub mod jsonl;
pub mod record;
pub mod tree;
pub mod validation;

pub use digest::{ContentHash, STORE_SNAPSHOT_REF_PREFIX, store_snapshot_ref};
pub use error::StoreError;
pub use history::{CourseAction, CourseEvent, CourseHistory};
pub use integrity::{
    FAILURE_CLASS_COUNT_MISMATCH, FAILURE_CLASS_CYCLE, FAILURE_CLASS_DANGLING,
    FAILURE_CLASS_DUPLICATE_COURSE, FAILURE_CLASS_KEY_ORDER, INTEGRITY_CHECK_KIND,
    IntegrityFinding, IntegrityReport, IntegritySummary, check_store,
};
pub use jsonl::{
    JsonlError, load_store, read_records, read_records_from_path, read_substrate, save_store,
    write_atomic, write_records, write_records_to_path,
};
pub use record::{Record, RecordKey, StudyYear};
pub use tree::{InOrder, OrderedStore, PreOrder};
pub use validation::{
    ValidationError, normalize_course_code, validate_contact, validate_course_code,
};
