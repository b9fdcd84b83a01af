//! # roster-registry
//!
//! One owned context over the record store, the request queue and its
//! undo/redo journal, plus the ambient pieces around it: TOML
//! configuration, tracing setup and a unified error type.
//!
//! ```text
//! RegistryConfig ──▶ Registry::open
//!                      ├── OrderedStore   ◀──▶ records.jsonl
//!                      ├── PriorityQueue  ◀──▶ requests.json
//!                      ├── MutationLog    (in memory only)
//!                      └── RequestIds
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod registry;

pub use config::{ConfigError, RegistryConfig};
pub use error::RegistryError;
pub use logging::init_logging;
pub use registry::{NewRequest, Registry};
