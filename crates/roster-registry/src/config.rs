//! Registry configuration, read from TOML.
//!
//! ```toml
//! records_path = ".roster/records.jsonl"
//! requests_path = ".roster/requests.json"
//! validate_fields = true
//! log_filter = "info"
//! ```
//!
//! Every key is optional; unknown keys are rejected.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub records_path: PathBuf,
    pub requests_path: PathBuf,
    /// Check contact and course-code formats on create and enroll.
    pub validate_fields: bool,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            records_path: PathBuf::from(".roster/records.jsonl"),
            requests_path: PathBuf::from(".roster/requests.json"),
            validate_fields: true,
            log_filter: "info".to_string(),
        }
    }
}

impl RegistryConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Self::parse(raw, "<inline>")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw, &path.display().to_string())
    }

    fn parse(raw: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::ParseToml {
            path: origin.to_string(),
            source,
        })
    }

    /// Both data files under `dir`, keeping the other settings.
    pub fn rooted_at(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.records_path = dir.join("records.jsonl");
        self.requests_path = dir.join("requests.json");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = RegistryConfig::from_toml_str("").expect("empty config should parse");
        assert_eq!(config, RegistryConfig::default());
        assert!(config.validate_fields);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn partial_document_overrides_named_keys() {
        let config = RegistryConfig::from_toml_str(
            "records_path = \"/tmp/r.jsonl\"\nvalidate_fields = false\n",
        )
        .expect("config should parse");
        assert_eq!(config.records_path, PathBuf::from("/tmp/r.jsonl"));
        assert!(!config.validate_fields);
        assert_eq!(config.requests_path, PathBuf::from(".roster/requests.json"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = RegistryConfig::from_toml_str("record_path = \"typo\"\n")
            .expect_err("unknown key must fail");
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = RegistryConfig::load("/nonexistent/roster.toml").expect_err("missing file");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
