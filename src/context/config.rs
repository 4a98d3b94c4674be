//! Validation configuration
//!
//! Every field has a serde default so partial JSON documents load.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::outcome::DuplicatePolicy;
use crate::schema::{SchemaError, SchemaResult};

/// Settings for a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Evaluate group and member passes on the rayon pool (default: false)
    #[serde(default)]
    pub parallel: bool,

    /// Minimum node × member-assertion cells before the member pass fans out (default: 64)
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Longest chain of schema references followed before giving up (default: 32)
    #[serde(default = "default_max_reference_depth")]
    pub max_reference_depth: usize,

    /// Duplicate handling for possible-tag collections (default: keep)
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,

    /// Log begin/complete records around each top-level run (default: true)
    #[serde(default = "default_trace_validation")]
    pub trace_validation: bool,
}

fn default_parallel_threshold() -> usize {
    64
}

fn default_max_reference_depth() -> usize {
    32
}

fn default_trace_validation() -> bool {
    true
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            parallel_threshold: default_parallel_threshold(),
            max_reference_depth: default_max_reference_depth(),
            duplicate_policy: DuplicatePolicy::default(),
            trace_validation: default_trace_validation(),
        }
    }
}

impl ValidationConfig {
    /// Default settings with parallel evaluation switched on
    pub fn parallel() -> Self {
        Self {
            parallel: true,
            ..Self::default()
        }
    }

    /// Parse from a JSON document
    pub fn from_json_str(json: &str) -> SchemaResult<Self> {
        serde_json::from_str(json).map_err(|e| SchemaError::InvalidConfig(e.to_string()))
    }

    /// Read and parse a JSON config file
    pub fn from_file(path: &Path) -> SchemaResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::InvalidConfig(format!("failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    /// Whether a member pass with this many cells should run in parallel
    pub fn fans_out(&self, cells: usize) -> bool {
        self.parallel && cells >= self.parallel_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ValidationConfig::default();
        assert!(!config.parallel);
        assert_eq!(config.parallel_threshold, 64);
        assert_eq!(config.max_reference_depth, 32);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Keep);
        assert!(config.trace_validation);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ValidationConfig::from_json_str(r#"{ "parallel": true }"#).unwrap();
        assert!(config.parallel);
        assert_eq!(config.max_reference_depth, 32);
    }

    #[test]
    fn test_duplicate_policy_from_json() {
        let config =
            ValidationConfig::from_json_str(r#"{ "duplicate_policy": "collapse" }"#).unwrap();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Collapse);
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = ValidationConfig::from_json_str("{ parallel: yes").unwrap_err();
        assert_eq!(err.code(), "SCHEMA_INVALID_CONFIG");
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_reference_depth": 4, "trace_validation": false }}"#).unwrap();

        let config = ValidationConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_reference_depth, 4);
        assert!(!config.trace_validation);
    }

    #[test]
    fn test_missing_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = ValidationConfig::from_file(&dir.path().join("absent.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_fans_out_respects_threshold() {
        let config = ValidationConfig::parallel();
        assert!(!config.fans_out(10));
        assert!(config.fans_out(64));
        assert!(!ValidationConfig::default().fans_out(1000));
    }
}
