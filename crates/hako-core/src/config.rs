//! # Lint Configuration
//!
//! The fixed domain constants the checks compare against. Defaults match the
//! Hakoniwa remote API contract; a YAML file can override any subset of
//! them, unknown keys are rejected.
//!
//! ```yaml
//! pdu_meta_data_size: 24
//! time_source_types: [real, virtual, hakoniwa]
//! participant_roles: [conductor, asset]
//! endpoint_file_paths: [pdu_def_path, cache, comm]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Size in bytes of the PDU metadata header every RPC document must declare.
pub const PDU_META_DATA_SIZE: i64 = 24;

/// Constants consulted by the linters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    /// Required value of `rpc.pduMetaDataSize`.
    pub pdu_meta_data_size: i64,
    /// Allowed values of `remote-api.time_source_type`.
    pub time_source_types: Vec<String>,
    /// Allowed values of `remote-api.participants[].role`.
    pub participant_roles: Vec<String>,
    /// Keys of an endpoint file that must name existing paths.
    pub endpoint_file_paths: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            pdu_meta_data_size: PDU_META_DATA_SIZE,
            time_source_types: to_strings(&["real", "virtual", "hakoniwa"]),
            participant_roles: to_strings(&["conductor", "asset"]),
            endpoint_file_paths: to_strings(&["pdu_def_path", "cache", "comm"]),
        }
    }
}

impl LintConfig {
    /// Load overrides from a YAML file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.check(path)?;
        Ok(config)
    }

    pub fn is_time_source_type(&self, value: &str) -> bool {
        self.time_source_types.iter().any(|t| t == value)
    }

    pub fn is_participant_role(&self, value: &str) -> bool {
        self.participant_roles.iter().any(|r| r == value)
    }

    fn check(&self, path: &Path) -> Result<(), ConfigError> {
        let empty = [
            ("time_source_types", self.time_source_types.is_empty()),
            ("participant_roles", self.participant_roles.is_empty()),
        ];
        if let Some((field, _)) = empty.iter().find(|(_, is_empty)| *is_empty) {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                detail: format!("{field} must not be empty"),
            });
        }
        Ok(())
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
