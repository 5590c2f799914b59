//! Validation configuration.
//!
//! Loaded from an optional TOML file, then overridden from the environment.
//! Every field has a default, so an empty file is a valid configuration.

use crate::{ConfigError, RecordId, CURRENT_SCHEMA_VERSION, MAX_ROW_ID};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Embedding dimensionality used by the reference deployment.
pub const DEFAULT_VECTOR_DIMENSIONS: usize = 1024;

/// How a PII record without a legal basis is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegalBasisPolicy {
    /// Reported as a warning; the record is still accepted
    #[default]
    Advisory,
    /// Reported as an error; the record is rejected
    Blocking,
}

impl fmt::Display for LegalBasisPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegalBasisPolicy::Advisory => write!(f, "advisory"),
            LegalBasisPolicy::Blocking => write!(f, "blocking"),
        }
    }
}

impl FromStr for LegalBasisPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "advisory" => Ok(LegalBasisPolicy::Advisory),
            "blocking" => Ok(LegalBasisPolicy::Blocking),
            other => Err(ConfigError::InvalidValue {
                field: "legal_basis_policy",
                reason: format!("expected 'advisory' or 'blocking', got '{other}'"),
            }),
        }
    }
}

/// Configuration for validation and storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AidocConfig {
    /// Required length of every embedding vector. `0` disables the check.
    pub vector_dimensions: usize,
    pub legal_basis_policy: LegalBasisPolicy,
    /// Upper bound for externally allocated row ids.
    pub max_row_id: RecordId,
    /// Version stamped on records that do not carry one.
    pub schema_version: String,
}

impl Default for AidocConfig {
    fn default() -> Self {
        Self {
            vector_dimensions: DEFAULT_VECTOR_DIMENSIONS,
            legal_basis_policy: LegalBasisPolicy::Advisory,
            max_row_id: MAX_ROW_ID,
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
        }
    }
}

impl AidocConfig {
    /// Load configuration: file (if given) or defaults, then environment
    /// overrides, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AidocConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Defaults overridden from the process environment.
    ///
    /// Environment variables:
    /// - `AIDOC_VECTOR_DIMENSIONS`: required vector length, `0` disables (default: 1024)
    /// - `AIDOC_LEGAL_BASIS_POLICY`: "advisory" or "blocking" (default: advisory)
    /// - `AIDOC_MAX_ROW_ID`: largest accepted row id (default: 2^48 - 1)
    /// - `AIDOC_SCHEMA_VERSION`: schema version string (default: 1.0.0-tier1)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `AIDOC_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("AIDOC_VECTOR_DIMENSIONS") {
            self.vector_dimensions = parse_number(&raw, "vector_dimensions")?;
        }
        if let Some(raw) = lookup("AIDOC_LEGAL_BASIS_POLICY") {
            self.legal_basis_policy = raw.parse()?;
        }
        if let Some(raw) = lookup("AIDOC_MAX_ROW_ID") {
            self.max_row_id = parse_number(&raw, "max_row_id")?;
        }
        if let Some(raw) = lookup("AIDOC_SCHEMA_VERSION") {
            self.schema_version = raw.trim().to_string();
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_row_id < 1 {
            return Err(ConfigError::InvalidValue {
                field: "max_row_id",
                reason: "must be >= 1".to_string(),
            });
        }
        if self.schema_version.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "schema_version",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Whether embedding vector lengths are enforced.
    pub fn checks_vector_dimensions(&self) -> bool {
        self.vector_dimensions > 0
    }
}

fn parse_number<T: FromStr>(raw: &str, field: &'static str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field,
        reason: format!("'{raw}' is not a valid number"),
    })
}
