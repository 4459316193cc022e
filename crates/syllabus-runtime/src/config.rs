#![forbid(unsafe_code)]

//! Builder configuration, loadable from TOML or JSON.
//!
//! ```toml
//! # syllabus-builder.toml
//! [reconciler]
//! in_flight = "exclusive"
//! slow_persist_warn_ms = 1500
//! journal_capacity = 64
//!
//! [session]
//! refresh_after_settle = false
//! ```
//!
//! ```rust,ignore
//! let config = BuilderConfig::from_toml_file("syllabus-builder.toml")?.validated()?;
//! ```
//!
//! Every field has a default, so a partial file (or none at all) is fine.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// How the reconciler treats a drop while another persistence call is
/// outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InFlightPolicy {
    /// Accept the drop. Each call keeps its own snapshot; a late failure
    /// restores that snapshot even if newer drops have landed since.
    #[default]
    Overlap,
    /// Reject drops until the outstanding call settles.
    Exclusive,
}

impl InFlightPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overlap => "overlap",
            Self::Exclusive => "exclusive",
        }
    }
}

/// Top-level builder configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub reconciler: ReconcilerConfig,
    pub session: SessionConfig,
}

/// Optimistic reconciler parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Drop handling while a call is in flight. Default: overlap.
    pub in_flight: InFlightPolicy,
    /// Settlements slower than this are logged at warn. Default: 2000.
    pub slow_persist_warn_ms: u64,
    /// Settled operations kept in the journal. Default: 256.
    pub journal_capacity: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            in_flight: InFlightPolicy::Overlap,
            slow_persist_warn_ms: 2_000,
            journal_capacity: 256,
        }
    }
}

/// Builder session parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Reload the syllabus from the provider after every settled call.
    pub refresh_after_settle: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_after_settle: true,
        }
    }
}

impl BuilderConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check parameter ranges. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.reconciler.journal_capacity == 0 {
            errors.push("reconciler.journal_capacity must be > 0".into());
        }

        if self.reconciler.slow_persist_warn_ms == 0 {
            errors.push("reconciler.slow_persist_warn_ms must be > 0".into());
        }

        errors
    }

    /// `self` if valid, otherwise [`ConfigError::Validation`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// One-line JSONL summary for startup logs.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        format!(
            r#"{{"schema":"syllabus-builder-config-v1","in_flight":"{}","slow_persist_warn_ms":{},"journal_capacity":{},"refresh_after_settle":{}}}"#,
            self.reconciler.in_flight.as_str(),
            self.reconciler.slow_persist_warn_ms,
            self.reconciler.journal_capacity,
            self.session.refresh_after_settle,
        )
    }
}

/// Loading or validating a [`BuilderConfig`] failed.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
