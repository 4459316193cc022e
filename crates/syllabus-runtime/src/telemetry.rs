#![forbid(unsafe_code)]

//! JSON log output for hosts without their own subscriber.
//!
//! ```rust,ignore
//! syllabus_runtime::telemetry::init_json_subscriber("syllabus=info")?;
//! ```
//!
//! `RUST_LOG` overrides the default directive when set.

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Installing the subscriber failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// The default filter directive did not parse.
    InvalidDirective(String),
    /// A global subscriber is already installed.
    AlreadyInstalled(String),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDirective(msg) => write!(f, "invalid filter directive: {msg}"),
            Self::AlreadyInstalled(msg) => write!(f, "subscriber already installed: {msg}"),
        }
    }
}

impl std::error::Error for TelemetryError {}

/// Build the env filter: `RUST_LOG` if set, else `default_directive`.
pub fn env_filter(default_directive: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|err| TelemetryError::InvalidDirective(err.to_string())),
    }
}

/// Install a global JSON subscriber.
pub fn init_json_subscriber(default_directive: &str) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(default_directive)?)
        .with_target(true)
        .try_init()
        .map_err(|err| TelemetryError::AlreadyInstalled(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_directive_is_reported() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(matches!(
            env_filter("syllabus=notalevel"),
            Err(TelemetryError::InvalidDirective(_))
        ));
        assert!(env_filter("syllabus.reconciler=debug").is_ok());
    }
}
