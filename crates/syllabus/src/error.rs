#![forbid(unsafe_code)]

//! Unified error type for syllabus builder hosts.
//!
//! Each crate keeps its own typed error. [`Error`] wraps them so a host can
//! propagate any of them with `?` and still match on the one it cares about.
//!
//! Persistence failures during a drop never surface here: the reconciler
//! rolls them back and logs them. [`Error::Persistence`] exists for hosts that
//! call a [`LessonStore`](syllabus_runtime::LessonStore) themselves.

use std::fmt;

use syllabus_core::SyllabusError;
#[cfg(feature = "tracing-json")]
use syllabus_runtime::TelemetryError;
use syllabus_runtime::{ConfigError, PersistenceError, ProviderError};

/// Top-level error type.
#[derive(Debug)]
pub enum Error {
    /// The syllabus breaks a structural invariant.
    Syllabus(SyllabusError),
    /// A store call did not complete.
    Persistence(PersistenceError),
    /// Loading the syllabus failed.
    Provider(ProviderError),
    /// Configuration could not be loaded or is out of range.
    Config(ConfigError),
    /// The log subscriber could not be installed.
    #[cfg(feature = "tracing-json")]
    Telemetry(TelemetryError),
}

impl Error {
    /// Short component name for log fields.
    #[must_use]
    pub const fn component(&self) -> &'static str {
        match self {
            Self::Syllabus(_) => "model",
            Self::Persistence(_) => "persistence",
            Self::Provider(_) => "provider",
            Self::Config(_) => "config",
            #[cfg(feature = "tracing-json")]
            Self::Telemetry(_) => "telemetry",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syllabus(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
            Self::Provider(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            #[cfg(feature = "tracing-json")]
            Self::Telemetry(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Syllabus(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::Provider(err) => Some(err),
            Self::Config(err) => Some(err),
            #[cfg(feature = "tracing-json")]
            Self::Telemetry(err) => Some(err),
        }
    }
}

impl From<SyllabusError> for Error {
    fn from(err: SyllabusError) -> Self {
        Self::Syllabus(err)
    }
}

impl From<PersistenceError> for Error {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}

impl From<ProviderError> for Error {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "tracing-json")]
impl From<TelemetryError> for Error {
    fn from(err: TelemetryError) -> Self {
        Self::Telemetry(err)
    }
}

/// Standard result type for syllabus builder APIs.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use syllabus_core::{CourseId, ModuleId};

    fn load(fail: bool) -> Result<()> {
        if fail {
            Err(ProviderError::NotFound {
                course: CourseId::from("c1"),
            })?;
        }
        Ok(())
    }

    #[test]
    fn question_mark_converts_component_errors() {
        let err = load(true).expect_err("fails");
        assert!(matches!(err, Error::Provider(ProviderError::NotFound { .. })));
        assert_eq!(err.component(), "provider");
        assert_eq!(err.to_string(), "course c1 not found");
        assert!(load(false).is_ok());
    }

    #[test]
    fn source_is_the_wrapped_error() {
        let err = Error::from(SyllabusError::DuplicateModule {
            module: ModuleId::from("m"),
        });
        assert_eq!(err.component(), "model");
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), err.to_string());
    }

    #[test]
    fn config_validation_messages_are_joined() {
        let err = Error::from(ConfigError::Validation(vec!["a".into(), "b".into()]));
        assert_eq!(err.to_string(), "validation errors: a; b");
    }
}
