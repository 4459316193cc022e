#![forbid(unsafe_code)]

//! Runtime for the syllabus builder.
//!
//! - [`reconciler`]: optimistic apply, persist, settle, roll back.
//! - [`persistence`]: store and provider traits plus their error types.
//! - [`session`]: a course editing session tying the pieces together.
//! - [`config`]: policy-as-data configuration.
//! - [`journal`]: bounded record of settled operations.

pub mod config;
pub mod journal;
pub mod persistence;
pub mod reconciler;
pub mod session;
#[cfg(feature = "tracing-json")]
pub mod telemetry;

pub use config::{BuilderConfig, ConfigError, InFlightPolicy, ReconcilerConfig, SessionConfig};
pub use journal::{JournalEntry, JournalResult, OperationJournal};
pub use persistence::{
    CourseDataProvider, LessonStore, PersistResponse, PersistenceError, ProviderError,
    execute_intent, load_validated,
};
pub use reconciler::{
    ApplyOutcome, DispatchOutcome, InFlight, PendingPersist, PersistFailure, Reconciler,
    SettleOutcome, Ticket,
};
pub use session::BuilderSession;
#[cfg(feature = "tracing-json")]
pub use telemetry::{TelemetryError, init_json_subscriber};
