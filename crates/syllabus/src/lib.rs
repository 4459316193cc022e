#![forbid(unsafe_code)]

//! Syllabus builder public facade.
//!
//! Re-exports the model, drag-and-drop, and runtime types that hosts use day
//! to day, plus a [`prelude`].
//!
//! ```rust,ignore
//! use syllabus::prelude::*;
//!
//! let config = BuilderConfig::from_toml_file("syllabus-builder.toml")?.validated()?;
//! let mut session = BuilderSession::load(course, provider, store, &config)?;
//!
//! session.drag_start("lesson-42");
//! session.drag_over(&frame.detect(pointer_rect));
//! session.drag_end("lesson-42", Some("module-zone-core"));
//! render(session.syllabus());
//! ```

pub mod error;

pub use error::{Error, Result};

// --- Model re-exports ------------------------------------------------------

pub use syllabus_core::{
    CourseId, DragItem, DropTarget, Lesson, LessonContent, LessonId, LessonKind, LessonLocation,
    Module, ModuleId, Resource, ResourceId, Syllabus, SyllabusError, TargetKind,
};

// --- Drag-and-drop re-exports ----------------------------------------------

pub use syllabus_dnd::{
    CollisionDecision, CollisionFrame, CollisionInput, CollisionRule, CollisionStrategy,
    DragOverlay, DragSession, DragTracker, MovePlan, NoopReason, PersistIntent, PlanOutcome, Rect,
    SyllabusCollisionStrategy, plan_move, resolve_collision,
};

// --- Runtime re-exports ----------------------------------------------------

pub use syllabus_runtime::{
    ApplyOutcome, BuilderConfig, BuilderSession, ConfigError, CourseDataProvider,
    DispatchOutcome, InFlightPolicy, LessonStore, PendingPersist, PersistFailure,
    PersistResponse, PersistenceError, ProviderError, Reconciler, SettleOutcome, Ticket,
};

#[cfg(feature = "tracing-json")]
pub use syllabus_runtime::init_json_subscriber;

/// Everyday imports.
pub mod prelude {
    pub use crate::{
        BuilderConfig, BuilderSession, CollisionFrame, CollisionInput, CourseDataProvider,
        CourseId, DispatchOutcome, DragItem, DropTarget, Error, LessonStore, PersistResponse,
        Rect, Result, SettleOutcome, Syllabus,
    };

    pub use crate::{core, dnd, runtime};
}

pub use syllabus_core as core;
pub use syllabus_dnd as dnd;
pub use syllabus_runtime as runtime;
