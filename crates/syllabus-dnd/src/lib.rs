#![forbid(unsafe_code)]

//! Drag-and-drop logic for the syllabus builder.
//!
//! - [`collision`]: module-aware drop-target priority, pluggable as a
//!   [`CollisionStrategy`].
//! - [`geometry`]: candidate sets and nearest-center ranking from measured
//!   rectangles.
//! - [`planner`]: new syllabus shape plus persistence intent for a drop.
//! - [`session`]: drag lifecycle and overlay state.
//!
//! Everything here is synchronous and side-effect free apart from `tracing`
//! diagnostics; applying plans and talking to persistence is the job of
//! `syllabus-runtime`.

pub mod collision;
pub mod geometry;
pub mod planner;
pub mod session;

pub use collision::{
    CollisionDecision, CollisionInput, CollisionRule, CollisionStrategy, NearestCenterStrategy,
    SyllabusCollisionStrategy, resolve_collision,
};
pub use geometry::{CollisionFrame, Rect, RegisteredTarget};
pub use planner::{
    IntentKind, MovePlan, NoopReason, PersistIntent, PlanOutcome, array_move, plan_move,
};
pub use session::{DragEnd, DragOverlay, DragSession, DragTracker};
