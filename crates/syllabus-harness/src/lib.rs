#![forbid(unsafe_code)]

//! Test harness for the syllabus builder.
//!
//! - [`backend`]: in-memory store and provider over one shared course, with
//!   scripted replies and a call log.
//! - [`fixtures`]: reference syllabi and framework id lists.
//! - [`invariants`]: membership checks.
//! - [`capture`](mod@capture): a `tracing` layer that records events for assertions.

pub mod backend;
pub mod capture;
pub mod fixtures;
pub mod invariants;

pub use backend::{BackendProvider, FakeBackend, InMemoryLessonStore, Reply, StoreCall};
pub use capture::{CapturedEvent, CapturedEvents, EventCapture, capture};
pub use invariants::{assert_membership_preserved, check_membership_preserved, module_lessons};
