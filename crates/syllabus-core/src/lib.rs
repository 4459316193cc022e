#![forbid(unsafe_code)]

//! Core: syllabus data model and drag identifiers.
//!
//! # Role in the course builder
//! `syllabus-core` owns the shapes every other crate agrees on: the ordered
//! [`Syllabus`] of modules and lessons, the identifier newtypes, and the
//! string encoding the host drag framework uses for draggable items and drop
//! targets.
//!
//! # How it fits in the system
//! `syllabus-dnd` resolves collisions and plans moves over these types;
//! `syllabus-runtime` applies plans optimistically and talks to persistence.
//! Nothing here performs I/O or logging.

pub mod ids;
pub mod syllabus;
pub mod target;

pub use ids::{CourseId, LessonId, ModuleId, ResourceId};
pub use syllabus::{
    Lesson, LessonContent, LessonKind, LessonLocation, Module, Resource, Syllabus, SyllabusError,
};
pub use target::{
    ADD_LESSON_PREFIX, DragItem, DropTarget, MODULE_ZONE_PREFIX, RESOURCE_ID_PREFIX, TargetKind,
    reserved_prefix,
};
