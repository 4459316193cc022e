#![forbid(unsafe_code)]

//! Interfaces to the course data provider and the lesson store.
//!
//! Both sit outside the core. The store exposes exactly two mutations,
//! mirroring the server actions the builder calls:
//!
//! - `reorder_lessons(ids)`: persist the full new order of one module.
//! - `move_lesson_to_module(lesson, module, index)`: move one lesson.
//!
//! Each answers `{ success, error? }`. A transport-level failure (the call
//! itself could not complete) is a [`PersistenceError`]; the reconciler treats
//! both kinds of failure the same way.

use std::fmt;

use serde::{Deserialize, Serialize};
use syllabus_core::{CourseId, LessonId, ModuleId, Syllabus, SyllabusError};
use syllabus_dnd::PersistIntent;

/// Response body of a persistence call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PersistResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }

    /// Decode a server action response body.
    pub fn from_json(body: &str) -> Result<Self, PersistenceError> {
        serde_json::from_str(body).map_err(|err| PersistenceError::Decode(err.to_string()))
    }
}

/// The persistence call could not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Network or server failure.
    Transport(String),
    /// The caller is no longer allowed to edit the course.
    Unauthorized,
    /// The response body was not a valid `{ success, error? }` payload.
    Decode(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport failure: {msg}"),
            Self::Unauthorized => write!(f, "not authorized to edit this course"),
            Self::Decode(msg) => write!(f, "malformed persistence response: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

/// Store-side lesson ordering operations.
pub trait LessonStore {
    /// Persist `lesson_ids` as the complete order of their (single) module.
    fn reorder_lessons(
        &mut self,
        lesson_ids: &[LessonId],
    ) -> Result<PersistResponse, PersistenceError>;

    /// Move `lesson_id` into `target_module_id` at `insertion_index`.
    fn move_lesson_to_module(
        &mut self,
        lesson_id: &LessonId,
        target_module_id: &ModuleId,
        insertion_index: usize,
    ) -> Result<PersistResponse, PersistenceError>;
}

impl<T: LessonStore + ?Sized> LessonStore for &mut T {
    fn reorder_lessons(
        &mut self,
        lesson_ids: &[LessonId],
    ) -> Result<PersistResponse, PersistenceError> {
        (**self).reorder_lessons(lesson_ids)
    }

    fn move_lesson_to_module(
        &mut self,
        lesson_id: &LessonId,
        target_module_id: &ModuleId,
        insertion_index: usize,
    ) -> Result<PersistResponse, PersistenceError> {
        (**self).move_lesson_to_module(lesson_id, target_module_id, insertion_index)
    }
}

/// Issue the store call matching `intent`.
pub fn execute_intent<S: LessonStore + ?Sized>(
    store: &mut S,
    intent: &PersistIntent,
) -> Result<PersistResponse, PersistenceError> {
    match intent {
        PersistIntent::Reorder { lesson_ids, .. } => store.reorder_lessons(lesson_ids),
        PersistIntent::MoveToModule {
            lesson_id,
            target_module_id,
            insertion_index,
        } => store.move_lesson_to_module(lesson_id, target_module_id, *insertion_index),
    }
}

/// Source of syllabus data for a course.
pub trait CourseDataProvider {
    fn load_syllabus(&mut self, course: &CourseId) -> Result<Syllabus, ProviderError>;
}

/// Loading a syllabus failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    NotFound { course: CourseId },
    Unavailable(String),
    /// The provider returned a syllabus that breaks the model invariants.
    Invalid(SyllabusError),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { course } => write!(f, "course {course} not found"),
            Self::Unavailable(msg) => write!(f, "course data unavailable: {msg}"),
            Self::Invalid(err) => write!(f, "invalid syllabus: {err}"),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Invalid(err) = self {
            return Some(err);
        }
        None
    }
}

impl From<SyllabusError> for ProviderError {
    fn from(err: SyllabusError) -> Self {
        Self::Invalid(err)
    }
}

/// Load and validate in one step.
pub fn load_validated<P: CourseDataProvider + ?Sized>(
    provider: &mut P,
    course: &CourseId,
) -> Result<Syllabus, ProviderError> {
    let syllabus = provider.load_syllabus(course)?;
    syllabus.validate()?;
    Ok(syllabus)
}
