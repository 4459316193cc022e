#![forbid(unsafe_code)]

//! In-memory course backend.
//!
//! [`FakeBackend`] holds the server-side copy of one course. It hands out a
//! [`InMemoryLessonStore`] (the two persistence calls) and a
//! [`BackendProvider`] (loads) that share that copy, so a refresh after a
//! confirmed call observes what the store persisted.
//!
//! Replies are scripted per call; with an empty script every call succeeds
//! and is applied.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use syllabus_core::{CourseId, LessonId, ModuleId, Syllabus};
use syllabus_runtime::{
    CourseDataProvider, LessonStore, PersistResponse, PersistenceError, ProviderError,
};

/// One persistence call as the store received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Reorder {
        lesson_ids: Vec<LessonId>,
    },
    MoveToModule {
        lesson_id: LessonId,
        target_module_id: ModuleId,
        insertion_index: usize,
    },
}

impl StoreCall {
    #[must_use]
    pub fn move_to_module(lesson: &str, module: &str, index: usize) -> Self {
        Self::MoveToModule {
            lesson_id: LessonId::from(lesson),
            target_module_id: ModuleId::from(module),
            insertion_index: index,
        }
    }

    #[must_use]
    pub fn reorder(lessons: &[&str]) -> Self {
        Self::Reorder {
            lesson_ids: lessons.iter().copied().map(LessonId::from).collect(),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Reorder { lesson_ids } => serde_json::json!({
                "call": "reorderLessons",
                "lessonIds": lesson_ids.iter().map(LessonId::as_str).collect::<Vec<_>>(),
            }),
            Self::MoveToModule {
                lesson_id,
                target_module_id,
                insertion_index,
            } => serde_json::json!({
                "call": "moveLessonToModule",
                "lessonId": lesson_id.as_str(),
                "moduleId": target_module_id.as_str(),
                "index": insertion_index,
            }),
        }
    }
}

/// Scripted answer for the next store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Apply the change and answer `{ success: true }`.
    Succeed,
    /// Leave the course unchanged and answer `{ success: false, error }`.
    Reject(String),
    /// Leave the course unchanged and fail the call itself.
    Error(PersistenceError),
}

#[derive(Debug)]
struct BackendState {
    course: CourseId,
    syllabus: Syllabus,
    calls: Vec<StoreCall>,
    replies: VecDeque<Reply>,
    loads: usize,
    failing_loads: usize,
}

/// Shared server-side state for one course.
#[derive(Debug, Clone)]
pub struct FakeBackend {
    state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    #[must_use]
    pub fn new(course: impl Into<CourseId>, syllabus: Syllabus) -> Self {
        Self {
            state: Arc::new(Mutex::new(BackendState {
                course: course.into(),
                syllabus,
                calls: Vec::new(),
                replies: VecDeque::new(),
                loads: 0,
                failing_loads: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn store(&self) -> InMemoryLessonStore {
        InMemoryLessonStore {
            backend: self.clone(),
        }
    }

    #[must_use]
    pub fn provider(&self) -> BackendProvider {
        BackendProvider {
            backend: self.clone(),
        }
    }

    #[must_use]
    pub fn course(&self) -> CourseId {
        self.lock().course.clone()
    }

    /// Server-side syllabus.
    #[must_use]
    pub fn syllabus(&self) -> Syllabus {
        self.lock().syllabus.clone()
    }

    /// Overwrite the server-side syllabus (another editor saved).
    pub fn set_syllabus(&self, syllabus: Syllabus) {
        self.lock().syllabus = syllabus;
    }

    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    #[must_use]
    pub fn loads(&self) -> usize {
        self.lock().loads
    }

    pub fn push_reply(&self, reply: Reply) {
        self.lock().replies.push_back(reply);
    }

    pub fn reject_next(&self, message: impl Into<String>) {
        self.push_reply(Reply::Reject(message.into()));
    }

    pub fn error_next(&self, err: PersistenceError) {
        self.push_reply(Reply::Error(err));
    }

    /// Make the next `n` loads fail with [`ProviderError::Unavailable`].
    pub fn fail_loads(&self, n: usize) {
        self.lock().failing_loads = n;
    }

    /// Received calls as JSON lines.
    #[must_use]
    pub fn call_log_jsonl(&self) -> String {
        self.lock()
            .calls
            .iter()
            .map(|call| format!("{}\n", call.to_json()))
            .collect()
    }

    fn handle(&self, call: StoreCall) -> Result<PersistResponse, PersistenceError> {
        let mut state = self.lock();
        state.calls.push(call.clone());
        let reply = state.replies.pop_front().unwrap_or(Reply::Succeed);
        tracing::trace!(
            target: "syllabus.harness",
            call = ?call,
            reply = ?reply,
            "store call"
        );
        match reply {
            Reply::Succeed => Ok(match apply_call(&mut state.syllabus, &call) {
                Ok(()) => PersistResponse::ok(),
                Err(msg) => PersistResponse::failed(msg),
            }),
            Reply::Reject(msg) => Ok(PersistResponse::failed(msg)),
            Reply::Error(err) => Err(err),
        }
    }
}

/// Apply a call to the server copy, with the checks a real backend makes.
fn apply_call(syllabus: &mut Syllabus, call: &StoreCall) -> Result<(), String> {
    match call {
        StoreCall::Reorder { lesson_ids } => {
            let Some(first) = lesson_ids.first() else {
                return Ok(());
            };
            let location = syllabus
                .locate_lesson(first)
                .ok_or_else(|| "Lesson not found".to_string())?;
            let module = &mut syllabus.modules[location.module_index];
            let mut current = module.lesson_ids();
            let mut requested = lesson_ids.clone();
            current.sort();
            requested.sort();
            if current != requested {
                return Err("Lessons must cover exactly one module".into());
            }
            let mut reordered = Vec::with_capacity(lesson_ids.len());
            for id in lesson_ids {
                if let Some(index) = module.lesson_index(id) {
                    reordered.push(module.lessons[index].clone());
                }
            }
            module.lessons = reordered;
            Ok(())
        }
        StoreCall::MoveToModule {
            lesson_id,
            target_module_id,
            insertion_index,
        } => {
            let target = syllabus
                .module_index(target_module_id)
                .ok_or_else(|| "Module not found".to_string())?;
            let source = syllabus
                .locate_lesson(lesson_id)
                .ok_or_else(|| "Lesson not found".to_string())?;
            let lesson = syllabus.modules[source.module_index]
                .lessons
                .remove(source.lesson_index);
            let lessons = &mut syllabus.modules[target].lessons;
            let index = (*insertion_index).min(lessons.len());
            lessons.insert(index, lesson);
            Ok(())
        }
    }
}

/// The backend's persistence endpoint.
#[derive(Debug, Clone)]
pub struct InMemoryLessonStore {
    backend: FakeBackend,
}

impl InMemoryLessonStore {
    #[must_use]
    pub fn backend(&self) -> &FakeBackend {
        &self.backend
    }
}

impl LessonStore for InMemoryLessonStore {
    fn reorder_lessons(
        &mut self,
        lesson_ids: &[LessonId],
    ) -> Result<PersistResponse, PersistenceError> {
        self.backend.handle(StoreCall::Reorder {
            lesson_ids: lesson_ids.to_vec(),
        })
    }

    fn move_lesson_to_module(
        &mut self,
        lesson_id: &LessonId,
        target_module_id: &ModuleId,
        insertion_index: usize,
    ) -> Result<PersistResponse, PersistenceError> {
        self.backend.handle(StoreCall::MoveToModule {
            lesson_id: lesson_id.clone(),
            target_module_id: target_module_id.clone(),
            insertion_index,
        })
    }
}

/// The backend's load endpoint.
#[derive(Debug, Clone)]
pub struct BackendProvider {
    backend: FakeBackend,
}

impl CourseDataProvider for BackendProvider {
    fn load_syllabus(&mut self, course: &CourseId) -> Result<Syllabus, ProviderError> {
        let mut state = self.backend.lock();
        state.loads += 1;
        if &state.course != course {
            return Err(ProviderError::NotFound {
                course: course.clone(),
            });
        }
        if state.failing_loads > 0 {
            state.failing_loads -= 1;
            return Err(ProviderError::Unavailable("backend offline".into()));
        }
        Ok(state.syllabus.clone())
    }
}
