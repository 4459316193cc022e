#![forbid(unsafe_code)]

//! Ephemeral drag session tracking.
//!
//! [`DragTracker`] mirrors the host framework's lifecycle callbacks:
//!
//! ```text
//! Idle --start--> Dragging --over*--> Dragging --end/cancel--> Idle
//! ```
//!
//! The session holds the active item and its source module for overlay
//! rendering. It is cleared on every end or cancel and never persisted.

use syllabus_core::{DragItem, DropTarget, ModuleId, Syllabus};

use crate::collision::{CollisionInput, CollisionStrategy, SyllabusCollisionStrategy};

/// State of an in-progress drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    /// Item being dragged.
    pub item: DragItem,
    /// Module the item was lifted from (`None` for resources).
    pub source_module: Option<ModuleId>,
    /// Target selected by the most recent collision pass.
    pub over: Option<DropTarget>,
}

/// Drop reported by the framework at drag end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEnd {
    pub item: DragItem,
    pub target: Option<DropTarget>,
}

/// What the drag overlay shows for the lifted item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragOverlay {
    pub item: DragItem,
    pub title: String,
    /// `"Module 2 · Lesson 3"` for lessons.
    pub position_label: Option<String>,
}

/// Drag lifecycle tracker parameterized by collision strategy.
#[derive(Debug, Clone, Default)]
pub struct DragTracker<S = SyllabusCollisionStrategy> {
    strategy: S,
    session: Option<DragSession>,
}

impl DragTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: CollisionStrategy> DragTracker<S> {
    #[must_use]
    pub fn with_strategy(strategy: S) -> Self {
        Self {
            strategy,
            session: None,
        }
    }

    /// Begin a drag of the element with framework id `active_id`.
    ///
    /// A session left over from a gesture that never ended is replaced.
    pub fn start(&mut self, active_id: &str, syllabus: &Syllabus) -> &DragSession {
        let item = DragItem::parse(active_id);
        let source_module = item
            .as_lesson()
            .and_then(|lesson| syllabus.module_of(lesson))
            .map(|module| module.id.clone());
        if let Some(stale) = self.session.take() {
            tracing::debug!(
                target: "syllabus.drag",
                stale_item = %stale.item,
                "replacing unfinished drag session"
            );
        }
        tracing::trace!(
            target: "syllabus.drag",
            item = %item,
            source_module = ?source_module.as_ref().map(ModuleId::as_str),
            "drag started"
        );
        self.session.insert(DragSession {
            item,
            source_module,
            over: None,
        })
    }

    /// Run one collision pass. Returns the currently selected target.
    pub fn over(&mut self, input: &CollisionInput) -> Option<&DropTarget> {
        let session = self.session.as_mut()?;
        session.over = self.strategy.detect(input).into_iter().next();
        session.over.as_ref()
    }

    /// Abort the drag without dropping.
    pub fn cancel(&mut self) -> Option<DragSession> {
        self.session.take()
    }

    /// Finish the drag. `over_id` is the framework's resolved target id.
    ///
    /// The framework ids are authoritative; the session is cleared either way.
    pub fn end(&mut self, active_id: &str, over_id: Option<&str>) -> DragEnd {
        let item = DragItem::parse(active_id);
        if let Some(session) = self.session.take()
            && session.item != item
        {
            tracing::debug!(
                target: "syllabus.drag",
                session_item = %session.item,
                item = %item,
                "drag end does not match the tracked session"
            );
        }
        DragEnd {
            item,
            target: over_id.map(DropTarget::parse),
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Overlay contents for the lifted item, if it still exists.
    #[must_use]
    pub fn overlay(&self, syllabus: &Syllabus) -> Option<DragOverlay> {
        let session = self.session.as_ref()?;
        match &session.item {
            DragItem::Lesson(lesson) => Some(DragOverlay {
                item: session.item.clone(),
                title: syllabus.lesson(lesson)?.title.clone(),
                position_label: syllabus.position_label(lesson),
            }),
            DragItem::Resource(resource) => {
                let index = syllabus.resource_index(resource)?;
                Some(DragOverlay {
                    item: session.item.clone(),
                    title: syllabus.resources[index].title.clone(),
                    position_label: None,
                })
            }
        }
    }
}
