#![forbid(unsafe_code)]

//! Builder session: one course, one provider, one store.
//!
//! Glues the drag tracker to the reconciler and performs persistence calls
//! synchronously through the [`LessonStore`]. Hosts that need the call to run
//! elsewhere drive a [`Reconciler`] directly instead.

use syllabus_core::{CourseId, DropTarget, Syllabus};
use syllabus_dnd::{CollisionInput, DragOverlay, DragSession, DragTracker, plan_move};

use crate::config::{BuilderConfig, SessionConfig};
use crate::persistence::{CourseDataProvider, LessonStore, ProviderError, load_validated};
use crate::reconciler::{DispatchOutcome, Reconciler, SettleOutcome};

/// Editing session for one course.
#[derive(Debug)]
pub struct BuilderSession<P, S> {
    course: CourseId,
    provider: P,
    store: S,
    tracker: DragTracker,
    reconciler: Reconciler,
    config: SessionConfig,
}

impl<P: CourseDataProvider, S: LessonStore> BuilderSession<P, S> {
    /// Load the course syllabus and start a session.
    pub fn load(
        course: CourseId,
        mut provider: P,
        store: S,
        config: &BuilderConfig,
    ) -> Result<Self, ProviderError> {
        let syllabus = load_validated(&mut provider, &course)?;
        tracing::debug!(
            target: "syllabus.session",
            course = %course,
            modules = syllabus.modules.len(),
            lessons = syllabus.lesson_count(),
            "syllabus loaded"
        );
        Ok(Self {
            course,
            provider,
            store,
            tracker: DragTracker::new(),
            reconciler: Reconciler::new(syllabus, config.reconciler.clone()),
            config: config.session.clone(),
        })
    }

    #[must_use]
    pub fn course(&self) -> &CourseId {
        &self.course
    }

    /// The syllabus to render.
    #[must_use]
    pub fn syllabus(&self) -> &Syllabus {
        self.reconciler.current()
    }

    #[must_use]
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    #[must_use]
    pub fn drag(&self) -> Option<&DragSession> {
        self.tracker.session()
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn drag_start(&mut self, active_id: &str) -> &DragSession {
        self.tracker.start(active_id, self.reconciler.current())
    }

    pub fn drag_over(&mut self, input: &CollisionInput) -> Option<&DropTarget> {
        self.tracker.over(input)
    }

    pub fn drag_cancel(&mut self) -> Option<DragSession> {
        self.tracker.cancel()
    }

    /// Finish a drag: plan, apply optimistically, persist, settle.
    ///
    /// Persistence failures are rolled back and logged, never returned.
    pub fn drag_end(&mut self, active_id: &str, over_id: Option<&str>) -> DispatchOutcome {
        let end = self.tracker.end(active_id, over_id);
        let plan = plan_move(self.reconciler.current(), &end.item, end.target.as_ref());
        let outcome = self.reconciler.dispatch(plan, &mut self.store);

        if let DispatchOutcome::Settled(
            SettleOutcome::Confirmed { .. } | SettleOutcome::RolledBack { .. },
        ) = &outcome
            && self.config.refresh_after_settle
            && let Err(err) = self.refresh()
        {
            tracing::warn!(
                target: "syllabus.session",
                course = %self.course,
                error = %err,
                "refresh after settlement failed; keeping current syllabus"
            );
        }
        outcome
    }

    /// Reload the syllabus from the provider, replacing it wholesale.
    ///
    /// On failure the current syllabus is kept.
    pub fn refresh(&mut self) -> Result<(), ProviderError> {
        let syllabus = load_validated(&mut self.provider, &self.course)?;
        self.reconciler.replace_syllabus(syllabus);
        Ok(())
    }

    /// Overlay contents for the item being dragged.
    #[must_use]
    pub fn overlay(&self) -> Option<DragOverlay> {
        self.tracker.overlay(self.reconciler.current())
    }
}
