#![forbid(unsafe_code)]

//! Drop-target selection with module-aware priority.
//!
//! Generic nearest-center selection tends to resolve a drag over a lesson
//! card to the enclosing module zone, because zones are large and overlap
//! their lessons. The resolver applies a fixed priority instead:
//!
//! 1. An add-lesson affordance in the candidate set wins outright.
//! 2. With a module zone in the set, the nearest-center ranking is searched
//!    for a lesson nested in a colliding zone; such a lesson beats the zone,
//!    otherwise the zone is chosen. A lesson counts as nested when it overlaps
//!    the dragged item itself or [`CollisionInput::nested`] places it inside
//!    one of the colliding zones.
//! 3. Otherwise the nearest-center ranking decides.
//!
//! Runs on every pointer or keyboard tick: pure, allocation-free apart from
//! the returned target, O(candidates + ranking).

use serde::{Deserialize, Serialize};
use syllabus_core::{DropTarget, LessonId, ModuleId, TargetKind};

/// Candidates for one collision-detection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionInput {
    /// Targets geometrically overlapping the dragged item.
    pub colliding: Vec<DropTarget>,
    /// Targets ordered by distance from the dragged item's center.
    pub nearest_center: Vec<DropTarget>,
    /// Lessons known to sit inside a module zone, as `(lesson, module)`.
    #[serde(default)]
    pub nested: Vec<(LessonId, ModuleId)>,
}

impl CollisionInput {
    #[must_use]
    pub fn new(colliding: Vec<DropTarget>, nearest_center: Vec<DropTarget>) -> Self {
        Self {
            colliding,
            nearest_center,
            nested: Vec::new(),
        }
    }

    /// Record that `lesson` is laid out inside `module`'s zone.
    #[must_use]
    pub fn with_nested(mut self, lesson: impl Into<LessonId>, module: impl Into<ModuleId>) -> Self {
        self.nested.push((lesson.into(), module.into()));
        self
    }

    /// True when `lesson` overlaps the dragged item or sits inside a colliding
    /// module zone.
    #[must_use]
    pub fn is_nested_in_colliding_zone(&self, lesson: &LessonId) -> bool {
        self.colliding
            .iter()
            .any(|target| matches!(target, DropTarget::Lesson(id) if id == lesson))
            || self.nested.iter().any(|(nested, module)| {
                nested == lesson
                    && self
                        .colliding
                        .iter()
                        .any(|target| matches!(target, DropTarget::ModuleZone(m) if m == module))
            })
    }

    /// True when neither list offers a target.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colliding.is_empty() && self.nearest_center.is_empty()
    }
}

/// Which priority rule produced the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionRule {
    AddLessonAffordance,
    LessonInsideZone,
    ModuleZone,
    NearestCenter,
}

/// Selected target plus the rule that chose it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionDecision {
    pub target: DropTarget,
    pub rule: CollisionRule,
}

/// Select at most one drop target.
///
/// An empty candidate set yields `None`, and the drag end that follows must
/// be a no-op.
#[must_use]
pub fn resolve_collision(input: &CollisionInput) -> Option<CollisionDecision> {
    if input.colliding.is_empty() {
        return None;
    }

    if let Some(target) = first_of_kind(&input.colliding, TargetKind::AddLessonAffordance) {
        return Some(CollisionDecision {
            target: target.clone(),
            rule: CollisionRule::AddLessonAffordance,
        });
    }

    if let Some(zone) = first_of_kind(&input.colliding, TargetKind::ModuleZone) {
        let nested_lesson = input.nearest_center.iter().find(|target| match target {
            DropTarget::Lesson(id) => input.is_nested_in_colliding_zone(id),
            _ => false,
        });
        let decision = match nested_lesson {
            Some(lesson) => CollisionDecision {
                target: lesson.clone(),
                rule: CollisionRule::LessonInsideZone,
            },
            None => CollisionDecision {
                target: zone.clone(),
                rule: CollisionRule::ModuleZone,
            },
        };
        return Some(decision);
    }

    input
        .nearest_center
        .first()
        .or_else(|| input.colliding.first())
        .map(|target| CollisionDecision {
            target: target.clone(),
            rule: CollisionRule::NearestCenter,
        })
}

fn first_of_kind(targets: &[DropTarget], kind: TargetKind) -> Option<&DropTarget> {
    targets.iter().find(|target| target.kind() == kind)
}

/// Pluggable collision strategy, as registered with the host drag framework.
///
/// The framework contract is a list holding zero or one selected collision.
pub trait CollisionStrategy {
    fn detect(&self, input: &CollisionInput) -> Vec<DropTarget>;
}

/// The module-aware priority strategy described at module level.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyllabusCollisionStrategy;

impl CollisionStrategy for SyllabusCollisionStrategy {
    fn detect(&self, input: &CollisionInput) -> Vec<DropTarget> {
        let decision = resolve_collision(input);
        if let Some(decision) = &decision {
            tracing::trace!(
                target: "syllabus.collision",
                target_id = %decision.target,
                rule = ?decision.rule,
                candidates = input.colliding.len(),
                "collision resolved"
            );
        }
        decision.map(|decision| decision.target).into_iter().collect()
    }
}

/// Plain nearest-center strategy; the baseline the syllabus strategy overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestCenterStrategy;

impl CollisionStrategy for NearestCenterStrategy {
    fn detect(&self, input: &CollisionInput) -> Vec<DropTarget> {
        input.nearest_center.first().cloned().into_iter().collect()
    }
}
