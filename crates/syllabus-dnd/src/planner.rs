#![forbid(unsafe_code)]

//! Move planning: from a resolved drop to a new syllabus and a persistence
//! intent.
//!
//! The planner never mutates its input. It returns one of:
//!
//! - [`PlanOutcome::Noop`]: nothing to do, the caller keeps its syllabus and
//!   issues no persistence call.
//! - [`PlanOutcome::LocalOnly`]: a resource-shelf reorder. Resources are not
//!   part of the module/lesson ordering contract, so the new shape is shown
//!   but never persisted.
//! - [`PlanOutcome::Persist`]: a lesson reorder or cross-module move with the
//!   matching [`PersistIntent`].
//!
//! Indices are zero-based. For a move, `insertion_index` is the slot the
//! lesson occupies in the destination module *after* insertion.

use std::fmt;

use serde::{Deserialize, Serialize};
use syllabus_core::{DragItem, DropTarget, LessonId, ModuleId, ResourceId, Syllabus};

/// Persistence call implied by a planned move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PersistIntent {
    /// Persist the full new order of one module. All ids belong to `module_id`.
    Reorder {
        module_id: ModuleId,
        lesson_ids: Vec<LessonId>,
    },
    /// Move one lesson into another module at `insertion_index`.
    MoveToModule {
        lesson_id: LessonId,
        target_module_id: ModuleId,
        insertion_index: usize,
    },
}

impl PersistIntent {
    #[must_use]
    pub const fn kind(&self) -> IntentKind {
        match self {
            Self::Reorder { .. } => IntentKind::Reorder,
            Self::MoveToModule { .. } => IntentKind::MoveToModule,
        }
    }
}

impl fmt::Display for PersistIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reorder {
                module_id,
                lesson_ids,
            } => write!(f, "reorder {module_id} ({} lessons)", lesson_ids.len()),
            Self::MoveToModule {
                lesson_id,
                target_module_id,
                insertion_index,
            } => write!(f, "move {lesson_id} -> {target_module_id}[{insertion_index}]"),
        }
    }
}

/// Stable intent discriminator used in logs and the operation journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Reorder,
    MoveToModule,
}

/// Why a drop produced no change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoopReason {
    /// The resolver selected nothing.
    NoTarget,
    /// Dropped onto itself.
    SelfDrop,
    /// Dropped onto the zone or affordance of its own module.
    SameModuleZone,
    /// Resource onto a lesson/zone, or lesson onto a resource.
    TargetMismatch,
    /// Dragged item is not in the syllabus.
    SourceNotFound { item: DragItem },
    /// Target lesson, module, or resource is not in the syllabus.
    TargetNotFound { target: DropTarget },
}

impl NoopReason {
    /// True when the no-op points at an upstream data-model violation rather
    /// than an ordinary "nothing to do" drop.
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound { .. } | Self::TargetNotFound { .. }
        )
    }
}

impl fmt::Display for NoopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTarget => write!(f, "no drop target"),
            Self::SelfDrop => write!(f, "dropped onto itself"),
            Self::SameModuleZone => write!(f, "dropped onto its own module"),
            Self::TargetMismatch => write!(f, "target does not accept this item"),
            Self::SourceNotFound { item } => write!(f, "dragged item {item} not found"),
            Self::TargetNotFound { target } => write!(f, "drop target {target} not found"),
        }
    }
}

/// A persisted move: the optimistic syllabus and the call that confirms it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub lesson_id: LessonId,
    pub source_module: ModuleId,
    pub syllabus: Syllabus,
    pub intent: PersistIntent,
}

/// Planner result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    Noop(NoopReason),
    LocalOnly(Syllabus),
    Persist(MovePlan),
}

impl PlanOutcome {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::Noop(_))
    }

    /// The persistence intent, if any.
    #[must_use]
    pub fn intent(&self) -> Option<&PersistIntent> {
        match self {
            Self::Persist(plan) => Some(&plan.intent),
            Self::Noop(_) | Self::LocalOnly(_) => None,
        }
    }

    /// Syllabus to display after the drop (`base` for a no-op).
    #[must_use]
    pub fn syllabus_or<'a>(&'a self, base: &'a Syllabus) -> &'a Syllabus {
        match self {
            Self::Noop(_) => base,
            Self::LocalOnly(syllabus) => syllabus,
            Self::Persist(plan) => &plan.syllabus,
        }
    }
}

/// Plan the result of dropping `item` onto `target`.
#[must_use]
pub fn plan_move(syllabus: &Syllabus, item: &DragItem, target: Option<&DropTarget>) -> PlanOutcome {
    let outcome = match target {
        None => PlanOutcome::Noop(NoopReason::NoTarget),
        Some(target) if target.is_item(item) => PlanOutcome::Noop(NoopReason::SelfDrop),
        Some(target) => match item {
            DragItem::Lesson(lesson) => plan_lesson_move(syllabus, item, lesson, target),
            DragItem::Resource(resource) => plan_resource_reorder(syllabus, item, resource, target),
        },
    };

    match &outcome {
        PlanOutcome::Noop(reason) if reason.is_invariant_violation() => tracing::warn!(
            target: "syllabus.planner",
            item = %item,
            reason = %reason,
            "drop ignored: syllabus does not match drag state"
        ),
        PlanOutcome::Noop(reason) => tracing::debug!(
            target: "syllabus.planner",
            item = %item,
            reason = %reason,
            "drop is a no-op"
        ),
        PlanOutcome::LocalOnly(_) => tracing::debug!(
            target: "syllabus.planner",
            item = %item,
            "resource reorder planned (not persisted)"
        ),
        PlanOutcome::Persist(plan) => tracing::debug!(
            target: "syllabus.planner",
            item = %item,
            intent = %plan.intent,
            "move planned"
        ),
    }
    outcome
}

fn plan_lesson_move(
    syllabus: &Syllabus,
    item: &DragItem,
    lesson: &LessonId,
    target: &DropTarget,
) -> PlanOutcome {
    let Some(source) = syllabus.locate_lesson(lesson) else {
        return PlanOutcome::Noop(NoopReason::SourceNotFound { item: item.clone() });
    };
    let source_module = syllabus.modules[source.module_index].id.clone();

    let (target_module_index, target_slot) = match target {
        DropTarget::ModuleZone(module) | DropTarget::AddLessonAffordance(module) => {
            let Some(index) = syllabus.module_index(module) else {
                return PlanOutcome::Noop(NoopReason::TargetNotFound {
                    target: target.clone(),
                });
            };
            if index == source.module_index {
                return PlanOutcome::Noop(NoopReason::SameModuleZone);
            }
            (index, None)
        }
        DropTarget::Lesson(target_lesson) => {
            let Some(location) = syllabus.locate_lesson(target_lesson) else {
                return PlanOutcome::Noop(NoopReason::TargetNotFound {
                    target: target.clone(),
                });
            };
            (location.module_index, Some(location.lesson_index))
        }
        DropTarget::Resource(_) => return PlanOutcome::Noop(NoopReason::TargetMismatch),
    };

    let mut next = syllabus.clone();

    if target_module_index == source.module_index {
        // Only a lesson target reaches here; zone drops on the own module
        // returned above.
        let Some(new_index) = target_slot else {
            return PlanOutcome::Noop(NoopReason::SameModuleZone);
        };
        let module = &mut next.modules[source.module_index];
        array_move(&mut module.lessons, source.lesson_index, new_index);
        let intent = PersistIntent::Reorder {
            module_id: module.id.clone(),
            lesson_ids: module.lesson_ids(),
        };
        return PlanOutcome::Persist(MovePlan {
            lesson_id: lesson.clone(),
            source_module,
            syllabus: next,
            intent,
        });
    }

    let moved = next.modules[source.module_index]
        .lessons
        .remove(source.lesson_index);
    let destination = &mut next.modules[target_module_index];
    let insertion_index = match target_slot {
        Some(slot) => {
            destination.lessons.insert(slot, moved);
            slot
        }
        None => {
            destination.lessons.push(moved);
            destination.lessons.len() - 1
        }
    };
    let intent = PersistIntent::MoveToModule {
        lesson_id: lesson.clone(),
        target_module_id: destination.id.clone(),
        insertion_index,
    };
    PlanOutcome::Persist(MovePlan {
        lesson_id: lesson.clone(),
        source_module,
        syllabus: next,
        intent,
    })
}

fn plan_resource_reorder(
    syllabus: &Syllabus,
    item: &DragItem,
    resource: &ResourceId,
    target: &DropTarget,
) -> PlanOutcome {
    let DropTarget::Resource(target_resource) = target else {
        return PlanOutcome::Noop(NoopReason::TargetMismatch);
    };
    let Some(old_index) = syllabus.resource_index(resource) else {
        return PlanOutcome::Noop(NoopReason::SourceNotFound { item: item.clone() });
    };
    let Some(new_index) = syllabus.resource_index(target_resource) else {
        return PlanOutcome::Noop(NoopReason::TargetNotFound {
            target: target.clone(),
        });
    };
    let mut next = syllabus.clone();
    array_move(&mut next.resources, old_index, new_index);
    PlanOutcome::LocalOnly(next)
}

/// Relocate `items[from]` to index `to`, shifting everything between by one.
///
/// Out-of-range indices leave the slice untouched.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}
