#![forbid(unsafe_code)]

//! Structural checks shared by unit, property, and E2E tests.

use std::collections::BTreeSet;

use syllabus_core::{LessonId, ResourceId, Syllabus};

/// Every lesson id in the syllabus, in display order (duplicates kept).
#[must_use]
pub fn lesson_ids(syllabus: &Syllabus) -> Vec<LessonId> {
    syllabus
        .modules
        .iter()
        .flat_map(|module| module.lessons.iter().map(|lesson| lesson.id.clone()))
        .collect()
}

/// Check that `after` holds exactly the lessons and resources of `before`,
/// each once, and that the model invariants hold.
pub fn check_membership_preserved(before: &Syllabus, after: &Syllabus) -> Result<(), String> {
    after.validate().map_err(|err| err.to_string())?;

    let before_lessons: BTreeSet<LessonId> = lesson_ids(before).into_iter().collect();
    let after_ids = lesson_ids(after);
    let after_lessons: BTreeSet<LessonId> = after_ids.iter().cloned().collect();
    if after_ids.len() != after_lessons.len() {
        return Err("duplicated lesson".into());
    }
    if before_lessons != after_lessons {
        let lost: Vec<_> = before_lessons.difference(&after_lessons).collect();
        let gained: Vec<_> = after_lessons.difference(&before_lessons).collect();
        return Err(format!("lesson set changed: lost {lost:?}, gained {gained:?}"));
    }

    let resources = |s: &Syllabus| -> BTreeSet<ResourceId> {
        s.resources.iter().map(|r| r.id.clone()).collect()
    };
    if resources(before) != resources(after) || before.resources.len() != after.resources.len() {
        return Err("resource set changed".into());
    }

    let modules = |s: &Syllabus| -> Vec<String> {
        s.modules.iter().map(|m| m.id.to_string()).collect()
    };
    if modules(before) != modules(after) {
        return Err("module list changed".into());
    }
    Ok(())
}

/// Panicking form of [`check_membership_preserved`] for tests.
#[track_caller]
pub fn assert_membership_preserved(before: &Syllabus, after: &Syllabus) {
    if let Err(msg) = check_membership_preserved(before, after) {
        panic!("membership not preserved: {msg}");
    }
}

/// Lesson ids of module `module`, as strings.
#[must_use]
pub fn module_lessons(syllabus: &Syllabus, module: &str) -> Vec<String> {
    syllabus
        .modules
        .iter()
        .find(|m| m.id.as_str() == module)
        .map(|m| m.lessons.iter().map(|l| l.id.to_string()).collect())
        .unwrap_or_default()
}
