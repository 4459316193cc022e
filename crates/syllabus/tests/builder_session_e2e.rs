//! End-to-end: a pointer drag over a laid-out course, through the facade.
//!
//! Course: Intro `[L1, L2]`, Core `[L3]`. Dragging L2 over L3 persists exactly
//! one `moveLessonToModule("L2", "Core", 0)`; when the store rejects it the
//! course reverts and a warning names the failed call.

use syllabus::prelude::*;
use syllabus::{CollisionRule, ModuleId, resolve_collision};
use syllabus_harness::{FakeBackend, StoreCall, capture, fixtures, module_lessons};

/// Stack module zones vertically; each lesson card is 40 high, the add-lesson
/// affordance sits under the last card.
fn layout(syllabus: &Syllabus) -> CollisionFrame {
    let mut frame = CollisionFrame::new();
    let mut y = 0.0;
    for module in &syllabus.modules {
        let height = 40.0 * (module.lessons.len() as f32 + 1.0) + 8.0;
        frame.register(
            DropTarget::ModuleZone(module.id.clone()),
            Rect::new(0.0, y, 400.0, height),
        );
        for (index, lesson) in module.lessons.iter().enumerate() {
            frame.register(
                DropTarget::Lesson(lesson.id.clone()),
                Rect::new(8.0, y + 4.0 + 40.0 * index as f32, 384.0, 36.0),
            );
        }
        frame.register(
            DropTarget::AddLessonAffordance(module.id.clone()),
            Rect::new(8.0, y + 4.0 + 40.0 * module.lessons.len() as f32, 384.0, 36.0),
        );
        y += height + 16.0;
    }
    frame
}

fn open(backend: &FakeBackend) -> BuilderSession<syllabus_harness::BackendProvider, syllabus_harness::InMemoryLessonStore> {
    BuilderSession::load(
        CourseId::from("course"),
        backend.provider(),
        backend.store(),
        &BuilderConfig::default(),
    )
    .expect("load")
}

/// Card-sized rect centered on L3's card.
fn pointer_over_l3(frame: &CollisionFrame) -> CollisionInput {
    // Intro zone: 0..128, gap 16, Core zone starts at 144; L3 card at 148.
    let active = Rect::new(10.0, 150.0, 380.0, 36.0);
    let input = frame.detect(active);
    let decision = resolve_collision(&input).expect("a target");
    assert_eq!(decision.rule, CollisionRule::LessonInsideZone);
    input
}

#[test]
fn drag_l2_onto_l3_moves_it_to_core() {
    let backend = FakeBackend::new("course", fixtures::intro_core());
    let mut session = open(&backend);
    let frame = layout(session.syllabus());

    session.drag_start("L2");
    let over = session
        .drag_over(&pointer_over_l3(&frame))
        .map(DropTarget::dom_id)
        .expect("selected target");
    assert_eq!(over, "L3");

    let outcome = session.drag_end("L2", Some(over.as_str()));
    assert!(matches!(
        outcome,
        DispatchOutcome::Settled(SettleOutcome::Confirmed { .. })
    ));
    assert_eq!(module_lessons(session.syllabus(), "Intro"), vec!["L1"]);
    assert_eq!(module_lessons(session.syllabus(), "Core"), vec!["L2", "L3"]);
    assert_eq!(
        backend.calls(),
        vec![StoreCall::move_to_module("L2", "Core", 0)]
    );
}

#[test]
fn rejected_move_reverts_and_warns() {
    let backend = FakeBackend::new("course", fixtures::intro_core());
    backend.reject_next("Lesson not found");
    let mut session = open(&backend);
    let frame = layout(session.syllabus());

    let events = capture(|| {
        session.drag_start("L2");
        session.drag_over(&pointer_over_l3(&frame));
        let outcome = session.drag_end("L2", Some("L3"));
        assert!(matches!(
            outcome,
            DispatchOutcome::Settled(SettleOutcome::RolledBack { .. })
        ));
    });

    assert_eq!(session.syllabus(), &fixtures::intro_core());
    assert_eq!(backend.calls().len(), 1);
    let warnings = events.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field("intent"), Some("move L2 -> Core[0]"));
}

#[test]
fn drop_on_empty_space_is_a_noop() {
    let backend = FakeBackend::new("course", fixtures::intro_core());
    let mut session = open(&backend);
    let frame = layout(session.syllabus());

    session.drag_start("L1");
    let input = frame.detect(Rect::new(900.0, 900.0, 10.0, 10.0));
    assert!(session.drag_over(&input).is_none());
    let outcome = session.drag_end("L1", None);
    assert!(matches!(outcome, DispatchOutcome::Noop(_)));
    assert!(backend.calls().is_empty());
}

#[test]
fn hovering_add_lesson_appends() {
    let backend = FakeBackend::new("course", fixtures::intro_core());
    let mut session = open(&backend);
    let frame = layout(session.syllabus());

    session.drag_start("L1");
    // Core add-lesson affordance: 144 + 4 + 40 = 188.
    let input = frame.detect(Rect::new(10.0, 190.0, 380.0, 30.0));
    let over = session.drag_over(&input).cloned();
    assert_eq!(
        over,
        Some(DropTarget::AddLessonAffordance(ModuleId::from("Core")))
    );
    session.drag_end("L1", over.as_ref().map(DropTarget::dom_id).as_deref());
    assert_eq!(module_lessons(session.syllabus(), "Core"), vec!["L3", "L1"]);
    assert_eq!(
        backend.calls(),
        vec![StoreCall::move_to_module("L1", "Core", 1)]
    );
}

#[test]
fn errors_propagate_through_facade_result() {
    fn load_missing(backend: &FakeBackend) -> syllabus::Result<()> {
        BuilderSession::load(
            CourseId::from("missing"),
            backend.provider(),
            backend.store(),
            &BuilderConfig::default(),
        )?;
        Ok(())
    }
    let backend = FakeBackend::new("course", fixtures::intro_core());
    let err = load_missing(&backend).expect_err("missing course");
    assert_eq!(err.component(), "provider");
}

#[test]
fn dragging_into_an_empty_module_targets_its_zone() {
    let backend = FakeBackend::new("course", fixtures::with_empty_module());
    let mut session = open(&backend);
    let mut frame = layout(session.syllabus());
    // Empty modules render only their zone placeholder.
    frame.unregister(&DropTarget::AddLessonAffordance(ModuleId::from("Extra")));

    // Intro 0..128, Core 144..232, Extra zone 248..296.
    let input = frame.detect(Rect::new(10.0, 252.0, 380.0, 36.0));
    assert_eq!(
        input.colliding,
        vec![DropTarget::ModuleZone(ModuleId::from("Extra"))]
    );
    let decision = resolve_collision(&input).expect("a target");
    assert_eq!(decision.rule, CollisionRule::ModuleZone);

    session.drag_start("L1");
    let over = session
        .drag_over(&input)
        .map(DropTarget::dom_id)
        .expect("selected target");
    assert_eq!(over, "module-zone-Extra");

    let outcome = session.drag_end("L1", Some(over.as_str()));
    assert!(matches!(
        outcome,
        DispatchOutcome::Settled(SettleOutcome::Confirmed { .. })
    ));
    assert_eq!(module_lessons(session.syllabus(), "Intro"), vec!["L2"]);
    assert_eq!(module_lessons(session.syllabus(), "Core"), vec!["L3"]);
    assert_eq!(module_lessons(session.syllabus(), "Extra"), vec!["L1"]);
    assert_eq!(
        backend.calls(),
        vec![StoreCall::move_to_module("L1", "Extra", 0)]
    );
}
