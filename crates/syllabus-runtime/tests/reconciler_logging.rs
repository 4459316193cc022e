//! Log policy checks for the reconciler.
//!
//! Rollbacks must be diagnosable from logs alone: a `warn` on
//! `syllabus.reconciler` carrying the ticket, the intent, and the error.
//! Confirmations stay below `warn`.
//!
//! Run:
//!   cargo test -p syllabus-runtime --test reconciler_logging

use syllabus_core::{DragItem, DropTarget};
use syllabus_harness::{capture, fixtures};
use syllabus_runtime::{
    ApplyOutcome, PersistResponse, PersistenceError, Reconciler, ReconcilerConfig,
};

fn pending_drop(r: &mut Reconciler, item: &str, target: &str) -> syllabus_runtime::PendingPersist {
    match r.apply_drop(&DragItem::parse(item), Some(&DropTarget::parse(target))) {
        ApplyOutcome::Pending(pending) => pending,
        other => panic!("expected pending persist, got {other:?}"),
    }
}

#[test]
fn rollback_emits_structured_warning() {
    let events = capture(|| {
        let mut r = Reconciler::new(fixtures::intro_core(), ReconcilerConfig::default());
        let p = pending_drop(&mut r, "L2", "L3");
        r.settle(p.ticket, Ok(PersistResponse::failed("Lesson not found")));
    });

    let warnings = events.warnings();
    assert_eq!(warnings.len(), 1, "exactly one warning: {warnings:?}");
    let warning = &warnings[0];
    assert_eq!(warning.target, "syllabus.reconciler");
    assert_eq!(warning.field("ticket"), Some("1"));
    assert_eq!(warning.field("intent"), Some("move L2 -> Core[0]"));
    assert_eq!(warning.field("error"), Some("rejected: Lesson not found"));
    assert!(warning.has_field("before_hash"));
    assert!(warning.has_field("after_hash"));
    assert_eq!(warning.span.as_deref(), Some("reconciler.settle"));
}

#[test]
fn transport_error_is_named_in_warning() {
    let events = capture(|| {
        let mut r = Reconciler::new(fixtures::intro_core(), ReconcilerConfig::default());
        let p = pending_drop(&mut r, "L1", "L2");
        r.settle(p.ticket, Err(PersistenceError::Transport("connection reset".into())));
    });
    let warnings = events.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].field("error"),
        Some("transport failure: connection reset")
    );
}

#[test]
fn confirmation_logs_nothing_at_warn() {
    let events = capture(|| {
        let mut r = Reconciler::new(fixtures::intro_core(), ReconcilerConfig::default());
        let p = pending_drop(&mut r, "L2", "L3");
        r.settle(p.ticket, Ok(PersistResponse::ok()));
    });
    assert!(events.warnings().is_empty());
    assert!(
        events
            .with_target("syllabus.reconciler")
            .iter()
            .any(|e| e.message() == Some("persistence confirmed"))
    );
}

#[test]
fn stale_settlement_after_replace_does_not_warn() {
    let events = capture(|| {
        let mut r = Reconciler::new(fixtures::intro_core(), ReconcilerConfig::default());
        let p = pending_drop(&mut r, "L2", "L3");
        r.replace_syllabus(fixtures::intro_core());
        r.settle(p.ticket, Ok(PersistResponse::failed("late")));
    });
    assert!(events.warnings().is_empty());
}

#[test]
fn invariant_violation_in_planning_warns() {
    let events = capture(|| {
        let mut r = Reconciler::new(fixtures::intro_core(), ReconcilerConfig::default());
        let outcome = r.apply_drop(&DragItem::parse("ghost"), Some(&DropTarget::parse("L1")));
        assert!(matches!(outcome, ApplyOutcome::Noop(_)));
    });
    let warnings = events.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].target, "syllabus.planner");
    assert!(warnings[0].has_field("reason"));
}

#[test]
fn journal_export_covers_every_entry_without_warnings() {
    let mut r = Reconciler::new(fixtures::intro_core(), ReconcilerConfig::default());
    let first = pending_drop(&mut r, "L2", "L3");
    r.settle(first.ticket, Ok(PersistResponse::ok()));
    let second = pending_drop(&mut r, "L1", "L3");
    r.settle(second.ticket, Ok(PersistResponse::failed("locked")));

    let mut jsonl = String::new();
    let events = capture(|| jsonl = r.journal().to_jsonl());

    assert!(events.with_target("syllabus.journal").is_empty());
    let rows: Vec<serde_json::Value> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).expect("json row"))
        .collect();
    assert_eq!(rows.len(), r.journal().len());
    assert_eq!(rows[0]["result"]["status"], "confirmed");
    assert_eq!(rows[1]["result"]["status"], "rolled_back");
    assert_eq!(rows[1]["sequence"], 1);
}
