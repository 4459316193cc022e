#![forbid(unsafe_code)]

//! Bounded journal of settled persistence operations.
//!
//! One row per settlement, oldest evicted first. Hashes are
//! [`Syllabus::state_hash`](syllabus_core::Syllabus::state_hash) values of the
//! snapshot and of the optimistic syllabus, so a replay can tell which shapes
//! the operation moved between.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use syllabus_dnd::{IntentKind, PersistIntent};

/// One settled operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Monotonic across the reconciler's lifetime.
    pub sequence: u64,
    pub ticket: u64,
    pub kind: IntentKind,
    pub intent: PersistIntent,
    pub before_hash: u64,
    pub after_hash: u64,
    pub elapsed_ms: u64,
    pub result: JournalResult,
}

/// How an operation settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JournalResult {
    Confirmed,
    RolledBack { reason: String },
    /// Settled after the syllabus was replaced; no effect.
    Stale,
}

/// Ring of the most recent [`JournalEntry`] rows.
#[derive(Debug, Clone)]
pub struct OperationJournal {
    entries: VecDeque<JournalEntry>,
    capacity: usize,
    next_sequence: u64,
}

impl OperationJournal {
    /// `capacity` is clamped to at least 1.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_sequence: 0,
        }
    }

    /// Append a row, assigning its sequence number. Returns the sequence.
    pub fn record(
        &mut self,
        ticket: u64,
        intent: PersistIntent,
        before_hash: u64,
        after_hash: u64,
        elapsed_ms: u64,
        result: JournalResult,
    ) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(JournalEntry {
            sequence,
            ticket,
            kind: intent.kind(),
            intent,
            before_hash,
            after_hash,
            elapsed_ms,
            result,
        });
        sequence
    }

    pub fn iter(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&JournalEntry> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Rows as JSON lines, oldest first.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match serde_json::to_string(entry) {
                Ok(line) => {
                    out.push_str(&line);
                    out.push('\n');
                }
                Err(err) => tracing::warn!(
                    target: "syllabus.journal",
                    sequence = entry.sequence,
                    error = %err,
                    "journal entry skipped in export"
                ),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syllabus_core::{LessonId, ModuleId};

    fn intent(n: usize) -> PersistIntent {
        PersistIntent::MoveToModule {
            lesson_id: LessonId::new(format!("L{n}")),
            target_module_id: ModuleId::from("core"),
            insertion_index: n,
        }
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut journal = OperationJournal::new(2);
        for n in 0..3 {
            journal.record(n as u64, intent(n), 1, 2, 0, JournalResult::Confirmed);
        }
        assert_eq!(journal.len(), 2);
        let sequences: Vec<u64> = journal.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![1, 2]);
        assert_eq!(journal.last().map(|e| e.ticket), Some(2));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut journal = OperationJournal::new(0);
        assert_eq!(journal.capacity(), 1);
        journal.record(0, intent(0), 0, 0, 0, JournalResult::Stale);
        journal.record(1, intent(1), 0, 0, 0, JournalResult::Stale);
        assert_eq!(journal.len(), 1);
    }

    #[test]
    fn jsonl_tags_result_status() {
        let mut journal = OperationJournal::new(4);
        journal.record(
            7,
            intent(0),
            10,
            20,
            3,
            JournalResult::RolledBack {
                reason: "locked".into(),
            },
        );
        let jsonl = journal.to_jsonl();
        let row: serde_json::Value =
            serde_json::from_str(jsonl.lines().next().expect("one line")).expect("json");
        assert_eq!(row["ticket"], 7);
        assert_eq!(row["kind"], "move_to_module");
        assert_eq!(row["result"]["status"], "rolled_back");
        assert_eq!(row["result"]["reason"], "locked");
        assert_eq!(row["intent"]["op"], "move_to_module");
    }
}
