#![forbid(unsafe_code)]

//! Optimistic reconciler.
//!
//! Owns the displayed syllabus and every outstanding persistence call. The
//! lifecycle of one drop is split so the host can run the call however it
//! likes (blocking, on an executor, over IPC):
//!
//! ```text
//! apply_plan(plan) --Pending{ticket, intent}--> host calls the store
//!                                                     |
//! settle(ticket, result) <----------------------------+
//!     Confirmed   keep the optimistic syllabus
//!     RolledBack  restore the snapshot taken at apply time
//!     Stale       ticket unknown or from before a replace_syllabus; ignored
//! ```
//!
//! [`Reconciler::dispatch`] does both halves in one synchronous step.
//!
//! Snapshots are shared [`Arc`]s of the syllabus that was current when the
//! drop was applied, so taking one never copies the tree.
//!
//! # Overlapping calls
//!
//! Under [`InFlightPolicy::Overlap`] several calls may be outstanding and
//! settle in any order. A failure restores *its own* snapshot, which discards
//! any newer optimistic drops as well; the last settlement observed wins.
//! [`InFlightPolicy::Exclusive`] refuses new persisted drops with
//! [`ApplyOutcome::Busy`] instead.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use syllabus_core::{DragItem, DropTarget, Syllabus};
use syllabus_dnd::{NoopReason, PersistIntent, PlanOutcome, plan_move};
use web_time::Instant;

use crate::config::{InFlightPolicy, ReconcilerConfig};
use crate::journal::{JournalResult, OperationJournal};
use crate::persistence::{LessonStore, PersistResponse, PersistenceError, execute_intent};

/// Handle for one outstanding persistence call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A persistence call the host must now perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPersist {
    pub ticket: Ticket,
    pub intent: PersistIntent,
}

/// Result of [`Reconciler::apply_plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Nothing changed.
    Noop(NoopReason),
    /// Syllabus updated; nothing to persist.
    LocalOnly,
    /// Syllabus updated optimistically; the call must be performed and settled.
    Pending(PendingPersist),
    /// Refused under [`InFlightPolicy::Exclusive`].
    Busy { in_flight: usize },
}

/// Why a persistence call counts as failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistFailure {
    /// The store answered `{ success: false }`.
    Rejected { message: Option<String> },
    /// The call did not complete.
    Errored(PersistenceError),
}

impl PersistFailure {
    /// Classify a store result. `Ok(())` means the call succeeded.
    pub fn check(result: Result<PersistResponse, PersistenceError>) -> Result<(), Self> {
        match result {
            Ok(response) if response.success => Ok(()),
            Ok(response) => Err(Self::Rejected {
                message: response.error,
            }),
            Err(err) => Err(Self::Errored(err)),
        }
    }
}

impl fmt::Display for PersistFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { message: Some(msg) } => write!(f, "rejected: {msg}"),
            Self::Rejected { message: None } => write!(f, "rejected"),
            Self::Errored(err) => write!(f, "{err}"),
        }
    }
}

/// Result of [`Reconciler::settle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    Confirmed { ticket: Ticket },
    RolledBack { ticket: Ticket, reason: PersistFailure },
    Stale { ticket: Ticket },
}

impl SettleOutcome {
    #[must_use]
    pub const fn ticket(&self) -> Ticket {
        match self {
            Self::Confirmed { ticket } | Self::RolledBack { ticket, .. } | Self::Stale { ticket } => {
                *ticket
            }
        }
    }

    #[must_use]
    pub const fn is_rolled_back(&self) -> bool {
        matches!(self, Self::RolledBack { .. })
    }
}

/// Result of [`Reconciler::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Noop(NoopReason),
    LocalOnly,
    Busy { in_flight: usize },
    Settled(SettleOutcome),
}

/// One outstanding call.
#[derive(Debug, Clone)]
pub struct InFlight {
    snapshot: Arc<Syllabus>,
    intent: PersistIntent,
    epoch: u64,
    before_hash: u64,
    after_hash: u64,
    started: Instant,
}

impl InFlight {
    /// Syllabus restored if this call fails.
    #[must_use]
    pub fn snapshot(&self) -> &Syllabus {
        &self.snapshot
    }

    #[must_use]
    pub fn intent(&self) -> &PersistIntent {
        &self.intent
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Optimistic state machine over the displayed syllabus.
#[derive(Debug, Clone)]
pub struct Reconciler {
    current: Arc<Syllabus>,
    in_flight: BTreeMap<Ticket, InFlight>,
    next_ticket: u64,
    epoch: u64,
    config: ReconcilerConfig,
    journal: OperationJournal,
}

impl Reconciler {
    #[must_use]
    pub fn new(syllabus: Syllabus, config: ReconcilerConfig) -> Self {
        let journal = OperationJournal::new(config.journal_capacity);
        Self {
            current: Arc::new(syllabus),
            in_flight: BTreeMap::new(),
            next_ticket: 1,
            epoch: 0,
            config,
            journal,
        }
    }

    /// The syllabus to render.
    #[must_use]
    pub fn current(&self) -> &Syllabus {
        &self.current
    }

    /// Shared handle to the syllabus to render.
    #[must_use]
    pub fn current_shared(&self) -> Arc<Syllabus> {
        Arc::clone(&self.current)
    }

    /// Outstanding calls keyed by ticket, oldest first.
    #[must_use]
    pub fn in_flight(&self) -> &BTreeMap<Ticket, InFlight> {
        &self.in_flight
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Incremented by every [`replace_syllabus`](Self::replace_syllabus).
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn journal(&self) -> &OperationJournal {
        &self.journal
    }

    #[must_use]
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Plan a drop against the current syllabus and apply it.
    pub fn apply_drop(&mut self, item: &DragItem, target: Option<&DropTarget>) -> ApplyOutcome {
        let plan = plan_move(&self.current, item, target);
        self.apply_plan(plan)
    }

    /// The single mutating entry point for drops.
    ///
    /// `plan` must have been computed against [`current`](Self::current).
    pub fn apply_plan(&mut self, plan: PlanOutcome) -> ApplyOutcome {
        match plan {
            PlanOutcome::Noop(reason) => ApplyOutcome::Noop(reason),
            PlanOutcome::LocalOnly(syllabus) => {
                self.current = Arc::new(syllabus);
                ApplyOutcome::LocalOnly
            }
            PlanOutcome::Persist(plan) => {
                if self.config.in_flight == InFlightPolicy::Exclusive && !self.in_flight.is_empty()
                {
                    tracing::debug!(
                        target: "syllabus.reconciler",
                        in_flight = self.in_flight.len(),
                        intent = %plan.intent,
                        "drop refused while a persistence call is outstanding"
                    );
                    return ApplyOutcome::Busy {
                        in_flight: self.in_flight.len(),
                    };
                }

                let ticket = Ticket(self.next_ticket);
                self.next_ticket += 1;

                let snapshot = Arc::clone(&self.current);
                let before_hash = snapshot.state_hash();
                let after_hash = plan.syllabus.state_hash();
                self.current = Arc::new(plan.syllabus);

                tracing::debug!(
                    target: "syllabus.reconciler",
                    ticket = ticket.get(),
                    intent = %plan.intent,
                    lesson_id = %plan.lesson_id,
                    module_id = %plan.source_module,
                    before_hash,
                    after_hash,
                    "optimistic update applied"
                );

                self.in_flight.insert(
                    ticket,
                    InFlight {
                        snapshot,
                        intent: plan.intent.clone(),
                        epoch: self.epoch,
                        before_hash,
                        after_hash,
                        started: Instant::now(),
                    },
                );
                ApplyOutcome::Pending(PendingPersist {
                    ticket,
                    intent: plan.intent,
                })
            }
        }
    }

    /// Record the result of the call behind `ticket`.
    ///
    /// Unknown tickets (already settled, or never issued) are reported as
    /// stale and leave the state untouched.
    pub fn settle(
        &mut self,
        ticket: Ticket,
        result: Result<PersistResponse, PersistenceError>,
    ) -> SettleOutcome {
        let span = tracing::debug_span!(
            "reconciler.settle",
            ticket = ticket.get(),
            elapsed_ms = tracing::field::Empty,
            result = tracing::field::Empty,
        )
        .entered();

        let Some(op) = self.in_flight.remove(&ticket) else {
            tracing::debug!(
                target: "syllabus.reconciler",
                ticket = ticket.get(),
                "settlement for unknown ticket ignored"
            );
            span.record("result", "stale");
            return SettleOutcome::Stale { ticket };
        };

        let elapsed_ms = u64::try_from(op.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        span.record("elapsed_ms", elapsed_ms);
        if elapsed_ms >= self.config.slow_persist_warn_ms {
            tracing::warn!(
                target: "syllabus.reconciler",
                ticket = ticket.get(),
                intent = %op.intent,
                elapsed_ms,
                threshold_ms = self.config.slow_persist_warn_ms,
                "slow persistence call"
            );
        }

        let failure = PersistFailure::check(result).err();

        let (outcome, journal_result) = if op.epoch != self.epoch {
            tracing::debug!(
                target: "syllabus.reconciler",
                ticket = ticket.get(),
                intent = %op.intent,
                failed = failure.is_some(),
                "settlement predates syllabus replacement; ignored"
            );
            (SettleOutcome::Stale { ticket }, JournalResult::Stale)
        } else if let Some(reason) = failure {
            self.current = Arc::clone(&op.snapshot);
            tracing::warn!(
                target: "syllabus.reconciler",
                ticket = ticket.get(),
                intent = %op.intent,
                error = %reason,
                before_hash = op.before_hash,
                after_hash = op.after_hash,
                elapsed_ms,
                overlapping = self.in_flight.len(),
                "persistence failed; rolled back to snapshot"
            );
            let journal_result = JournalResult::RolledBack {
                reason: reason.to_string(),
            };
            (SettleOutcome::RolledBack { ticket, reason }, journal_result)
        } else {
            tracing::debug!(
                target: "syllabus.reconciler",
                ticket = ticket.get(),
                intent = %op.intent,
                elapsed_ms,
                "persistence confirmed"
            );
            (SettleOutcome::Confirmed { ticket }, JournalResult::Confirmed)
        };

        span.record(
            "result",
            match &outcome {
                SettleOutcome::Confirmed { .. } => "confirmed",
                SettleOutcome::RolledBack { .. } => "rolled_back",
                SettleOutcome::Stale { .. } => "stale",
            },
        );
        self.journal.record(
            ticket.get(),
            op.intent,
            op.before_hash,
            op.after_hash,
            elapsed_ms,
            journal_result,
        );
        outcome
    }

    /// Apply `plan` and, if it needs persisting, call `store` and settle.
    pub fn dispatch<S: LessonStore + ?Sized>(
        &mut self,
        plan: PlanOutcome,
        store: &mut S,
    ) -> DispatchOutcome {
        let _span = tracing::debug_span!("reconciler.dispatch").entered();
        match self.apply_plan(plan) {
            ApplyOutcome::Noop(reason) => DispatchOutcome::Noop(reason),
            ApplyOutcome::LocalOnly => DispatchOutcome::LocalOnly,
            ApplyOutcome::Busy { in_flight } => DispatchOutcome::Busy { in_flight },
            ApplyOutcome::Pending(pending) => {
                let result = execute_intent(store, &pending.intent);
                DispatchOutcome::Settled(self.settle(pending.ticket, result))
            }
        }
    }

    /// Replace the syllabus wholesale (provider refresh).
    ///
    /// Outstanding calls stay tracked so their settlements are journaled, but
    /// they can no longer roll anything back.
    pub fn replace_syllabus(&mut self, syllabus: Syllabus) {
        self.epoch += 1;
        tracing::debug!(
            target: "syllabus.reconciler",
            epoch = self.epoch,
            in_flight = self.in_flight.len(),
            state_hash = syllabus.state_hash(),
            "syllabus replaced"
        );
        self.current = Arc::new(syllabus);
    }
}
