//! Round-based work scheduling.
//!
//! The host compiler hands each annotated declaration to the driver as a
//! work item. Items are drained once per round, single-threaded, in the
//! order they were enqueued. An item that depends on a type no round has
//! generated yet stays pending and runs again next round; everything else
//! is terminal. The pending-to-pending transition is bounded by the number
//! of rounds, so the loop always terminates.

use graft_model::{ClassName, SymbolTable};
use tracing::{debug, trace};

use crate::host::DiagnosticHost;
use crate::reporter::DiagnosticReporter;

/// Lifecycle of one work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkState {
    Pending,
    Resolved,
    Failed,
}

/// One (annotation, element) pair awaiting processing.
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// The annotation that put the element on the queue.
    pub annotation: ClassName,
    /// The annotated declaration.
    pub element: ClassName,
    pub state: WorkState,
}

/// What processing one item produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Resolved,
    /// A needed type does not exist yet; run this item again next round.
    /// The processor records the matching deferred-type diagnostic itself.
    Deferred,
    Failed,
}

/// Drains the work queue over a bounded number of rounds.
pub struct RoundDriver {
    items: Vec<WorkItem>,
    max_rounds: u32,
    /// Hold all reporting until the final round instead of flushing per
    /// round. Some hosts reject diagnostics raised against elements from
    /// rounds they have already discarded.
    pub delay_errors: bool,
}

impl RoundDriver {
    pub fn new(max_rounds: u32) -> Self {
        assert!(max_rounds > 0, "at least one round is required");
        RoundDriver { items: Vec::new(), max_rounds, delay_errors: false }
    }

    pub fn enqueue(&mut self, annotation: ClassName, element: ClassName) {
        self.items.push(WorkItem { annotation, element, state: WorkState::Pending });
    }

    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    /// Runs rounds until every item is terminal or the round limit is
    /// reached. Returns true when no error reached the host.
    ///
    /// `process` runs once per pending item per round. It may insert newly
    /// generated elements into the symbol table; the table's generation
    /// advances at every round boundary so identity-keyed caches never
    /// carry stale entries across rounds.
    pub fn run<P>(
        &mut self,
        symbols: &mut SymbolTable,
        host: &mut dyn DiagnosticHost,
        mut process: P,
    ) -> bool
    where
        P: FnMut(&WorkItem, &mut SymbolTable, &mut DiagnosticReporter) -> Outcome,
    {
        let mut reporter = DiagnosticReporter::new();

        for round in 0..self.max_rounds {
            let final_round = round + 1 == self.max_rounds;
            let mut deferred = 0usize;

            for index in 0..self.items.len() {
                if self.items[index].state != WorkState::Pending {
                    continue;
                }
                let outcome = process(&self.items[index], symbols, &mut reporter);
                trace!(
                    element = %self.items[index].element,
                    ?outcome,
                    "work item processed"
                );
                self.items[index].state = match outcome {
                    Outcome::Resolved => WorkState::Resolved,
                    Outcome::Failed => WorkState::Failed,
                    Outcome::Deferred => {
                        deferred += 1;
                        WorkState::Pending
                    }
                };
            }

            if !self.delay_errors || final_round {
                reporter.check_errors(symbols, final_round, host);
            }
            symbols.advance_generation();
            debug!(round, deferred, "round finished");

            if deferred == 0 {
                // No later round will run; flush anything still held back.
                if self.delay_errors && !final_round {
                    reporter.check_errors(symbols, true, host);
                }
                break;
            }
        }

        // Items still pending here were deferred in the final round; the
        // reporter escalated their diagnostics, so mark them failed.
        for item in &mut self.items {
            if item.state == WorkState::Pending {
                item.state = WorkState::Failed;
            }
        }

        reporter.errors_reported() == 0
    }
}
