//! Diagnostic accumulation and round-boundary flushing.
//!
//! Diagnostics are recorded as they are found and flushed in one batch per
//! round, so one failing declaration never hides problems in the others.
//! Deferred-type diagnostics are the exception: they mark a declaration
//! that depends on a type no round has generated yet, and they turn into a
//! re-queue instead of a report until the final round runs out of chances.

use graft_model::{ClassName, Diagnostic, DiagnosticKind, SymbolTable};
use tracing::trace;

use crate::host::DiagnosticHost;

/// Accumulates diagnostics for the current round.
#[derive(Debug, Default)]
pub struct DiagnosticReporter {
    pending: Vec<Diagnostic>,
    errors_reported: usize,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        DiagnosticReporter::default()
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        self.pending.push(diagnostic);
    }

    pub fn record_all(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.pending.extend(diagnostics);
    }

    /// Errors emitted to the host so far, across all flushes.
    pub fn errors_reported(&self) -> usize {
        self.errors_reported
    }

    /// Flushes every accumulated diagnostic to the host and returns the
    /// elements whose work must be re-queued for a later round.
    ///
    /// Deferred-type diagnostics are withheld on non-final rounds; their
    /// elements come back in the returned set. On the final round they are
    /// escalated and emitted like any other error. Element attribution is
    /// checked against the current round's symbol table: an element that no
    /// longer resolves is a stale cross-round handle, and the diagnostic is
    /// emitted without attribution rather than pointing at a dead element.
    pub fn check_errors(
        &mut self,
        symbols: &SymbolTable,
        final_round: bool,
        host: &mut dyn DiagnosticHost,
    ) -> Vec<ClassName> {
        let mut requeue = Vec::new();
        for mut diagnostic in self.pending.drain(..) {
            if diagnostic.kind == DiagnosticKind::DeferredType && !final_round {
                if let Some(element) = diagnostic.element.clone() {
                    requeue.push(element);
                }
                trace!(%diagnostic, "withheld for a later round");
                continue;
            }
            if let Some(element) = &diagnostic.element {
                if symbols.type_element(element).is_none() {
                    diagnostic.element = None;
                }
            }
            if diagnostic.is_error() {
                self.errors_reported += 1;
            }
            host.emit(diagnostic);
        }
        requeue
    }
}
