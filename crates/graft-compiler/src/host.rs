//! The host diagnostic channel.
//!
//! The driver never prints; everything user-visible goes through
//! [`DiagnosticHost`], which the embedding build tool implements. Tests
//! use [`CollectingHost`] to assert on what would have been emitted.

use graft_model::Diagnostic;

/// Sink for diagnostics flushed at round boundaries.
pub trait DiagnosticHost {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// A host that keeps every emitted diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingHost {
    pub emitted: Vec<Diagnostic>,
}

impl CollectingHost {
    pub fn new() -> Self {
        CollectingHost::default()
    }

    pub fn has_errors(&self) -> bool {
        graft_model::has_errors(&self.emitted)
    }
}

impl DiagnosticHost for CollectingHost {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.emitted.push(diagnostic);
    }
}
