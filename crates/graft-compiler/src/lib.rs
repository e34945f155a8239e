// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Graft Compiler
//!
//! Unified entry point for the dependency-injection compilation pipeline.
//! Wraps the per-round resolve pipeline in the round-based processing
//! driver: a work queue drained once per round, a diagnostic reporter that
//! flushes to the host channel at round boundaries, and deferred-type
//! re-queueing for declarations that depend on not-yet-generated types.

pub mod host;
pub mod reporter;
pub mod rounds;

pub use host::{CollectingHost, DiagnosticHost};
pub use reporter::DiagnosticReporter;
pub use rounds::{Outcome, RoundDriver, WorkItem, WorkState};

// Single-shot compilation without the round machinery.
pub use graft_resolve::{compile, CompileOptions, CompileOutput};
