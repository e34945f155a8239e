// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Cross-compilation marker aggregation.
//!
//! Each compilation unit that declares a module, entry point, or component
//! entry point emits one marker element into a well-known package, carrying
//! the declaration's metadata as a serialized payload. This crate reads all
//! markers visible to the current compilation back into typed records
//! ([`payload`]), scans and validates the marker packages ([`store`]), and
//! derives the per-component dependency sets after uninstall and replace
//! directives ([`deps`]).

pub mod deps;
pub mod payload;
pub mod store;

pub use deps::{ComponentDependencies, ComponentEntries};
pub use payload::{
    AggregatedDepsMetadata, AggregatedDepsPayload, AggregatedUninstallModulesPayload,
    ContributionKind, PayloadError, UninstallMetadata,
};
pub use store::AggregationStore;
