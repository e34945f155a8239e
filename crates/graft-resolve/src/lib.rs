// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Resolution and validation for the graft dependency-injection compiler.
//!
//! This crate turns aggregated declarations into component descriptors,
//! builds the binding graph for each component tree, and validates the
//! finished graph with a pipeline of independent passes.

pub mod resolve;

pub use resolve::*;
