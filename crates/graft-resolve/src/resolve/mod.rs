//! Resolution passes.
//!
//! The passes run in dependency order: creators and component descriptors
//! first, then module binding extraction, then the binding graph factory,
//! then validation over the finished graph. [`pipeline::compile`] wires
//! them together.

pub mod chain;
pub mod components;
pub mod creators;
pub mod factory;
pub mod keys;
pub mod modules;
pub mod pipeline;
pub mod validation;

pub use components::ComponentResolver;
pub use creators::resolve_creator;
pub use factory::BindingGraphFactory;
pub use pipeline::{compile, CompileOptions, CompileOutput};
pub use validation::{validate_graph, ValidationOptions};
