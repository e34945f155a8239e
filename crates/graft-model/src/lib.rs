// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Declaration model for the graft dependency-injection compiler.
//!
//! This crate defines the immutable value objects shared by every phase of
//! the compiler: canonical names and type references, annotations, input
//! elements and the symbol table, binding keys and declarations, component
//! descriptors, the resolved binding graph, and the diagnostic type that all
//! phases report through.

pub mod annotation;
pub mod binding;
pub mod component;
pub mod diagnostics;
pub mod element;
pub mod graph;
pub mod key;
pub mod name;
pub mod names;
pub mod request;

pub use annotation::{Annotation, AnnotationValue};
pub use binding::{Binding, BindingKind, ContributionType};
pub use component::{ComponentAnnotation, ComponentDescriptor, CreatorDescriptor};
pub use diagnostics::{has_errors, Diagnostic, DiagnosticKind, Severity};
pub use element::{Constructor, Element, ElementId, ElementKind, Field, Method, Parameter, SymbolTable};
pub use graph::{BindingGraph, ResolvedBinding, SubcomponentFactoryMethod};
pub use key::{ContributionIdentifier, Key, Scope};
pub use name::{ClassName, TypeRef};
pub use request::{DependencyRequest, RequestKind};
