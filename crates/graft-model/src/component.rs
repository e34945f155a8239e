//! Component descriptors.
//!
//! A [`ComponentDescriptor`] is the resolved shape of one component
//! definition: its name, its scopes, its creator if it declares one, and a
//! link to its parent descriptor. Descriptors form a tree rooted at the
//! singleton component.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;

use crate::element::ElementId;
use crate::key::{Key, Scope};
use crate::name::ClassName;

/// How a component entered the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentAnnotation {
    /// A component definition written by the user, with the component
    /// dependencies it declares.
    Real { dependencies: Vec<ClassName> },
    /// A placeholder fabricated for full-graph analysis of a module whose
    /// installation target is unknown or absent.
    Fictional { module: ClassName },
}

impl ComponentAnnotation {
    pub fn real() -> Self {
        ComponentAnnotation::Real { dependencies: Vec::new() }
    }

    pub fn is_real(&self) -> bool {
        matches!(self, ComponentAnnotation::Real { .. })
    }

    pub fn dependencies(&self) -> &[ClassName] {
        match self {
            ComponentAnnotation::Real { dependencies } => dependencies,
            ComponentAnnotation::Fictional { .. } => &[],
        }
    }
}

/// Resolved shape of a component creator (builder) definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorDescriptor {
    pub element: ElementId,
    pub name: ClassName,
    /// The component this creator builds.
    pub component: ClassName,
    /// Name of the single zero-argument build method.
    pub build_method: String,
    /// Keys bound into the component through `@BindsInstance` setters.
    pub bound_instances: Vec<Key>,
}

/// Resolved shape of one component definition.
#[derive(Debug, Clone)]
pub struct ComponentDescriptor {
    pub element: ElementId,
    pub name: ClassName,
    pub annotation: ComponentAnnotation,
    pub scopes: IndexSet<Scope>,
    pub creator: Option<CreatorDescriptor>,
    pub parent: Option<Arc<ComponentDescriptor>>,
}

impl ComponentDescriptor {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn has_scope(&self, scope: &Scope) -> bool {
        self.scopes.contains(scope)
    }

    /// Depth of this descriptor in the component tree, root being 0.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent.as_deref();
        while let Some(parent) = current {
            depth += 1;
            current = parent.parent.as_deref();
        }
        depth
    }
}

impl PartialEq for ComponentDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element && self.name == other.name
    }
}

impl Eq for ComponentDescriptor {}

impl fmt::Display for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
