//! Component descriptor resolution.
//!
//! `@DefineComponent` interfaces are resolved into [`ComponentDescriptor`]s
//! with their parent chain, scope set, and creator. Resolution is memoized
//! by element identity: a descriptor is built exactly once per element per
//! round, and a regenerated element in a later round carries a fresh
//! identity, so it resolves fresh.
//!
//! Validation happens inline and is best-effort: every problem is reported
//! and resolution continues where it can, so one malformed component does
//! not hide the problems of another.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use tracing::trace;

use graft_model::{
    names, Annotation, ClassName, ComponentAnnotation, ComponentDescriptor, CreatorDescriptor,
    Diagnostic, DiagnosticKind, Element, ElementId, ElementKind, Scope, SymbolTable,
};

use crate::resolve::chain;

/// Memoizing resolver for component definitions.
pub struct ComponentResolver<'a> {
    symbols: &'a SymbolTable,
    /// Creators already resolved, keyed by the component they build.
    creators: IndexMap<ClassName, CreatorDescriptor>,
    cache: IndexMap<ElementId, Arc<ComponentDescriptor>>,
}

impl<'a> ComponentResolver<'a> {
    pub fn new(
        symbols: &'a SymbolTable,
        creators: IndexMap<ClassName, CreatorDescriptor>,
    ) -> Self {
        ComponentResolver { symbols, creators, cache: IndexMap::new() }
    }

    /// Resolves a component by name. Returns `None` when the element is
    /// missing or too malformed to describe.
    pub fn resolve(
        &mut self,
        name: &ClassName,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Arc<ComponentDescriptor>> {
        let mut path = IndexSet::new();
        self.resolve_in_path(name, &mut path, diagnostics)
    }

    /// All descriptors resolved so far, in resolution order.
    pub fn resolved(&self) -> impl Iterator<Item = &Arc<ComponentDescriptor>> {
        self.cache.values()
    }

    fn resolve_in_path(
        &mut self,
        name: &ClassName,
        path: &mut IndexSet<ClassName>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Arc<ComponentDescriptor>> {
        let element = match self.symbols.type_element(name) {
            Some(element) => element,
            None => {
                diagnostics.push(Diagnostic::error(
                    DiagnosticKind::UnknownComponent,
                    format!("{name} is not a known type"),
                ));
                return None;
            }
        };
        if let Some(cached) = self.cache.get(&element.id()) {
            return Some(cached.clone());
        }

        // The visited path is the recursion's own call chain. Seeing a name
        // twice means the parent references loop.
        if !path.insert(name.clone()) {
            let mut segments: Vec<String> =
                path.iter().map(|n| n.canonical_name().to_string()).collect();
            segments.push(name.canonical_name().to_string());
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticKind::ComponentCycle,
                    format!("component parent chain is cyclic: {}", chain::render(&segments)),
                )
                .with_element(name.clone()),
            );
            return None;
        }

        let descriptor = self.resolve_element(element, path, diagnostics);
        path.shift_remove(name);

        if let Some(descriptor) = &descriptor {
            trace!(component = %descriptor.name, "resolved component descriptor");
            self.cache.insert(element.id(), descriptor.clone());
        }
        descriptor
    }

    fn resolve_element(
        &mut self,
        element: &Element,
        path: &mut IndexSet<ClassName>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Arc<ComponentDescriptor>> {
        let annotation = match element.annotation(&names::define_component()) {
            Some(annotation) => annotation.clone(),
            None => {
                diagnostics.push(invalid(
                    element,
                    format!("{} is not annotated with @{}", element.name(), names::define_component()),
                ));
                return None;
            }
        };

        self.check_shape(element, diagnostics);

        // The canonical singleton component owns its simple name. Any other
        // component reusing it, even in another package, would be
        // indistinguishable in generated-code references.
        let singleton = names::singleton_component();
        if element.name().simple_name() == singleton.simple_name() && element.name() != &singleton
        {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticKind::ReservedComponentName,
                    format!(
                        "the simple name {} is reserved for {singleton}",
                        singleton.simple_name()
                    ),
                )
                .with_element(element.name().clone()),
            );
        }

        // A parent that was named but could not be resolved (unknown type or
        // a cyclic chain) poisons this descriptor too: a child without its
        // ancestry would mislead every later pass.
        let parent = self.resolve_parent(element, &annotation, path, diagnostics).ok()?;

        let scopes: IndexSet<Scope> = element
            .annotations
            .iter()
            .filter(|a| self.symbols.is_scope_annotation(a.name()))
            .cloned()
            .map(Scope::new)
            .collect();

        Some(Arc::new(ComponentDescriptor {
            element: element.id(),
            name: element.name().clone(),
            annotation: ComponentAnnotation::Real {
                dependencies: annotation.type_values("dependencies"),
            },
            scopes,
            creator: self.creators.get(element.name()).cloned(),
            parent,
        }))
    }

    fn resolve_parent(
        &mut self,
        element: &Element,
        annotation: &Annotation,
        path: &mut IndexSet<ClassName>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Option<Arc<ComponentDescriptor>>, ()> {
        let parent_name = annotation
            .type_value("parent")
            .cloned()
            .unwrap_or_else(names::define_component_no_parent);

        if parent_name == names::define_component_no_parent() {
            if element.name() != &names::singleton_component() {
                diagnostics.push(invalid(
                    element,
                    format!(
                        "{} has no parent; every root must be {}",
                        element.name(),
                        names::singleton_component()
                    ),
                ));
            }
            return Ok(None);
        }

        let parent_is_component = self
            .symbols
            .type_element(&parent_name)
            .map(|e| e.has_annotation(&names::define_component()))
            .unwrap_or(false);
        if !parent_is_component {
            diagnostics.push(invalid(
                element,
                format!("parent {parent_name} is not a component definition"),
            ));
            return Err(());
        }

        match self.resolve_in_path(&parent_name, path, diagnostics) {
            Some(parent) => Ok(Some(parent)),
            None => Err(()),
        }
    }

    /// Shape checks on the definition itself. All reported, none fatal.
    fn check_shape(&self, element: &Element, diagnostics: &mut Vec<Diagnostic>) {
        if element.kind() != ElementKind::Interface {
            diagnostics.push(invalid(element, "component definition must be an interface"));
        }
        if !element.interfaces.is_empty() {
            diagnostics.push(invalid(element, "component definition must not extend interfaces"));
        }
        if element.type_parameters > 0 {
            diagnostics.push(invalid(element, "component definition must not have type parameters"));
        }
        for method in element.methods.iter().filter(|m| !m.is_static) {
            diagnostics.push(invalid(
                element,
                format!("method {}() must be static", method.name),
            ));
        }
        for field in element.fields.iter().filter(|f| !f.is_static) {
            diagnostics.push(invalid(
                element,
                format!("field {} must be static", field.name),
            ));
        }
    }
}

fn invalid(element: &Element, message: impl Into<String>) -> Diagnostic {
    Diagnostic::error(DiagnosticKind::InvalidComponent, message)
        .with_element(element.name().clone())
}
