//! The compile pipeline.
//!
//! Orchestrates one compilation: read the aggregation store, derive the
//! per-component dependency sets, resolve creators and component
//! descriptors, build the binding graph per component tree, and validate
//! every graph. All passes accumulate into one diagnostic list; nothing
//! short-circuits, so a single run reports every independent problem.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use graft_aggregate::{AggregationStore, ComponentDependencies};
use graft_model::{
    names, BindingGraph, ClassName, ComponentAnnotation, ComponentDescriptor, Diagnostic,
    DiagnosticKind, SymbolTable,
};

use crate::resolve::components::ComponentResolver;
use crate::resolve::creators::resolve_creator;
use crate::resolve::factory::BindingGraphFactory;
use crate::resolve::validation::{validate_graph, ValidationOptions};

/// Per-compilation settings.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Validate every known declaration, not only what entry points reach.
    pub full_graph: bool,
    /// The test whose component tree is being built, if any.
    pub test: Option<ClassName>,
    pub validation: ValidationOptions,
}

/// Result of one compilation.
#[derive(Debug)]
pub struct CompileOutput {
    /// One graph per component tree root, in resolution order.
    pub graphs: Vec<BindingGraph>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        graft_model::has_errors(&self.diagnostics)
    }
}

/// Runs the whole pipeline over the current symbol table.
pub fn compile(symbols: &SymbolTable, options: &CompileOptions) -> CompileOutput {
    let mut diagnostics = Vec::new();

    let store = AggregationStore::read(symbols, &mut diagnostics);
    let deps = ComponentDependencies::from_metadata(
        &store.metadata,
        &store.uninstalls,
        options.test.as_ref(),
    );

    // Creators first: descriptors embed them.
    let mut creators = IndexMap::new();
    for element in symbols.elements() {
        if element.has_annotation(&names::define_component_builder()) {
            if let Some(creator) = resolve_creator(element, symbols, &mut diagnostics) {
                creators.insert(creator.component.clone(), creator);
            }
        }
    }

    let mut resolver = ComponentResolver::new(symbols, creators);
    let mut fictional: Vec<Arc<ComponentDescriptor>> = Vec::new();
    for component in deps.components() {
        let known = symbols
            .type_element(component)
            .map(|e| e.has_annotation(&names::define_component()))
            .unwrap_or(false);
        if known {
            resolver.resolve(component, &mut diagnostics);
        } else if options.full_graph {
            // Library-mode placeholder: validate the modules against a
            // component that does not exist in this compilation.
            if let Some(descriptor) = fictional_descriptor(component, &deps, symbols) {
                fictional.push(descriptor);
            }
        } else {
            diagnostics.push(Diagnostic::error(
                DiagnosticKind::UnknownComponent,
                format!("{component} is not a component definition known to this compilation"),
            ));
        }
    }

    let mut all: Vec<Arc<ComponentDescriptor>> = resolver.resolved().cloned().collect();
    all.extend(fictional);

    let factory = BindingGraphFactory::new(symbols, &deps);
    let mut graphs = Vec::new();
    for descriptor in all.iter().filter(|d| d.is_root()) {
        let graph = factory.build(descriptor.clone(), &all, options.full_graph, &mut diagnostics);
        diagnostics.extend(validate_graph(&graph, &options.validation));
        graphs.push(graph);
    }

    debug!(
        graphs = graphs.len(),
        diagnostics = diagnostics.len(),
        "compilation pipeline finished"
    );
    CompileOutput { graphs, diagnostics }
}

fn fictional_descriptor(
    component: &ClassName,
    deps: &ComponentDependencies,
    symbols: &SymbolTable,
) -> Option<Arc<ComponentDescriptor>> {
    // Anchor the placeholder's identity to the first module installed into
    // the unknown component.
    let module = deps.modules(component).into_iter().next()?;
    let element = symbols.type_element(&module)?;
    Some(Arc::new(ComponentDescriptor {
        element: element.id(),
        name: component.clone(),
        annotation: ComponentAnnotation::Fictional { module },
        scopes: indexmap::IndexSet::new(),
        creator: None,
        parent: None,
    }))
}
