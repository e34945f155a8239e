//! Graph validation passes.
//!
//! Each validator is an independent, stateless pass over a finished
//! [`BindingGraph`]. All of them run even when earlier ones find problems,
//! so one compilation surfaces every independently-discoverable defect.
//! Validators never mutate the graph and never short-circuit each other.

use indexmap::IndexMap;
use tracing::debug;

use graft_model::{
    BindingGraph, ClassName, ComponentDescriptor, Diagnostic, Key, ResolvedBinding, Severity,
};

mod cycles;
mod duplicates;
mod factory_methods;
mod missing;
mod multibindings;
mod nullable;
mod scopes;
pub mod tarjan;

/// Tunable validation policy.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Severity of a nullable binding requested at a site without the
    /// nullable marker.
    pub nullable_validation: Severity,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        ValidationOptions { nullable_validation: Severity::Error }
    }
}

/// Runs every validator over the component tree.
pub fn validate_graph(graph: &BindingGraph, options: &ValidationOptions) -> Vec<Diagnostic> {
    let network = Network::new(graph);
    let mut diagnostics = Vec::new();
    diagnostics.extend(cycles::validate(&network));
    diagnostics.extend(duplicates::validate(&network));
    diagnostics.extend(missing::validate(&network));
    diagnostics.extend(scopes::validate(&network));
    diagnostics.extend(multibindings::validate(&network));
    diagnostics.extend(factory_methods::validate(&network));
    diagnostics.extend(nullable::validate(&network, options));
    debug!(
        component = %graph.component.name,
        diagnostics = diagnostics.len(),
        "graph validated"
    );
    diagnostics
}

/// Flattened view of one component tree, shared by the validators.
///
/// Node resolution already guarantees a key resolves in exactly one frame
/// of the tree, so flattening loses nothing; it just spares every pass the
/// same recursion.
pub(crate) struct Network<'g> {
    pub root: &'g BindingGraph,
    pub nodes: IndexMap<&'g Key, &'g ResolvedBinding>,
}

impl<'g> Network<'g> {
    pub fn new(root: &'g BindingGraph) -> Network<'g> {
        let mut nodes = IndexMap::new();
        for graph in root.all_graphs() {
            for (key, resolved) in &graph.nodes {
                nodes.entry(key).or_insert(resolved);
            }
        }
        Network { root, nodes }
    }

    pub fn resolved(&self, key: &Key) -> Option<&'g ResolvedBinding> {
        self.nodes.get(key).copied()
    }

    /// The descriptor owning `name`, anywhere in the tree.
    pub fn descriptor(&self, name: &ClassName) -> Option<&'g ComponentDescriptor> {
        self.root
            .all_graphs()
            .into_iter()
            .map(|g| g.component.as_ref())
            .find(|d| &d.name == name)
    }
}
