//! Dependency cycle detection.
//!
//! Runs Tarjan over the dependency edges, restricted to edges that are
//! evaluated at construction time. A provider-shaped request defers
//! evaluation to call time and therefore breaks a cycle, as does an
//! instance request for a map whose values are provider-wrapped.

use graft_model::{Diagnostic, DiagnosticKind, DependencyRequest, Key, RequestKind};

use crate::resolve::chain;
use crate::resolve::keys::MapType;
use crate::resolve::validation::{tarjan, Network};

pub(crate) fn validate(network: &Network<'_>) -> Vec<Diagnostic> {
    let nodes: Vec<Key> = network.nodes.keys().map(|k| (*k).clone()).collect();
    let mut successors = |key: &Key| -> Vec<Key> {
        let resolved = match network.resolved(key) {
            Some(resolved) => resolved,
            None => return Vec::new(),
        };
        resolved
            .bindings
            .iter()
            .flat_map(|b| b.dependencies.iter())
            .filter(|request| !breaks_cycle(request))
            // Edges into the missing set lead nowhere; the missing-binding
            // validator owns those.
            .filter(|request| network.resolved(&request.key).is_some())
            .map(|request| request.key.clone())
            .collect()
    };

    let mut diagnostics = Vec::new();
    for scc in tarjan::find_sccs(&nodes, &mut successors) {
        let is_cycle = match scc.as_slice() {
            [] => false,
            [only] => successors(only).contains(only),
            _ => true,
        };
        if !is_cycle {
            continue;
        }
        let mut segments: Vec<String> = scc.iter().map(|k| k.to_string()).collect();
        segments.push(scc[0].to_string());
        diagnostics.push(Diagnostic::error(
            DiagnosticKind::DependencyCycle,
            format!("dependency cycle: {}", chain::render(&segments)),
        ));
    }
    diagnostics
}

/// Whether a request's edge is deferred past construction.
fn breaks_cycle(request: &DependencyRequest) -> bool {
    if request.kind.breaks_cycle() {
        return true;
    }
    // An instance map of providers defers each value.
    request.kind == RequestKind::Instance
        && MapType::is_map(request.key.ty())
        && request.key.ty().arguments().len() == 2
        && MapType::of(request.key.ty()).values_are_wrapped()
}
