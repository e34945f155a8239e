//! Missing binding detection.
//!
//! Each key that was requested but never resolved is reported with the
//! request chain from the nearest entry point, found by breadth-first
//! search so the chain is the shortest explanation available.

use std::collections::VecDeque;

use indexmap::IndexSet;

use graft_model::{Diagnostic, DiagnosticKind, Key};

use crate::resolve::chain;
use crate::resolve::validation::Network;

pub(crate) fn validate(network: &Network<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for graph in network.root.all_graphs() {
        for key in &graph.missing {
            let mut diag = Diagnostic::error(
                DiagnosticKind::MissingBinding,
                format!("{key} cannot be provided"),
            )
            .with_element(graph.component.name.clone());
            if let Some(segments) = request_chain(network, key) {
                diag = diag.with_note(format!("requested at {}", chain::render(&segments)));
            }
            diagnostics.push(diag);
        }
    }
    diagnostics
}

/// Shortest chain `entry site → key → ... → target`, breadth-first from
/// every entry point in the tree.
fn request_chain(network: &Network<'_>, target: &Key) -> Option<Vec<String>> {
    let mut queue: VecDeque<(Key, Vec<String>)> = VecDeque::new();
    let mut seen: IndexSet<Key> = IndexSet::new();

    for graph in network.root.all_graphs() {
        for request in &graph.entry_points {
            let segments = vec![request.site.clone(), request.key.to_string()];
            if &request.key == target {
                return Some(segments);
            }
            if seen.insert(request.key.clone()) {
                queue.push_back((request.key.clone(), segments));
            }
        }
    }

    while let Some((key, segments)) = queue.pop_front() {
        let resolved = match network.resolved(&key) {
            Some(resolved) => resolved,
            None => continue,
        };
        for request in resolved.bindings.iter().flat_map(|b| b.dependencies.iter()) {
            let mut next = segments.clone();
            next.push(request.key.to_string());
            if &request.key == target {
                return Some(next);
            }
            if seen.insert(request.key.clone()) {
                queue.push_back((request.key.clone(), next));
            }
        }
    }
    None
}
