//! Duplicate binding detection.
//!
//! A key with more than one unique binding is reported once, naming every
//! contributing site, so the user sees the whole conflict at once. Map
//! contributions that declare the same map key are the multibinding shape
//! of the same problem and are folded in here.

use indexmap::IndexMap;

use graft_model::{AnnotationValue, BindingKind, Diagnostic, DiagnosticKind};

use crate::resolve::validation::Network;

pub(crate) fn validate(network: &Network<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for resolved in network.nodes.values() {
        if resolved.bindings.len() > 1 {
            let mut diag = Diagnostic::error(
                DiagnosticKind::DuplicateBinding,
                format!("{} is bound multiple times", resolved.key),
            );
            for binding in &resolved.bindings {
                diag = diag.with_note(format!("bound at {}", binding.declaring_site));
            }
            diagnostics.push(diag);
        }
    }

    // Same-map-key collisions: walk each synthetic map node's contributions
    // and group them by their declared map key value.
    for resolved in network.nodes.values() {
        let synthetic = match resolved.bindings.as_slice() {
            [binding] if binding.kind == BindingKind::Multibound => binding,
            _ => continue,
        };
        let mut by_map_key: IndexMap<&AnnotationValue, Vec<&str>> = IndexMap::new();
        for request in &synthetic.dependencies {
            let contribution = match network.resolved(&request.key).and_then(|r| r.unique()) {
                Some(contribution) => contribution,
                None => continue,
            };
            if let Some(map_key) = &contribution.map_key {
                by_map_key
                    .entry(map_key)
                    .or_default()
                    .push(contribution.declaring_site.as_str());
            }
        }
        for (map_key, sites) in by_map_key {
            if sites.len() > 1 {
                let mut diag = Diagnostic::error(
                    DiagnosticKind::DuplicateBinding,
                    format!("{} declares map key {map_key} more than once", resolved.key),
                );
                for site in sites {
                    diag = diag.with_note(format!("bound at {site}"));
                }
                diagnostics.push(diag);
            }
        }
    }

    diagnostics
}
