//! Scope compatibility.
//!
//! A scoped binding must live in a component whose declared scope set
//! contains that exact scope. Scope membership is identity, not alias
//! compatibility. Fictional components fabricated for full-graph analysis
//! declare no scopes of their own, so they are exempt: the real check
//! happens when an application installs the module into a real component.

use graft_model::{Diagnostic, DiagnosticKind};

use crate::resolve::validation::Network;

pub(crate) fn validate(network: &Network<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for graph in network.root.all_graphs() {
        if graph.full_graph && !graph.component.annotation.is_real() {
            continue;
        }
        for resolved in graph.nodes.values() {
            let owner = match network.descriptor(&resolved.owner) {
                Some(owner) => owner,
                None => continue,
            };
            for binding in &resolved.bindings {
                if let Some(scope) = &binding.scope {
                    if !owner.has_scope(scope) {
                        diagnostics.push(
                            Diagnostic::error(
                                DiagnosticKind::IncompatiblyScoped,
                                format!(
                                    "{scope} binding {} is installed in {}, which does not declare {scope}",
                                    binding.declaring_site, owner.name
                                ),
                            )
                            .with_element(owner.name.clone()),
                        );
                    }
                }
            }
        }
    }
    diagnostics
}
