//! Nullable binding policy.
//!
//! A binding marked nullable may produce null; a site that consumes it
//! without its own nullable marker would dereference that null. The
//! severity is a policy knob: projects migrating onto the check run it as
//! a warning first.

use graft_model::{Diagnostic, DiagnosticKind, Severity};

use crate::resolve::validation::{Network, ValidationOptions};

pub(crate) fn validate(network: &Network<'_>, options: &ValidationOptions) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let mut check = |site: &str, is_nullable: bool, key: &graft_model::Key| {
        if is_nullable {
            return;
        }
        let nullable_binding = network
            .resolved(key)
            .and_then(|r| r.unique())
            .map(|b| b.is_nullable)
            .unwrap_or(false);
        if nullable_binding {
            let message =
                format!("{key} is nullable, but {site} requests it without a nullable marker");
            diagnostics.push(match options.nullable_validation {
                Severity::Error => Diagnostic::error(DiagnosticKind::NullableViolation, message),
                Severity::Warning => {
                    Diagnostic::warning(DiagnosticKind::NullableViolation, message)
                }
                Severity::Note => Diagnostic::note(DiagnosticKind::NullableViolation, message),
            });
        }
    };

    for graph in network.root.all_graphs() {
        for request in &graph.entry_points {
            check(&request.site, request.is_nullable, &request.key);
        }
    }
    for resolved in network.nodes.values() {
        for binding in &resolved.bindings {
            for request in &binding.dependencies {
                check(&binding.declaring_site, request.is_nullable, &request.key);
            }
        }
    }

    diagnostics
}
