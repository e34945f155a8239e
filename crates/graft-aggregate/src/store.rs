//! The aggregation store.
//!
//! Scans the well-known marker packages of the current symbol table, unwraps
//! public proxies emitted for package-private markers, decodes each marker's
//! payload, and hands back the typed metadata. Reading is pure: every
//! problem is reported as a diagnostic tied to the offending element, never
//! a crash, except for the emitter-defect invariants the payload layer
//! panics on.

use tracing::debug;

use graft_model::{names, ClassName, Diagnostic, DiagnosticKind, Element, SymbolTable};

use crate::payload::{
    AggregatedDepsMetadata, AggregatedDepsPayload, AggregatedUninstallModulesPayload,
    UninstallMetadata,
};

/// All marker metadata visible to the current compilation.
#[derive(Debug, Default)]
pub struct AggregationStore {
    pub metadata: Vec<AggregatedDepsMetadata>,
    pub uninstalls: Vec<UninstallMetadata>,
}

impl AggregationStore {
    /// Reads every marker package. Diagnostics for malformed markers are
    /// pushed onto `diagnostics`; the store still contains every valid
    /// record so resolution can proceed best-effort.
    pub fn read(symbols: &SymbolTable, diagnostics: &mut Vec<Diagnostic>) -> AggregationStore {
        let mut store = AggregationStore::default();

        for element in marker_elements(
            symbols,
            names::AGGREGATED_DEPS_PACKAGE,
            &names::aggregated_deps(),
            diagnostics,
        ) {
            if let Some(payload) =
                decode_payload(element, &names::aggregated_deps(), diagnostics, |json| {
                    AggregatedDepsPayload::decode(json).map(|p| AggregatedDepsMetadata::from_payload(&p))
                })
            {
                store.metadata.push(payload);
            }
        }

        for element in marker_elements(
            symbols,
            names::AGGREGATED_UNINSTALL_PACKAGE,
            &names::aggregated_uninstall_modules(),
            diagnostics,
        ) {
            if let Some(payload) = decode_payload(
                element,
                &names::aggregated_uninstall_modules(),
                diagnostics,
                |json| {
                    AggregatedUninstallModulesPayload::decode(json)
                        .map(|p| UninstallMetadata::from_payload(&p))
                },
            ) {
                store.uninstalls.push(payload);
            }
        }

        debug!(
            deps = store.metadata.len(),
            uninstalls = store.uninstalls.len(),
            "aggregation store read"
        );
        store
    }
}

/// Collects the marker elements of one package, unwrapping proxies.
///
/// Package-private markers are re-exported through a public proxy so they
/// stay visible to whole-program aggregation from another package; callers
/// always see the original element, never the proxy. A package that exists
/// but yields zero valid markers is reported: it means generated markers
/// were deleted out from under a stale artifact.
fn marker_elements<'a>(
    symbols: &'a SymbolTable,
    package: &str,
    marker: &ClassName,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<&'a Element> {
    if !symbols.has_package(package) {
        return Vec::new();
    }

    let mut elements = Vec::new();
    for element in symbols.package_elements(package) {
        let unwrapped = match element.annotation(&names::aggregated_element_proxy()) {
            Some(proxy) => match proxy.type_value("value").and_then(|n| symbols.type_element(n)) {
                Some(original) => original,
                None => {
                    diagnostics.push(
                        Diagnostic::error(
                            DiagnosticKind::InvalidAggregation,
                            "proxy marker does not name an element in this compilation",
                        )
                        .with_element(element.name().clone()),
                    );
                    continue;
                }
            },
            None => element,
        };

        if !unwrapped.has_annotation(marker) {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticKind::InvalidAggregation,
                    format!("expected element to be annotated with @{marker}"),
                )
                .with_element(unwrapped.name().clone()),
            );
            continue;
        }
        elements.push(unwrapped);
    }

    if elements.is_empty() {
        diagnostics.push(Diagnostic::error(
            DiagnosticKind::InvalidAggregation,
            format!("package {package} exists but contains no valid markers"),
        ));
    }
    elements
}

/// Decodes the `value` member of a marker annotation through `decode`.
fn decode_payload<T>(
    element: &Element,
    marker: &ClassName,
    diagnostics: &mut Vec<Diagnostic>,
    decode: impl FnOnce(&str) -> Result<T, crate::payload::PayloadError>,
) -> Option<T> {
    let annotation = element.annotation(marker)?;
    let json = match annotation.string_value("value") {
        Some(json) => json,
        None => {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticKind::InvalidAggregation,
                    format!("marker @{marker} carries no payload"),
                )
                .with_element(element.name().clone()),
            );
            return None;
        }
    };
    match decode(json) {
        Ok(value) => Some(value),
        Err(err) => {
            diagnostics.push(
                Diagnostic::error(DiagnosticKind::InvalidAggregation, err.to_string())
                    .with_element(element.name().clone()),
            );
            None
        }
    }
}
