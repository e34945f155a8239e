//! The persisted marker payload format.
//!
//! Marker payloads are the durable cross-compilation transport: the unit
//! that declares a module or entry point encodes one
//! [`AggregatedDepsPayload`] into its marker annotation, and the aggregating
//! pass decodes every payload visible on the classpath. The format is a
//! versioned contract; decode tolerates fields that older emitters did not
//! write.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use graft_model::{names, ClassName};

/// Hard failure on the payload decode path.
///
/// User-facing declaration problems are reported as diagnostics; this error
/// covers payloads that are not even well-formed records.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed marker payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("marker on {element} carries no payload")]
    MissingPayload { element: ClassName },
}

/// Wire form of one aggregated-deps marker.
///
/// Exactly one of `modules`, `entry_points`, `component_entry_points` is
/// non-empty. That invariant belongs to the consumer, not the decoder:
/// [`AggregatedDepsMetadata::from_payload`] enforces it loudly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedDepsPayload {
    /// Fully-qualified names of the components this entry installs into.
    pub components: Vec<String>,
    /// Test the entry is restricted to. Empty means it applies globally.
    #[serde(default)]
    pub test: String,
    /// Entries this one replaces. Absent in payloads from older emitters.
    #[serde(default)]
    pub replaces: Vec<String>,
    #[serde(default)]
    pub modules: Vec<String>,
    #[serde(default)]
    pub entry_points: Vec<String>,
    #[serde(default)]
    pub component_entry_points: Vec<String>,
}

impl AggregatedDepsPayload {
    pub fn decode(json: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn encode(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Wire form of one uninstall-modules marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedUninstallModulesPayload {
    /// Test the directive belongs to.
    pub test: String,
    #[serde(default)]
    pub uninstall_modules: Vec<String>,
}

impl AggregatedUninstallModulesPayload {
    pub fn decode(json: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn encode(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// What a marker contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContributionKind {
    Module,
    EntryPoint,
    ComponentEntryPoint,
}

/// One decoded and validated aggregated-deps entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedDepsMetadata {
    pub kind: ContributionKind,
    /// The module or entry-point interface the marker describes.
    pub element: ClassName,
    pub components: Vec<ClassName>,
    pub test: Option<ClassName>,
    pub replaces: Vec<ClassName>,
}

impl AggregatedDepsMetadata {
    /// Validates a decoded payload into typed metadata.
    ///
    /// Panics if the exactly-one-of invariant is violated: a marker with
    /// zero or several populated contribution fields can only come from a
    /// defective emitter, and silently picking one would corrupt the graph.
    pub fn from_payload(payload: &AggregatedDepsPayload) -> AggregatedDepsMetadata {
        let populated = [
            (ContributionKind::Module, &payload.modules),
            (ContributionKind::EntryPoint, &payload.entry_points),
            (ContributionKind::ComponentEntryPoint, &payload.component_entry_points),
        ];
        let mut non_empty = populated.iter().filter(|(_, names)| !names.is_empty());
        let (kind, names) = match (non_empty.next(), non_empty.next()) {
            (Some(only), None) => *only,
            _ => panic!(
                "aggregated-deps marker must populate exactly one of \
                 modules/entryPoints/componentEntryPoints: {payload:?}"
            ),
        };
        assert!(
            names.len() == 1,
            "aggregated-deps marker must name exactly one element: {payload:?}"
        );

        AggregatedDepsMetadata {
            kind,
            element: ClassName::new(names[0].clone()),
            components: payload
                .components
                .iter()
                .map(|c| canonical_component_name(ClassName::new(c.clone())))
                .collect(),
            test: if payload.test.is_empty() {
                None
            } else {
                Some(ClassName::new(payload.test.clone()))
            },
            replaces: payload.replaces.iter().map(|r| ClassName::new(r.clone())).collect(),
        }
    }

    /// Whether this entry applies to the given test's component tree.
    /// Global entries (no test) apply everywhere.
    pub fn applies_to(&self, test: Option<&ClassName>) -> bool {
        match &self.test {
            None => true,
            Some(own) => test == Some(own),
        }
    }
}

/// One decoded uninstall-modules directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallMetadata {
    pub test: ClassName,
    pub uninstall_modules: Vec<ClassName>,
}

impl UninstallMetadata {
    pub fn from_payload(payload: &AggregatedUninstallModulesPayload) -> UninstallMetadata {
        UninstallMetadata {
            test: ClassName::new(payload.test.clone()),
            uninstall_modules: payload
                .uninstall_modules
                .iter()
                .map(|m| ClassName::new(m.clone()))
                .collect(),
        }
    }
}

/// Compatibility shim: markers emitted before the singleton component was
/// renamed still install into `ApplicationComponent`. Rewrite the legacy
/// name to the canonical one at decode so the rest of the compiler never
/// sees it.
pub fn canonical_component_name(name: ClassName) -> ClassName {
    if name == names::legacy_application_component() {
        names::singleton_component()
    } else {
        name
    }
}
