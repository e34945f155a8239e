//! Per-component dependency sets.
//!
//! [`ComponentDependencies`] folds the flat marker metadata into one entry
//! set per component, applying test restriction, `replaces` directives, and
//! per-test uninstall directives. The result is derived state: it is rebuilt
//! fresh for every validation pass and never mutated in place.

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use graft_model::ClassName;

use crate::payload::{AggregatedDepsMetadata, ContributionKind, UninstallMetadata};

/// Resolved entries of one component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentEntries {
    pub modules: IndexSet<ClassName>,
    pub entry_points: IndexSet<ClassName>,
    pub component_entry_points: IndexSet<ClassName>,
}

/// All components' resolved entries for one compilation (or one test).
#[derive(Debug, Clone, Default)]
pub struct ComponentDependencies {
    per_component: IndexMap<ClassName, ComponentEntries>,
}

impl ComponentDependencies {
    /// Derives the dependency sets from aggregated metadata.
    ///
    /// `test` selects the tree being built: entries restricted to a
    /// different test are dropped, and uninstall directives of this test
    /// remove their modules. Replaced entries are dropped wherever a
    /// surviving entry names them.
    pub fn from_metadata(
        metadata: &[AggregatedDepsMetadata],
        uninstalls: &[UninstallMetadata],
        test: Option<&ClassName>,
    ) -> ComponentDependencies {
        let applicable: Vec<&AggregatedDepsMetadata> =
            metadata.iter().filter(|m| m.applies_to(test)).collect();

        let mut removed: IndexSet<&ClassName> = applicable
            .iter()
            .flat_map(|m| m.replaces.iter())
            .collect();
        if let Some(test) = test {
            removed.extend(
                uninstalls
                    .iter()
                    .filter(|u| &u.test == test)
                    .flat_map(|u| u.uninstall_modules.iter()),
            );
        }

        let mut per_component: IndexMap<ClassName, ComponentEntries> = IndexMap::new();
        for meta in &applicable {
            if removed.contains(&meta.element) {
                continue;
            }
            for component in &meta.components {
                let entries = per_component.entry(component.clone()).or_default();
                let target = match meta.kind {
                    ContributionKind::Module => &mut entries.modules,
                    ContributionKind::EntryPoint => &mut entries.entry_points,
                    ContributionKind::ComponentEntryPoint => &mut entries.component_entry_points,
                };
                target.insert(meta.element.clone());
            }
        }

        debug!(
            components = per_component.len(),
            removed = removed.len(),
            "component dependencies derived"
        );
        ComponentDependencies { per_component }
    }

    pub fn entries(&self, component: &ClassName) -> Option<&ComponentEntries> {
        self.per_component.get(component)
    }

    /// Components that have at least one entry, in derivation order.
    pub fn components(&self) -> impl Iterator<Item = &ClassName> {
        self.per_component.keys()
    }

    pub fn modules(&self, component: &ClassName) -> IndexSet<ClassName> {
        self.entries(component)
            .map(|e| e.modules.clone())
            .unwrap_or_default()
    }

    pub fn entry_points(&self, component: &ClassName) -> IndexSet<ClassName> {
        self.entries(component)
            .map(|e| e.entry_points.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str, component: &str) -> AggregatedDepsMetadata {
        AggregatedDepsMetadata {
            kind: ContributionKind::Module,
            element: ClassName::new(name),
            components: vec![ClassName::new(component)],
            test: None,
            replaces: vec![],
        }
    }

    const SINGLETON: &str = "graft.components.SingletonComponent";

    #[test]
    fn test_grouping_by_component() {
        let metadata = vec![
            module("app.NetModule", SINGLETON),
            module("app.DbModule", SINGLETON),
            module("app.UiModule", "app.ActivityComponent"),
        ];
        let deps = ComponentDependencies::from_metadata(&metadata, &[], None);
        assert_eq!(deps.modules(&ClassName::new(SINGLETON)).len(), 2);
        assert_eq!(deps.modules(&ClassName::new("app.ActivityComponent")).len(), 1);
    }

    #[test]
    fn test_replaces_removes_the_named_entry() {
        let mut fake = module("app.FakeNetModule", SINGLETON);
        fake.replaces = vec![ClassName::new("app.NetModule")];
        let metadata = vec![module("app.NetModule", SINGLETON), fake];

        let deps = ComponentDependencies::from_metadata(&metadata, &[], None);
        let modules = deps.modules(&ClassName::new(SINGLETON));
        assert!(modules.contains(&ClassName::new("app.FakeNetModule")));
        assert!(!modules.contains(&ClassName::new("app.NetModule")));
    }

    #[test]
    fn test_test_restricted_entries() {
        let mut scoped = module("app.TestModule", SINGLETON);
        scoped.test = Some(ClassName::new("app.RepoTest"));
        let metadata = vec![module("app.NetModule", SINGLETON), scoped];

        let global = ComponentDependencies::from_metadata(&metadata, &[], None);
        assert_eq!(global.modules(&ClassName::new(SINGLETON)).len(), 1);

        let in_test = ComponentDependencies::from_metadata(
            &metadata,
            &[],
            Some(&ClassName::new("app.RepoTest")),
        );
        assert_eq!(in_test.modules(&ClassName::new(SINGLETON)).len(), 2);
    }

    #[test]
    fn test_uninstall_applies_to_its_test_only() {
        let metadata = vec![module("app.NetModule", SINGLETON)];
        let uninstalls = vec![UninstallMetadata {
            test: ClassName::new("app.RepoTest"),
            uninstall_modules: vec![ClassName::new("app.NetModule")],
        }];

        let in_test = ComponentDependencies::from_metadata(
            &metadata,
            &uninstalls,
            Some(&ClassName::new("app.RepoTest")),
        );
        assert!(in_test.modules(&ClassName::new(SINGLETON)).is_empty());

        let other = ComponentDependencies::from_metadata(
            &metadata,
            &uninstalls,
            Some(&ClassName::new("app.OtherTest")),
        );
        assert_eq!(other.modules(&ClassName::new(SINGLETON)).len(), 1);
    }

    #[test]
    fn test_missing_component_yields_empty_sets() {
        let deps = ComponentDependencies::from_metadata(&[], &[], None);
        assert!(deps.modules(&ClassName::new(SINGLETON)).is_empty());
        assert!(deps.entry_points(&ClassName::new(SINGLETON)).is_empty());
    }
}
