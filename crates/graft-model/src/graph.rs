//! The resolved binding graph.
//!
//! A [`BindingGraph`] is the output of resolution for one component: every
//! key reachable from the component's entry points mapped to the bindings
//! that satisfy it, plus one nested graph per subcomponent. Validation
//! passes consume this structure; they never re-resolve anything.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::binding::Binding;
use crate::component::ComponentDescriptor;
use crate::key::Key;
use crate::name::ClassName;
use crate::request::DependencyRequest;

/// All bindings resolved for one key within one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinding {
    pub key: Key,
    /// Every binding found for the key. Exactly one for a valid unique
    /// binding; more than one is a duplicate the validator reports.
    pub bindings: Vec<Binding>,
    /// Component in whose scope the key was resolved. For a scoped binding
    /// this is the component carrying the scope, which may be an ancestor
    /// of the graph's own component.
    pub owner: ClassName,
}

impl ResolvedBinding {
    /// The single binding, when resolution was unambiguous.
    pub fn unique(&self) -> Option<&Binding> {
        match self.bindings.as_slice() {
            [binding] => Some(binding),
            _ => None,
        }
    }
}

/// A component method returning a subcomponent or its creator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcomponentFactoryMethod {
    pub method: String,
    pub subcomponent: ClassName,
    /// Modules passed as factory method parameters.
    pub supplied_modules: Vec<ClassName>,
    /// Modules the subcomponent needs an instance of.
    pub required_modules: Vec<ClassName>,
}

/// The resolved graph of one component, with nested graphs for its
/// subcomponents.
#[derive(Debug, Clone)]
pub struct BindingGraph {
    pub component: Arc<ComponentDescriptor>,
    /// Whether this graph was built in full-graph mode, seeding every known
    /// declaration instead of only the keys reachable from entry points.
    pub full_graph: bool,
    /// Every resolved key, in resolution order.
    pub nodes: IndexMap<Key, ResolvedBinding>,
    pub entry_points: Vec<DependencyRequest>,
    /// Keys that were requested but have no binding.
    pub missing: IndexSet<Key>,
    pub factory_methods: Vec<SubcomponentFactoryMethod>,
    pub children: Vec<BindingGraph>,
}

impl BindingGraph {
    pub fn resolved(&self, key: &Key) -> Option<&ResolvedBinding> {
        self.nodes.get(key)
    }

    /// This graph and every descendant, preorder.
    pub fn all_graphs(&self) -> Vec<&BindingGraph> {
        let mut graphs = vec![self];
        for child in &self.children {
            graphs.extend(child.all_graphs());
        }
        graphs
    }

    /// Total number of resolved keys across the component tree.
    pub fn node_count(&self) -> usize {
        self.all_graphs().iter().map(|g| g.nodes.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::BindingKind;
    use crate::component::ComponentAnnotation;
    use crate::element::{Element, SymbolTable};

    fn graph(name: &str, children: Vec<BindingGraph>) -> BindingGraph {
        let mut symbols = SymbolTable::new();
        let element = symbols.insert(Element::interface(name));
        BindingGraph {
            component: Arc::new(ComponentDescriptor {
                element,
                name: ClassName::new(name),
                annotation: ComponentAnnotation::real(),
                scopes: IndexSet::new(),
                creator: None,
                parent: None,
            }),
            full_graph: false,
            nodes: IndexMap::new(),
            entry_points: Vec::new(),
            missing: IndexSet::new(),
            factory_methods: Vec::new(),
            children,
        }
    }

    #[test]
    fn test_all_graphs_preorder() {
        let tree = graph(
            "app.Root",
            vec![graph("app.A", vec![graph("app.A1", vec![])]), graph("app.B", vec![])],
        );
        let names: Vec<_> = tree
            .all_graphs()
            .iter()
            .map(|g| g.component.name.simple_name().to_string())
            .collect();
        assert_eq!(names, vec!["Root", "A", "A1", "B"]);
    }

    #[test]
    fn test_unique_resolution() {
        let key = Key::of("app.Repo");
        let one = ResolvedBinding {
            key: key.clone(),
            bindings: vec![Binding::new(key.clone(), BindingKind::Injection, "app.Repo()")],
            owner: ClassName::new("app.Root"),
        };
        assert!(one.unique().is_some());

        let two = ResolvedBinding {
            bindings: vec![
                Binding::new(key.clone(), BindingKind::Injection, "app.Repo()"),
                Binding::new(key.clone(), BindingKind::Provision, "app.M.repo()"),
            ],
            ..one
        };
        assert!(two.unique().is_none());
    }
}
