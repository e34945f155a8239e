//! Subcomponent factory method parameters.
//!
//! A method on a parent component that creates a subcomponent must take,
//! as parameters, exactly the modules that require explicit instantiation.
//! Missing ones cannot be constructed by the component; extra ones are
//! dead weight the caller would have to fabricate for nothing.

use indexmap::IndexSet;

use graft_model::{ClassName, Diagnostic, DiagnosticKind};

use crate::resolve::validation::Network;

pub(crate) fn validate(network: &Network<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for graph in network.root.all_graphs() {
        for factory_method in &graph.factory_methods {
            let supplied: IndexSet<&ClassName> =
                factory_method.supplied_modules.iter().collect();
            let required: IndexSet<&ClassName> =
                factory_method.required_modules.iter().collect();

            let omitted: Vec<_> = required.difference(&supplied).collect();
            let extra: Vec<_> = supplied.difference(&required).collect();
            if omitted.is_empty() && extra.is_empty() {
                continue;
            }

            let mut diag = Diagnostic::error(
                DiagnosticKind::InvalidFactoryMethod,
                format!(
                    "{} must take exactly the modules {} cannot construct itself",
                    factory_method.method, factory_method.subcomponent
                ),
            )
            .with_element(graph.component.name.clone());
            for module in omitted {
                diag = diag.with_note(format!("missing parameter for module {module}"));
            }
            for module in extra {
                diag = diag.with_note(format!("unnecessary parameter for module {module}"));
            }
            diagnostics.push(diag);
        }
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use indexmap::{IndexMap, IndexSet};

    use graft_model::{
        BindingGraph, ComponentAnnotation, ComponentDescriptor, Element,
        SubcomponentFactoryMethod, SymbolTable,
    };

    use super::*;

    fn graph(factory_methods: Vec<SubcomponentFactoryMethod>) -> BindingGraph {
        let mut symbols = SymbolTable::new();
        let element = symbols.insert(Element::interface("app.Parent"));
        BindingGraph {
            component: Arc::new(ComponentDescriptor {
                element,
                name: ClassName::new("app.Parent"),
                annotation: ComponentAnnotation::real(),
                scopes: IndexSet::new(),
                creator: None,
                parent: None,
            }),
            full_graph: false,
            nodes: IndexMap::new(),
            entry_points: Vec::new(),
            missing: IndexSet::new(),
            factory_methods,
            children: Vec::new(),
        }
    }

    fn method(supplied: &[&str], required: &[&str]) -> SubcomponentFactoryMethod {
        SubcomponentFactoryMethod {
            method: "child()".into(),
            subcomponent: ClassName::new("app.Child"),
            supplied_modules: supplied.iter().map(|m| ClassName::new(*m)).collect(),
            required_modules: required.iter().map(|m| ClassName::new(*m)).collect(),
        }
    }

    #[test]
    fn test_exact_parameters_pass() {
        let g = graph(vec![method(&["app.M"], &["app.M"])]);
        assert!(validate(&Network::new(&g)).is_empty());
    }

    #[test]
    fn test_omission_and_extra_reported_together() {
        let g = graph(vec![method(&["app.Extra"], &["app.Needed"])]);
        let diagnostics = validate(&Network::new(&g));
        assert_eq!(diagnostics.len(), 1);
        let notes = &diagnostics[0].notes;
        assert!(notes.iter().any(|n| n.contains("missing") && n.contains("app.Needed")));
        assert!(notes.iter().any(|n| n.contains("unnecessary") && n.contains("app.Extra")));
    }

    #[test]
    fn test_default_constructible_modules_need_no_parameter() {
        let g = graph(vec![method(&[], &[])]);
        assert!(validate(&Network::new(&g)).is_empty());
    }
}
