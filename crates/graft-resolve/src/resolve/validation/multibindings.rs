//! Map multibinding key-type agreement.
//!
//! Every `@IntoMap` contribution toward the same logical map (same
//! qualifier, same value type) must declare its key through map-key
//! annotations of the same key type. Contributions with differing key
//! types would otherwise split one intended map into several, silently.

use indexmap::IndexMap;

use graft_model::{
    Binding, ContributionType, Diagnostic, DiagnosticKind, Key, TypeRef,
};

use crate::resolve::keys::MapType;
use crate::resolve::validation::Network;

pub(crate) fn validate(network: &Network<'_>) -> Vec<Diagnostic> {
    // Group every map contribution by qualifier and value type. The key
    // type is part of the collection key, so disagreeing contributions
    // land under different keys and never meet anywhere else.
    let mut groups: IndexMap<(Option<String>, TypeRef), Vec<&Binding>> = IndexMap::new();
    for resolved in network.nodes.values() {
        for binding in &resolved.bindings {
            if binding.contribution_type != ContributionType::Map {
                continue;
            }
            if let Some(group) = group_key(&binding.key) {
                groups.entry(group).or_default().push(binding);
            }
        }
    }

    let mut diagnostics = Vec::new();
    for ((_, value_type), bindings) in groups {
        let mut key_types: IndexMap<TypeRef, Vec<&Binding>> = IndexMap::new();
        for binding in bindings {
            let map = MapType::of(binding.key.ty());
            key_types.entry(map.key_type().clone()).or_default().push(binding);
        }
        if key_types.len() > 1 {
            let mut diag = Diagnostic::error(
                DiagnosticKind::MultibindingConflict,
                format!(
                    "map contributions for value type {value_type} disagree on their key type"
                ),
            );
            for (key_type, bindings) in key_types {
                for binding in bindings {
                    diag = diag
                        .with_note(format!("{} uses key type {key_type}", binding.declaring_site));
                }
            }
            diagnostics.push(diag);
        }
    }
    diagnostics
}

fn group_key(key: &Key) -> Option<(Option<String>, TypeRef)> {
    if !MapType::is_map(key.ty()) || key.ty().arguments().len() != 2 {
        return None;
    }
    let map = MapType::of(key.ty());
    Some((
        key.qualifier().map(|q| q.to_string()),
        map.value_type().clone(),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use indexmap::{IndexMap as Map, IndexSet};

    use graft_model::{
        names, AnnotationValue, BindingGraph, BindingKind, ClassName, ComponentAnnotation,
        ComponentDescriptor, ContributionIdentifier, Element, ResolvedBinding, SymbolTable,
    };

    use super::*;

    fn map_contribution(module: &str, key_type: &str, value: AnnotationValue) -> (Key, Binding) {
        let ty = TypeRef::parameterized(
            names::map(),
            vec![TypeRef::new(key_type), TypeRef::new("app.Task")],
        );
        let key = Key::of(ty)
            .contribution(ContributionIdentifier::new(ClassName::new(module), "contribute"));
        let binding = Binding::new(
            key.clone(),
            BindingKind::Provision,
            format!("{module}.contribute()"),
        )
        .with_contribution_type(ContributionType::Map)
        .with_map_key(value);
        (key, binding)
    }

    fn graph(entries: Vec<(Key, Binding)>) -> BindingGraph {
        let mut symbols = SymbolTable::new();
        let element = symbols.insert(Element::interface("app.C"));
        let mut nodes = Map::new();
        for (key, binding) in entries {
            nodes.insert(
                key.clone(),
                ResolvedBinding {
                    key,
                    bindings: vec![binding],
                    owner: ClassName::new("app.C"),
                },
            );
        }
        BindingGraph {
            component: Arc::new(ComponentDescriptor {
                element,
                name: ClassName::new("app.C"),
                annotation: ComponentAnnotation::real(),
                scopes: IndexSet::new(),
                creator: None,
                parent: None,
            }),
            full_graph: false,
            nodes,
            entry_points: Vec::new(),
            missing: IndexSet::new(),
            factory_methods: Vec::new(),
            children: Vec::new(),
        }
    }

    #[test]
    fn test_disagreeing_key_types_reported() {
        let g = graph(vec![
            map_contribution("app.M1", "core.String", AnnotationValue::Str("a".into())),
            map_contribution("app.M2", "core.Int", AnnotationValue::Int(1)),
        ]);
        let diagnostics = validate(&Network::new(&g));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::MultibindingConflict);
        assert_eq!(diagnostics[0].notes.len(), 2);
    }

    #[test]
    fn test_agreeing_key_types_pass() {
        let g = graph(vec![
            map_contribution("app.M1", "core.String", AnnotationValue::Str("a".into())),
            map_contribution("app.M2", "core.String", AnnotationValue::Str("b".into())),
        ]);
        assert!(validate(&Network::new(&g)).is_empty());
    }
}
