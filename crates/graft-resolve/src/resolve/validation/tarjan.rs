//! Tarjan's strongly-connected-components algorithm.
//!
//! Deterministic: nodes are visited in the order given, successors in the
//! order the edge function yields them, so the same graph always produces
//! the same components in the same order.

use std::hash::Hash;

use indexmap::IndexMap;

struct State {
    index: usize,
    low_link: usize,
    on_stack: bool,
}

/// Finds all strongly connected components.
///
/// Components come out in reverse topological order: a component appears
/// before any component that depends on it.
pub fn find_sccs<N, F>(nodes: &[N], mut successors: F) -> Vec<Vec<N>>
where
    N: Clone + Eq + Hash,
    F: FnMut(&N) -> Vec<N>,
{
    let mut states: IndexMap<N, State> = IndexMap::new();
    let mut stack: Vec<N> = Vec::new();
    let mut next_index = 0usize;
    let mut components: Vec<Vec<N>> = Vec::new();

    for node in nodes {
        if !states.contains_key(node) {
            strong_connect(
                node,
                &mut successors,
                &mut states,
                &mut stack,
                &mut next_index,
                &mut components,
            );
        }
    }
    components
}

fn strong_connect<N, F>(
    node: &N,
    successors: &mut F,
    states: &mut IndexMap<N, State>,
    stack: &mut Vec<N>,
    next_index: &mut usize,
    components: &mut Vec<Vec<N>>,
) where
    N: Clone + Eq + Hash,
    F: FnMut(&N) -> Vec<N>,
{
    let index = *next_index;
    *next_index += 1;
    states.insert(node.clone(), State { index, low_link: index, on_stack: true });
    stack.push(node.clone());

    for successor in successors(node) {
        match states.get(&successor) {
            None => {
                strong_connect(&successor, successors, states, stack, next_index, components);
                let successor_low = states[&successor].low_link;
                let state = &mut states[node];
                state.low_link = state.low_link.min(successor_low);
            }
            Some(s) if s.on_stack => {
                let successor_index = s.index;
                let state = &mut states[node];
                state.low_link = state.low_link.min(successor_index);
            }
            Some(_) => {}
        }
    }

    let state = &states[node];
    if state.low_link == state.index {
        let mut component = Vec::new();
        loop {
            let member = match stack.pop() {
                Some(member) => member,
                None => break,
            };
            states[&member].on_stack = false;
            let done = &member == node;
            component.push(member);
            if done {
                break;
            }
        }
        component.reverse();
        components.push(component);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl FnMut(&String) -> Vec<String> + 'a {
        move |node: &String| {
            pairs
                .iter()
                .filter(|(from, _)| from == node)
                .map(|(_, to)| to.to_string())
                .collect()
        }
    }

    fn nodes(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_acyclic_graph_is_all_singletons() {
        let sccs = find_sccs(&nodes(&["a", "b", "c"]), edges(&[("a", "b"), ("b", "c")]));
        assert_eq!(sccs.len(), 3);
        assert!(sccs.iter().all(|c| c.len() == 1));
        // Reverse topological: leaves first.
        assert_eq!(sccs[0], vec!["c"]);
        assert_eq!(sccs[2], vec!["a"]);
    }

    #[test]
    fn test_two_node_cycle() {
        let sccs = find_sccs(&nodes(&["a", "b"]), edges(&[("a", "b"), ("b", "a")]));
        assert_eq!(sccs.len(), 1);
        assert_eq!(sccs[0].len(), 2);
    }

    #[test]
    fn test_cycle_with_tail() {
        let sccs = find_sccs(
            &nodes(&["a", "b", "c", "d"]),
            edges(&[("a", "b"), ("b", "c"), ("c", "b"), ("c", "d")]),
        );
        let cycle: Vec<_> = sccs.iter().filter(|c| c.len() > 1).collect();
        assert_eq!(cycle.len(), 1);
        assert_eq!(cycle[0].len(), 2);
        assert!(cycle[0].contains(&"b".to_string()));
        assert!(cycle[0].contains(&"c".to_string()));
    }

    #[test]
    fn test_self_loop_is_singleton_component() {
        // A self-loop comes out as a size-1 component; the cycle validator
        // checks the edge separately.
        let sccs = find_sccs(&nodes(&["a"]), edges(&[("a", "a")]));
        assert_eq!(sccs, vec![vec!["a".to_string()]]);
    }
}
