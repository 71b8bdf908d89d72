//! The reachability analyser (C11): a per-machine state-reachability
//! classification for clients (tests, visualisers) to flag dead states,
//! per spec.md §4.11.

use std::collections::BTreeMap;

use crate::check::ResolvedEdge;

/// A state's best attainable reachability classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Reachability {
    /// No transition at all connects the two states (or the state is
    /// unreachable from the start state along any path).
    Unreachable,
    /// Some path exists, but every transition along the best path has at
    /// least one precondition that could block it.
    PossiblyReachable,
    /// Some path exists whose every transition is unconditional.
    Reachable,
}

/// Condense `edges` into a `(from_state, to_state) -> Reachability` label
/// for every state pair with at least one transition between them,
/// taking the highest label among parallel transitions.
fn label_state_pairs(edges: &[ResolvedEdge], state_count: usize) -> BTreeMap<(usize, usize), Reachability> {
    let mut labels: BTreeMap<(usize, usize), Reachability> = BTreeMap::new();
    let _ = state_count;

    for edge in edges {
        let label = if edge.definition.preconditions.is_empty() {
            Reachability::Reachable
        } else {
            Reachability::PossiblyReachable
        };
        let key = (edge.from_state, edge.to_state);
        let entry = labels.entry(key).or_insert(Reachability::Unreachable);
        if label > *entry {
            *entry = label;
        }
    }

    labels
}

/// Classify every state's reachability from state 0, per spec.md §4.11: a
/// modified Dijkstra where the combining operator along a path is `min`
/// (a path is only as good as its weakest edge) and the relaxation
/// operator across competing paths is `max` (the best of all paths to a
/// state wins).
pub fn analyse(edges: &[ResolvedEdge], state_count: usize) -> BTreeMap<usize, Reachability> {
    let pair_labels = label_state_pairs(edges, state_count);

    let mut best: BTreeMap<usize, Reachability> = (0..state_count).map(|s| (s, Reachability::Unreachable)).collect();
    if state_count == 0 {
        return best;
    }
    best.insert(0, Reachability::Reachable);

    let mut visited = vec![false; state_count];

    loop {
        // Pick the unvisited state with the best current label (the
        // usual Dijkstra frontier choice), breaking ties by state index
        // for determinism.
        let Some(current) = (0..state_count)
            .filter(|&s| !visited[s] && best[&s] != Reachability::Unreachable)
            .max_by_key(|&s| (best[&s], std::cmp::Reverse(s)))
        else {
            break;
        };
        visited[current] = true;
        let current_label = best[&current];

        for (&(from, to), &edge_label) in &pair_labels {
            if from != current || visited[to] {
                continue;
            }
            let candidate = current_label.min(edge_label);
            if candidate > best[&to] {
                best.insert(to, candidate);
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{pre_check_and_register, sanity_check};
    use crate::parser::parse_program;

    fn xml_node() -> &'static str {
        r#"<node>
            <interface name="org.example.Thing">
                <method name="M1">
                    <arg name="value" type="s" direction="in"/>
                </method>
            </interface>
        </node>"#
    }

    /// Seed scenario 6: three states, `A` the start; `A -> B` gated by an
    /// always-false precondition; `A -> C` unconditional (random tick).
    #[test]
    fn classifies_reachable_possibly_reachable_and_unreachable() {
        let src = r#"
            object at "/a" implements org.example.Thing {
                states { A; }
                states { B; C; }
                transition from A to B on method M1 {
                    precondition { false }
                }
                transition from A to C on random {
                }
            }
        "#;
        let program = parse_program(src).unwrap();
        let node = dbus_sim_xml::parse_interface(xml_node()).unwrap();
        let decl = &program.objects[0];
        sanity_check(decl);
        let checked = pre_check_and_register(decl, &node).unwrap();

        let a = checked.states.iter().position(|s| s == "A").unwrap();
        let b = checked.states.iter().position(|s| s == "B").unwrap();
        let c = checked.states.iter().position(|s| s == "C").unwrap();
        assert_eq!(a, 0, "A is the default state and must occupy index 0");

        let labels = analyse(&checked.edges, checked.states.len());
        assert_eq!(labels[&a], Reachability::Reachable);
        assert_eq!(labels[&b], Reachability::PossiblyReachable);
        assert_eq!(labels[&c], Reachability::Reachable);
    }

    #[test]
    fn state_with_no_incoming_edge_is_unreachable() {
        let src = r#"
            object at "/a" implements org.example.Thing {
                states { A; }
                states { B; Orphan; }
                transition from A to B on random {
                }
            }
        "#;
        let program = parse_program(src).unwrap();
        let node = dbus_sim_xml::parse_interface(xml_node()).unwrap();
        let decl = &program.objects[0];
        sanity_check(decl);
        let checked = pre_check_and_register(decl, &node).unwrap();

        let orphan = checked.states.iter().position(|s| s == "Orphan").unwrap();
        let labels = analyse(&checked.edges, checked.states.len());
        assert_eq!(labels[&orphan], Reachability::Unreachable);
    }
}
