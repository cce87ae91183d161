//! Dependency-graph diagnostics
//!
//! Builds an explicit petgraph view of the registered targets so the run
//! driver can display dependencies and warn about cycles. The execution
//! engine never uses this graph; it resolves dependencies by name during
//! the run and truncates cycles silently, so this is where a cycle becomes
//! visible to the user at all.

use std::collections::HashMap;

use petgraph::algo::kosaraju_scc;
use petgraph::graph::DiGraph;

use crate::results::GraphResult;
use crate::tree::TargetTree;
use crate::types::{GantryError, GantryResult};

/// Build the dependency graph for every registered target.
///
/// Every dependency name must resolve; the engine would fail the same
/// lookup at run time, so an unresolved name is reported here as well.
pub fn build_dependency_graph(tree: &TargetTree) -> GantryResult<GraphResult> {
    let mut graph = DiGraph::<String, ()>::new();
    let mut node_indices = HashMap::new();

    let mut names: Vec<&str> = tree.targets().map(|t| t.name()).collect();
    names.sort_unstable();

    for name in &names {
        let node_index = graph.add_node((*name).to_string());
        node_indices.insert(*name, node_index);
    }

    for name in &names {
        let target = tree.target(name)?;
        let from_node = node_indices[name];
        for dep in target.dependencies() {
            let Some(&to_node) = node_indices.get(dep.as_str()) else {
                return Err(GantryError::Target(format!(
                    "Target '{}' depends on '{}' which is not registered",
                    name, dep
                )));
            };
            // Edge direction: target -> dependency.
            graph.add_edge(from_node, to_node, ());
        }
    }

    // Strongly connected components with more than one member are cycles;
    // a single node only cycles if it depends on itself.
    let mut cycles: Vec<Vec<String>> = kosaraju_scc(&graph)
        .into_iter()
        .filter_map(|component| {
            if component.len() > 1 {
                let mut cycle = component
                    .iter()
                    .map(|node| graph[*node].clone())
                    .collect::<Vec<_>>();
                cycle.sort();
                Some(cycle)
            } else {
                let node = component[0];
                if graph.contains_edge(node, node) {
                    Some(vec![graph[node].clone()])
                } else {
                    None
                }
            }
        })
        .collect();
    cycles.sort();

    Ok(GraphResult { graph, cycles })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Target;

    #[test]
    fn acyclic_graph_reports_no_cycles() {
        let mut tree = TargetTree::new();
        tree.add_target(Target::new("compile")).unwrap();
        tree.add_target(Target::new("test").depends_on(["compile"]))
            .unwrap();
        tree.add_target(Target::new("package").depends_on(["compile", "test"]))
            .unwrap();

        let result = build_dependency_graph(&tree).unwrap();

        assert_eq!(result.graph.node_count(), 3);
        assert_eq!(result.graph.edge_count(), 3);
        assert!(result.cycles.is_empty());
    }

    #[test]
    fn cycles_are_detected_and_sorted() {
        let mut tree = TargetTree::new();
        tree.add_target(Target::new("a").depends_on(["b"])).unwrap();
        tree.add_target(Target::new("b").depends_on(["a"])).unwrap();
        tree.add_target(Target::new("standalone")).unwrap();

        let result = build_dependency_graph(&tree).unwrap();

        assert_eq!(result.cycles.len(), 1);
        assert_eq!(result.cycles[0], vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let mut tree = TargetTree::new();
        tree.add_target(Target::new("loop").depends_on(["loop"]))
            .unwrap();

        let result = build_dependency_graph(&tree).unwrap();
        assert_eq!(result.cycles, vec![vec!["loop".to_string()]]);
    }

    #[test]
    fn unresolved_dependency_fails() {
        let mut tree = TargetTree::new();
        tree.add_target(Target::new("deploy").depends_on(["package"]))
            .unwrap();

        let err = build_dependency_graph(&tree).unwrap_err();
        assert!(err.to_string().contains("package"));
    }
}
