//! Causal graph construction and topological ordering (spec §3.4, §4.3
//! steps 4-5).

use std::collections::VecDeque;

use indexmap::IndexMap;

use crate::ast::{Declaration, Scenario, SENTINEL_LIST_NAME};
use crate::base::SourceSpan;
use crate::diagnostics::{Diagnostic, DiagnosticCode};

use super::symbol_table::base_segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Variable,
    Assumption,
    Parameter,
    Impact,
}

/// The dependency graph induced by `Variable.depends_on` and
/// `Impact.derives_from` edges, plus its topological order. Only top-level
/// declarations become nodes (spec §3.4; see DESIGN.md for the scoping
/// decision).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CausalGraph {
    pub nodes: Vec<(String, NodeKind)>,
    pub edges: Vec<(String, String)>,
    pub topological_order: Vec<String>,
}

impl CausalGraph {
    /// A topological order exists iff every node was scheduled; a shorter
    /// order means Kahn's algorithm stalled on a cycle.
    pub fn is_acyclic(&self) -> bool {
        self.topological_order.len() == self.nodes.len()
    }
}

pub fn build_causal_graph(scenario: &Scenario, diagnostics: &mut Vec<Diagnostic>) -> CausalGraph {
    let mut nodes = Vec::new();
    let mut node_names: IndexMap<&str, ()> = IndexMap::new();

    for decl in &scenario.declarations {
        let entry = match decl {
            Declaration::Variable(v) => Some((v.name.as_str(), NodeKind::Variable)),
            Declaration::Assumption(a) => Some((a.name.as_str(), NodeKind::Assumption)),
            Declaration::Parameter(p) => Some((p.name.as_str(), NodeKind::Parameter)),
            Declaration::Impact(i) if i.name != SENTINEL_LIST_NAME => {
                Some((i.name.as_str(), NodeKind::Impact))
            }
            _ => None,
        };
        if let Some((name, kind)) = entry {
            if node_names.insert(name, ()).is_none() {
                nodes.push((name.to_string(), kind));
            }
        }
    }

    let mut edges = Vec::new();
    for decl in &scenario.declarations {
        match decl {
            Declaration::Variable(v) => {
                for dep in &v.depends_on {
                    push_edge(&mut edges, &node_names, dep, &v.name);
                }
            }
            Declaration::Impact(i) if i.name != SENTINEL_LIST_NAME => {
                for dep in &i.derives_from {
                    push_edge(&mut edges, &node_names, dep, &i.name);
                }
            }
            _ => {}
        }
    }

    let topological_order = kahn_topological_sort(scenario, &nodes, &edges, diagnostics);
    CausalGraph {
        nodes,
        edges,
        topological_order,
    }
}

fn push_edge(
    edges: &mut Vec<(String, String)>,
    node_names: &IndexMap<&str, ()>,
    dependency: &str,
    dependent: &str,
) {
    let base = base_segment(dependency);
    if node_names.contains_key(base) {
        edges.push((base.to_string(), dependent.to_string()));
    }
}

fn kahn_topological_sort(
    scenario: &Scenario,
    nodes: &[(String, NodeKind)],
    edges: &[(String, String)],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<String> {
    let mut in_degree: IndexMap<&str, usize> =
        nodes.iter().map(|(n, _)| (n.as_str(), 0)).collect();
    let mut successors: IndexMap<&str, Vec<&str>> =
        nodes.iter().map(|(n, _)| (n.as_str(), Vec::new())).collect();

    for (from, to) in edges {
        successors.get_mut(from.as_str()).unwrap().push(to.as_str());
        *in_degree.get_mut(to.as_str()).unwrap() += 1;
    }

    // Seed the queue in declaration order so ties between independently
    // ready nodes resolve deterministically (spec glossary, "topological
    // order").
    let mut queue: VecDeque<&str> = nodes
        .iter()
        .map(|(n, _)| n.as_str())
        .filter(|n| in_degree[n] == 0)
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(name) = queue.pop_front() {
        order.push(name.to_string());
        for &succ in &successors[name] {
            let deg = in_degree.get_mut(succ).unwrap();
            *deg -= 1;
            if *deg == 0 {
                queue.push_back(succ);
            }
        }
    }

    if order.len() != nodes.len() {
        let scheduled: rustc_hash::FxHashSet<&str> = order.iter().map(|s| s.as_str()).collect();
        let stuck: Vec<&str> = nodes
            .iter()
            .map(|(n, _)| n.as_str())
            .filter(|n| !scheduled.contains(n))
            .collect();
        let span = stuck
            .iter()
            .filter_map(|name| scenario.declarations_named().find(|(n, _)| n == name))
            .map(|(_, decl)| decl.span())
            .reduce(SourceSpan::merge)
            .unwrap_or_else(|| SourceSpan::at(crate::base::SourceLocation::start()));
        diagnostics.push(
            Diagnostic::builder(DiagnosticCode::E004)
                .message(format!("cyclic dependency among: {}", stuck.join(", ")))
                .span(span)
                .build(),
        );
        return Vec::new();
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn linear_chain_orders_dependency_before_dependent() {
        let (scenario, _) = parse(
            r#"scenario "T" {
                variable a { 2025: 1 }
                variable b { depends_on: [a] 2025: 1 }
            }"#,
        );
        let scenario = scenario.unwrap();
        let mut diagnostics = Vec::new();
        let graph = build_causal_graph(&scenario, &mut diagnostics);
        assert!(diagnostics.is_empty());
        assert!(graph.is_acyclic());
        let pos_a = graph.topological_order.iter().position(|n| n == "a").unwrap();
        let pos_b = graph.topological_order.iter().position(|n| n == "b").unwrap();
        assert!(pos_a < pos_b);
    }

    #[test]
    fn cycle_is_detected_and_reported() {
        let (scenario, _) = parse(
            r#"scenario "Cycle" {
                variable a { depends_on: [b] 2025: 1 }
                variable b { depends_on: [a] 2025: 1 }
            }"#,
        );
        let scenario = scenario.unwrap();
        let mut diagnostics = Vec::new();
        let graph = build_causal_graph(&scenario, &mut diagnostics);
        assert!(!graph.is_acyclic());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::E004);
    }
}
