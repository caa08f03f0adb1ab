//! Semantic validation: symbol resolution, metadata checks, per-declaration
//! rules, and causal-graph construction with cycle detection (spec §4.3).
//!
//! Like the lexer and parser, the validator never stops at the first
//! problem — every stage accumulates diagnostics and `validate` reports all
//! of them together.

mod declarations;
mod distribution;
mod graph;
mod metadata;
mod reference;
mod symbol_table;

use crate::ast::Scenario;
use crate::diagnostics::{all_valid, Diagnostic};

pub use graph::{CausalGraph, NodeKind};

/// Validate a parsed scenario. Returns whether the scenario is free of
/// error-severity diagnostics, the full diagnostic list (errors and
/// warnings), and the causal graph derived from `depends_on`/`derives_from`
/// edges.
pub fn validate(scenario: &Scenario) -> (bool, Vec<Diagnostic>, CausalGraph) {
    let mut diagnostics = Vec::new();

    let symbols = symbol_table::SymbolTable::build(scenario, &mut diagnostics);
    metadata::validate_metadata(&scenario.metadata, scenario.span, &mut diagnostics);
    for decl in &scenario.declarations {
        declarations::validate_declaration(decl, &symbols, &mut diagnostics);
    }
    let causal_graph = graph::build_causal_graph(scenario, &mut diagnostics);

    let valid = all_valid(&diagnostics);
    if !valid {
        tracing::debug!(
            scenario = %scenario.name,
            diagnostic_count = diagnostics.len(),
            "scenario failed validation"
        );
    }
    (valid, diagnostics, causal_graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn well_formed_scenario_validates_clean() {
        let (scenario, parse_diags) = parse(
            r#"scenario "Clean" {
                timeframe: 2025 -> 2030
                variable revenue {
                    uncertainty: normal(0, 0.05)
                    2025: 1000000
                    2030: 1500000
                }
            }"#,
        );
        assert!(parse_diags.is_empty(), "{parse_diags:?}");
        let (valid, diagnostics, graph) = validate(&scenario.unwrap());
        assert!(valid, "{diagnostics:?}");
        assert!(graph.is_acyclic());
    }

    #[test]
    fn cyclic_scenario_is_invalid() {
        let (scenario, _) = parse(
            r#"scenario "Cycle" {
                variable a { depends_on: [b] uncertainty: normal(0, 1) 2025: 1 }
                variable b { depends_on: [a] uncertainty: normal(0, 1) 2025: 1 }
            }"#,
        );
        let (valid, diagnostics, graph) = validate(&scenario.unwrap());
        assert!(!valid);
        assert!(!graph.is_acyclic());
        assert!(diagnostics
            .iter()
            .any(|d| d.code == crate::diagnostics::DiagnosticCode::E004));
    }
}
