//! # sdl
//!
//! An interpreter for Scenario Description Language: a small declarative
//! language for probabilistic future-scenario modeling, with a Monte Carlo
//! engine behind it.
//!
//! ## Module structure (dependency order)
//!
//! ```text
//! simulate  → Monte Carlo engine, timesteps, configuration, results
//!   ↓
//! validator → symbol resolution, causal graph, per-declaration checks
//!   ↓
//! eval      → expression evaluator, interpolation, growth models
//!   ↓
//! rng       → seeded PRNG and distribution samplers
//!   ↓
//! parser    → recursive-descent parser, typed AST output
//!   ↓
//! lexer     → byte stream → token stream
//!   ↓
//! ast       → typed AST node definitions
//!   ↓
//! token     → token kinds shared by lexer and parser
//!   ↓
//! diagnostics → error codes, severity, structured messages
//!   ↓
//! base      → primitives (SourceSpan, SourceLocation)
//! ```
//!
//! Every stage up through the validator accumulates [`diagnostics::Diagnostic`]s
//! rather than aborting on the first problem; only [`simulate::simulate`]
//! turns an invalid scenario into a hard [`diagnostics::SdlError`] (spec §7).

/// Foundation types: SourceSpan, SourceLocation.
pub mod base;

/// Diagnostics: error codes, severity, structured messages.
pub mod diagnostics;

/// Token kinds shared by the lexer and parser.
pub mod token;

/// Typed AST node definitions.
pub mod ast;

/// Lexer: byte stream → token stream.
pub mod lexer;

/// Parser: token stream → typed AST.
pub mod parser;

/// Seeded PRNG and distribution samplers.
pub mod rng;

/// Expression evaluator, interpolation, and growth models.
pub mod eval;

/// Semantic validation: symbol resolution, causal graph, per-declaration checks.
pub mod validator;

/// Monte Carlo simulation engine.
pub mod simulate;

pub use ast::Scenario;
pub use diagnostics::{Diagnostic, SdlError};
pub use token::Token;
pub use validator::CausalGraph;

/// Lex a source string into a token stream (spec §6.1). Never fails outright:
/// lexical errors are reported as diagnostics alongside whatever tokens were
/// recovered.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    lexer::tokenize(source)
}

/// Lex and parse a source string into a scenario (spec §6.1).
pub fn parse(source: &str) -> (Option<Scenario>, Vec<Diagnostic>) {
    parser::parse(source)
}

/// Validate a parsed scenario: symbol resolution, metadata checks,
/// per-declaration rules, and causal-graph construction (spec §6.1).
pub fn validate(scenario: &Scenario) -> (bool, Vec<Diagnostic>, CausalGraph) {
    validator::validate(scenario)
}

/// Run the Monte Carlo engine over a validated scenario (spec §6.1).
pub fn simulate(
    scenario: &Scenario,
    overrides: simulate::SimulateOverrides,
) -> Result<simulate::SimulationResult, SdlError> {
    simulate::simulate(scenario, overrides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_tokenize_parse_validate_simulate() {
        let source = r#"scenario "Smoke Test" {
            timeframe: 2025 -> 2026
            variable revenue {
                uncertainty: normal(±5%)
                2025: 1000
                2026: 1200
            }
        }"#;

        let (tokens, lex_diags) = tokenize(source);
        assert!(!tokens.is_empty());
        assert!(lex_diags.is_empty());

        let (scenario, parse_diags) = parse(source);
        assert!(parse_diags.is_empty(), "{parse_diags:?}");
        let scenario = scenario.expect("well-formed source should parse to a scenario");

        let (valid, validate_diags, graph) = validate(&scenario);
        assert!(valid, "{validate_diags:?}");
        assert!(graph.is_acyclic());

        let result = simulate(
            &scenario,
            simulate::SimulateOverrides {
                runs: Some(200),
                seed: Some(7),
                ..Default::default()
            },
        )
        .expect("validated scenario should simulate");
        assert_eq!(result.actual_runs, 200);
        assert_eq!(result.timesteps.len(), 2);
    }
}
