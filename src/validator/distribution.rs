//! Distribution argument validation (spec §4.3.1).
//!
//! Checks only fire when every relevant argument const-folds to a number;
//! an argument built from a reference or a call is left for the simulator
//! to discover at run time.

use crate::ast::{DistributionExpr, DistributionFamily, Expr, ExprKind};
use crate::base::SourceSpan;
use crate::diagnostics::{Diagnostic, DiagnosticCode};

pub fn check_distribution_args(dist: &DistributionExpr, span: SourceSpan, diagnostics: &mut Vec<Diagnostic>) {
    match &dist.family {
        DistributionFamily::Beta => {
            if let [a, b] = positional_constants(dist, 2).as_slice() {
                if !(*a > 0.0 && *b > 0.0) {
                    diagnostics.push(error(span, "beta distribution requires alpha > 0 and beta > 0"));
                }
            }
        }
        DistributionFamily::Uniform => {
            if let [min, max] = positional_constants(dist, 2).as_slice() {
                if !(min < max) {
                    diagnostics.push(error(span, "uniform distribution requires min < max"));
                }
            }
        }
        DistributionFamily::Triangular => {
            if let [min, mode, max] = positional_constants(dist, 3).as_slice() {
                if !(min <= mode && mode <= max) {
                    diagnostics.push(error(span, "triangular distribution requires min <= mode <= max"));
                }
            }
        }
        DistributionFamily::Normal | DistributionFamily::Lognormal | DistributionFamily::Custom(_) => {}
    }
}

fn error(span: SourceSpan, message: &str) -> Diagnostic {
    Diagnostic::builder(DiagnosticCode::E007)
        .message(message)
        .span(span)
        .build()
}

/// The first `count` positional arguments, if every one of them
/// const-folds; otherwise empty (and the caller's check is skipped).
fn positional_constants(dist: &DistributionExpr, count: usize) -> Vec<f64> {
    if dist.positional.len() < count {
        return Vec::new();
    }
    let folded: Vec<f64> = dist.positional[..count].iter().filter_map(const_fold).collect();
    if folded.len() == count {
        folded
    } else {
        Vec::new()
    }
}

/// A narrow constant folder for literal numeric expressions: enough to
/// validate distribution arguments without a full evaluator (spec §4.3.1
/// "when constant-foldable").
fn const_fold(expr: &Expr) -> Option<f64> {
    match &expr.kind {
        ExprKind::Number(n) | ExprKind::Currency(n) => Some(*n),
        ExprKind::Percentage(p) => Some(p / 100.0),
        ExprKind::Unary {
            op: crate::ast::UnaryOp::Neg,
            expr,
        } => const_fold(expr).map(|v| -v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::parser::parse;

    fn first_uncertainty(source: &str) -> DistributionExpr {
        let (scenario, diags) = parse(source);
        assert!(diags.is_empty(), "{diags:?}");
        let crate::ast::Declaration::Variable(v) = &scenario.unwrap().declarations[0] else {
            panic!("expected a variable declaration");
        };
        v.uncertainty.clone().unwrap()
    }

    #[rstest]
    #[case("beta(-1, 2)", Some(DiagnosticCode::E007))]
    #[case("beta(2, 5)", None)]
    #[case("uniform(10, 5)", Some(DiagnosticCode::E007))]
    #[case("uniform(1, 10)", None)]
    #[case("triangular(1, 2, 3)", None)]
    #[case("triangular(3, 2, 1)", Some(DiagnosticCode::E007))]
    #[case("normal(0, 1)", None)]
    fn distribution_argument_diagnostic_codes(#[case] ctor: &str, #[case] expected: Option<DiagnosticCode>) {
        let source = format!(r#"scenario "T" {{ variable x {{ uncertainty: {ctor} 2025: 1 }} }}"#);
        let dist = first_uncertainty(&source);
        let mut diagnostics = Vec::new();
        check_distribution_args(&dist, SourceSpan::at(crate::base::SourceLocation::start()), &mut diagnostics);
        match expected {
            Some(code) => {
                assert_eq!(diagnostics.len(), 1);
                assert_eq!(diagnostics[0].code, code);
            }
            None => assert!(diagnostics.is_empty(), "{diagnostics:?}"),
        }
    }
}
