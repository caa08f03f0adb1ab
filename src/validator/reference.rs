//! Identifier reference resolution inside expressions (spec §4.3.2).
//!
//! All other expression kinds are treated as terminal: a literal can't
//! reference a symbol, so there is nothing further to walk.

use crate::ast::{Expr, ExprKind};
use crate::base::SourceSpan;

use super::symbol_table::{base_segment, SymbolTable};

/// Every identifier the expression reaches, paired with the span it occurred
/// at, in traversal order.
pub fn collect_references(expr: &Expr) -> Vec<(String, SourceSpan)> {
    let mut refs = Vec::new();
    walk(expr, &mut refs);
    refs
}

fn walk(expr: &Expr, refs: &mut Vec<(String, SourceSpan)>) {
    match &expr.kind {
        ExprKind::Ident(name) => refs.push((name.clone(), expr.span)),
        ExprKind::QualifiedIdent(segments) => {
            if let Some(first) = segments.first() {
                refs.push((first.clone(), expr.span));
            }
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            walk(lhs, refs);
            walk(rhs, refs);
        }
        ExprKind::Unary { expr, .. } => walk(expr, refs),
        ExprKind::Call { args, .. } => {
            for arg in args {
                walk(arg, refs);
            }
        }
        _ => {}
    }
}

/// Resolve every reference in `expr` against `symbols`, reporting `E005` for
/// names that don't correspond to a declared symbol.
pub fn check_references(
    expr: &Expr,
    symbols: &SymbolTable,
    diagnostics: &mut Vec<crate::diagnostics::Diagnostic>,
) {
    for (name, span) in collect_references(expr) {
        let base = base_segment(&name);
        if !symbols.contains(base) {
            diagnostics.push(
                crate::diagnostics::Diagnostic::builder(crate::diagnostics::DiagnosticCode::E005)
                    .message(format!("undefined symbol '{base}'"))
                    .span(span)
                    .build(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::validator::symbol_table::SymbolTable;

    #[test]
    fn unresolved_branch_condition_reference_is_flagged() {
        let (scenario, _) = parse(
            r#"scenario "T" {
                branch "B" when unknown > 1 { }
            }"#,
        );
        let scenario = scenario.unwrap();
        let mut diagnostics = Vec::new();
        let symbols = SymbolTable::build(&scenario, &mut diagnostics);
        let crate::ast::Declaration::Branch(b) = &scenario.declarations[0] else {
            panic!("expected a branch declaration");
        };
        check_references(&b.condition, &symbols, &mut diagnostics);
        assert!(diagnostics
            .iter()
            .any(|d| d.code == crate::diagnostics::DiagnosticCode::E005));
    }
}
