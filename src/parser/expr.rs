//! Expression grammar: Pratt-style precedence climbing (spec §4.2).
//!
//! Precedence, low to high: `or` → `and` → comparison (non-associative) →
//! additive → multiplicative → exponent (right-associative) → unary →
//! primary.

use crate::ast::{
    BinaryOp, DateLit, DistributionExpr, DistributionFamily, DurationUnit, Expr, ExprKind,
    ModelExpr, ModelFamily, UnaryOp,
};
use crate::token::TokenKind;

use super::Parser;

impl Parser {
    fn parse_or(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_and()?;
        while self.at(TokenKind::OrKw) {
            self.advance();
            let rhs = self.parse_and()?;
            let span = lhs.span.merge(rhs.span);
            lhs = Expr::new(
                ExprKind::Binary {
                    op: BinaryOp::Or,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        Some(lhs)
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_comparison()?;
        while self.at(TokenKind::AndKw) {
            self.advance();
            let rhs = self.parse_comparison()?;
            let span = lhs.span.merge(rhs.span);
            lhs = Expr::new(
                ExprKind::Binary {
                    op: BinaryOp::And,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        Some(lhs)
    }

    fn parse_comparison(&mut self) -> Option<Expr> {
        let lhs = self.parse_additive()?;
        let op = match self.peek_kind() {
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::GtEq => BinaryOp::Ge,
            TokenKind::LtEq => BinaryOp::Le,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::BangEq => BinaryOp::Ne,
            _ => return Some(lhs),
        };
        self.advance();
        let rhs = self.parse_additive()?;
        let span = lhs.span.merge(rhs.span);
        Some(Expr::new(
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            span,
        ))
    }

    fn parse_additive(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            let span = lhs.span.merge(rhs.span);
            lhs = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        Some(lhs)
    }

    fn parse_multiplicative(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_exponent()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_exponent()?;
            let span = lhs.span.merge(rhs.span);
            lhs = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        Some(lhs)
    }

    fn parse_exponent(&mut self) -> Option<Expr> {
        let lhs = self.parse_unary()?;
        if self.at(TokenKind::Caret) {
            self.advance();
            let rhs = self.parse_exponent()?; // right-associative
            let span = lhs.span.merge(rhs.span);
            return Some(Expr::new(
                ExprKind::Binary {
                    op: BinaryOp::Pow,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            ));
        }
        Some(lhs)
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        match self.peek_kind() {
            TokenKind::Minus => {
                let tok = self.advance();
                let operand = self.parse_unary()?;
                let span = tok.span.merge(operand.span);
                Some(Expr::new(
                    ExprKind::Unary {
                        op: UnaryOp::Neg,
                        expr: Box::new(operand),
                    },
                    span,
                ))
            }
            TokenKind::NotKw => {
                let tok = self.advance();
                let operand = self.parse_unary()?;
                let span = tok.span.merge(operand.span);
                Some(Expr::new(
                    ExprKind::Unary {
                        op: UnaryOp::Not,
                        expr: Box::new(operand),
                    },
                    span,
                ))
            }
            // `±expr` is sugar for `normal(expr)` (spec §4.2).
            TokenKind::PlusMinus => {
                let tok = self.advance();
                let operand = self.parse_unary()?;
                let span = tok.span.merge(operand.span);
                Some(Expr::new(
                    ExprKind::Distribution(DistributionExpr {
                        family: DistributionFamily::Normal,
                        positional: vec![operand],
                        named: Vec::new(),
                    }),
                    span,
                ))
            }
            _ => self.parse_primary(),
        }
    }

    pub(super) fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_or()
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Number => {
                self.advance();
                Some(Expr::new(ExprKind::Number(tok.lexeme.parse().unwrap_or(0.0)), tok.span))
            }
            TokenKind::Percentage => {
                self.advance();
                let digits = tok.lexeme.trim_end_matches('%');
                Some(Expr::new(
                    ExprKind::Percentage(digits.parse().unwrap_or(0.0)),
                    tok.span,
                ))
            }
            TokenKind::Currency => {
                self.advance();
                Some(Expr::new(ExprKind::Currency(parse_currency_lexeme(&tok.lexeme)), tok.span))
            }
            TokenKind::String => {
                self.advance();
                Some(Expr::new(ExprKind::Str(tok.lexeme.clone()), tok.span))
            }
            TokenKind::TrueKw => {
                self.advance();
                Some(Expr::new(ExprKind::Bool(true), tok.span))
            }
            TokenKind::FalseKw => {
                self.advance();
                Some(Expr::new(ExprKind::Bool(false), tok.span))
            }
            TokenKind::Date => {
                self.advance();
                Some(Expr::new(ExprKind::Date(parse_date_lexeme(&tok.lexeme)), tok.span))
            }
            TokenKind::Duration => {
                self.advance();
                let (amount, unit) = parse_duration_lexeme(&tok.lexeme);
                Some(Expr::new(ExprKind::Duration { amount, unit }, tok.span))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expr()?;
                let end = self.expect(TokenKind::RightParen);
                let span = tok.span.merge(end.map(|t| t.span).unwrap_or(inner.span));
                Some(Expr::new(inner.kind, span))
            }
            TokenKind::LeftBrace => self.parse_record(tok.span),
            TokenKind::LeftBracket => self.parse_array(tok.span),
            TokenKind::NormalKw
            | TokenKind::UniformKw
            | TokenKind::BetaKw
            | TokenKind::TriangularKw
            | TokenKind::LognormalKw
            | TokenKind::CustomKw => self.parse_distribution_ctor(),
            TokenKind::LinearKw
            | TokenKind::LogisticKw
            | TokenKind::ExponentialKw
            | TokenKind::SigmoidKw
            | TokenKind::PolynomialKw => self.parse_model_ctor(),
            TokenKind::Identifier => self.parse_ident_chain(),
            k if k.is_soft_keyword() => self.parse_ident_chain(),
            _ => {
                self.error_at(tok.span, format!("unexpected token {:?} in expression position", tok.kind));
                None
            }
        }
    }

    fn parse_ident_chain(&mut self) -> Option<Expr> {
        let first = self.advance();
        if self.at(TokenKind::LeftParen) {
            self.advance();
            let args = self.parse_call_args();
            let end = self.expect(TokenKind::RightParen);
            let span = first.span.merge(end.map(|t| t.span).unwrap_or(first.span));
            return Some(Expr::new(
                ExprKind::Call {
                    name: first.lexeme,
                    args,
                },
                span,
            ));
        }
        if self.at(TokenKind::Dot) {
            let mut segments = vec![first.lexeme];
            let mut last_span = first.span;
            while self.at(TokenKind::Dot) {
                self.advance();
                match self.expect_ident_like() {
                    Some(seg) => {
                        last_span = seg.span;
                        segments.push(seg.lexeme);
                    }
                    None => break,
                }
            }
            let span = first.span.merge(last_span);
            return Some(Expr::new(ExprKind::QualifiedIdent(segments), span));
        }
        Some(Expr::new(ExprKind::Ident(first.lexeme), first.span))
    }

    fn parse_call_args(&mut self) -> Vec<Expr> {
        let mut args = Vec::new();
        while !self.at(TokenKind::RightParen) && !self.is_eof() {
            match self.parse_expr() {
                Some(e) => args.push(e),
                None => break,
            }
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        args
    }

    fn parse_record(&mut self, open_span: crate::base::SourceSpan) -> Option<Expr> {
        self.advance(); // '{'
        let mut fields = Vec::new();
        while !self.at(TokenKind::RightBrace) && !self.is_eof() {
            let Some(name) = self.expect_ident_like() else {
                self.advance();
                continue;
            };
            self.expect(TokenKind::Colon);
            let Some(value) = self.parse_expr() else {
                break;
            };
            fields.push((name.lexeme, value));
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        let end = self.expect(TokenKind::RightBrace);
        let span = open_span.merge(end.map(|t| t.span).unwrap_or(open_span));
        Some(Expr::new(ExprKind::Record(fields), span))
    }

    fn parse_array(&mut self, open_span: crate::base::SourceSpan) -> Option<Expr> {
        self.advance(); // '['
        let mut items = Vec::new();
        while !self.at(TokenKind::RightBracket) && !self.is_eof() {
            match self.parse_expr() {
                Some(e) => items.push(e),
                None => break,
            }
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        let end = self.expect(TokenKind::RightBracket);
        let span = open_span.merge(end.map(|t| t.span).unwrap_or(open_span));
        Some(Expr::new(ExprKind::Array(items), span))
    }

    fn looks_like_named_arg(&self) -> bool {
        let k = self.peek_kind();
        (k == TokenKind::Identifier || k.is_soft_keyword()) && self.peek_at(1) == TokenKind::Eq
    }

    /// `(args)` body for a distribution constructor: positional expressions,
    /// the `±expr` shorthand, or named `ident=expr` pairs (spec §4.2).
    pub(super) fn parse_distribution_args(&mut self) -> (Vec<Expr>, Vec<(String, Expr)>) {
        let mut positional = Vec::new();
        let mut named = Vec::new();
        if self.at(TokenKind::RightParen) {
            return (positional, named);
        }
        if self.at(TokenKind::PlusMinus) {
            self.advance();
            if let Some(e) = self.parse_expr() {
                positional.push(e);
            }
            return (positional, named);
        }
        if self.looks_like_named_arg() {
            loop {
                let Some(name) = self.expect_ident_like() else { break };
                self.expect(TokenKind::Eq);
                if let Some(value) = self.parse_expr() {
                    named.push((name.lexeme, value));
                }
                if self.at(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            return (positional, named);
        }
        loop {
            match self.parse_expr() {
                Some(e) => positional.push(e),
                None => break,
            }
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        (positional, named)
    }

    /// `(name=value, …)` body for a model constructor: named parameters only.
    pub(super) fn parse_model_args(&mut self) -> Vec<(String, Expr)> {
        let mut named = Vec::new();
        if self.at(TokenKind::RightParen) {
            return named;
        }
        loop {
            let Some(name) = self.expect_ident_like() else { break };
            self.expect(TokenKind::Eq);
            if let Some(value) = self.parse_expr() {
                named.push((name.lexeme, value));
            }
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        named
    }

    fn parse_distribution_ctor(&mut self) -> Option<Expr> {
        let kw = self.advance();
        let mut family = match kw.kind {
            TokenKind::NormalKw => DistributionFamily::Normal,
            TokenKind::UniformKw => DistributionFamily::Uniform,
            TokenKind::BetaKw => DistributionFamily::Beta,
            TokenKind::TriangularKw => DistributionFamily::Triangular,
            TokenKind::LognormalKw => DistributionFamily::Lognormal,
            TokenKind::CustomKw => DistributionFamily::Custom(String::new()),
            _ => unreachable!("caller matched a distribution keyword"),
        };
        self.expect(TokenKind::LeftParen)?;
        let (mut positional, named) = self.parse_distribution_args();
        let end = self.expect(TokenKind::RightParen);
        if let DistributionFamily::Custom(_) = &family {
            if !positional.is_empty() {
                let name_expr = positional.remove(0);
                let name = match name_expr.kind {
                    ExprKind::Str(s) => s,
                    ExprKind::Ident(s) => s,
                    _ => String::new(),
                };
                family = DistributionFamily::Custom(name);
            }
        }
        let span = kw.span.merge(end.map(|t| t.span).unwrap_or(kw.span));
        Some(Expr::new(
            ExprKind::Distribution(DistributionExpr {
                family,
                positional,
                named,
            }),
            span,
        ))
    }

    fn parse_model_ctor(&mut self) -> Option<Expr> {
        let kw = self.advance();
        let family = match kw.kind {
            TokenKind::LinearKw => ModelFamily::Linear,
            TokenKind::LogisticKw => ModelFamily::Logistic,
            TokenKind::ExponentialKw => ModelFamily::Exponential,
            TokenKind::SigmoidKw => ModelFamily::Sigmoid,
            TokenKind::PolynomialKw => ModelFamily::Polynomial,
            _ => unreachable!("caller matched a model keyword"),
        };
        self.expect(TokenKind::LeftParen)?;
        let named = self.parse_model_args();
        let end = self.expect(TokenKind::RightParen);
        let span = kw.span.merge(end.map(|t| t.span).unwrap_or(kw.span));
        Some(Expr::new(ExprKind::Model(ModelExpr { family, named }), span))
    }
}

/// A constant-foldable literal used for simple numeric fields (probability,
/// confidence, runs, seed, percentiles, convergence) that the grammar
/// allows to carry a percentage or a unary sign but never a full
/// expression. Returns `None` for anything else; callers treat that as
/// "value omitted" rather than a parse failure.
pub(super) fn literal_numeric(expr: &Expr) -> Option<f64> {
    match &expr.kind {
        ExprKind::Number(v) | ExprKind::Currency(v) => Some(*v),
        ExprKind::Percentage(v) => Some(*v / 100.0),
        ExprKind::Unary {
            op: UnaryOp::Neg,
            expr,
        } => literal_numeric(expr).map(|v| -v),
        _ => None,
    }
}

pub(super) fn parse_date_lexeme(lexeme: &str) -> DateLit {
    let mut parts = lexeme.split('-');
    let year = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let month = parts.next().and_then(|s| s.parse().ok());
    let day = parts.next().and_then(|s| s.parse().ok());
    DateLit { year, month, day }
}

fn parse_duration_lexeme(lexeme: &str) -> (f64, DurationUnit) {
    let mut chars = lexeme.chars();
    let unit_char = chars.next_back().unwrap_or('s');
    let amount: f64 = chars.as_str().parse().unwrap_or(0.0);
    let unit = DurationUnit::from_suffix(unit_char).unwrap_or(DurationUnit::Second);
    (amount, unit)
}

/// `"<digits>[KMBT] <CODE>"` → the magnitude-expanded value; the currency
/// code itself carries no numeric weight (spec §4.1/§4.4.3).
fn parse_currency_lexeme(lexeme: &str) -> f64 {
    let numeric_part = lexeme.split_whitespace().next().unwrap_or("0");
    let (digits, magnitude) = match numeric_part.chars().last() {
        Some(c @ ('K' | 'M' | 'B' | 'T')) => {
            (&numeric_part[..numeric_part.len() - c.len_utf8()], Some(c))
        }
        _ => (numeric_part, None),
    };
    let base: f64 = digits.parse().unwrap_or(0.0);
    match magnitude {
        Some('K') => base * 1e3,
        Some('M') => base * 1e6,
        Some('B') => base * 1e9,
        Some('T') => base * 1e12,
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use crate::ast::{BinaryOp, Declaration, ExprKind};

    #[test]
    fn precedence_climbs_over_and_or() {
        let (scenario, diags) = parse(
            r#"scenario "T" {
                parameter p { value: 1 + 2 * 3 ^ 2 }
            }"#,
        );
        assert!(diags.is_empty(), "{diags:?}");
        let scenario = scenario.unwrap();
        let Declaration::Parameter(p) = &scenario.declarations[0] else {
            panic!()
        };
        let value = p.value.as_ref().unwrap();
        let ExprKind::Binary { op, rhs, .. } = &value.kind else {
            panic!()
        };
        assert_eq!(*op, BinaryOp::Add);
        let ExprKind::Binary { op: mul_op, .. } = &rhs.kind else {
            panic!()
        };
        assert_eq!(*mul_op, BinaryOp::Mul);
    }

    #[test]
    fn plus_minus_sugar_desugars_to_normal() {
        let (scenario, _) = parse(
            r#"scenario "T" {
                parameter p { value: ±5% }
            }"#,
        );
        let scenario = scenario.unwrap();
        let Declaration::Parameter(p) = &scenario.declarations[0] else {
            panic!()
        };
        let value = p.value.as_ref().unwrap();
        assert!(matches!(value.kind, ExprKind::Distribution(_)));
    }

    #[test]
    fn qualified_identifier_chain() {
        let (scenario, _) = parse(
            r#"scenario "T" {
                parameter p { value: a.b.c }
            }"#,
        );
        let scenario = scenario.unwrap();
        let Declaration::Parameter(p) = &scenario.declarations[0] else {
            panic!()
        };
        let value = p.value.as_ref().unwrap();
        let ExprKind::QualifiedIdent(segments) = &value.kind else {
            panic!()
        };
        assert_eq!(segments, &vec!["a".to_string(), "b".to_string(), "c".to_string()]);
    }
}
