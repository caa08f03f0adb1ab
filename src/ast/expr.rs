//! Expression nodes (spec §3.2 "Expressions").
//!
//! Modeled as a tag-enum (`ExprKind`) paired with a payload struct (`Expr`)
//! carrying the span, never as a virtual-dispatch hierarchy (spec §9).

use crate::base::SourceSpan;

use super::literal::{DateLit, DurationUnit};

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: SourceSpan,
}

impl Expr {
    pub fn new(kind: ExprKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(f64),
    /// Raw literal value before the spec's `/100` evaluation semantics.
    Percentage(f64),
    /// Fully expanded by magnitude at parse time (spec §4.3 "Numeric semantics").
    Currency(f64),
    Str(String),
    Bool(bool),
    Date(DateLit),
    Duration { amount: f64, unit: DurationUnit },
    Ident(String),
    /// Dot-separated segments of a qualified identifier, e.g. `a.b.c`.
    QualifiedIdent(Vec<String>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    Distribution(DistributionExpr),
    Model(ModelExpr),
    Record(Vec<(String, Expr)>),
    Array(Vec<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// `<family>(<args>)`. The `±expr` shorthand desugars to `normal(expr)`
/// during parsing (spec §4.2).
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionExpr {
    pub family: DistributionFamily,
    pub positional: Vec<Expr>,
    pub named: Vec<(String, Expr)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DistributionFamily {
    Normal,
    Uniform,
    Beta,
    Triangular,
    Lognormal,
    Custom(String),
}

/// `<family>(name=value, …)`, named parameters only.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelExpr {
    pub family: ModelFamily,
    pub named: Vec<(String, Expr)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    Linear,
    Logistic,
    Exponential,
    Sigmoid,
    Polynomial,
}
