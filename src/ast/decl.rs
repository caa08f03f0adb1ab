//! Declaration nodes (spec §3.2 "Declarations").

use crate::base::SourceSpan;

use super::expr::{DistributionExpr, Expr, ModelExpr};
use super::literal::DateLit;

/// Sentinel declaration name produced by the `impact on: [...]` sugar
/// (spec §3.2 invariants); excluded from the validator's symbol table.
pub const SENTINEL_LIST_NAME: &str = "_list";

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Variable(VariableDecl),
    Assumption(AssumptionDecl),
    Parameter(ParameterDecl),
    Branch(BranchDecl),
    Impact(ImpactDecl),
    Simulate(SimulateDecl),
    Watch(WatchDecl),
    Calibrate(CalibrateDecl),
    Import(ImportDecl),
}

impl Declaration {
    /// The declaration's name, if it has one participating in the symbol
    /// table. `Simulate` declarations are unnamed.
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Variable(d) => Some(&d.name),
            Declaration::Assumption(d) => Some(&d.name),
            Declaration::Parameter(d) => Some(&d.name),
            Declaration::Branch(d) => Some(&d.name),
            Declaration::Impact(d) => Some(&d.name),
            Declaration::Watch(d) => d.target.as_deref(),
            Declaration::Calibrate(d) => d.name.as_deref(),
            Declaration::Import(d) => Some(&d.alias),
            Declaration::Simulate(_) => None,
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            Declaration::Variable(d) => d.span,
            Declaration::Assumption(d) => d.span,
            Declaration::Parameter(d) => d.span,
            Declaration::Branch(d) => d.span,
            Declaration::Impact(d) => d.span,
            Declaration::Simulate(d) => d.span,
            Declaration::Watch(d) => d.span,
            Declaration::Calibrate(d) => d.span,
            Declaration::Import(d) => d.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpolationMethod {
    Step,
    #[default]
    Linear,
    Spline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub name: String,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub label: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    /// `(date, value expression)` pairs in strictly increasing date order.
    pub anchors: Vec<(DateLit, Expr)>,
    /// Full dependency name strings, possibly dotted (spec §9 "Dotted
    /// dependency names" — only the segment before the first `.` joins the
    /// causal graph).
    pub depends_on: Vec<String>,
    pub growth: Option<ModelExpr>,
    pub uncertainty: Option<DistributionExpr>,
    pub interpolation: InterpolationMethod,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssumptionDecl {
    pub name: String,
    pub value: Option<Expr>,
    pub by: Option<DateLit>,
    pub source: Option<String>,
    pub confidence: Option<f64>,
    pub uncertainty: Option<DistributionExpr>,
    pub bind: Option<BindDecl>,
    pub watch: Option<WatchDecl>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDecl {
    pub name: String,
    pub value: Option<Expr>,
    pub range: Option<(Expr, Expr)>,
    pub label: Option<String>,
    pub unit: Option<String>,
    pub step: Option<Expr>,
    pub format: Option<String>,
    pub control: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub source: Option<String>,
    pub description: Option<String>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BranchDecl {
    pub name: String,
    pub condition: Expr,
    pub probability: Option<f64>,
    pub fork: Option<String>,
    pub declarations: Vec<Declaration>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImpactDecl {
    pub name: String,
    pub derives_from: Vec<String>,
    pub formula: Option<Expr>,
    pub label: Option<String>,
    pub unit: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SimulateMethod {
    #[default]
    MonteCarlo,
    /// Reserved; the orchestrator always runs as `MonteCarlo` (spec §9).
    LatinHypercube,
    /// Reserved; the orchestrator always runs as `MonteCarlo` (spec §9).
    Sobol,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulateDecl {
    pub runs: Option<u64>,
    pub method: Option<SimulateMethod>,
    pub seed: Option<u32>,
    pub output: Option<String>,
    pub percentiles: Vec<f64>,
    pub convergence: Option<f64>,
    pub timeout: Option<Expr>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchSeverity {
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatchRule {
    pub severity: WatchSeverity,
    pub condition: Expr,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OnTrigger {
    pub recalculate: bool,
    pub notify: Vec<String>,
    pub suggest: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatchDecl {
    pub target: Option<String>,
    pub rules: Vec<WatchRule>,
    pub on_trigger: Option<OnTrigger>,
    pub span: SourceSpan,
}

/// `Calibrate` is parsed and carried through but never interpreted by the
/// simulator (spec §3.2).
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrateDecl {
    pub name: Option<String>,
    pub properties: Vec<(String, Expr)>,
    pub span: SourceSpan,
}

/// `Bind` is parsed and carried through but never interpreted by the
/// simulator (spec §3.2).
#[derive(Debug, Clone, PartialEq)]
pub struct BindDecl {
    pub target: Option<String>,
    pub properties: Vec<(String, Expr)>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub path: String,
    pub alias: String,
    pub span: SourceSpan,
}
