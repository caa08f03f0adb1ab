//! Typed AST (spec §3 "Abstract Syntax").
//!
//! Every node is a tag-enum plus a payload struct, never a trait-object
//! hierarchy (spec §9). Modules are layered bottom-up: `literal` has no
//! dependency on the rest of the AST, `expr` depends on `literal`, `decl`
//! depends on `expr` and `literal`, `scenario` depends on `decl`.

mod decl;
mod expr;
mod literal;
mod scenario;

pub use decl::{
    AssumptionDecl, BindDecl, BranchDecl, CalibrateDecl, Declaration, ImpactDecl, ImportDecl,
    InterpolationMethod, OnTrigger, ParameterDecl, SimulateDecl, SimulateMethod, VariableDecl,
    WatchDecl, WatchRule, WatchSeverity, SENTINEL_LIST_NAME,
};
pub use expr::{
    BinaryOp, DistributionExpr, DistributionFamily, Expr, ExprKind, ModelExpr, ModelFamily,
    UnaryOp,
};
pub use literal::{DateLit, DurationLit, DurationUnit};
pub use scenario::{Metadata, Resolution, Scenario};
