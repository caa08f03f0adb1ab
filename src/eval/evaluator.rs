//! Expression evaluation over per-run state (spec §4.4.3).

use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};

use super::builtins::call_builtin;
use super::state::EvalState;

pub fn evaluate(expr: &Expr, state: &EvalState) -> f64 {
    match &expr.kind {
        ExprKind::Number(n) | ExprKind::Currency(n) => *n,
        ExprKind::Percentage(p) => p / 100.0,
        ExprKind::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        ExprKind::Ident(name) => state.lookup(name),
        ExprKind::QualifiedIdent(segments) => segments.first().map(|s| state.lookup(s)).unwrap_or(0.0),
        ExprKind::Binary { op, lhs, rhs } => eval_binary(*op, evaluate(lhs, state), evaluate(rhs, state)),
        ExprKind::Unary { op, expr } => eval_unary(*op, evaluate(expr, state)),
        ExprKind::Call { name, args } => {
            let values: Vec<f64> = args.iter().map(|a| evaluate(a, state)).collect();
            call_builtin(name, &values)
        }
        // Dates, durations, distributions, models, records, and arrays are
        // never themselves arithmetic values: they're sampled, interpolated,
        // or structurally destructured by the simulator instead.
        ExprKind::Date(_)
        | ExprKind::Duration { .. }
        | ExprKind::Distribution(_)
        | ExprKind::Model(_)
        | ExprKind::Record(_)
        | ExprKind::Array(_)
        | ExprKind::Str(_) => 0.0,
    }
}

fn eval_binary(op: BinaryOp, lhs: f64, rhs: f64) -> f64 {
    let truthy = |v: f64| v != 0.0;
    let bool_to_f64 = |b: bool| if b { 1.0 } else { 0.0 };
    match op {
        BinaryOp::Add => lhs + rhs,
        BinaryOp::Sub => lhs - rhs,
        BinaryOp::Mul => lhs * rhs,
        BinaryOp::Div => {
            if rhs == 0.0 {
                0.0
            } else {
                lhs / rhs
            }
        }
        BinaryOp::Mod => {
            if rhs == 0.0 {
                0.0
            } else {
                lhs % rhs
            }
        }
        BinaryOp::Pow => lhs.powf(rhs),
        BinaryOp::Gt => bool_to_f64(lhs > rhs),
        BinaryOp::Lt => bool_to_f64(lhs < rhs),
        BinaryOp::Ge => bool_to_f64(lhs >= rhs),
        BinaryOp::Le => bool_to_f64(lhs <= rhs),
        BinaryOp::Eq => bool_to_f64(lhs == rhs),
        BinaryOp::Ne => bool_to_f64(lhs != rhs),
        BinaryOp::And => bool_to_f64(truthy(lhs) && truthy(rhs)),
        BinaryOp::Or => bool_to_f64(truthy(lhs) || truthy(rhs)),
    }
}

fn eval_unary(op: UnaryOp, value: f64) -> f64 {
    match op {
        UnaryOp::Neg => -value,
        UnaryOp::Not => {
            if value == 0.0 {
                1.0
            } else {
                0.0
            }
        }
    }
}
