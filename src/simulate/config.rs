//! Simulation configuration: overrides, scenario-declared defaults, and the
//! effective configuration actually used for a run (spec §4.4 "Pre-run",
//! spec §9 "Configuration objects").

use std::time::{SystemTime, UNIX_EPOCH};

use crate::ast::{Declaration, Expr, ExprKind, Scenario, SimulateMethod};

const DEFAULT_RUNS: u64 = 1000;
const DEFAULT_PERCENTILES: &[f64] = &[5.0, 25.0, 50.0, 75.0, 95.0];
const DEFAULT_CONVERGENCE: f64 = 0.01;
const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// One invocation's progress snapshot, delivered every 100 runs.
#[derive(Debug, Clone, Copy)]
pub struct ProgressReport {
    pub completed_runs: u64,
    pub total_runs: u64,
    pub elapsed_ms: u64,
    pub convergence_metric: Option<f64>,
}

/// Caller-supplied overrides layered over the scenario's own `Simulate`
/// declaration and the built-in defaults. Every field is optional; the
/// caller sets only what it wants to change.
#[derive(Default)]
pub struct SimulateOverrides {
    pub runs: Option<u64>,
    pub method: Option<SimulateMethod>,
    pub seed: Option<u32>,
    pub percentiles: Option<Vec<f64>>,
    pub convergence: Option<f64>,
    pub timeout_ms: Option<u64>,
    /// Invoked inline every 100 runs; must not block (spec §9 "Callbacks").
    pub on_progress: Option<Box<dyn FnMut(ProgressReport)>>,
}

/// The fully-resolved configuration a single simulation run actually uses.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EffectiveConfig {
    pub runs: u64,
    pub method: SimulateMethod,
    pub seed: u32,
    pub percentiles: Vec<f64>,
    pub convergence: f64,
    pub timeout_ms: u64,
}

/// Resolve precedence: caller overrides, then the scenario's first
/// `Simulate` declaration, then the built-in defaults.
pub fn resolve_config(scenario: &Scenario, overrides: &SimulateOverrides) -> EffectiveConfig {
    let declared = scenario.declarations.iter().find_map(|d| match d {
        Declaration::Simulate(s) => Some(s),
        _ => None,
    });

    let runs = overrides
        .runs
        .or(declared.and_then(|s| s.runs))
        .unwrap_or(DEFAULT_RUNS);
    let method = overrides
        .method
        .or(declared.and_then(|s| s.method))
        .unwrap_or_default();
    let seed = overrides
        .seed
        .or(declared.and_then(|s| s.seed))
        .unwrap_or_else(default_seed);
    let percentiles = overrides
        .percentiles
        .clone()
        .or_else(|| declared.map(|s| s.percentiles.clone()).filter(|p| !p.is_empty()))
        .unwrap_or_else(|| DEFAULT_PERCENTILES.to_vec());
    let convergence = overrides
        .convergence
        .or(declared.and_then(|s| s.convergence))
        .unwrap_or(DEFAULT_CONVERGENCE);
    let timeout_ms = overrides
        .timeout_ms
        .or(declared
            .and_then(|s| s.timeout.as_ref())
            .and_then(const_fold)
            .map(|ms| ms as u64))
        .unwrap_or(DEFAULT_TIMEOUT_MS);

    EffectiveConfig {
        runs,
        method,
        seed,
        percentiles,
        convergence,
        timeout_ms,
    }
}

/// Mirrors the validator's narrow literal folder (spec §4.3.1 "when
/// constant-foldable"); kept local rather than exported across modules for
/// a six-line helper.
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

fn default_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0)
}
