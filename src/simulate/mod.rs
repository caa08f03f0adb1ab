//! The Monte Carlo simulation orchestrator (spec §4.4).
//!
//! Single-threaded and synchronous: one run follows the next, in order,
//! through the same PRNG stream, so a given seed always reproduces the
//! same sequence of samples (spec §5).

mod calendar;
mod config;
mod convergence;
mod result;
mod timesteps;

pub use config::{EffectiveConfig, ProgressReport, SimulateOverrides};
pub use result::{BranchResult, DistributionSummary, ImpactResult, SimulationResult, VariableResult};
pub use timesteps::Timestep;

use std::collections::HashMap;
use std::time::Instant;

use indexmap::IndexMap;

use crate::ast::{Declaration, Scenario};
use crate::diagnostics::SdlError;
use crate::eval::{evaluate, evaluate_growth, interpolate, EvalState};
use crate::rng::{sample_beta, sample_lognormal, sample_normal, sample_normal_pct, sample_triangular, sample_uniform, Xorshift32};
use crate::validator::validate;

type RunState = HashMap<String, HashMap<i32, f64>>;

/// Validate, then run the Monte Carlo loop to completion, convergence, or
/// timeout (spec §6.1, §4.4 "Contract").
pub fn simulate(scenario: &Scenario, mut overrides: SimulateOverrides) -> Result<SimulationResult, SdlError> {
    let (valid, diagnostics, causal_graph) = validate(scenario);
    if !valid {
        return Err(SdlError::Invalid(diagnostics));
    }

    let config = config::resolve_config(scenario, &overrides);
    let timesteps = timesteps::build_timesteps(&scenario.metadata);
    let timeframe_start = scenario.metadata.timeframe.map(|(s, _)| s.year).unwrap_or(0);

    let assumptions: Vec<_> = scenario
        .declarations
        .iter()
        .filter_map(|d| match d {
            Declaration::Assumption(a) => Some(a),
            _ => None,
        })
        .collect();
    let parameters: Vec<_> = scenario
        .declarations
        .iter()
        .filter_map(|d| match d {
            Declaration::Parameter(p) => Some(p),
            _ => None,
        })
        .collect();
    let variables_by_name: HashMap<&str, _> = scenario
        .declarations
        .iter()
        .filter_map(|d| match d {
            Declaration::Variable(v) => Some((v.name.as_str(), v)),
            _ => None,
        })
        .collect();
    let impacts: Vec<_> = scenario
        .declarations
        .iter()
        .filter_map(|d| match d {
            Declaration::Impact(i) if i.name != crate::ast::SENTINEL_LIST_NAME => Some(i),
            _ => None,
        })
        .collect();
    let branches: Vec<_> = scenario
        .declarations
        .iter()
        .filter_map(|d| match d {
            Declaration::Branch(b) => Some(b),
            _ => None,
        })
        .collect();

    let mut rng = Xorshift32::new(config.seed);
    let started = Instant::now();

    let mut variable_samples: SampleState = HashMap::new();
    let mut impact_samples: SampleState = HashMap::new();
    let mut branch_activations: HashMap<&str, u64> = branches.iter().map(|b| (b.name.as_str(), 0)).collect();

    let mut actual_runs = 0u64;
    let mut convergence_reached = false;

    for run in 0..config.runs {
        if started.elapsed().as_millis() as u64 > config.timeout_ms {
            tracing::warn!(
                scenario = %scenario.name,
                completed = run,
                requested = config.runs,
                "simulation timed out before completing all runs"
            );
            break;
        }
        actual_runs = run + 1;

        let mut state: RunState = HashMap::new();

        sample_assumptions(&assumptions, &timesteps, &mut rng, &mut state);
        sample_parameters(&parameters, &timesteps, &mut rng, &mut state);
        evaluate_variables(
            &causal_graph,
            &variables_by_name,
            &timesteps,
            timeframe_start,
            &mut rng,
            &mut state,
        );
        evaluate_branches(&branches, &timesteps, &mut rng, &state, &mut branch_activations);
        push_run_into_samples(&state, &mut variable_samples);

        let mut impact_state: RunState = HashMap::new();
        evaluate_impacts(&impacts, &timesteps, &state, &mut impact_state);
        push_run_into_samples(&impact_state, &mut impact_samples);

        if (run + 1) % 100 == 0 {
            if convergence::has_converged(&variable_samples, config.convergence) {
                convergence_reached = true;
            }
            if let Some(callback) = overrides.on_progress.as_mut() {
                callback(ProgressReport {
                    completed_runs: run + 1,
                    total_runs: config.runs,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                    convergence_metric: None,
                });
            }
            if convergence_reached {
                tracing::debug!(scenario = %scenario.name, runs = run + 1, "converged early");
                break;
            }
        }
    }

    let variables = summarize_declarations(
        variables_by_name.values().map(|v| (v.name.as_str(), v.unit.clone())),
        &timesteps,
        &variable_samples,
        &config.percentiles,
    );
    let impact_results = summarize_declarations(
        impacts.iter().map(|i| (i.name.as_str(), i.unit.clone())),
        &timesteps,
        &impact_samples,
        &config.percentiles,
    )
    .into_iter()
    .map(|(name, result)| {
        (
            name,
            ImpactResult {
                name: result.name,
                unit: result.unit,
                series: result.series,
                sensitivity: IndexMap::new(),
            },
        )
    })
    .collect();

    let branch_results = branches
        .iter()
        .map(|b| {
            let activated = *branch_activations.get(b.name.as_str()).unwrap_or(&0);
            let rate = if actual_runs == 0 { 0.0 } else { activated as f64 / actual_runs as f64 };
            (
                b.name.clone(),
                BranchResult {
                    name: b.name.clone(),
                    activation_rate: rate,
                    overrides: IndexMap::new(),
                },
            )
        })
        .collect();

    Ok(SimulationResult {
        scenario_name: scenario.name.clone(),
        config,
        actual_runs,
        timesteps,
        variables,
        impacts: impact_results,
        branches: branch_results,
        convergence_reached,
        elapsed_ms: started.elapsed().as_millis() as u64,
        seed: rng_seed_used(scenario, &overrides),
    })
}

fn rng_seed_used(scenario: &Scenario, overrides: &SimulateOverrides) -> u32 {
    // Recomputed rather than threaded through `config` so the returned seed
    // is exactly the one the run's PRNG was initialised with.
    config::resolve_config(scenario, overrides).seed
}

fn sample_assumptions(
    assumptions: &[&crate::ast::AssumptionDecl],
    timesteps: &[Timestep],
    rng: &mut Xorshift32,
    state: &mut RunState,
) {
    let empty = HashMap::new();
    for assumption in assumptions {
        let probe = EvalState::new(&empty, 0);
        let base = assumption.value.as_ref().map(|e| evaluate(e, &probe)).unwrap_or(0.0);
        let value = match &assumption.uncertainty {
            Some(dist) => sample_distribution(dist, base, rng, &probe),
            None => base,
        };
        let series: HashMap<i32, f64> = timesteps.iter().map(|t| (t.year, value)).collect();
        state.insert(assumption.name.clone(), series);
    }
}

fn sample_parameters(
    parameters: &[&crate::ast::ParameterDecl],
    timesteps: &[Timestep],
    rng: &mut Xorshift32,
    state: &mut RunState,
) {
    let empty = HashMap::new();
    for parameter in parameters {
        let probe = EvalState::new(&empty, 0);
        let value = if let Some((min, max)) = &parameter.range {
            let lo = evaluate(min, &probe);
            let hi = evaluate(max, &probe);
            sample_uniform(rng, lo, hi)
        } else {
            parameter.value.as_ref().map(|e| evaluate(e, &probe)).unwrap_or(0.0)
        };
        let series: HashMap<i32, f64> = timesteps.iter().map(|t| (t.year, value)).collect();
        state.insert(parameter.name.clone(), series);
    }
}

fn evaluate_variables(
    causal_graph: &crate::validator::CausalGraph,
    variables_by_name: &HashMap<&str, &crate::ast::VariableDecl>,
    timesteps: &[Timestep],
    timeframe_start: i32,
    rng: &mut Xorshift32,
    state: &mut RunState,
) {
    let order: Vec<&str> = if causal_graph.is_acyclic() {
        causal_graph.topological_order.iter().map(|s| s.as_str()).collect()
    } else {
        variables_by_name.keys().copied().collect()
    };

    for name in order {
        let Some(variable) = variables_by_name.get(name) else { continue };

        let anchor_points: Vec<(f64, f64)> = variable
            .anchors
            .iter()
            .map(|(date, expr)| {
                let probe = EvalState::new(state, date.year);
                (date.as_year_fraction(), evaluate(expr, &probe))
            })
            .collect();

        let mut year_values = HashMap::with_capacity(timesteps.len());
        for timestep in timesteps {
            let probe = EvalState::new(state, timestep.year);
            let mut base = if !anchor_points.is_empty() {
                interpolate(&anchor_points, variable.interpolation, timestep.year as f64)
            } else if let Some(growth) = &variable.growth {
                evaluate_growth(growth, timestep.year as f64, timeframe_start as f64, &probe)
            } else {
                0.0
            };

            if !variable.depends_on.is_empty() && variable.growth.is_some() {
                let modulation: f64 = variable
                    .depends_on
                    .iter()
                    .map(|dep| {
                        let base_name = dep.split('.').next().unwrap_or(dep);
                        1.0 + probe.lookup(base_name) * 0.01
                    })
                    .product();
                base *= modulation;
            }

            let value = match &variable.uncertainty {
                Some(dist) => sample_distribution(dist, base, rng, &probe),
                None => base,
            };
            year_values.insert(timestep.year, value);
        }
        state.insert(variable.name.clone(), year_values);
    }
}

fn evaluate_branches<'a>(
    branches: &[&'a crate::ast::BranchDecl],
    timesteps: &[Timestep],
    rng: &mut Xorshift32,
    state: &RunState,
    activations: &mut HashMap<&'a str, u64>,
) {
    for branch in branches {
        let probability = branch.probability.unwrap_or(0.5);
        let mut activated = false;
        for timestep in timesteps {
            let probe = EvalState::new(state, timestep.year);
            if evaluate(&branch.condition, &probe) != 0.0 && rng.next_f64() < probability {
                activated = true;
                break;
            }
        }
        if activated {
            *activations.entry(branch.name.as_str()).or_insert(0) += 1;
        }
    }
}

fn evaluate_impacts(impacts: &[&crate::ast::ImpactDecl], timesteps: &[Timestep], state: &RunState, out: &mut RunState) {
    for impact in impacts {
        let mut year_values = HashMap::with_capacity(timesteps.len());
        for timestep in timesteps {
            let probe = EvalState::new(state, timestep.year);
            let value = if let Some(formula) = &impact.formula {
                evaluate(formula, &probe)
            } else {
                impact
                    .derives_from
                    .iter()
                    .map(|dep| probe.lookup(dep.split('.').next().unwrap_or(dep)))
                    .sum()
            };
            year_values.insert(timestep.year, value);
        }
        out.entry(impact.name.clone()).or_default().extend(year_values);
    }
}

/// Per-(name, year) sample accumulation across runs. Kept distinct from
/// `RunState` (a single run's scalar values) so the type signals which
/// stage of the pipeline is in play.
type SampleState = HashMap<String, HashMap<i32, Vec<f64>>>;

fn push_run_into_samples(run_state: &RunState, samples: &mut SampleState) {
    for (name, by_year) in run_state {
        let entry = samples.entry(name.clone()).or_default();
        for (year, value) in by_year {
            entry.entry(*year).or_default().push(*value);
        }
    }
}

fn summarize_declarations<'a>(
    names_and_units: impl Iterator<Item = (&'a str, Option<String>)>,
    timesteps: &[Timestep],
    samples: &SampleState,
    percentiles: &[f64],
) -> IndexMap<String, VariableResult> {
    let mut out = IndexMap::new();
    for (name, unit) in names_and_units {
        let by_year = samples.get(name);
        let series = timesteps
            .iter()
            .map(|timestep| {
                let values = by_year.and_then(|m| m.get(&timestep.year)).cloned().unwrap_or_default();
                (*timestep, result::summarize(values, percentiles))
            })
            .collect();
        out.insert(
            name.to_string(),
            VariableResult {
                name: name.to_string(),
                unit,
                series,
            },
        );
    }
    out
}

/// Map a distribution expression's already-evaluated arguments onto the
/// RNG's per-family samplers, falling back to the base value for unknown
/// or malformed distributions (spec §4.5 "Unknown or malformed
/// distributions return the base value unchanged").
fn sample_distribution(dist: &crate::ast::DistributionExpr, base: f64, rng: &mut Xorshift32, state: &EvalState) -> f64 {
    use crate::ast::DistributionFamily;

    let positional: Vec<f64> = dist.positional.iter().map(|e| evaluate(e, state)).collect();
    let named = |key: &str| -> Option<f64> { dist.named.iter().find(|(n, _)| n == key).map(|(_, e)| evaluate(e, state)) };

    match &dist.family {
        DistributionFamily::Normal => match positional.as_slice() {
            [fraction] => sample_normal_pct(rng, base, *fraction),
            [mean, std] => sample_normal(rng, *mean, *std),
            _ => base,
        },
        DistributionFamily::Uniform => match positional.as_slice() {
            [min, max] => sample_uniform(rng, *min, *max),
            _ => base,
        },
        DistributionFamily::Beta => match positional.as_slice() {
            [alpha, beta] => sample_beta(rng, *alpha, *beta),
            _ => named("alpha").zip(named("beta")).map(|(a, b)| sample_beta(rng, a, b)).unwrap_or(base),
        },
        DistributionFamily::Triangular => match positional.as_slice() {
            [min, mode, max] => sample_triangular(rng, *min, *mode, *max),
            _ => base,
        },
        DistributionFamily::Lognormal => match positional.as_slice() {
            [mu, sigma] => sample_lognormal(rng, *mu, *sigma),
            _ => base,
        },
        DistributionFamily::Custom(_) => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn run(source: &str, overrides: SimulateOverrides) -> SimulationResult {
        let (scenario, diags) = parse(source);
        assert!(diags.is_empty(), "{diags:?}");
        simulate(&scenario.unwrap(), overrides).expect("scenario should validate")
    }

    #[test]
    fn zero_width_uncertainty_holds_percentiles_exact() {
        let result = run(
            r#"scenario "T" {
                timeframe: 2025 -> 2025
                variable x {
                    uncertainty: normal(±0%)
                    2025: 100
                }
            }"#,
            SimulateOverrides {
                runs: Some(10),
                seed: Some(42),
                ..Default::default()
            },
        );
        let series = &result.variables["x"].series;
        let (_, summary) = &series[0];
        for (_, value) in &summary.percentiles {
            assert!((value - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn certain_branch_activates_every_run() {
        let result = run(
            r#"scenario "T" {
                timeframe: 2025 -> 2025
                branch "Hi" when 1 > 0 { probability: 1.0 }
            }"#,
            SimulateOverrides {
                runs: Some(10),
                seed: Some(42),
                ..Default::default()
            },
        );
        assert_eq!(result.branches["Hi"].activation_rate, 1.0);
    }

    #[test]
    fn normal_uncertainty_mean_and_median_track_the_base() {
        let result = run(
            r#"scenario "T" {
                timeframe: 2025 -> 2025
                variable x {
                    uncertainty: normal(±10%)
                    2025: 10
                }
            }"#,
            SimulateOverrides {
                runs: Some(4000),
                seed: Some(1),
                ..Default::default()
            },
        );
        let (_, summary) = &result.variables["x"].series[0];
        assert!((summary.mean - 10.0).abs() < 0.2);
        assert!((summary.median - 10.0).abs() < 0.2);
    }

    #[test]
    fn empty_scenario_has_no_timesteps_without_a_timeframe() {
        let result = run(r#"scenario "Empty" { }"#, SimulateOverrides::default());
        assert!(result.timesteps.is_empty());
        assert!(result.variables.is_empty());
    }
}
