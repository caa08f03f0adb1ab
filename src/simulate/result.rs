//! Simulation result types and summary aggregation (spec §3.3, §4.4.2).

use indexmap::IndexMap;

use super::config::EffectiveConfig;
use super::timesteps::Timestep;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DistributionSummary {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// `(percentile rank, value)` pairs in the order the caller requested.
    pub percentiles: Vec<(f64, f64)>,
    pub samples: Vec<f64>,
}

/// Sort `samples`, then compute mean/variance/median/min/max and the
/// requested percentiles (spec §4.4.2).
pub fn summarize(mut samples: Vec<f64>, percentile_ranks: &[f64]) -> DistributionSummary {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = samples.len();
    if n == 0 {
        return DistributionSummary {
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
            percentiles: percentile_ranks.iter().map(|p| (*p, 0.0)).collect(),
            samples,
        };
    }

    let mean = samples.iter().sum::<f64>() / n as f64;
    let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    let std_dev = variance.sqrt();
    let median = samples[n / 2];
    let min = samples[0];
    let max = samples[n - 1];
    let percentiles = percentile_ranks
        .iter()
        .map(|p| {
            let idx = ((p / 100.0 * n as f64).ceil() as i64 - 1).clamp(0, n as i64 - 1) as usize;
            (*p, samples[idx])
        })
        .collect();

    DistributionSummary {
        mean,
        median,
        std_dev,
        min,
        max,
        percentiles,
        samples,
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VariableResult {
    pub name: String,
    pub unit: Option<String>,
    pub series: Vec<(Timestep, DistributionSummary)>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImpactResult {
    pub name: String,
    pub unit: Option<String>,
    pub series: Vec<(Timestep, DistributionSummary)>,
    /// Always empty: no specification exists yet for how sensitivities
    /// should be computed (spec §9 open question).
    pub sensitivity: IndexMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BranchResult {
    pub name: String,
    pub activation_rate: f64,
    /// Always empty: the main loop only tracks activation, it never
    /// specifies how an activated branch overrides a variable's value.
    pub overrides: IndexMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationResult {
    pub scenario_name: String,
    pub config: EffectiveConfig,
    pub actual_runs: u64,
    pub timesteps: Vec<Timestep>,
    pub variables: IndexMap<String, VariableResult>,
    pub impacts: IndexMap<String, ImpactResult>,
    pub branches: IndexMap<String, BranchResult>,
    pub convergence_reached: bool,
    pub elapsed_ms: u64,
    pub seed: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_ordering_invariant_holds() {
        let samples: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        let summary = summarize(samples, &[5.0, 25.0, 50.0, 75.0, 95.0]);
        let values: Vec<f64> = summary.percentiles.iter().map(|(_, v)| *v).collect();
        assert!(summary.min <= values[0]);
        assert!(values[0] <= values[1]);
        assert!(values[1] <= summary.median);
        assert!(summary.median <= values[2]);
        assert!(values[2] <= values[3]);
        assert!(values[3] <= summary.max);
    }

    #[test]
    fn empty_sample_vector_summarizes_to_zero() {
        let summary = summarize(Vec::new(), &[50.0]);
        assert_eq!(summary.mean, 0.0);
        assert_eq!(summary.percentiles, vec![(50.0, 0.0)]);
    }
}
