//! Convergence testing (spec §4.4.1).

use std::collections::HashMap;

/// True when every sample vector with at least 200 samples shows a
/// first-half/second-half relative mean difference below `threshold`.
/// Vectors shorter than 200 samples are skipped (not yet informative).
pub fn has_converged(series: &HashMap<String, HashMap<i32, Vec<f64>>>, threshold: f64) -> bool {
    let mut checked_any = false;
    for by_year in series.values() {
        for samples in by_year.values() {
            if samples.len() < 200 {
                continue;
            }
            checked_any = true;
            let half = samples.len() / 2;
            let m1 = mean(&samples[..half]);
            let m2 = mean(&samples[half..]);
            let denom = m1.abs().max(m2.abs()).max(1e-10);
            if (m1 - m2).abs() / denom >= threshold {
                return false;
            }
        }
    }
    checked_any
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_vectors_never_count_as_converged() {
        let mut series = HashMap::new();
        series.insert("x".to_string(), HashMap::from([(2025, vec![1.0; 50])]));
        assert!(!has_converged(&series, 0.01));
    }

    #[test]
    fn identical_halves_converge() {
        let mut series = HashMap::new();
        series.insert("x".to_string(), HashMap::from([(2025, vec![10.0; 400])]));
        assert!(has_converged(&series, 0.01));
    }

    #[test]
    fn wildly_diverging_halves_do_not_converge() {
        let mut first_half = vec![0.0; 100];
        let mut second_half = vec![1000.0; 100];
        first_half.append(&mut second_half);
        let mut series = HashMap::new();
        series.insert("x".to_string(), HashMap::from([(2025, first_half)]));
        assert!(!has_converged(&series, 0.01));
    }
}
