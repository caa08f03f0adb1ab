//! Per-family distribution samplers (spec §4.5 "Distribution samplers").

use std::f64::consts::PI;

use super::xorshift::Xorshift32;

pub fn sample_uniform(rng: &mut Xorshift32, min: f64, max: f64) -> f64 {
    min + rng.next_f64() * (max - min)
}

/// Box-Muller. `u1` is floored away from zero so `ln` never sees zero.
pub fn sample_normal(rng: &mut Xorshift32, mean: f64, std: f64) -> f64 {
    let u1 = rng.next_f64().max(f64::MIN_POSITIVE);
    let u2 = rng.next_f64();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    mean + std * z
}

/// The `normal(p)` shorthand: centred on `base` with a standard deviation
/// that is a fraction of it (spec §4.5 "Shorthand form"). `fraction` is
/// already normalised (a `5%` literal evaluates to `0.05`, not `5`).
pub fn sample_normal_pct(rng: &mut Xorshift32, base: f64, fraction: f64) -> f64 {
    sample_normal(rng, base, base * fraction)
}

pub fn sample_lognormal(rng: &mut Xorshift32, mu: f64, sigma: f64) -> f64 {
    sample_normal(rng, mu, sigma).exp()
}

pub fn sample_beta(rng: &mut Xorshift32, alpha: f64, beta: f64) -> f64 {
    let x = sample_gamma(rng, alpha, 1.0);
    let y = sample_gamma(rng, beta, 1.0);
    x / (x + y)
}

/// Marsaglia-Tsang. Shapes below 1 are boosted via `Gamma(a+1)·U^(1/a)`
/// (spec §4.5).
pub fn sample_gamma(rng: &mut Xorshift32, shape: f64, scale: f64) -> f64 {
    if shape < 1.0 {
        let u = rng.next_f64().max(f64::MIN_POSITIVE);
        return sample_gamma(rng, shape + 1.0, scale) * u.powf(1.0 / shape);
    }
    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();
    loop {
        let (x, mut v);
        loop {
            let candidate_x = sample_normal(rng, 0.0, 1.0);
            let candidate_v = 1.0 + c * candidate_x;
            if candidate_v > 0.0 {
                x = candidate_x;
                v = candidate_v;
                break;
            }
        }
        v = v * v * v;
        let u = rng.next_f64();
        if u < 1.0 - 0.0331 * x * x * x * x {
            return d * v * scale;
        }
        if u.ln() < 0.5 * x * x + d * (1.0 - v + v.ln()) {
            return d * v * scale;
        }
    }
}

/// Inverse CDF (spec §4.5).
pub fn sample_triangular(rng: &mut Xorshift32, min: f64, mode: f64, max: f64) -> f64 {
    let u = rng.next_f64();
    let fc = (mode - min) / (max - min);
    if u < fc {
        min + ((max - min) * fc * u).sqrt()
    } else {
        max - ((max - min) * (1.0 - fc) * (1.0 - u)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_stays_within_bounds() {
        let mut rng = Xorshift32::new(11);
        for _ in 0..500 {
            let v = sample_uniform(&mut rng, 10.0, 20.0);
            assert!((10.0..20.0).contains(&v));
        }
    }

    #[test]
    fn normal_pct_shorthand_centres_on_base() {
        let mut rng = Xorshift32::new(99);
        let samples: Vec<f64> = (0..2000).map(|_| sample_normal_pct(&mut rng, 100.0, 0.10)).collect();
        let mean: f64 = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!((mean - 100.0).abs() < 2.0);
    }

    #[test]
    fn beta_samples_land_in_unit_interval() {
        let mut rng = Xorshift32::new(3);
        for _ in 0..500 {
            let v = sample_beta(&mut rng, 2.0, 5.0);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn triangular_respects_min_and_max() {
        let mut rng = Xorshift32::new(5);
        for _ in 0..500 {
            let v = sample_triangular(&mut rng, 1.0, 2.0, 5.0);
            assert!((1.0..=5.0).contains(&v));
        }
    }

    #[test]
    fn gamma_with_shape_below_one_stays_positive() {
        let mut rng = Xorshift32::new(17);
        for _ in 0..500 {
            assert!(sample_gamma(&mut rng, 0.5, 1.0) > 0.0);
        }
    }
}
