//! Timeseries interpolation between declared anchors (spec §4.4.5).

use crate::ast::InterpolationMethod;

/// `anchors` must be sorted ascending by position (the validator already
/// rejects non-ascending anchor dates before the simulator ever runs).
pub fn interpolate(anchors: &[(f64, f64)], method: InterpolationMethod, t: f64) -> f64 {
    match anchors {
        [] => 0.0,
        [(_, only)] => *only,
        _ => match method {
            InterpolationMethod::Step => step(anchors, t),
            InterpolationMethod::Linear => linear(anchors, t),
            InterpolationMethod::Spline => spline(anchors, t),
        },
    }
}

/// The most recent anchor not after `t`; falls back to the first anchor
/// when `t` precedes every anchor.
fn step(anchors: &[(f64, f64)], t: f64) -> f64 {
    anchors
        .iter()
        .rev()
        .find(|(x, _)| *x <= t)
        .map(|(_, y)| *y)
        .unwrap_or(anchors[0].1)
}

/// The bracketing anchor index pair; both indices equal when `t` falls
/// outside the anchor range (clamped to the nearest edge).
fn bracket(anchors: &[(f64, f64)], t: f64) -> (usize, usize) {
    let last = anchors.len() - 1;
    if t <= anchors[0].0 {
        return (0, 0);
    }
    if t >= anchors[last].0 {
        return (last, last);
    }
    for i in 0..last {
        if anchors[i].0 <= t && t <= anchors[i + 1].0 {
            return (i, i + 1);
        }
    }
    (last, last)
}

fn linear(anchors: &[(f64, f64)], t: f64) -> f64 {
    let (i, j) = bracket(anchors, t);
    if i == j {
        return anchors[i].1;
    }
    let (x0, y0) = anchors[i];
    let (x1, y1) = anchors[j];
    if (x1 - x0).abs() < f64::EPSILON {
        return y0;
    }
    y0 + (y1 - y0) * (t - x0) / (x1 - x0)
}

/// Catmull-Rom over four neighbour anchors, duplicating the first/last
/// anchor at the boundaries (spec §4.4.5).
fn spline(anchors: &[(f64, f64)], t: f64) -> f64 {
    let (i, j) = bracket(anchors, t);
    if i == j {
        return anchors[i].1;
    }
    let p0 = if i == 0 { anchors[0] } else { anchors[i - 1] };
    let p1 = anchors[i];
    let p2 = anchors[j];
    let p3 = if j + 1 < anchors.len() { anchors[j + 1] } else { anchors[j] };

    let u = if (p2.0 - p1.0).abs() < f64::EPSILON {
        0.0
    } else {
        (t - p1.0) / (p2.0 - p1.0)
    };
    catmull_rom(p0.1, p1.1, p2.1, p3.1, u)
}

fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, u: f64) -> f64 {
    let u2 = u * u;
    let u3 = u2 * u;
    0.5 * (2.0 * p1
        + (-p0 + p2) * u
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * u2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * u3)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHORS: &[(f64, f64)] = &[(2025.0, 100.0), (2027.0, 200.0), (2030.0, 400.0)];

    #[test]
    fn step_returns_most_recent_anchor_not_after_target() {
        assert_eq!(interpolate(ANCHORS, InterpolationMethod::Step, 2026.5), 100.0);
        assert_eq!(interpolate(ANCHORS, InterpolationMethod::Step, 2028.0), 200.0);
    }

    #[test]
    fn linear_interpolates_between_bracketing_anchors() {
        let v = interpolate(ANCHORS, InterpolationMethod::Linear, 2026.0);
        assert!((v - 150.0).abs() < 1e-9);
    }

    #[test]
    fn linear_clamps_outside_anchor_range() {
        assert_eq!(interpolate(ANCHORS, InterpolationMethod::Linear, 2000.0), 100.0);
        assert_eq!(interpolate(ANCHORS, InterpolationMethod::Linear, 2040.0), 400.0);
    }

    #[test]
    fn spline_passes_through_anchor_points() {
        for &(x, y) in ANCHORS {
            let v = interpolate(ANCHORS, InterpolationMethod::Spline, x);
            assert!((v - y).abs() < 1e-6, "expected {y}, got {v}");
        }
    }

    #[test]
    fn single_anchor_is_constant() {
        let anchors = [(2025.0, 42.0)];
        assert_eq!(interpolate(&anchors, InterpolationMethod::Linear, 2099.0), 42.0);
    }
}
