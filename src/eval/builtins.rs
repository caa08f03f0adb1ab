//! Built-in function table (spec §4.4.4). Unknown names return 0, matching
//! the evaluator's overall "absent means zero" numeric semantics.

pub fn call_builtin(name: &str, args: &[f64]) -> f64 {
    match name {
        "min" => args.iter().copied().fold(f64::INFINITY, f64::min),
        "max" => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        "abs" => args.first().map(|v| v.abs()).unwrap_or(0.0),
        "sqrt" => args.first().map(|v| v.sqrt()).unwrap_or(0.0),
        "log" => args.first().map(|v| v.ln()).unwrap_or(0.0),
        "pow" => match args {
            [base, exponent] => base.powf(*exponent),
            _ => 0.0,
        },
        "round" => match args {
            [x, decimals] => round_half_away_from_zero(*x, *decimals),
            _ => 0.0,
        },
        "clamp" => match args {
            [x, lo, hi] => x.clamp(*lo, *hi),
            _ => 0.0,
        },
        "lerp" => match args {
            [a, b, t] => a + (b - a) * t,
            _ => 0.0,
        },
        "sum" => args.iter().sum(),
        "avg" => {
            if args.is_empty() {
                0.0
            } else {
                args.iter().sum::<f64>() / args.len() as f64
            }
        }
        _ => 0.0,
    }
}

fn round_half_away_from_zero(x: f64, decimals: f64) -> f64 {
    let factor = 10f64.powf(decimals);
    (x * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_truncates_to_requested_decimals() {
        assert_eq!(call_builtin("round", &[1.2345, 2.0]), 1.23);
        assert_eq!(call_builtin("round", &[-1.005, 2.0]), -1.0);
    }

    #[test]
    fn clamp_bounds_the_value() {
        assert_eq!(call_builtin("clamp", &[15.0, 0.0, 10.0]), 10.0);
        assert_eq!(call_builtin("clamp", &[-5.0, 0.0, 10.0]), 0.0);
    }

    #[test]
    fn unknown_name_returns_zero() {
        assert_eq!(call_builtin("frobnicate", &[1.0]), 0.0);
    }

    #[test]
    fn sum_and_avg_over_variadic_args() {
        assert_eq!(call_builtin("sum", &[1.0, 2.0, 3.0]), 6.0);
        assert_eq!(call_builtin("avg", &[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(call_builtin("avg", &[]), 0.0);
    }
}
