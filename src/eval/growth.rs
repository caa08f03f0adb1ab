//! Growth model evaluation (spec §4.4.6). Missing named parameters fall
//! back to the neutral defaults the spec fixes for each family.

use crate::ast::{ModelExpr, ModelFamily};

use super::evaluator::evaluate;
use super::state::EvalState;

pub fn evaluate_growth(model: &ModelExpr, t: f64, t0: f64, state: &EvalState) -> f64 {
    let dt = t - t0;
    let named = |name: &str, default: f64| -> f64 {
        model
            .named
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, expr)| evaluate(expr, state))
            .unwrap_or(default)
    };

    match model.family {
        ModelFamily::Linear => named("intercept", 0.0) + named("slope", 0.0) * dt,
        ModelFamily::Logistic => {
            let midpoint = named("midpoint", t0 + 10.0);
            named("max", 1.0) / (1.0 + (-named("k", 0.1) * (t - midpoint)).exp())
        }
        ModelFamily::Exponential => named("base", 1.0) * (named("rate", 0.05) * dt).exp(),
        ModelFamily::Sigmoid => {
            let midpoint = named("midpoint", t0 + 10.0);
            1.0 / (1.0 + (-named("k", 0.1) * (t - midpoint)).exp())
        }
        ModelFamily::Polynomial => {
            let mut sum = 0.0;
            let mut power = 0i32;
            loop {
                let name = format!("c{power}");
                match model.named.iter().find(|(n, _)| *n == name) {
                    Some((_, expr)) => {
                        sum += evaluate(expr, state) * dt.powi(power);
                        power += 1;
                    }
                    None => break,
                }
            }
            sum
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn number(value: f64) -> crate::ast::Expr {
        crate::ast::Expr::new(
            crate::ast::ExprKind::Number(value),
            crate::base::SourceSpan::at(crate::base::SourceLocation::start()),
        )
    }

    #[test]
    fn linear_uses_defaults_when_params_absent() {
        let model = ModelExpr {
            family: ModelFamily::Linear,
            named: vec![],
        };
        let values = HashMap::new();
        let state = EvalState::new(&values, 2025);
        assert_eq!(evaluate_growth(&model, 2030.0, 2025.0, &state), 0.0);
    }

    #[test]
    fn exponential_applies_rate_over_delta_t() {
        let model = ModelExpr {
            family: ModelFamily::Exponential,
            named: vec![("base".to_string(), number(100.0)), ("rate".to_string(), number(0.1))],
        };
        let values = HashMap::new();
        let state = EvalState::new(&values, 2025);
        let v = evaluate_growth(&model, 2035.0, 2025.0, &state);
        assert!((v - 100.0 * (0.1f64 * 10.0).exp()).abs() < 1e-9);
    }

    #[test]
    fn polynomial_sums_contiguous_coefficients() {
        let model = ModelExpr {
            family: ModelFamily::Polynomial,
            named: vec![
                ("c0".to_string(), number(1.0)),
                ("c1".to_string(), number(2.0)),
                ("c2".to_string(), number(3.0)),
            ],
        };
        let values = HashMap::new();
        let state = EvalState::new(&values, 2025);
        // dt = 2, so 1 + 2*2 + 3*4 = 17
        let v = evaluate_growth(&model, 2027.0, 2025.0, &state);
        assert!((v - 17.0).abs() < 1e-9);
    }
}
