use sdl::diagnostics::DiagnosticCode;
use sdl::simulate::SimulateOverrides;
use sdl::token::TokenKind;
use sdl::{parse, simulate, tokenize, validate};

#[test]
fn tokenizing_a_minimal_header_yields_the_expected_kinds() {
    let (tokens, diagnostics) = tokenize(r#"scenario "T" { timeframe: 2025 -> 2027 }"#);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::ScenarioKw,
            TokenKind::String,
            TokenKind::LeftBrace,
            TokenKind::TimeframeKw,
            TokenKind::Colon,
            TokenKind::Number,
            TokenKind::Arrow,
            TokenKind::Number,
            TokenKind::RightBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn mutually_dependent_variables_report_one_cyclic_dependency_error() {
    let (scenario, parse_diags) = parse(
        r#"scenario "Cycle" {
            variable a { depends_on: [b] uncertainty: normal(0, 1) 2025: 1 }
            variable b { depends_on: [a] uncertainty: normal(0, 1) 2025: 1 }
        }"#,
    );
    assert!(parse_diags.is_empty(), "{parse_diags:?}");
    let (valid, diagnostics, graph) = validate(&scenario.unwrap());
    assert!(!valid);
    assert!(!graph.is_acyclic());

    let cycle_errors: Vec<_> = diagnostics.iter().filter(|d| d.code == DiagnosticCode::E004).collect();
    assert_eq!(cycle_errors.len(), 1);
    assert!(cycle_errors[0].message.contains('a'));
    assert!(cycle_errors[0].message.contains('b'));
}

#[test]
fn certain_branch_always_activates_over_ten_runs() {
    let (scenario, parse_diags) = parse(
        r#"scenario "T" {
            timeframe: 2025 -> 2025
            branch "Hi" when 1 > 0 { probability: 1.0 }
        }"#,
    );
    assert!(parse_diags.is_empty(), "{parse_diags:?}");
    let result = simulate(
        &scenario.unwrap(),
        SimulateOverrides {
            runs: Some(10),
            seed: Some(42),
            ..Default::default()
        },
    )
    .expect("scenario should validate");
    assert_eq!(result.branches["Hi"].activation_rate, 1.0);
}

#[test]
fn zero_width_normal_uncertainty_holds_every_percentile_exact() {
    let (scenario, parse_diags) = parse(
        r#"scenario "T" {
            timeframe: 2025 -> 2025
            variable x {
                uncertainty: normal(±0%)
                2025: 100
            }
        }"#,
    );
    assert!(parse_diags.is_empty(), "{parse_diags:?}");
    let result = simulate(&scenario.unwrap(), SimulateOverrides::default()).expect("scenario should validate");

    let (_, summary) = &result.variables["x"].series[0];
    assert!((summary.min - 100.0).abs() < 1e-9);
    assert!((summary.max - 100.0).abs() < 1e-9);
    for (_, value) in &summary.percentiles {
        assert!((value - 100.0).abs() < 1e-9);
    }
}

#[test]
fn four_thousand_runs_at_ten_percent_uncertainty_converge_near_the_base() {
    let (scenario, parse_diags) = parse(
        r#"scenario "T" {
            timeframe: 2025 -> 2025
            variable x {
                uncertainty: normal(±10%)
                2025: 10
            }
        }"#,
    );
    assert!(parse_diags.is_empty(), "{parse_diags:?}");
    let result = simulate(
        &scenario.unwrap(),
        SimulateOverrides {
            runs: Some(4000),
            seed: Some(1),
            ..Default::default()
        },
    )
    .expect("scenario should validate");

    let (_, summary) = &result.variables["x"].series[0];
    assert!((summary.mean - 10.0).abs() < 0.2, "mean was {}", summary.mean);
    let p50 = summary.percentiles.iter().find(|(p, _)| *p == 50.0).unwrap().1;
    assert!((p50 - 10.0).abs() < 0.2, "p50 was {p50}");
}

#[test]
fn currency_lexemes_resolve_to_their_expanded_magnitude() {
    let (tokens, diagnostics) = tokenize("5B EUR 1.5M 65B");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let currency_tokens: Vec<_> = tokens.iter().filter(|t| t.kind == TokenKind::Currency).collect();
    assert_eq!(currency_tokens.len(), 1);

    let numeric_tokens: Vec<_> = tokens.iter().filter(|t| t.kind == TokenKind::Number).collect();
    assert_eq!(numeric_tokens.len(), 2);
}

#[test]
fn topological_order_is_a_permutation_of_nodes_when_acyclic() {
    let (scenario, _) = parse(
        r#"scenario "Chain" {
            variable a { uncertainty: normal(0, 1) 2025: 1 }
            variable b { depends_on: [a] uncertainty: normal(0, 1) 2025: 1 }
            variable c { depends_on: [b] uncertainty: normal(0, 1) 2025: 1 }
        }"#,
    );
    let (valid, diagnostics, graph) = validate(&scenario.unwrap());
    assert!(valid, "{diagnostics:?}");
    assert!(graph.is_acyclic());

    let mut names: Vec<&str> = graph.nodes.iter().map(|(n, _)| n.as_str()).collect();
    names.sort();
    let mut ordered: Vec<&str> = graph.topological_order.iter().map(|s| s.as_str()).collect();
    ordered.sort();
    assert_eq!(names, ordered);
}

#[test]
fn uncertain_variable_has_strictly_positive_variance_across_runs() {
    let (scenario, _) = parse(
        r#"scenario "T" {
            timeframe: 2025 -> 2025
            variable x { uncertainty: normal(±10%) 2025: 100 }
        }"#,
    );
    let result = simulate(
        &scenario.unwrap(),
        SimulateOverrides {
            runs: Some(50),
            seed: Some(3),
            ..Default::default()
        },
    )
    .unwrap();
    let (_, summary) = &result.variables["x"].series[0];
    assert!(summary.std_dev > 0.0);
}

#[test]
fn distribution_summary_percentiles_are_monotonic() {
    let (scenario, _) = parse(
        r#"scenario "T" {
            timeframe: 2025 -> 2025
            variable x { uncertainty: normal(±20%) 2025: 50 }
        }"#,
    );
    let result = simulate(
        &scenario.unwrap(),
        SimulateOverrides {
            runs: Some(500),
            seed: Some(9),
            ..Default::default()
        },
    )
    .unwrap();
    let (_, summary) = &result.variables["x"].series[0];
    let values: Vec<f64> = summary.percentiles.iter().map(|(_, v)| *v).collect();
    let mut full = vec![summary.min];
    full.extend(values);
    full.push(summary.max);
    assert!(full.windows(2).all(|w| w[0] <= w[1]), "{full:?}");
}

#[test]
fn same_seed_produces_bit_identical_results() {
    let (scenario, _) = parse(
        r#"scenario "T" {
            timeframe: 2025 -> 2030
            variable x { uncertainty: normal(±15%) 2025: 10 2030: 20 }
        }"#,
    );
    let scenario = scenario.unwrap();
    let first = simulate(
        &scenario,
        SimulateOverrides {
            runs: Some(300),
            seed: Some(123),
            ..Default::default()
        },
    )
    .unwrap();
    let second = simulate(
        &scenario,
        SimulateOverrides {
            runs: Some(300),
            seed: Some(123),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(first.variables["x"].series, second.variables["x"].series);
}

#[test]
fn empty_scenario_simulates_to_no_variables_and_no_timesteps() {
    let (scenario, _) = parse(r#"scenario "Empty" { }"#);
    let result = simulate(&scenario.unwrap(), SimulateOverrides::default()).unwrap();
    assert!(result.timesteps.is_empty());
    assert!(result.variables.is_empty());
    assert!(result.impacts.is_empty());
}

#[test]
fn single_anchor_variable_is_constant_under_every_interpolation_method() {
    for method in ["step", "linear", "spline"] {
        let source = format!(
            r#"scenario "T" {{
                timeframe: 2025 -> 2030
                variable x {{
                    interpolation: {method}
                    2027: 42
                }}
            }}"#
        );
        let (scenario, parse_diags) = parse(&source);
        assert!(parse_diags.is_empty(), "{parse_diags:?}");
        let result = simulate(&scenario.unwrap(), SimulateOverrides::default()).unwrap();
        for (_, summary) in &result.variables["x"].series {
            assert!((summary.mean - 42.0).abs() < 1e-9, "method {method} gave {}", summary.mean);
        }
    }
}

#[test]
fn branch_probability_zero_never_activates() {
    let (scenario, _) = parse(
        r#"scenario "T" {
            timeframe: 2025 -> 2025
            branch "Never" when 1 > 0 { probability: 0.0 }
        }"#,
    );
    let result = simulate(
        &scenario.unwrap(),
        SimulateOverrides {
            runs: Some(50),
            seed: Some(5),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(result.branches["Never"].activation_rate, 0.0);
}
