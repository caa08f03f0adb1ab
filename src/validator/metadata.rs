//! Scenario metadata validation (spec §4.3 step 2).

use crate::ast::Metadata;
use crate::base::SourceSpan;
use crate::diagnostics::{Diagnostic, DiagnosticCode};

pub fn validate_metadata(metadata: &Metadata, scenario_span: SourceSpan, diagnostics: &mut Vec<Diagnostic>) {
    match &metadata.timeframe {
        None => diagnostics.push(
            Diagnostic::builder(DiagnosticCode::W001)
                .message("scenario has no timeframe")
                .span(scenario_span)
                .build(),
        ),
        Some((start, end)) => {
            if end < start {
                diagnostics.push(
                    Diagnostic::builder(DiagnosticCode::E008)
                        .message("timeframe end precedes timeframe start")
                        .span(scenario_span)
                        .build(),
                );
            }
        }
    }

    if let Some(confidence) = metadata.confidence {
        if !(0.0..=1.0).contains(&confidence) {
            diagnostics.push(
                Diagnostic::builder(DiagnosticCode::E003)
                    .message("scenario confidence must be between 0 and 1")
                    .span(scenario_span)
                    .build(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn missing_timeframe_warns() {
        let (scenario, _) = parse(r#"scenario "T" { }"#);
        let scenario = scenario.unwrap();
        let mut diagnostics = Vec::new();
        validate_metadata(&scenario.metadata, scenario.span, &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::W001);
    }

    #[test]
    fn inverted_timeframe_errors() {
        let (scenario, _) = parse(r#"scenario "T" { timeframe: 2030 -> 2020 }"#);
        let scenario = scenario.unwrap();
        let mut diagnostics = Vec::new();
        validate_metadata(&scenario.metadata, scenario.span, &mut diagnostics);
        assert!(diagnostics.iter().any(|d| d.code == DiagnosticCode::E008));
    }
}
