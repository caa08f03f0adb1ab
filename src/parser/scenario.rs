//! Top-level structure: imports, the `scenario` header, and metadata lines
//! (spec §4.2 "Top-level structure").

use crate::ast::{Metadata, Resolution, Scenario};
use crate::token::TokenKind;

use super::expr::literal_numeric;
use super::Parser;

impl Parser {
    pub(super) fn parse_scenario(&mut self) -> Option<Scenario> {
        let mut declarations = Vec::new();
        while self.at(TokenKind::ImportKw) {
            match self.parse_import() {
                Some(import) => declarations.push(import),
                None => {
                    self.advance();
                }
            }
        }

        let start = self.expect(TokenKind::ScenarioKw)?;
        let name = self.expect(TokenKind::String)?;
        self.expect(TokenKind::LeftBrace)?;

        let mut metadata = Metadata::default();
        loop {
            if self.at(TokenKind::RightBrace) || self.is_eof() {
                break;
            }
            if is_metadata_keyword(self.peek_kind()) {
                self.parse_metadata(&mut metadata);
                continue;
            }
            if is_declaration_keyword(self.peek_kind()) {
                if let Some(decl) = self.parse_declaration() {
                    declarations.push(decl);
                }
                continue;
            }
            self.error("unrecognised token in scenario body");
            self.advance();
        }
        let end = self.expect(TokenKind::RightBrace);
        let span = start.span.merge(end.map(|t| t.span).unwrap_or(start.span));

        Some(Scenario {
            name: name.lexeme,
            metadata,
            declarations,
            span,
        })
    }

    fn parse_metadata(&mut self, metadata: &mut Metadata) {
        let kw = self.advance();
        self.expect(TokenKind::Colon);
        match kw.kind {
            TokenKind::TimeframeKw => {
                let start = self.parse_metadata_date();
                self.expect(TokenKind::Arrow);
                let end = self.parse_metadata_date();
                if let (Some(s), Some(e)) = (start, end) {
                    metadata.timeframe = Some((s, e));
                }
            }
            TokenKind::ResolutionKw => {
                metadata.resolution = match self.advance().kind {
                    TokenKind::YearlyKw => Some(Resolution::Yearly),
                    TokenKind::MonthlyKw => Some(Resolution::Monthly),
                    TokenKind::WeeklyKw => Some(Resolution::Weekly),
                    TokenKind::DailyKw => Some(Resolution::Daily),
                    _ => None,
                };
            }
            TokenKind::ConfidenceKw => {
                metadata.confidence = self.parse_expr().and_then(|e| literal_numeric(&e));
            }
            TokenKind::AuthorKw => metadata.author = self.parse_metadata_string(),
            TokenKind::VersionKw => metadata.version = self.parse_metadata_string(),
            TokenKind::DescriptionKw => metadata.description = self.parse_metadata_string(),
            TokenKind::TagsKw => metadata.tags = self.parse_string_array(),
            TokenKind::SubtitleKw => metadata.subtitle = self.parse_metadata_string(),
            TokenKind::CategoryKw => metadata.category = self.parse_metadata_string(),
            TokenKind::IconKw => metadata.icon = self.parse_metadata_string(),
            TokenKind::ColorKw => metadata.color = self.parse_metadata_string(),
            TokenKind::DifficultyKw => metadata.difficulty = self.parse_metadata_string(),
            _ => unreachable!("is_metadata_keyword guards this dispatch"),
        }
    }

    fn parse_metadata_string(&mut self) -> Option<String> {
        self.expect(TokenKind::String).map(|t| t.lexeme)
    }

    fn parse_metadata_date(&mut self) -> Option<crate::ast::DateLit> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Date => Some(super::expr::parse_date_lexeme(&tok.lexeme)),
            TokenKind::Number => tok
                .lexeme
                .parse::<f64>()
                .ok()
                .map(|y| crate::ast::DateLit::year_only(y as i32)),
            _ => {
                self.error_at(tok.span, "expected a date or year");
                None
            }
        }
    }
}

fn is_metadata_keyword(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::TimeframeKw
            | TokenKind::ResolutionKw
            | TokenKind::ConfidenceKw
            | TokenKind::AuthorKw
            | TokenKind::VersionKw
            | TokenKind::DescriptionKw
            | TokenKind::TagsKw
            | TokenKind::SubtitleKw
            | TokenKind::CategoryKw
            | TokenKind::IconKw
            | TokenKind::ColorKw
            | TokenKind::DifficultyKw
    )
}

fn is_declaration_keyword(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::VariableKw
            | TokenKind::AssumptionKw
            | TokenKind::ParameterKw
            | TokenKind::BranchKw
            | TokenKind::ImpactKw
            | TokenKind::SimulateKw
            | TokenKind::WatchKw
            | TokenKind::CalibrateKw
            | TokenKind::ImportKw
    )
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use crate::ast::{Declaration, Resolution};

    #[test]
    fn empty_scenario_parses_with_no_diagnostics() {
        let (scenario, diags) = parse(r#"scenario "Empty" { }"#);
        assert!(diags.is_empty(), "{diags:?}");
        let scenario = scenario.unwrap();
        assert_eq!(scenario.name, "Empty");
        assert!(scenario.declarations.is_empty());
    }

    #[test]
    fn timeframe_and_resolution_metadata() {
        let (scenario, diags) = parse(
            r#"scenario "T" {
                timeframe: 2025 -> 2030
                resolution: yearly
            }"#,
        );
        assert!(diags.is_empty(), "{diags:?}");
        let scenario = scenario.unwrap();
        let (start, end) = scenario.metadata.timeframe.unwrap();
        assert_eq!(start.year, 2025);
        assert_eq!(end.year, 2030);
        assert_eq!(scenario.metadata.resolution, Some(Resolution::Yearly));
    }

    #[test]
    fn leading_imports_land_at_front_of_declarations() {
        let (scenario, diags) = parse(
            r#"import "shared.sdl" as shared
            scenario "T" {
                variable x { }
            }"#,
        );
        assert!(diags.is_empty(), "{diags:?}");
        let scenario = scenario.unwrap();
        assert!(matches!(scenario.declarations[0], Declaration::Import(_)));
        assert!(matches!(scenario.declarations[1], Declaration::Variable(_)));
    }

    #[test]
    fn missing_scenario_keyword_yields_none() {
        let (scenario, diags) = parse("not a scenario at all");
        assert!(scenario.is_none());
        assert!(!diags.is_empty());
    }

    #[test]
    fn cyclic_dependency_scenario_still_parses() {
        let (scenario, diags) = parse(
            r#"scenario "Cycle" {
                variable A { depends_on: [B] 2025: 1 }
                variable B { depends_on: [A] 2025: 1 }
            }"#,
        );
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(scenario.unwrap().declarations.len(), 2);
    }
}
