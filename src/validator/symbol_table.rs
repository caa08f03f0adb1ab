//! Scenario-wide symbol table (spec §4.3 step 1).
//!
//! Only top-level declarations participate: a `Branch`'s nested declarations
//! override values within the branch's scope rather than introducing new
//! scenario-wide symbols, so they are intentionally left out of this table
//! (see DESIGN.md).

use indexmap::IndexMap;

use crate::ast::{Declaration, Scenario, SENTINEL_LIST_NAME};
use crate::diagnostics::{Diagnostic, DiagnosticCode};

pub struct SymbolTable<'a> {
    declarations: IndexMap<&'a str, &'a Declaration>,
}

impl<'a> SymbolTable<'a> {
    pub fn build(scenario: &'a Scenario, diagnostics: &mut Vec<Diagnostic>) -> Self {
        let mut declarations = IndexMap::new();
        for decl in &scenario.declarations {
            let Some(name) = decl.name() else { continue };
            if name == SENTINEL_LIST_NAME {
                continue;
            }
            if declarations.contains_key(name) {
                diagnostics.push(
                    Diagnostic::builder(DiagnosticCode::E006)
                        .message(format!("duplicate declaration name '{name}'"))
                        .span(decl.span())
                        .build(),
                );
                continue;
            }
            declarations.insert(name, decl);
        }
        Self { declarations }
    }

    pub fn contains(&self, base_name: &str) -> bool {
        self.declarations.contains_key(base_name)
    }

    pub fn get(&self, base_name: &str) -> Option<&'a Declaration> {
        self.declarations.get(base_name).copied()
    }
}

/// The declared-before-the-dot segment of a possibly-dotted dependency name
/// (spec §9 "Dotted dependency names").
pub fn base_segment(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn duplicate_names_reported_once_and_first_wins() {
        let (scenario, _) = parse(
            r#"scenario "T" {
                variable x { 2025: 1 }
                variable x { 2025: 2 }
            }"#,
        );
        let scenario = scenario.unwrap();
        let mut diagnostics = Vec::new();
        let table = SymbolTable::build(&scenario, &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::E006);
        assert!(table.contains("x"));
    }

    #[test]
    fn sentinel_list_name_never_registers() {
        let (scenario, _) = parse(
            r#"scenario "T" {
                impact on: [a, b]
            }"#,
        );
        let scenario = scenario.unwrap();
        let mut diagnostics = Vec::new();
        let table = SymbolTable::build(&scenario, &mut diagnostics);
        assert!(diagnostics.is_empty());
        assert!(!table.contains(SENTINEL_LIST_NAME));
    }

    #[test]
    fn base_segment_splits_on_first_dot() {
        assert_eq!(base_segment("a.b.c"), "a");
        assert_eq!(base_segment("plain"), "plain");
    }
}
