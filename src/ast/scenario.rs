//! The top-level `Scenario` node (spec §3.1 "Scenario").

use crate::base::SourceSpan;

use super::decl::Declaration;
use super::literal::DateLit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Yearly,
    Monthly,
    Weekly,
    Daily,
}

/// Free-form metadata attached to the scenario header (spec §3.1). Every
/// field is optional; absence drives validator warnings rather than errors,
/// except where noted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata {
    pub timeframe: Option<(DateLit, DateLit)>,
    pub resolution: Option<Resolution>,
    pub confidence: Option<f64>,
    pub author: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub subtitle: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub metadata: Metadata,
    pub declarations: Vec<Declaration>,
    pub span: SourceSpan,
}

impl Scenario {
    /// Top-level declarations only; branch bodies are not flattened (the
    /// validator walks those separately to keep branch scoping visible).
    pub fn declarations_named(&self) -> impl Iterator<Item = (&str, &Declaration)> {
        self.declarations
            .iter()
            .filter_map(|d| d.name().map(|name| (name, d)))
    }
}
