//! The single hard-failure type for the public API.

use thiserror::Error;

use super::diagnostic::Diagnostic;

/// Error returned by [`crate::simulate::simulate`] when the scenario does not
/// validate. `tokenize`, `parse`, and `validate` never return this — they
/// always return structured output plus diagnostics (spec §7).
#[derive(Debug, Error)]
pub enum SdlError {
    /// Validation reported at least one error-severity diagnostic; the
    /// scenario was refused and was not simulated.
    #[error("scenario failed validation with {} error diagnostic(s)", .0.iter().filter(|d| d.severity.is_error()).count())]
    Invalid(Vec<Diagnostic>),

    /// The source did not parse to a scenario at all (lexer/parser gave up
    /// entirely, e.g. missing `scenario` keyword).
    #[error("source did not parse to a scenario")]
    NoScenario(Vec<Diagnostic>),
}

impl SdlError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Invalid(d) | Self::NoScenario(d) => d,
        }
    }
}
