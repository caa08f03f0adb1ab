//! Structured diagnostics produced by every stage of the interpreter.

use crate::base::SourceSpan;

use super::codes::DiagnosticCode;

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
    /// Reserved; no stage currently emits `Info`-level diagnostics.
    Info,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// A single diagnostic: a stable code, severity, human message, source span,
/// and optional hint. Diagnostics are never bare strings (spec §7).
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    pub span: SourceSpan,
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, span: SourceSpan) -> Self {
        let severity = if code.is_error() {
            Severity::Error
        } else {
            Severity::Warning
        };
        Self {
            message: code.default_message().to_string(),
            code,
            severity,
            span,
            hint: None,
        }
    }

    pub fn builder(code: DiagnosticCode) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Builder for diagnostics that need a custom message or hint, mirroring the
/// accumulate-and-continue style used by every stage.
pub struct DiagnosticBuilder {
    code: DiagnosticCode,
    message: Option<String>,
    span: Option<SourceSpan>,
    severity: Option<Severity>,
    hint: Option<String>,
}

impl DiagnosticBuilder {
    pub fn new(code: DiagnosticCode) -> Self {
        Self {
            code,
            message: None,
            span: None,
            severity: None,
            hint: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        let severity = self.severity.unwrap_or(if self.code.is_error() {
            Severity::Error
        } else {
            Severity::Warning
        });
        Diagnostic {
            message: self
                .message
                .unwrap_or_else(|| self.code.default_message().to_string()),
            span: self.span.unwrap_or_else(|| {
                SourceSpan::at(crate::base::SourceLocation::start())
            }),
            code: self.code,
            severity,
            hint: self.hint,
        }
    }
}

/// True when no diagnostic in the slice has error severity.
pub fn all_valid(diagnostics: &[Diagnostic]) -> bool {
    !diagnostics.iter().any(|d| d.severity.is_error())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::SourceLocation;

    #[test]
    fn default_severity_follows_code() {
        let d = Diagnostic::new(DiagnosticCode::E004, SourceSpan::at(SourceLocation::start()));
        assert!(d.severity.is_error());
        let w = Diagnostic::new(DiagnosticCode::W001, SourceSpan::at(SourceLocation::start()));
        assert!(!w.severity.is_error());
    }

    #[test]
    fn all_valid_detects_any_error() {
        let ok = vec![Diagnostic::new(DiagnosticCode::W001, SourceSpan::at(SourceLocation::start()))];
        assert!(all_valid(&ok));
        let bad = vec![Diagnostic::new(DiagnosticCode::E004, SourceSpan::at(SourceLocation::start()))];
        assert!(!all_valid(&bad));
    }

    #[test]
    fn builder_sets_custom_message_and_hint() {
        let d = Diagnostic::builder(DiagnosticCode::E005)
            .message("undefined symbol 'x'")
            .hint("did you mean 'y'?")
            .span(SourceSpan::at(SourceLocation::start()))
            .build();
        assert_eq!(d.message, "undefined symbol 'x'");
        assert_eq!(d.hint.as_deref(), Some("did you mean 'y'?"));
    }
}
