//! Hand-written scanner for the scenario description language (spec §4.1).
//!
//! Single pass over the source with one-byte lookahead in the normal path,
//! and bounded backtracking for the three context-sensitive numeric cases:
//! magnitude suffixes, currency codes, and duration units.

use crate::base::SourceSpan;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::token::{Token, TokenKind};

use super::cursor::Cursor;

const CURRENCY_CODES: &[&str] = &["EUR", "USD", "GBP", "CHF", "JPY", "CNY"];
const DURATION_UNITS: &[u8] = b"ymwds";

/// Tokenize a complete source string. Never aborts: unrecognized bytes are
/// reported as `SDL-E001` and skipped (spec §4.1 "Failure mode").
pub fn tokenize(src: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut lexer = Lexer::new(src);
    lexer.run();
    (lexer.tokens, lexer.diagnostics)
}

struct Lexer<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            cursor: Cursor::new(src),
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn run(&mut self) {
        loop {
            self.skip_trivia();
            let start_loc = self.cursor.location();
            let Some(byte) = self.cursor.peek() else {
                self.push(TokenKind::Eof, String::new(), SourceSpan::at(start_loc));
                break;
            };

            if byte.is_ascii_digit() {
                self.scan_number();
                continue;
            }
            if byte == b'"' {
                self.scan_string();
                continue;
            }
            if byte == b'_' || byte.is_ascii_alphabetic() {
                self.scan_identifier_or_keyword();
                continue;
            }
            if self.scan_operator_or_punct() {
                continue;
            }

            // Unknown byte: report and discard, keep the stream productive.
            self.cursor.bump();
            let end_loc = self.cursor.location();
            tracing::trace!(byte = ?(byte as char), line = start_loc.line, "unexpected character");
            self.diagnostics.push(
                Diagnostic::builder(DiagnosticCode::E001)
                    .message(format!("unexpected character {:?}", byte as char))
                    .span(SourceSpan::new(start_loc, end_loc))
                    .build(),
            );
        }
    }

    fn push(&mut self, kind: TokenKind, lexeme: String, span: SourceSpan) {
        self.tokens.push(Token::new(kind, lexeme, span));
    }

    fn span_from(&self, start: crate::base::SourceLocation) -> SourceSpan {
        SourceSpan::new(start, self.cursor.location())
    }

    // ------------------------------------------------------------------
    // Trivia
    // ------------------------------------------------------------------

    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                    self.cursor.bump();
                }
                Some(b'/') if self.cursor.peek_at(1) == Some(b'/') => {
                    while let Some(b) = self.cursor.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.cursor.bump();
                    }
                }
                Some(b'/') if self.cursor.peek_at(1) == Some(b'*') => {
                    self.cursor.bump();
                    self.cursor.bump();
                    loop {
                        match self.cursor.peek() {
                            None => break, // unterminated block comment: not an error
                            Some(b'*') if self.cursor.peek_at(1) == Some(b'/') => {
                                self.cursor.bump();
                                self.cursor.bump();
                                break;
                            }
                            Some(_) => {
                                self.cursor.bump();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn skip_inline_spaces(&mut self) {
        while matches!(self.cursor.peek(), Some(b' ') | Some(b'\t')) {
            self.cursor.bump();
        }
    }

    // ------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------

    fn scan_string(&mut self) {
        let start_loc = self.cursor.location();
        self.cursor.bump(); // opening quote
        let mut content = String::new();
        let mut terminated = false;
        loop {
            match self.cursor.peek() {
                None => break,
                Some(b'"') => {
                    self.cursor.bump();
                    terminated = true;
                    break;
                }
                Some(b'\\') => {
                    self.cursor.bump();
                    match self.cursor.bump() {
                        Some(b'"') => content.push('"'),
                        Some(b'\\') => content.push('\\'),
                        Some(b'n') => content.push('\n'),
                        Some(b't') => content.push('\t'),
                        Some(other) => content.push(other as char),
                        None => break,
                    }
                }
                Some(_) => {
                    if let Some(b) = self.cursor.bump() {
                        content.push(b as char);
                    }
                }
            }
        }
        let span = self.span_from(start_loc);
        if !terminated {
            self.diagnostics.push(
                Diagnostic::builder(DiagnosticCode::E001)
                    .message("unterminated string literal")
                    .span(span)
                    .build(),
            );
        }
        self.push(TokenKind::String, content, span);
    }

    // ------------------------------------------------------------------
    // Identifiers & keywords
    // ------------------------------------------------------------------

    fn scan_identifier_or_keyword(&mut self) {
        let start_loc = self.cursor.location();
        let start_off = self.cursor.offset();
        while matches!(self.cursor.peek(), Some(b) if b == b'_' || b.is_ascii_alphanumeric()) {
            self.cursor.bump();
        }
        let word = self.cursor.slice(start_off).to_string();
        let span = self.span_from(start_loc);
        let kind = match word.as_str() {
            "true" => TokenKind::TrueKw,
            "false" => TokenKind::FalseKw,
            _ => TokenKind::keyword(&word).unwrap_or(TokenKind::Identifier),
        };
        self.push(kind, word, span);
    }

    // ------------------------------------------------------------------
    // Numbers, dates, durations, currency, percentages
    // ------------------------------------------------------------------

    fn scan_number(&mut self) {
        let start_loc = self.cursor.location();
        let start_off = self.cursor.offset();

        while matches!(self.cursor.peek(), Some(b) if b.is_ascii_digit()) {
            self.cursor.bump();
        }
        let digit_run_len = self.cursor.offset() - start_off;

        // Date: exactly 4 digits followed by '-' and a digit.
        if digit_run_len == 4
            && self.cursor.peek() == Some(b'-')
            && matches!(self.cursor.peek_at(1), Some(b) if b.is_ascii_digit())
        {
            self.scan_date_tail(start_loc, start_off);
            return;
        }

        // Optional decimal part.
        if self.cursor.peek() == Some(b'.')
            && matches!(self.cursor.peek_at(1), Some(b) if b.is_ascii_digit())
        {
            self.cursor.bump(); // '.'
            while matches!(self.cursor.peek(), Some(b) if b.is_ascii_digit()) {
                self.cursor.bump();
            }
        }

        let numeric_text = self.cursor.slice(start_off).to_string();

        // 1. Percentage.
        if self.cursor.peek() == Some(b'%') {
            self.cursor.bump();
            let span = self.span_from(start_loc);
            let lexeme = format!("{numeric_text}%");
            self.push(TokenKind::Percentage, lexeme, span);
            return;
        }

        // 2. Magnitude suffix K/M/B/T.
        if let Some(mag) = self
            .cursor
            .peek()
            .filter(|b| matches!(b, b'K' | b'M' | b'B' | b'T'))
        {
            let before_suffix = self.cursor.checkpoint();
            self.cursor.bump(); // consume suffix
            let after_suffix = self.cursor.checkpoint();
            self.skip_inline_spaces();
            if let Some(code) = self.try_match_currency_code() {
                let span = self.span_from(start_loc);
                let lexeme = format!("{numeric_text}{} {code}", mag as char);
                self.push(TokenKind::Currency, lexeme, span);
                return;
            }
            // No currency code: restore past the spaces we skipped, then
            // decide between a magnified plain number and a full backtrack.
            self.cursor.restore(after_suffix);
            let next_is_alnum = matches!(self.cursor.peek(), Some(b) if b.is_ascii_alphanumeric());
            if !next_is_alnum {
                let magnitude = match mag {
                    b'K' => 3,
                    b'M' => 6,
                    b'B' => 9,
                    b'T' => 12,
                    _ => unreachable!(),
                };
                let expanded = expand_magnitude(&numeric_text, magnitude);
                let span = self.span_from(start_loc);
                self.push(TokenKind::Number, expanded, span);
                return;
            }
            self.cursor.restore(before_suffix);
        }

        // 3. Currency code (no magnitude suffix consumed, or backtracked).
        {
            let before = self.cursor.checkpoint();
            self.skip_inline_spaces();
            if let Some(code) = self.try_match_currency_code() {
                let span = self.span_from(start_loc);
                let lexeme = format!("{numeric_text} {code}");
                self.push(TokenKind::Currency, lexeme, span);
                return;
            }
            self.cursor.restore(before);
        }

        // 4. Duration unit.
        if let Some(unit) = self.cursor.peek().filter(|b| DURATION_UNITS.contains(b)) {
            let next_alpha = matches!(self.cursor.peek_at(1), Some(b) if b.is_ascii_alphabetic());
            if !next_alpha {
                self.cursor.bump();
                let span = self.span_from(start_loc);
                let lexeme = format!("{numeric_text}{}", unit as char);
                self.push(TokenKind::Duration, lexeme, span);
                return;
            }
        }

        // 5. Plain number.
        let span = self.span_from(start_loc);
        self.push(TokenKind::Number, numeric_text, span);
    }

    fn scan_date_tail(&mut self, start_loc: crate::base::SourceLocation, start_off: usize) {
        // year already consumed; consume "-DD" then optionally another "-DD"
        self.cursor.bump(); // '-'
        for _ in 0..2 {
            if matches!(self.cursor.peek(), Some(b) if b.is_ascii_digit()) {
                self.cursor.bump();
            }
        }
        if self.cursor.peek() == Some(b'-')
            && matches!(self.cursor.peek_at(1), Some(b) if b.is_ascii_digit())
        {
            self.cursor.bump();
            for _ in 0..2 {
                if matches!(self.cursor.peek(), Some(b) if b.is_ascii_digit()) {
                    self.cursor.bump();
                }
            }
        }
        let lexeme = self.cursor.slice(start_off).to_string();
        let span = self.span_from(start_loc);
        self.push(TokenKind::Date, lexeme, span);
    }

    /// Try to consume an alphabetic run at the cursor and match it against
    /// the fixed currency code table. Consumes on success, leaves the cursor
    /// untouched on failure.
    fn try_match_currency_code(&mut self) -> Option<&'static str> {
        let before = self.cursor.checkpoint();
        let start = self.cursor.offset();
        while matches!(self.cursor.peek(), Some(b) if b.is_ascii_alphabetic()) {
            self.cursor.bump();
        }
        let run = self.cursor.slice(start);
        for code in CURRENCY_CODES {
            if run == *code {
                return Some(code);
            }
        }
        self.cursor.restore(before);
        None
    }

    // ------------------------------------------------------------------
    // Operators & punctuation
    // ------------------------------------------------------------------

    fn scan_operator_or_punct(&mut self) -> bool {
        let start_loc = self.cursor.location();
        let b0 = match self.cursor.peek() {
            Some(b) => b,
            None => return false,
        };
        let b1 = self.cursor.peek_at(1);

        // ± (U+00B1, UTF-8: 0xC2 0xB1)
        if b0 == 0xC2 && b1 == Some(0xB1) {
            self.cursor.bump();
            self.cursor.bump();
            let span = self.span_from(start_loc);
            self.push(TokenKind::PlusMinus, "\u{b1}".to_string(), span);
            return true;
        }
        // +/- digraph
        if b0 == b'+' && b1 == Some(b'/') && self.cursor.peek_at(2) == Some(b'-') {
            self.cursor.bump();
            self.cursor.bump();
            self.cursor.bump();
            let span = self.span_from(start_loc);
            self.push(TokenKind::PlusMinus, "+/-".to_string(), span);
            return true;
        }

        let two_byte = b1.map(|b1| [b0, b1]);
        let two_byte_kind = two_byte.and_then(|bytes| match &bytes {
            b"->" => Some(TokenKind::Arrow),
            b">=" => Some(TokenKind::GtEq),
            b"<=" => Some(TokenKind::LtEq),
            b"==" => Some(TokenKind::EqEq),
            b"!=" => Some(TokenKind::BangEq),
            _ => None,
        });
        if let Some(kind) = two_byte_kind {
            self.cursor.bump();
            self.cursor.bump();
            let span = self.span_from(start_loc);
            self.push(kind, self.cursor.slice(start_loc.offset).to_string(), span);
            return true;
        }

        let one_byte_kind = match b0 {
            b'{' => Some(TokenKind::LeftBrace),
            b'}' => Some(TokenKind::RightBrace),
            b'[' => Some(TokenKind::LeftBracket),
            b']' => Some(TokenKind::RightBracket),
            b'(' => Some(TokenKind::LeftParen),
            b')' => Some(TokenKind::RightParen),
            b':' => Some(TokenKind::Colon),
            b',' => Some(TokenKind::Comma),
            b'.' => Some(TokenKind::Dot),
            b'=' => Some(TokenKind::Eq),
            b'>' => Some(TokenKind::Gt),
            b'<' => Some(TokenKind::Lt),
            b'+' => Some(TokenKind::Plus),
            b'-' => Some(TokenKind::Minus),
            b'*' => Some(TokenKind::Star),
            b'/' => Some(TokenKind::Slash),
            b'^' => Some(TokenKind::Caret),
            b'%' => Some(TokenKind::Percent),
            _ => None,
        };
        match one_byte_kind {
            Some(kind) => {
                self.cursor.bump();
                let span = self.span_from(start_loc);
                self.push(kind, self.cursor.slice(start_loc.offset).to_string(), span);
                true
            }
            None => false,
        }
    }
}

/// Expand `"<digits>[.<digits>]" × 10^magnitude` into its plain decimal
/// string, truncating any fractional part shorter than the shift.
fn expand_magnitude(numeric_text: &str, magnitude: u32) -> String {
    let value: f64 = numeric_text.parse().unwrap_or(0.0);
    let expanded = value * 10f64.powi(magnitude as i32);
    if expanded.fract().abs() < f64::EPSILON {
        format!("{}", expanded as i64)
    } else {
        format!("{expanded}")
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scenario_header_tokenizes_cleanly() {
        let (tokens, diags) = tokenize("scenario \"T\" { timeframe: 2025 -> 2027 }");
        assert!(diags.is_empty());
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        use TokenKind::*;
        assert_eq!(
            kinds,
            vec![
                ScenarioKw, String, LeftBrace, TimeframeKw, Colon, Number, Arrow, Number,
                RightBrace, Eof
            ]
        );
    }

    #[test]
    fn magnitude_currency_and_plain_number() {
        let (tokens, _) = tokenize("5B EUR 1.5M 65B");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        use TokenKind::*;
        assert_eq!(kinds, vec![Currency, Number, Number, Eof]);
        assert_eq!(tokens[1].lexeme, "1500000");
        assert_eq!(tokens[2].lexeme, "65000000000");
    }

    /// The context-sensitive cases: a bare digit run reads as a plain
    /// number until a magnitude suffix, currency code, or duration unit
    /// follows it, each resolved with its own bounded backtrack.
    #[rstest]
    #[case("5y", TokenKind::Duration, "5y")]
    #[case("3m", TokenKind::Duration, "3m")]
    #[case("2w", TokenKind::Duration, "2w")]
    #[case("10d", TokenKind::Duration, "10d")]
    #[case("12.5%", TokenKind::Percentage, "12.5%")]
    #[case("2025-06-15", TokenKind::Date, "2025-06-15")]
    #[case("2025-06", TokenKind::Date, "2025-06")]
    #[case("1.5M", TokenKind::Number, "1500000")]
    #[case("65B", TokenKind::Number, "65000000000")]
    #[case("5K EUR", TokenKind::Currency, "5K EUR")]
    #[case("100 USD", TokenKind::Currency, "100 USD")]
    #[case("42", TokenKind::Number, "42")]
    fn context_sensitive_numeric_suffix_cases(#[case] input: &str, #[case] expected_kind: TokenKind, #[case] expected_lexeme: &str) {
        let (tokens, diags) = tokenize(input);
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(tokens[0].kind, expected_kind);
        assert_eq!(tokens[0].lexeme, expected_lexeme);
    }

    #[test]
    fn unterminated_string_still_yields_token() {
        let (tokens, diags) = tokenize("\"abc");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, "abc");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::E001);
    }

    #[test]
    fn unknown_byte_is_reported_and_skipped() {
        let (tokens, diags) = tokenize("a # b");
        assert_eq!(diags.len(), 1);
        assert_eq!(kinds("a # b").len(), 3); // Identifier, Identifier, Eof
        let _ = tokens;
    }

    #[test]
    fn plus_minus_variants() {
        let (tokens, _) = tokenize("\u{b1}5% +/-5%");
        assert_eq!(tokens[0].kind, TokenKind::PlusMinus);
        assert_eq!(tokens[2].kind, TokenKind::PlusMinus);
    }

    #[test]
    fn keywords_are_case_sensitive() {
        let (tokens, _) = tokenize("Scenario scenario");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].kind, TokenKind::ScenarioKw);
    }

    #[test]
    fn block_comment_unterminated_consumes_to_eof() {
        let (tokens, diags) = tokenize("/* never closed");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert!(diags.is_empty());
    }
}
