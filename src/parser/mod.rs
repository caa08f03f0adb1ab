//! Parser: token stream → typed AST with diagnostics (spec §4.2).
//!
//! Recursive-descent with Pratt-style precedence climbing for expressions.
//! Parsing never aborts the whole source on a malformed declaration; a
//! single unrecoverable expression failure drops only the declaration it
//! occurred in, and the surrounding loop keeps dispatching on the next
//! token so later declarations still get a chance to parse cleanly.

mod decl;
mod expr;
mod scenario;

use crate::ast::Scenario;
use crate::base::SourceSpan;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};

/// Lex and parse a complete source string. Diagnostics from both stages are
/// concatenated, lexer first (spec §6.1).
pub fn parse(source: &str) -> (Option<Scenario>, Vec<Diagnostic>) {
    let (tokens, mut diagnostics) = tokenize(source);
    let mut parser = Parser::new(tokens);
    let scenario = parser.parse_scenario();
    diagnostics.extend(parser.diagnostics);
    (scenario, diagnostics)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().expect("token stream always has EOF"))
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn peek_at(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn is_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    /// Consume the current token if it matches `kind`; otherwise report a
    /// diagnostic and leave the cursor where it is, so the caller's own
    /// recovery loop gets a chance to make progress.
    fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) {
            Some(self.advance())
        } else {
            let tok = self.peek().clone();
            self.error_at(tok.span, format!("expected {kind:?}, found {:?}", tok.kind));
            None
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        let span = self.peek().span;
        self.error_at(span, message);
    }

    fn error_at(&mut self, span: SourceSpan, message: impl Into<String>) {
        self.diagnostics.push(
            Diagnostic::builder(DiagnosticCode::E001)
                .message(message)
                .span(span)
                .build(),
        );
    }

    /// Accept the current token as a free-standing identifier: a plain
    /// `Identifier`, or one of the soft keywords that double as field names
    /// and identifiers (spec §4.2 "Identifier flexibility").
    fn expect_ident_like(&mut self) -> Option<Token> {
        if self.at(TokenKind::Identifier) || self.peek_kind().is_soft_keyword() {
            Some(self.advance())
        } else {
            let tok = self.peek().clone();
            self.error_at(tok.span, format!("expected an identifier, found {:?}", tok.kind));
            None
        }
    }
}
