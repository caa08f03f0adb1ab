//! Lexer: byte stream → token stream with diagnostics (spec §4.1).

mod cursor;
mod scanner;

pub use scanner::tokenize;
