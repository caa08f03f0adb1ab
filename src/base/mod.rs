//! Foundation types shared by every stage of the interpreter.
//!
//! - [`SourceLocation`], [`SourceSpan`] — byte/line/column positions
//!
//! This module has no dependencies on any other crate module.

mod position;

pub use position::{SourceLocation, SourceSpan};
