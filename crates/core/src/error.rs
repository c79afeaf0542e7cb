use serde::{Deserialize, Serialize};

use crate::ast::Span;

/// A structured parse error: a message plus the byte range it covers.
///
/// Spans always index into the exact text that was handed to `parse`, so
/// consumers can translate them to line/column positions against that
/// same text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        ParseError {
            message: message.into(),
            span,
        }
    }

    /// Error pinned to a single byte offset, rendered as an empty range.
    pub fn at_offset(message: impl Into<String>, offset: usize) -> Self {
        ParseError::new(message, Span::new(offset, offset))
    }
}
