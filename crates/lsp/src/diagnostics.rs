//! Parse-error-to-diagnostic conversion.
//!
//! Calls `cddl_core::parse()` and converts each `ParseError` into an
//! `lsp_types::Diagnostic`, translating byte spans into line/character
//! positions against the same text that was parsed.

use cddl_core::{ParseError, Rule};
use lsp_types::{Diagnostic, DiagnosticSeverity, Range};

use crate::position::offset_to_position;

/// Parse `text` and return either the rules or the diagnostics to
/// publish. At most `max_diagnostics` are converted; the rest are
/// dropped (the parser has its own, much higher, collection cap).
pub fn check_document(text: &str, max_diagnostics: usize) -> Result<Vec<Rule>, Vec<Diagnostic>> {
    match cddl_core::parse(text) {
        Ok(rules) => Ok(rules),
        Err(errors) => {
            if errors.len() > max_diagnostics {
                tracing::debug!(
                    dropped = errors.len() - max_diagnostics,
                    "diagnostic cap reached"
                );
            }
            Err(errors
                .iter()
                .take(max_diagnostics)
                .map(|e| to_diagnostic(text, e))
                .collect())
        }
    }
}

fn to_diagnostic(text: &str, error: &ParseError) -> Diagnostic {
    Diagnostic {
        range: Range {
            start: offset_to_position(text, error.span.start),
            end: offset_to_position(text, error.span.end),
        },
        severity: Some(DiagnosticSeverity::ERROR),
        source: Some("cddl".to_string()),
        message: error.message.clone(),
        ..Default::default()
    }
}
