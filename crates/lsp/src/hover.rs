//! Hover information for prelude names and control operators.

use lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position};

use crate::ident::ident_at_offset;
use crate::position::position_to_offset;
use crate::reference::{control_entry, prelude_entry};

/// Compute hover information for the word at the given position.
///
/// Prelude names show their defining line from RFC 8610 appendix D;
/// control operators show their documentation. The boundary scan keeps
/// a leading dot attached to the word, so hovering anywhere in `.size`
/// finds the control operator entry directly.
pub fn compute_hover(text: &str, position: Position) -> Option<Hover> {
    let offset = position_to_offset(text, position)?;
    let word = ident_at_offset(text, offset)?;

    if let Some(entry) = prelude_entry(word) {
        let mut markdown = format!("```cddl\n{}\n```", entry.detail);
        if let Some(doc) = entry.documentation {
            markdown.push_str("\n\n");
            markdown.push_str(doc);
        }
        return Some(make_hover(markdown));
    }

    if let Some(entry) = control_entry(word) {
        let markdown = match entry.documentation {
            Some(doc) => doc.to_string(),
            None => format!("**{}** -- {}", entry.label, entry.detail),
        };
        return Some(make_hover(markdown));
    }

    None
}

/// Create a Hover with markdown content.
fn make_hover(markdown: String) -> Hover {
    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: markdown,
        }),
        range: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hover_text(text: &str, line: u32, character: u32) -> Option<String> {
        compute_hover(text, Position::new(line, character)).map(|h| match h.contents {
            HoverContents::Markup(m) => m.value,
            other => panic!("unexpected hover contents: {:?}", other),
        })
    }

    #[test]
    fn prelude_name_shows_its_definition() {
        let got = hover_text("a = tstr", 0, 5).expect("hover");
        assert!(got.contains("tstr = #3"));
    }

    #[test]
    fn control_operator_is_found_with_its_dot() {
        let got = hover_text("ip4 = bstr .size 4", 0, 12).expect("hover");
        assert!(got.contains(".size"));
    }

    #[test]
    fn comparison_control_falls_back_to_its_detail_line() {
        let got = hover_text("small = uint .lt 10", 0, 14).expect("hover");
        assert!(got.contains("less than"));
    }

    #[test]
    fn user_defined_names_have_no_hover() {
        assert_eq!(hover_text("a = b\n\nb = tstr", 0, 4), None);
    }

    #[test]
    fn hover_in_whitespace_is_a_miss() {
        assert_eq!(hover_text("a = tstr", 0, 1), None);
    }
}
