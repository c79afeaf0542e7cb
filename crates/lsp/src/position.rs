//! Byte-offset to line/column translation for a document snapshot.
//!
//! The engine reports spans as byte offsets into the exact text it was
//! given; the editor protocol speaks in zero-based line numbers and
//! UTF-16 code-unit columns. Both directions live here so every handler
//! translates the same way.

use lsp_types::Position;

/// Translate a byte offset into a protocol position. Offsets past the
/// end of the text clamp to the final position.
pub fn offset_to_position(text: &str, offset: usize) -> Position {
    let offset = offset.min(text.len());
    let mut line = 0u32;
    let mut character = 0u32;
    for (i, ch) in text.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            character = 0;
        } else {
            character += ch.len_utf16() as u32;
        }
    }
    Position::new(line, character)
}

/// Translate a protocol position into a byte offset.
///
/// A line number past the end of the document yields `None`; a column
/// past the end of its line clamps to the line end, since editors
/// routinely report the position just after the last character.
pub fn position_to_offset(text: &str, position: Position) -> Option<usize> {
    let mut line_start = 0usize;
    for _ in 0..position.line {
        let rest = &text[line_start..];
        match rest.find('\n') {
            Some(nl) => line_start += nl + 1,
            None => return None,
        }
    }

    let line_text = match text[line_start..].find('\n') {
        Some(nl) => &text[line_start..line_start + nl],
        None => &text[line_start..],
    };

    let mut units = 0u32;
    for (i, ch) in line_text.char_indices() {
        if units >= position.character {
            return Some(line_start + i);
        }
        units += ch.len_utf16() as u32;
    }
    Some(line_start + line_text.len())
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_within_a_line() {
        let text = "a = b\n\nb = tstr";
        assert_eq!(offset_to_position(text, 0), Position::new(0, 0));
        assert_eq!(offset_to_position(text, 4), Position::new(0, 4));
        assert_eq!(offset_to_position(text, 7), Position::new(2, 0));
        assert_eq!(offset_to_position(text, 11), Position::new(2, 4));

        assert_eq!(position_to_offset(text, Position::new(0, 4)), Some(4));
        assert_eq!(position_to_offset(text, Position::new(2, 0)), Some(7));
        assert_eq!(position_to_offset(text, Position::new(2, 4)), Some(11));
    }

    #[test]
    fn offset_past_end_clamps() {
        let text = "a = b";
        assert_eq!(offset_to_position(text, 99), Position::new(0, 5));
    }

    #[test]
    fn line_past_end_is_none() {
        let text = "a = b\n";
        assert_eq!(position_to_offset(text, Position::new(5, 0)), None);
    }

    #[test]
    fn column_past_line_end_clamps() {
        let text = "a = b\nc = d";
        assert_eq!(position_to_offset(text, Position::new(0, 99)), Some(5));
    }

    #[test]
    fn multibyte_characters_count_utf16_units() {
        // 'é' is two bytes in UTF-8 but one UTF-16 unit.
        let text = "é = x";
        assert_eq!(position_to_offset(text, Position::new(0, 2)), Some(3));
        assert_eq!(offset_to_position(text, 3), Position::new(0, 2));

        // Outside the BMP: four UTF-8 bytes, two UTF-16 units.
        let text = "\u{1F389} x";
        assert_eq!(position_to_offset(text, Position::new(0, 2)), Some(4));
        assert_eq!(offset_to_position(text, 4), Position::new(0, 2));
    }

    #[test]
    fn end_of_document_position() {
        let text = "a = b";
        assert_eq!(position_to_offset(text, Position::new(0, 5)), Some(5));
    }
}
