//! Identifier extraction around a cursor offset.
//!
//! The engine does not expose its tokenizer, so hover and definition
//! requests recover the identifier under the cursor by scanning raw
//! bytes outward until a delimiter. The two directions use different
//! delimiter sets: the left scan stops at `{` while the right scan
//! does not, and the right scan stops at `,` while the left does not.
//! Unifying the sets would change which text is extracted at group
//! boundaries, so the asymmetry is kept and pinned by test.

fn is_left_stop(b: u8) -> bool {
    matches!(b, b' ' | b'<' | b'>' | b'{' | b'}' | b'\n')
}

fn is_right_stop(b: u8) -> bool {
    matches!(b, b' ' | b',' | b'<' | b'>' | b'}' | b'\n')
}

/// The maximal delimiter-free substring around `offset`, or `None` when
/// the offset sits on a space or past the end of the text.
pub fn ident_at_offset(text: &str, offset: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    if offset >= bytes.len() || bytes[offset] == b' ' {
        return None;
    }

    let mut start = offset;
    while start > 0 && !is_left_stop(bytes[start - 1]) {
        start -= 1;
    }
    let mut end = offset;
    while end < bytes.len() && !is_right_stop(bytes[end]) {
        end += 1;
    }

    if start >= end {
        return None;
    }
    // Every stop byte is ASCII, so both bounds sit on char boundaries.
    text.get(start..end)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_identifier_under_cursor() {
        let text = "a = b\n\nb = tstr";
        assert_eq!(ident_at_offset(text, 4), Some("b"));
        assert_eq!(ident_at_offset(text, 11), Some("tstr"));
        assert_eq!(ident_at_offset(text, 13), Some("tstr"));
    }

    #[test]
    fn space_and_end_of_text_yield_nothing() {
        let text = "a = b";
        assert_eq!(ident_at_offset(text, 1), None);
        assert_eq!(ident_at_offset(text, 5), None);
        assert_eq!(ident_at_offset(text, 99), None);
    }

    #[test]
    fn hyphens_and_dots_stay_inside_identifiers() {
        let text = "x = mime-message";
        assert_eq!(ident_at_offset(text, 8), Some("mime-message"));
        let text = "y = bstr .size 4";
        assert_eq!(ident_at_offset(text, 11), Some(".size"));
    }

    #[test]
    fn scan_is_idempotent_inside_identifiers() {
        let text = "foo = mime-message";
        let found = ident_at_offset(text, 9).expect("identifier");
        assert_eq!(found, "mime-message");
        for offset in 6..6 + found.len() {
            assert_eq!(ident_at_offset(text, offset), Some(found));
        }
    }

    #[test]
    fn delimiter_sets_differ_by_direction() {
        // '{' stops the left scan but not the right scan.
        let text = "a{b";
        assert_eq!(ident_at_offset(text, 0), Some("a{b"));
        assert_eq!(ident_at_offset(text, 2), Some("b"));

        // ',' stops the right scan but not the left scan.
        let text = "a,b";
        assert_eq!(ident_at_offset(text, 0), Some("a"));
        assert_eq!(ident_at_offset(text, 2), Some("a,b"));
    }

    #[test]
    fn braces_bound_member_names() {
        let text = "m = {name: tstr}";
        assert_eq!(ident_at_offset(text, 5), Some("name:"));
        assert_eq!(ident_at_offset(text, 11), Some("tstr"));
    }
}
