//! Static reference tables for the standard prelude and the control
//! operators, with lookup by label.
//!
//! Prelude details quote the RFC 8610 appendix D definitions. Control
//! operator labels keep their leading dot: the completion trigger is
//! the dot itself, so the resolve step strips it from the insert text.

pub struct ReferenceEntry {
    pub label: &'static str,
    pub detail: &'static str,
    pub documentation: Option<&'static str>,
}

pub static STANDARD_PRELUDE: &[ReferenceEntry] = &[
    ReferenceEntry {
        label: "any",
        detail: "any = #",
        documentation: Some("Any single element; matches everything."),
    },
    ReferenceEntry {
        label: "uint",
        detail: "uint = #0",
        documentation: Some("An unsigned integer."),
    },
    ReferenceEntry {
        label: "nint",
        detail: "nint = #1",
        documentation: Some("A negative integer."),
    },
    ReferenceEntry {
        label: "int",
        detail: "int = uint / nint",
        documentation: Some("An unsigned or negative integer."),
    },
    ReferenceEntry {
        label: "bstr",
        detail: "bstr = #2",
        documentation: Some("A byte string."),
    },
    ReferenceEntry {
        label: "bytes",
        detail: "bytes = bstr",
        documentation: None,
    },
    ReferenceEntry {
        label: "tstr",
        detail: "tstr = #3",
        documentation: Some("A text string (UTF-8)."),
    },
    ReferenceEntry {
        label: "text",
        detail: "text = tstr",
        documentation: None,
    },
    ReferenceEntry {
        label: "tdate",
        detail: "tdate = #6.0(tstr)",
        documentation: Some("A date/time string as in RFC 3339."),
    },
    ReferenceEntry {
        label: "time",
        detail: "time = #6.1(number)",
        documentation: Some("Seconds since the POSIX epoch."),
    },
    ReferenceEntry {
        label: "number",
        detail: "number = int / float",
        documentation: None,
    },
    ReferenceEntry {
        label: "biguint",
        detail: "biguint = #6.2(bstr)",
        documentation: None,
    },
    ReferenceEntry {
        label: "bignint",
        detail: "bignint = #6.3(bstr)",
        documentation: None,
    },
    ReferenceEntry {
        label: "bigint",
        detail: "bigint = biguint / bignint",
        documentation: None,
    },
    ReferenceEntry {
        label: "integer",
        detail: "integer = int / bigint",
        documentation: None,
    },
    ReferenceEntry {
        label: "unsigned",
        detail: "unsigned = uint / biguint",
        documentation: None,
    },
    ReferenceEntry {
        label: "decfrac",
        detail: "decfrac = #6.4([e10: int, m: integer])",
        documentation: None,
    },
    ReferenceEntry {
        label: "bigfloat",
        detail: "bigfloat = #6.5([e2: int, m: integer])",
        documentation: None,
    },
    ReferenceEntry {
        label: "eb64url",
        detail: "eb64url = #6.21(any)",
        documentation: Some("Expected conversion to base64url encoding."),
    },
    ReferenceEntry {
        label: "eb64legacy",
        detail: "eb64legacy = #6.22(any)",
        documentation: Some("Expected conversion to classic base64 encoding."),
    },
    ReferenceEntry {
        label: "eb16",
        detail: "eb16 = #6.23(any)",
        documentation: Some("Expected conversion to base16 encoding."),
    },
    ReferenceEntry {
        label: "encoded-cbor",
        detail: "encoded-cbor = #6.24(bstr)",
        documentation: Some("A byte string carrying an embedded CBOR data item."),
    },
    ReferenceEntry {
        label: "uri",
        detail: "uri = #6.32(tstr)",
        documentation: Some("A URI as in RFC 3986."),
    },
    ReferenceEntry {
        label: "b64url",
        detail: "b64url = #6.33(tstr)",
        documentation: None,
    },
    ReferenceEntry {
        label: "b64legacy",
        detail: "b64legacy = #6.34(tstr)",
        documentation: None,
    },
    ReferenceEntry {
        label: "regexp",
        detail: "regexp = #6.35(tstr)",
        documentation: Some("A regular expression in PCRE or JavaScript syntax."),
    },
    ReferenceEntry {
        label: "mime-message",
        detail: "mime-message = #6.36(tstr)",
        documentation: Some("A MIME message including all headers."),
    },
    ReferenceEntry {
        label: "cbor-any",
        detail: "cbor-any = #6.55799(any)",
        documentation: Some("A self-described CBOR data item."),
    },
    ReferenceEntry {
        label: "float16",
        detail: "float16 = #7.25",
        documentation: Some("A half-precision float."),
    },
    ReferenceEntry {
        label: "float32",
        detail: "float32 = #7.26",
        documentation: Some("A single-precision float."),
    },
    ReferenceEntry {
        label: "float64",
        detail: "float64 = #7.27",
        documentation: Some("A double-precision float."),
    },
    ReferenceEntry {
        label: "float16-32",
        detail: "float16-32 = float16 / float32",
        documentation: None,
    },
    ReferenceEntry {
        label: "float32-64",
        detail: "float32-64 = float32 / float64",
        documentation: None,
    },
    ReferenceEntry {
        label: "float",
        detail: "float = float16-32 / float64",
        documentation: None,
    },
    ReferenceEntry {
        label: "false",
        detail: "false = #7.20",
        documentation: None,
    },
    ReferenceEntry {
        label: "true",
        detail: "true = #7.21",
        documentation: None,
    },
    ReferenceEntry {
        label: "bool",
        detail: "bool = false / true",
        documentation: None,
    },
    ReferenceEntry {
        label: "nil",
        detail: "nil = #7.22",
        documentation: None,
    },
    ReferenceEntry {
        label: "null",
        detail: "null = nil",
        documentation: None,
    },
    ReferenceEntry {
        label: "undefined",
        detail: "undefined = #7.23",
        documentation: None,
    },
];

pub static CONTROL_OPERATORS: &[ReferenceEntry] = &[
    ReferenceEntry {
        label: ".size",
        detail: "controls the size of the target in bytes",
        documentation: Some(
            "**.size** -- constrains the byte length of a string or the \
             value range of a uint.\n\n```cddl\nip4 = bstr .size 4\nlabel = tstr .size (1..63)\n```",
        ),
    },
    ReferenceEntry {
        label: ".bits",
        detail: "names the bits set in the target byte string",
        documentation: Some(
            "**.bits** -- only the bits named by the controller group may be \
             set in the target.\n\n```cddl\ntcpflagbytes = bstr .bits flags\n```",
        ),
    },
    ReferenceEntry {
        label: ".regexp",
        detail: "constrains the target text with a regular expression",
        documentation: Some(
            "**.regexp** -- the target text string must match the controller \
             regular expression.\n\n```cddl\nnai = tstr .regexp \"[A-Za-z0-9]+@[A-Za-z0-9]+(\\\\.[A-Za-z0-9]+)+\"\n```",
        ),
    },
    ReferenceEntry {
        label: ".cbor",
        detail: "target byte string carries CBOR matching the controller",
        documentation: Some(
            "**.cbor** -- the target byte string holds an encoded CBOR data \
             item matching the controller type.\n\n```cddl\nembedded = bytes .cbor header\n```",
        ),
    },
    ReferenceEntry {
        label: ".cborseq",
        detail: "target byte string carries a CBOR sequence matching the controller array",
        documentation: Some(
            "**.cborseq** -- the target byte string holds a CBOR sequence \
             matching the controller array.\n\n```cddl\nstream = bytes .cborseq [* event]\n```",
        ),
    },
    ReferenceEntry {
        label: ".within",
        detail: "target is a formal subset of the controller",
        documentation: Some(
            "**.within** -- asserts the target matches only values the \
             controller also matches; tools may warn when that does not hold.",
        ),
    },
    ReferenceEntry {
        label: ".and",
        detail: "data must match both target and controller",
        documentation: Some(
            "**.and** -- the value must match the target type and the \
             controller type.\n\n```cddl\npin = uint .and (0..9999)\n```",
        ),
    },
    ReferenceEntry {
        label: ".lt",
        detail: "target value is less than the controller value",
        documentation: None,
    },
    ReferenceEntry {
        label: ".le",
        detail: "target value is less than or equal to the controller value",
        documentation: None,
    },
    ReferenceEntry {
        label: ".gt",
        detail: "target value is greater than the controller value",
        documentation: None,
    },
    ReferenceEntry {
        label: ".ge",
        detail: "target value is greater than or equal to the controller value",
        documentation: None,
    },
    ReferenceEntry {
        label: ".eq",
        detail: "target value equals the controller value",
        documentation: None,
    },
    ReferenceEntry {
        label: ".ne",
        detail: "target value is not equal to the controller value",
        documentation: None,
    },
    ReferenceEntry {
        label: ".default",
        detail: "declares a default value for an optional member",
        documentation: Some(
            "**.default** -- attaches a default to an optional map member; \
             has no effect on validation of present members.\n\n```cddl\ntimer = { ? tcp: bool .default true }\n```",
        ),
    },
    ReferenceEntry {
        label: ".plus",
        detail: "target value plus the controller value (RFC 9165)",
        documentation: Some(
            "**.plus** -- matches numbers that are the sum of the target and \
             the controller.\n\n```cddl\nnext-code = base-code .plus 1\n```",
        ),
    },
    ReferenceEntry {
        label: ".cat",
        detail: "concatenation of target and controller (RFC 9165)",
        documentation: Some(
            "**.cat** -- string concatenation of the target and controller \
             literals.\n\n```cddl\nbasename = tstr .cat \".txt\"\n```",
        ),
    },
    ReferenceEntry {
        label: ".det",
        detail: "dedenting concatenation of target and controller (RFC 9165)",
        documentation: None,
    },
    ReferenceEntry {
        label: ".abnf",
        detail: "target text matches the controller ABNF grammar (RFC 9165)",
        documentation: Some(
            "**.abnf** -- the target text string must match the controller's \
             ABNF specification.\n\n```cddl\nprintable = tstr .abnf \"chars = *%x20-7E\"\n```",
        ),
    },
    ReferenceEntry {
        label: ".abnfb",
        detail: "target bytes match the controller ABNF grammar (RFC 9165)",
        documentation: None,
    },
    ReferenceEntry {
        label: ".feature",
        detail: "marks the target as a named extension point (RFC 9165)",
        documentation: Some(
            "**.feature** -- flags use of the target as a named feature so \
             generic tooling can report extension usage.",
        ),
    },
];

/// Exact-label lookup in the standard prelude table.
pub fn prelude_entry(label: &str) -> Option<&'static ReferenceEntry> {
    STANDARD_PRELUDE.iter().find(|e| e.label == label)
}

/// Exact-label lookup in the control operator table. Labels include the
/// leading dot.
pub fn control_entry(label: &str) -> Option<&'static ReferenceEntry> {
    CONTROL_OPERATORS.iter().find(|e| e.label == label)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prelude_lookup_by_label() {
        let entry = prelude_entry("tstr").expect("tstr is in the prelude");
        assert_eq!(entry.detail, "tstr = #3");
        assert!(prelude_entry("tcp").is_none());
    }

    #[test]
    fn control_lookup_keeps_leading_dot() {
        assert!(control_entry(".size").is_some());
        assert!(control_entry("size").is_none());
    }

    #[test]
    fn control_labels_all_start_with_a_dot() {
        for entry in CONTROL_OPERATORS {
            assert!(entry.label.starts_with('.'), "{}", entry.label);
        }
    }
}
