//! Go-to-definition over the cached rule list.

use cddl_core::{Rule, Span};
use lsp_types::{Position, Range};

use crate::ident::ident_at_offset;
use crate::position::{offset_to_position, position_to_offset};

/// Resolves the identifier under `position` to the span of the rule (or
/// generic parameter) that declares it. Rules are scanned in document
/// order; within a type rule the rule name wins over its generic
/// parameters. Returns the range of the declaring name, not the whole
/// rule body.
///
/// `rules` may have been parsed from an older revision of `text`. Spans
/// that no longer fit the current text are treated as a miss rather
/// than translated into an arbitrary location.
pub fn resolve_definition(text: &str, rules: &[Rule], position: Position) -> Option<Range> {
    let offset = position_to_offset(text, position)?;
    let word = ident_at_offset(text, offset)?;

    for rule in rules {
        match rule {
            Rule::Type(tr) => {
                if tr.name.ident == word {
                    return span_to_range(text, tr.name.span);
                }
                if let Some(params) = &tr.generic_params {
                    for param in params {
                        if param.ident == word {
                            return span_to_range(text, param.span);
                        }
                    }
                }
            }
            Rule::Group(gr) => {
                if gr.name.ident == word {
                    return span_to_range(text, gr.name.span);
                }
            }
        }
    }
    None
}

fn span_to_range(text: &str, span: Span) -> Option<Range> {
    if span.start > text.len() || span.end > text.len() {
        return None;
    }
    Some(Range {
        start: offset_to_position(text, span.start),
        end: offset_to_position(text, span.end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cddl_core::parse;

    fn range(sl: u32, sc: u32, el: u32, ec: u32) -> Range {
        Range {
            start: Position::new(sl, sc),
            end: Position::new(el, ec),
        }
    }

    #[test]
    fn reference_jumps_to_the_defining_rule_name() {
        let text = "a = b\n\nb = tstr";
        let rules = parse(text).expect("parses");
        let got = resolve_definition(text, &rules, Position::new(0, 4));
        assert_eq!(got, Some(range(2, 0, 2, 1)));
    }

    #[test]
    fn definition_of_a_rule_is_its_own_name() {
        let text = "a = b\n\nb = tstr";
        let rules = parse(text).expect("parses");
        let got = resolve_definition(text, &rules, Position::new(2, 0));
        assert_eq!(got, Some(range(2, 0, 2, 1)));
    }

    #[test]
    fn rule_name_wins_over_a_generic_parameter_of_the_same_name() {
        let text = "x<x> = int\ny = x<int>";
        let rules = parse(text).expect("parses");
        let got = resolve_definition(text, &rules, Position::new(1, 4));
        assert_eq!(got, Some(range(0, 0, 0, 1)));
    }

    #[test]
    fn generic_parameters_are_found_when_no_rule_shadows_them() {
        let text = "pair<k, v> = {a: k}";
        let rules = parse(text).expect("parses");
        let got = resolve_definition(text, &rules, Position::new(0, 17));
        assert_eq!(got, Some(range(0, 5, 0, 6)));
    }

    #[test]
    fn group_rules_are_definition_targets() {
        let text = "delivery //= (city: tstr)\nd = { delivery }";
        let rules = parse(text).expect("parses");
        let got = resolve_definition(text, &rules, Position::new(1, 7));
        assert_eq!(got, Some(range(0, 0, 0, 8)));
    }

    #[test]
    fn unknown_identifier_resolves_to_nothing() {
        let text = "a = tstr";
        let rules = parse(text).expect("parses");
        assert_eq!(resolve_definition(text, &rules, Position::new(0, 4)), None);
    }

    #[test]
    fn spans_past_the_current_text_are_a_miss() {
        let old = "bbbb = aaaa\n\naaaa = tstr";
        let rules = parse(old).expect("parses");
        let shrunk = "bbbb = aaaa";
        assert_eq!(resolve_definition(shrunk, &rules, Position::new(0, 8)), None);
    }
}
