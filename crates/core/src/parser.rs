//! Recursive-descent parser for CDDL rule lists.
//!
//! Produces the `ast` types with byte-offset spans. Errors do not abort
//! the whole parse: the parser records the error and skips to the next
//! plausible rule start, so one broken rule still yields errors for the
//! rules after it.

use crate::ast::{
    GenericParam, Group, GroupChoice, GroupEntry, GroupRule, Identifier, MemberKey, Occur,
    OperatorKind, Rule, Span, Type, Type1, Type2, TypeOperator, TypeRule,
};
use crate::error::ParseError;
use crate::lexer::{self, Spanned, Token};

/// Maximum number of errors collected before the parser gives up.
pub const DEFAULT_MAX_ERRORS: usize = 100;

/// Parse a CDDL document into its rule list.
///
/// Spans in the result (and in any errors) are byte offsets into `src`.
/// `Ok` is returned only for a completely clean parse; any error means
/// `Err` carrying every recorded error in source order.
pub fn parse(src: &str) -> Result<Vec<Rule>, Vec<ParseError>> {
    let tokens = match lexer::lex(src) {
        Ok(tokens) => tokens,
        Err(e) => return Err(vec![e]),
    };
    let mut parser = Parser::new(&tokens);
    let (rules, errors) = parser.parse_document(DEFAULT_MAX_ERRORS);
    if errors.is_empty() {
        Ok(rules)
    } else {
        Err(errors)
    }
}

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned]) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn cur(&self) -> &Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.cur().token
    }

    fn peek2(&self) -> &Token {
        let i = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[i].token
    }

    fn cur_span(&self) -> Span {
        self.cur().span
    }

    /// Span of the most recently consumed token.
    fn prev_span(&self) -> Span {
        if self.pos == 0 {
            self.cur().span
        } else {
            self.tokens[self.pos - 1].span
        }
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        ParseError::new(msg, self.cur_span())
    }

    fn take_ident(&mut self) -> Result<Identifier, ParseError> {
        if let Token::Ident(name) = self.peek().clone() {
            let span = self.cur_span();
            self.advance();
            Ok(Identifier { ident: name, span })
        } else {
            Err(self.err(format!("expected identifier, got {:?}", self.peek())))
        }
    }

    fn expect_rparen(&mut self) -> Result<(), ParseError> {
        if self.peek() == &Token::RParen {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!("expected ')', got {:?}", self.peek())))
        }
    }

    fn expect_rbrace(&mut self) -> Result<(), ParseError> {
        if self.peek() == &Token::RBrace {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!("expected '}}', got {:?}", self.peek())))
        }
    }

    fn expect_rbracket(&mut self) -> Result<(), ParseError> {
        if self.peek() == &Token::RBracket {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!("expected ']', got {:?}", self.peek())))
        }
    }

    // -- Rules --------------------------------------------------

    fn parse_document(&mut self, max_errors: usize) -> (Vec<Rule>, Vec<ParseError>) {
        let mut rules = Vec::new();
        let mut errors = Vec::new();

        if self.peek() == &Token::Eof {
            errors.push(self.err("expected at least one rule"));
            return (rules, errors);
        }

        while self.peek() != &Token::Eof {
            match self.parse_rule() {
                Ok(rule) => rules.push(rule),
                Err(e) => {
                    errors.push(e);
                    if errors.len() >= max_errors {
                        break;
                    }
                    self.recover_to_next_rule();
                }
            }
        }

        (rules, errors)
    }

    fn parse_rule(&mut self) -> Result<Rule, ParseError> {
        let name = self.take_ident()?;
        let generic_params = if self.peek() == &Token::LAngle {
            Some(self.parse_generic_params()?)
        } else {
            None
        };

        let assign = self.peek().clone();
        match assign {
            Token::Assign | Token::TypeChoiceAlt | Token::GroupChoiceAlt => self.advance(),
            _ => {
                return Err(self.err(format!(
                    "expected '=', '/=' or '//=', got {:?}",
                    self.peek()
                )))
            }
        }

        // A right-hand side that starts with '(' or an occurrence
        // indicator defines a group; so does any '//=' rule.
        if assign == Token::GroupChoiceAlt || self.starts_group_body() {
            let entry = self.parse_group_rule_body()?;
            let span = Span::new(name.span.start, self.prev_span().end);
            return Ok(Rule::Group(GroupRule { name, entry, span }));
        }

        let value = self.parse_type()?;
        let span = Span::new(name.span.start, self.prev_span().end);
        Ok(Rule::Type(TypeRule {
            name,
            generic_params,
            value,
            span,
        }))
    }

    fn starts_group_body(&self) -> bool {
        match self.peek() {
            Token::LParen | Token::Question | Token::Plus | Token::Star => true,
            // Bounded occurrences `n*m` / `n*` open a group body as well.
            Token::Int(n) => *n >= 0 && self.peek2() == &Token::Star,
            _ => false,
        }
    }

    fn parse_group_rule_body(&mut self) -> Result<Group, ParseError> {
        if self.peek() == &Token::LParen {
            self.advance();
            let group = self.parse_group()?;
            self.expect_rparen()?;
            Ok(group)
        } else {
            let entry = self.parse_group_entry()?;
            Ok(Group(vec![GroupChoice(vec![entry])]))
        }
    }

    fn parse_generic_params(&mut self) -> Result<Vec<GenericParam>, ParseError> {
        self.advance(); // '<'
        let mut params = Vec::new();
        loop {
            let id = self.take_ident()?;
            params.push(GenericParam {
                ident: id.ident,
                span: id.span,
            });
            match self.peek() {
                Token::Comma => self.advance(),
                Token::RAngle => {
                    self.advance();
                    break;
                }
                _ => return Err(self.err(format!("expected ',' or '>', got {:?}", self.peek()))),
            }
        }
        Ok(params)
    }

    fn parse_generic_args(&mut self) -> Result<Vec<Type>, ParseError> {
        self.advance(); // '<'
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type()?);
            match self.peek() {
                Token::Comma => self.advance(),
                Token::RAngle => {
                    self.advance();
                    break;
                }
                _ => return Err(self.err(format!("expected ',' or '>', got {:?}", self.peek()))),
            }
        }
        Ok(args)
    }

    // -- Types --------------------------------------------------

    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let mut choices = vec![self.parse_type1()?];
        while self.peek() == &Token::TypeChoice {
            self.advance();
            choices.push(self.parse_type1()?);
        }
        Ok(Type(choices))
    }

    fn parse_type1(&mut self) -> Result<Type1, ParseError> {
        let type2 = self.parse_type2()?;
        let operator = match self.peek().clone() {
            Token::RangeIncl => {
                self.advance();
                Some(TypeOperator {
                    kind: OperatorKind::RangeInclusive,
                    controller: self.parse_type2()?,
                })
            }
            Token::RangeExcl => {
                self.advance();
                Some(TypeOperator {
                    kind: OperatorKind::RangeExclusive,
                    controller: self.parse_type2()?,
                })
            }
            Token::ControlOp(name) => {
                self.advance();
                Some(TypeOperator {
                    kind: OperatorKind::Control(name),
                    controller: self.parse_type2()?,
                })
            }
            _ => None,
        };
        Ok(Type1 { type2, operator })
    }

    fn parse_type2(&mut self) -> Result<Type2, ParseError> {
        match self.peek().clone() {
            Token::Text(s) => {
                self.advance();
                Ok(Type2::TextValue(s))
            }
            Token::Int(n) => {
                self.advance();
                if n >= 0 {
                    Ok(Type2::UintValue(n as u64))
                } else {
                    Ok(Type2::IntValue(n))
                }
            }
            Token::Float(f) => {
                self.advance();
                Ok(Type2::FloatValue(f))
            }
            Token::Bytes(s) => {
                self.advance();
                Ok(Type2::BytesValue(s))
            }
            Token::Ident(_) => {
                let name = self.take_ident()?;
                let generic_args = if self.peek() == &Token::LAngle {
                    Some(self.parse_generic_args()?)
                } else {
                    None
                };
                Ok(Type2::Typename { name, generic_args })
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect_rparen()?;
                Ok(Type2::Parenthesized(inner))
            }
            Token::LBrace => {
                self.advance();
                let group = self.parse_group()?;
                self.expect_rbrace()?;
                Ok(Type2::Map(group))
            }
            Token::LBracket => {
                self.advance();
                let group = self.parse_group()?;
                self.expect_rbracket()?;
                Ok(Type2::Array(group))
            }
            Token::Tilde => {
                self.advance();
                let name = self.take_ident()?;
                Ok(Type2::Unwrap(name))
            }
            Token::Amp => {
                self.advance();
                if self.peek() == &Token::LParen {
                    self.advance();
                    let group = self.parse_group()?;
                    self.expect_rparen()?;
                    Ok(Type2::ChoiceFromInlineGroup(group))
                } else {
                    let name = self.take_ident()?;
                    Ok(Type2::ChoiceFromGroupname(name))
                }
            }
            Token::Tag { major, constraint } => {
                self.advance();
                match major {
                    None => Ok(Type2::Any),
                    Some(6) if self.peek() == &Token::LParen => {
                        let tag = constraint
                            .ok_or_else(|| self.err("tagged type requires a tag number"))?;
                        self.advance();
                        let value = self.parse_type()?;
                        self.expect_rparen()?;
                        Ok(Type2::Tagged {
                            tag,
                            value: Box::new(value),
                        })
                    }
                    Some(m) => Ok(Type2::MajorType {
                        major: m,
                        constraint,
                    }),
                }
            }
            other => Err(self.err(format!("expected a type, got {:?}", other))),
        }
    }

    // -- Groups -------------------------------------------------

    fn parse_group(&mut self) -> Result<Group, ParseError> {
        let mut choices = vec![self.parse_group_choice()?];
        while self.peek() == &Token::GroupChoice {
            self.advance();
            choices.push(self.parse_group_choice()?);
        }
        Ok(Group(choices))
    }

    fn parse_group_choice(&mut self) -> Result<GroupChoice, ParseError> {
        let mut entries = Vec::new();
        loop {
            match self.peek() {
                Token::RBrace
                | Token::RBracket
                | Token::RParen
                | Token::GroupChoice
                | Token::Eof => break,
                _ => {}
            }
            entries.push(self.parse_group_entry()?);
            // Separators are optional -- a newline is as good as a comma.
            if self.peek() == &Token::Comma {
                self.advance();
            }
        }
        Ok(GroupChoice(entries))
    }

    fn parse_group_entry(&mut self) -> Result<GroupEntry, ParseError> {
        let occur = self.parse_occur();

        if self.peek() == &Token::LParen {
            self.advance();
            let group = self.parse_group()?;
            self.expect_rparen()?;
            return Ok(GroupEntry::InlineGroup { occur, group });
        }

        let member_key = self.try_parse_member_key()?;
        let entry_type = self.parse_type()?;

        if member_key.is_none() {
            if let Some((name, generic_args)) = lone_typename(&entry_type) {
                return Ok(GroupEntry::TypeGroupname {
                    occur,
                    name,
                    generic_args,
                });
            }
        }

        Ok(GroupEntry::ValueMemberKey {
            occur,
            member_key,
            entry_type,
        })
    }

    fn parse_occur(&mut self) -> Option<Occur> {
        match self.peek().clone() {
            Token::Question => {
                self.advance();
                Some(Occur::Optional)
            }
            Token::Plus => {
                self.advance();
                Some(Occur::OneOrMore)
            }
            Token::Star => {
                self.advance();
                if let Token::Int(n) = *self.peek() {
                    if n >= 0 {
                        self.advance();
                        return Some(Occur::Exact {
                            lower: None,
                            upper: Some(n as u64),
                        });
                    }
                }
                Some(Occur::ZeroOrMore)
            }
            Token::Int(n) if n >= 0 && self.peek2() == &Token::Star => {
                self.advance();
                self.advance();
                let mut upper = None;
                if let Token::Int(u) = *self.peek() {
                    if u >= 0 {
                        self.advance();
                        upper = Some(u as u64);
                    }
                }
                Some(Occur::Exact {
                    lower: Some(n as u64),
                    upper,
                })
            }
            _ => None,
        }
    }

    /// Member keys come in three shapes: `word:`, `"text":`, and
    /// `type1 =>` (with an optional `^` cut). The first two need only
    /// two-token lookahead; the last takes a speculative type1 parse
    /// that is rolled back when no `=>` (or value `:`) follows.
    fn try_parse_member_key(&mut self) -> Result<Option<MemberKey>, ParseError> {
        if matches!(self.peek(), Token::Ident(_)) && self.peek2() == &Token::Colon {
            let id = self.take_ident()?;
            self.advance(); // ':'
            return Ok(Some(MemberKey::Bareword(id)));
        }
        if let Token::Text(s) = self.peek().clone() {
            if self.peek2() == &Token::Colon {
                self.advance();
                self.advance();
                return Ok(Some(MemberKey::Text(s)));
            }
        }

        let saved = self.pos;
        match self.parse_type1() {
            Ok(key) => {
                let cut = if self.peek() == &Token::Caret {
                    self.advance();
                    true
                } else {
                    false
                };
                match self.peek() {
                    Token::Arrow => {
                        self.advance();
                        Ok(Some(MemberKey::Type1 {
                            key: Box::new(key),
                            cut,
                        }))
                    }
                    // Value keys like `5: int` -- the ':' form always cuts.
                    Token::Colon if !cut => {
                        self.advance();
                        Ok(Some(MemberKey::Type1 {
                            key: Box::new(key),
                            cut: true,
                        }))
                    }
                    _ => {
                        self.pos = saved;
                        Ok(None)
                    }
                }
            }
            Err(_) => {
                self.pos = saved;
                Ok(None)
            }
        }
    }

    // -- Recovery -----------------------------------------------

    /// Skip tokens until a plausible rule start: an identifier followed
    /// by an assignment operator or a generic parameter list, outside
    /// any open bracket.
    fn recover_to_next_rule(&mut self) {
        let mut depth: i32 = 0;
        loop {
            match self.peek() {
                Token::Eof => break,
                Token::LBrace | Token::LBracket | Token::LParen => {
                    depth += 1;
                    self.advance();
                }
                Token::RBrace | Token::RBracket | Token::RParen => {
                    depth -= 1;
                    self.advance();
                }
                Token::Ident(_) if depth <= 0 => {
                    if matches!(
                        self.peek2(),
                        Token::Assign
                            | Token::TypeChoiceAlt
                            | Token::GroupChoiceAlt
                            | Token::LAngle
                    ) {
                        break;
                    }
                    self.advance();
                }
                _ => self.advance(),
            }
        }
    }
}

/// A type that is exactly one choice with no operator, naming another
/// rule. Such group entries are references, not inline member types.
fn lone_typename(t: &Type) -> Option<(Identifier, Option<Vec<Type>>)> {
    if t.0.len() != 1 {
        return None;
    }
    let t1 = &t.0[0];
    if t1.operator.is_some() {
        return None;
    }
    match &t1.type2 {
        Type2::Typename { name, generic_args } => Some((name.clone(), generic_args.clone())),
        _ => None,
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> Vec<Rule> {
        match parse(src) {
            Ok(rules) => rules,
            Err(errors) => panic!("expected clean parse, got errors: {:?}", errors),
        }
    }

    fn parse_err(src: &str) -> Vec<ParseError> {
        match parse(src) {
            Ok(rules) => panic!("expected errors, got {} rules", rules.len()),
            Err(errors) => errors,
        }
    }

    fn type_rule(rule: &Rule) -> &TypeRule {
        match rule {
            Rule::Type(tr) => tr,
            other => panic!("expected type rule, got {:?}", other),
        }
    }

    #[test]
    fn simple_type_rule() {
        let rules = parse_ok("a = tstr");
        assert_eq!(rules.len(), 1);
        let tr = type_rule(&rules[0]);
        assert_eq!(tr.name.ident, "a");
        assert_eq!(tr.name.span, Span::new(0, 1));
        assert_eq!(tr.value.0.len(), 1);
        match &tr.value.0[0].type2 {
            Type2::Typename { name, .. } => assert_eq!(name.ident, "tstr"),
            other => panic!("expected typename, got {:?}", other),
        }
    }

    #[test]
    fn two_rules_carry_their_own_name_spans() {
        let rules = parse_ok("a = b\n\nb = tstr");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].name().ident, "a");
        assert_eq!(rules[0].name().span, Span::new(0, 1));
        assert_eq!(rules[1].name().ident, "b");
        assert_eq!(rules[1].name().span, Span::new(7, 8));
    }

    #[test]
    fn trailing_assignment_reports_error_at_end_of_input() {
        let errors = parse_err("a = ");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("expected a type"));
        assert_eq!(errors[0].span, Span::new(4, 4));
    }

    #[test]
    fn empty_document_is_an_error() {
        let errors = parse_err("");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("expected at least one rule"));

        let errors = parse_err("; nothing but a comment\n");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn parenthesized_body_is_a_group_rule() {
        let rules = parse_ok("location = ( lon: float, lat: float )");
        let gr = match &rules[0] {
            Rule::Group(gr) => gr,
            other => panic!("expected group rule, got {:?}", other),
        };
        assert_eq!(gr.name.ident, "location");
        assert_eq!(gr.entry.0.len(), 1);
        assert_eq!(gr.entry.0[0].0.len(), 2);
    }

    #[test]
    fn group_choice_assignment_is_a_group_rule() {
        let rules = parse_ok("delivery //= city: tstr");
        let gr = match &rules[0] {
            Rule::Group(gr) => gr,
            other => panic!("expected group rule, got {:?}", other),
        };
        assert_eq!(gr.name.ident, "delivery");
        match &gr.entry.0[0].0[0] {
            GroupEntry::ValueMemberKey {
                member_key: Some(MemberKey::Bareword(id)),
                ..
            } => assert_eq!(id.ident, "city"),
            other => panic!("expected bareword entry, got {:?}", other),
        }
    }

    #[test]
    fn bounded_occurrence_body_is_a_group_rule() {
        let rules = parse_ok("a = 1*3 tstr\nb = 2* tstr");
        let gr = match &rules[0] {
            Rule::Group(gr) => gr,
            other => panic!("expected group rule, got {:?}", other),
        };
        match &gr.entry.0[0].0[0] {
            GroupEntry::TypeGroupname { occur, name, .. } => {
                assert_eq!(
                    occur,
                    &Some(Occur::Exact {
                        lower: Some(1),
                        upper: Some(3),
                    })
                );
                assert_eq!(name.ident, "tstr");
            }
            other => panic!("expected type reference entry, got {:?}", other),
        }

        let gr = match &rules[1] {
            Rule::Group(gr) => gr,
            other => panic!("expected group rule, got {:?}", other),
        };
        match &gr.entry.0[0].0[0] {
            GroupEntry::TypeGroupname { occur, .. } => {
                assert_eq!(
                    occur,
                    &Some(Occur::Exact {
                        lower: Some(2),
                        upper: None,
                    })
                );
            }
            other => panic!("expected type reference entry, got {:?}", other),
        }
    }

    #[test]
    fn generic_params_carry_spans() {
        let rules = parse_ok("message<t, v> = {type: t, value: v}");
        let tr = type_rule(&rules[0]);
        let params = tr.generic_params.as_ref().expect("generic params");
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].ident, "t");
        assert_eq!(params[0].span, Span::new(8, 9));
        assert_eq!(params[1].ident, "v");
        assert_eq!(params[1].span, Span::new(11, 12));
    }

    #[test]
    fn generic_arguments_on_references() {
        let rules = parse_ok("messages = message<tstr, int>");
        let tr = type_rule(&rules[0]);
        match &tr.value.0[0].type2 {
            Type2::Typename {
                name,
                generic_args: Some(args),
            } => {
                assert_eq!(name.ident, "message");
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected generic typename, got {:?}", other),
        }
    }

    #[test]
    fn recovery_reports_an_error_per_broken_rule() {
        let errors = parse_err("a = =\nb = =");
        assert_eq!(errors.len(), 2);
        assert!(errors[0].span.start < errors[1].span.start);
    }

    #[test]
    fn error_collection_stops_at_the_cap() {
        let mut src = String::new();
        for i in 0..150 {
            src.push_str(&format!("rule{} = =\n", i));
        }
        let errors = parse_err(&src);
        assert_eq!(errors.len(), DEFAULT_MAX_ERRORS);
    }

    #[test]
    fn array_entry_with_occurrence_is_a_reference() {
        let rules = parse_ok("a = [ * tstr ]");
        let tr = type_rule(&rules[0]);
        let group = match &tr.value.0[0].type2 {
            Type2::Array(g) => g,
            other => panic!("expected array, got {:?}", other),
        };
        match &group.0[0].0[0] {
            GroupEntry::TypeGroupname { occur, name, .. } => {
                assert_eq!(occur, &Some(Occur::ZeroOrMore));
                assert_eq!(name.ident, "tstr");
            }
            other => panic!("expected type reference entry, got {:?}", other),
        }
    }

    #[test]
    fn bounded_occurrence() {
        let rules = parse_ok("a = [ 1*3 int ]");
        let tr = type_rule(&rules[0]);
        let group = match &tr.value.0[0].type2 {
            Type2::Array(g) => g,
            other => panic!("expected array, got {:?}", other),
        };
        match &group.0[0].0[0] {
            GroupEntry::TypeGroupname { occur, .. } => {
                assert_eq!(
                    occur,
                    &Some(Occur::Exact {
                        lower: Some(1),
                        upper: Some(3),
                    })
                );
            }
            other => panic!("expected type reference entry, got {:?}", other),
        }
    }

    #[test]
    fn member_key_shapes() {
        let rules = parse_ok("person = { name: tstr, \"age\": uint, * tstr => any }");
        let tr = type_rule(&rules[0]);
        let entries = match &tr.value.0[0].type2 {
            Type2::Map(g) => &g.0[0].0,
            other => panic!("expected map, got {:?}", other),
        };
        assert_eq!(entries.len(), 3);
        assert!(matches!(
            &entries[0],
            GroupEntry::ValueMemberKey {
                member_key: Some(MemberKey::Bareword(_)),
                ..
            }
        ));
        assert!(matches!(
            &entries[1],
            GroupEntry::ValueMemberKey {
                member_key: Some(MemberKey::Text(_)),
                ..
            }
        ));
        match &entries[2] {
            GroupEntry::ValueMemberKey {
                occur,
                member_key: Some(MemberKey::Type1 { .. }),
                ..
            } => assert_eq!(occur, &Some(Occur::ZeroOrMore)),
            other => panic!("expected wildcard entry, got {:?}", other),
        }
    }

    #[test]
    fn type_choices() {
        let rules = parse_ok("color = \"red\" / \"green\" / \"blue\"");
        let tr = type_rule(&rules[0]);
        assert_eq!(tr.value.0.len(), 3);
    }

    #[test]
    fn range_and_control_operators() {
        let rules = parse_ok("age = 0..120\nip4 = bstr .size 4");
        let age = type_rule(&rules[0]);
        let op = age.value.0[0].operator.as_ref().expect("range operator");
        assert_eq!(op.kind, OperatorKind::RangeInclusive);
        assert_eq!(op.controller, Type2::UintValue(120));

        let ip4 = type_rule(&rules[1]);
        let op = ip4.value.0[0].operator.as_ref().expect("control operator");
        assert_eq!(op.kind, OperatorKind::Control(".size".into()));
    }

    #[test]
    fn tagged_type() {
        let rules = parse_ok("mydate = #6.0(tstr)");
        let tr = type_rule(&rules[0]);
        match &tr.value.0[0].type2 {
            Type2::Tagged { tag, .. } => assert_eq!(*tag, 0),
            other => panic!("expected tagged type, got {:?}", other),
        }
    }

    #[test]
    fn group_choices_inside_a_map() {
        let rules = parse_ok("attire = { \"bow\": bool // \"tie\": bool }");
        let tr = type_rule(&rules[0]);
        let group = match &tr.value.0[0].type2 {
            Type2::Map(g) => g,
            other => panic!("expected map, got {:?}", other),
        };
        assert_eq!(group.0.len(), 2);
        assert_eq!(group.0[0].0.len(), 1);
        assert_eq!(group.0[1].0.len(), 1);
    }

    #[test]
    fn rule_span_covers_name_through_definition() {
        let rules = parse_ok("a = tstr");
        assert_eq!(rules[0].span(), Span::new(0, 8));
    }
}
