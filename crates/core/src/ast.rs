//! Shared AST types for the CDDL front end.
//!
//! These types are produced by the parser and consumed by the JSON
//! validator and the language server. They live here so that both can
//! import them without depending on parser internals.

use std::fmt;

use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Spans and identifiers
// ──────────────────────────────────────────────

/// Half-open byte range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

/// A name together with the byte range it occupies in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub ident: String,
    pub span: Span,
}

/// Generic parameter of a type rule, e.g. `t` in `message<t> = ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericParam {
    pub ident: String,
    pub span: Span,
}

// ──────────────────────────────────────────────
// Rules
// ──────────────────────────────────────────────

/// A top-level CDDL rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// `name = type`, `name /= type`
    Type(TypeRule),
    /// `name = ( group )`, `name //= grpent`
    Group(GroupRule),
}

impl Rule {
    pub fn name(&self) -> &Identifier {
        match self {
            Rule::Type(tr) => &tr.name,
            Rule::Group(gr) => &gr.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Rule::Type(tr) => tr.span,
            Rule::Group(gr) => gr.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeRule {
    pub name: Identifier,
    pub generic_params: Option<Vec<GenericParam>>,
    pub value: Type,
    /// Covers the rule name through the last token of the definition.
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupRule {
    pub name: Identifier,
    pub entry: Group,
    pub span: Span,
}

// ──────────────────────────────────────────────
// Type expressions
// ──────────────────────────────────────────────

/// Type choices: `t1 / t2 / ...` (at least one).
#[derive(Debug, Clone, PartialEq)]
pub struct Type(pub Vec<Type1>);

/// One choice, optionally constrained by a range or control operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Type1 {
    pub type2: Type2,
    pub operator: Option<TypeOperator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeOperator {
    pub kind: OperatorKind,
    pub controller: Type2,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperatorKind {
    /// `..` -- both ends included
    RangeInclusive,
    /// `...` -- upper end excluded
    RangeExclusive,
    /// `.size`, `.regexp`, ... (name carries the leading dot)
    Control(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type2 {
    /// `"text"`
    TextValue(String),
    /// Non-negative integer literal
    UintValue(u64),
    /// Negative integer literal
    IntValue(i64),
    /// Floating-point literal
    FloatValue(f64),
    /// `h'...'` / `b64'...'` -- raw literal content, undecoded
    BytesValue(String),
    /// `name` or `name<args>`
    Typename {
        name: Identifier,
        generic_args: Option<Vec<Type>>,
    },
    /// `( type )`
    Parenthesized(Type),
    /// `{ group }`
    Map(Group),
    /// `[ group ]`
    Array(Group),
    /// `~name` -- unwrap of a named map/array rule
    Unwrap(Identifier),
    /// `&( group )` -- choice built from an inline group
    ChoiceFromInlineGroup(Group),
    /// `&name` -- choice built from a named group
    ChoiceFromGroupname(Identifier),
    /// `#6.32(type)` -- tagged data item
    Tagged { tag: u64, value: Box<Type> },
    /// `#1`, `#7.25` -- major type constraint
    MajorType { major: u8, constraint: Option<u64> },
    /// `#` -- any data item
    Any,
}

// ──────────────────────────────────────────────
// Groups
// ──────────────────────────────────────────────

/// Group choices separated by `//` (at least one).
#[derive(Debug, Clone, PartialEq)]
pub struct Group(pub Vec<GroupChoice>);

/// An ordered sequence of group entries.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupChoice(pub Vec<GroupEntry>);

#[derive(Debug, Clone, PartialEq)]
pub enum GroupEntry {
    /// `[occur] [memberkey] type`
    ValueMemberKey {
        occur: Option<Occur>,
        member_key: Option<MemberKey>,
        entry_type: Type,
    },
    /// `[occur] name` -- reference to another rule
    TypeGroupname {
        occur: Option<Occur>,
        name: Identifier,
        generic_args: Option<Vec<Type>>,
    },
    /// `[occur] ( group )`
    InlineGroup { occur: Option<Occur>, group: Group },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberKey {
    /// `word:` -- shorthand for the text key "word"
    Bareword(Identifier),
    /// `"text":`
    Text(String),
    /// `type1 =>`, optionally with a `^` cut
    Type1 { key: Box<Type1>, cut: bool },
}

/// Occurrence indicator on a group entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Occur {
    /// `?`
    Optional,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
    /// `n*m` with either bound optional
    Exact {
        lower: Option<u64>,
        upper: Option<u64>,
    },
}

// ──────────────────────────────────────────────
// Display -- CDDL surface syntax, used in error messages
// ──────────────────────────────────────────────

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ident)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, t1) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " / ")?;
            }
            write!(f, "{}", t1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Type1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type2)?;
        if let Some(op) = &self.operator {
            write!(f, " {} {}", op.kind, op.controller)?;
        }
        Ok(())
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorKind::RangeInclusive => write!(f, ".."),
            OperatorKind::RangeExclusive => write!(f, "..."),
            OperatorKind::Control(name) => write!(f, "{}", name),
        }
    }
}

impl fmt::Display for Type2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type2::TextValue(s) => write!(f, "\"{}\"", s),
            Type2::UintValue(n) => write!(f, "{}", n),
            Type2::IntValue(n) => write!(f, "{}", n),
            Type2::FloatValue(n) => write!(f, "{}", n),
            Type2::BytesValue(s) => write!(f, "h'{}'", s),
            Type2::Typename { name, generic_args } => {
                write!(f, "{}", name)?;
                if let Some(args) = generic_args {
                    write!(f, "<")?;
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", a)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            Type2::Parenthesized(t) => write!(f, "({})", t),
            Type2::Map(g) => write!(f, "{{ {} }}", g),
            Type2::Array(g) => write!(f, "[ {} ]", g),
            Type2::Unwrap(name) => write!(f, "~{}", name),
            Type2::ChoiceFromInlineGroup(g) => write!(f, "&({})", g),
            Type2::ChoiceFromGroupname(name) => write!(f, "&{}", name),
            Type2::Tagged { tag, value } => write!(f, "#6.{}({})", tag, value),
            Type2::MajorType { major, constraint } => match constraint {
                Some(c) => write!(f, "#{}.{}", major, c),
                None => write!(f, "#{}", major),
            },
            Type2::Any => write!(f, "#"),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, choice) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " // ")?;
            }
            write!(f, "{}", choice)?;
        }
        Ok(())
    }
}

impl fmt::Display for GroupChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

impl fmt::Display for GroupEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupEntry::ValueMemberKey {
                occur,
                member_key,
                entry_type,
            } => {
                if let Some(o) = occur {
                    write!(f, "{} ", o)?;
                }
                if let Some(k) = member_key {
                    write!(f, "{} ", k)?;
                }
                write!(f, "{}", entry_type)
            }
            GroupEntry::TypeGroupname {
                occur,
                name,
                generic_args,
            } => {
                if let Some(o) = occur {
                    write!(f, "{} ", o)?;
                }
                write!(f, "{}", name)?;
                if let Some(args) = generic_args {
                    write!(f, "<")?;
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", a)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            GroupEntry::InlineGroup { occur, group } => {
                if let Some(o) = occur {
                    write!(f, "{} ", o)?;
                }
                write!(f, "({})", group)
            }
        }
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKey::Bareword(id) => write!(f, "{}:", id),
            MemberKey::Text(s) => write!(f, "\"{}\":", s),
            MemberKey::Type1 { key, cut } => {
                if *cut {
                    write!(f, "{} ^ =>", key)
                } else {
                    write!(f, "{} =>", key)
                }
            }
        }
    }
}

impl fmt::Display for Occur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occur::Optional => write!(f, "?"),
            Occur::ZeroOrMore => write!(f, "*"),
            Occur::OneOrMore => write!(f, "+"),
            Occur::Exact { lower, upper } => match (lower, upper) {
                (Some(l), Some(u)) => write!(f, "{}*{}", l, u),
                (Some(l), None) => write!(f, "{}*", l),
                (None, Some(u)) => write!(f, "*{}", u),
                (None, None) => write!(f, "*"),
            },
        }
    }
}
