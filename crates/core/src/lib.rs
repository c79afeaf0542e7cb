//! cddl-core: CDDL parsing and validation core library.
//!
//! Parses CDDL (RFC 8610) schema text into an AST with byte-offset
//! spans, and validates JSON documents against parsed schemas.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`parse()`] -- lex and parse a CDDL document into its rule list
//! - [`validate_json()`] / [`validate_json_str()`] -- check a JSON
//!   document against a schema
//! - [`ParseError`] -- parse error with source span
//! - AST types: [`Rule`], [`Type`], [`Group`], [`Identifier`], [`Span`]

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod validate;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{
    GenericParam, Group, GroupChoice, GroupEntry, GroupRule, Identifier, MemberKey, Occur,
    OperatorKind, Rule, Span, Type, Type1, Type2, TypeOperator, TypeRule,
};
pub use error::ParseError;
pub use validate::ValidateError;

// ── Convenience re-exports: entry points ─────────────────────────────

pub use parser::parse;
pub use validate::{validate_json, validate_json_str};
