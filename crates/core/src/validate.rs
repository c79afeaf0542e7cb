//! JSON validation against a parsed CDDL schema.
//!
//! The root of validation is the first type rule in the document. Rules
//! sharing a name (via `/=` extensions) are tried as alternatives. CDDL
//! constructs with no JSON counterpart (byte strings, tags, most control
//! operators) report an unsupported-construct error rather than silently
//! passing.

use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::ast::{
    Group, GroupChoice, GroupEntry, MemberKey, Occur, OperatorKind, Rule, Type, Type1, Type2,
};

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("schema error: {0}")]
    Schema(String),
    #[error("document is not valid JSON: {0}")]
    Document(#[from] serde_json::Error),
    #[error("expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },
    #[error("no rule named '{0}'")]
    UnknownRule(String),
    #[error("{0}")]
    Occurrence(String),
    #[error("cannot validate JSON against {0}")]
    Unsupported(String),
    #[error("{} validation failures", .0.len())]
    Multi(Vec<ValidateError>),
}

/// Validate a JSON value against a rule list. The first type rule in
/// the list is the root.
pub fn validate_json(rules: &[Rule], value: &Value) -> Result<(), ValidateError> {
    let v = Validator { rules };
    for rule in rules {
        if let Rule::Type(tr) = rule {
            return v.validate_type(&tr.value, value);
        }
    }
    Err(ValidateError::Schema(
        "schema has no type rule to use as root".into(),
    ))
}

/// Parse both inputs and validate, wrapping schema parse failures and
/// JSON syntax errors in the validator's error type.
pub fn validate_json_str(schema: &str, json: &str) -> Result<(), ValidateError> {
    let rules = crate::parser::parse(schema).map_err(|errors| {
        ValidateError::Schema(
            errors
                .iter()
                .map(|e| e.message.clone())
                .collect::<Vec<_>>()
                .join("; "),
        )
    })?;
    let value: Value = serde_json::from_str(json)?;
    validate_json(&rules, &value)
}

// ──────────────────────────────────────────────
// Validator
// ──────────────────────────────────────────────

struct Validator<'a> {
    rules: &'a [Rule],
}

impl<'a> Validator<'a> {
    /// All rules with the given name are alternatives; `/=` and `//=`
    /// extensions parse as separate same-named rules.
    fn validate_rule_named(
        &self,
        name: &str,
        occur: Option<&Occur>,
        value: &Value,
    ) -> Result<(), ValidateError> {
        let mut errors = Vec::new();
        let mut found = false;
        for rule in self.rules {
            let result = match rule {
                Rule::Type(tr) if tr.name.ident == name => self.validate_type(&tr.value, value),
                Rule::Group(gr) if gr.name.ident == name => {
                    self.validate_group(&gr.entry, occur, value)
                }
                _ => continue,
            };
            found = true;
            match result {
                Ok(()) => return Ok(()),
                Err(e) => errors.push(e),
            }
        }
        if !found {
            return Err(ValidateError::UnknownRule(name.to_string()));
        }
        collapse(errors)
    }

    fn validate_type(&self, t: &Type, value: &Value) -> Result<(), ValidateError> {
        let mut errors = Vec::new();
        for t1 in &t.0 {
            match self.validate_type1(t1, value) {
                Ok(()) => return Ok(()),
                Err(e) => errors.push(e),
            }
        }
        collapse(errors)
    }

    fn validate_type1(&self, t1: &Type1, value: &Value) -> Result<(), ValidateError> {
        match &t1.operator {
            None => self.validate_type2(&t1.type2, value),
            Some(op) => match &op.kind {
                OperatorKind::RangeInclusive => {
                    self.validate_range(&t1.type2, &op.controller, true, value)
                }
                OperatorKind::RangeExclusive => {
                    self.validate_range(&t1.type2, &op.controller, false, value)
                }
                OperatorKind::Control(name) => {
                    self.validate_control(&t1.type2, name, &op.controller, value)
                }
            },
        }
    }

    fn validate_type2(&self, t2: &Type2, value: &Value) -> Result<(), ValidateError> {
        match t2 {
            Type2::TextValue(s) => match value {
                Value::String(actual) if actual == s => Ok(()),
                _ => Err(mismatch(t2, value)),
            },
            Type2::UintValue(n) => match value.as_u64() {
                Some(actual) if actual == *n => Ok(()),
                _ => Err(mismatch(t2, value)),
            },
            Type2::IntValue(n) => match value.as_i64() {
                Some(actual) if actual == *n => Ok(()),
                _ => Err(mismatch(t2, value)),
            },
            Type2::FloatValue(f) => match value.as_f64() {
                Some(actual) if (actual - f).abs() < f64::EPSILON => Ok(()),
                _ => Err(mismatch(t2, value)),
            },
            Type2::Typename { name, .. } => self.validate_typename(&name.ident, value),
            Type2::Parenthesized(t) => self.validate_type(t, value),
            Type2::Map(g) => match value {
                Value::Object(_) => self.validate_group(g, None, value),
                _ => Err(mismatch(t2, value)),
            },
            Type2::Array(g) => match value {
                Value::Array(_) => self.validate_group(g, None, value),
                _ => Err(mismatch(t2, value)),
            },
            Type2::Any => Ok(()),
            other => Err(ValidateError::Unsupported(other.to_string())),
        }
    }

    fn validate_typename(&self, name: &str, value: &Value) -> Result<(), ValidateError> {
        match name {
            "any" => return Ok(()),
            "tstr" | "text" => {
                return match value {
                    Value::String(_) => Ok(()),
                    _ => Err(mismatch(name, value)),
                }
            }
            "bool" => {
                return match value {
                    Value::Bool(_) => Ok(()),
                    _ => Err(mismatch(name, value)),
                }
            }
            "true" => {
                return match value {
                    Value::Bool(true) => Ok(()),
                    _ => Err(mismatch(name, value)),
                }
            }
            "false" => {
                return match value {
                    Value::Bool(false) => Ok(()),
                    _ => Err(mismatch(name, value)),
                }
            }
            "null" | "nil" => {
                return match value {
                    Value::Null => Ok(()),
                    _ => Err(mismatch(name, value)),
                }
            }
            "uint" => {
                return match value.as_u64() {
                    Some(_) => Ok(()),
                    None => Err(mismatch(name, value)),
                }
            }
            "nint" => {
                return match value.as_i64() {
                    Some(n) if n < 0 => Ok(()),
                    _ => Err(mismatch(name, value)),
                }
            }
            "int" | "integer" => {
                return match value.as_i64() {
                    Some(_) => Ok(()),
                    None => Err(mismatch(name, value)),
                }
            }
            "number" | "float" | "float16" | "float32" | "float64" | "float16-32"
            | "float32-64" => {
                return match value {
                    Value::Number(_) => Ok(()),
                    _ => Err(mismatch(name, value)),
                }
            }
            _ => {}
        }
        if is_prelude_name(name) {
            // bstr, time, uri and friends have no JSON representation.
            return Err(ValidateError::Unsupported(name.to_string()));
        }
        self.validate_rule_named(name, None, value)
    }

    // -- Operators ----------------------------------------------

    fn validate_range(
        &self,
        lower: &Type2,
        upper: &Type2,
        inclusive: bool,
        value: &Value,
    ) -> Result<(), ValidateError> {
        let expected = format!("{}{}{}", lower, if inclusive { ".." } else { "..." }, upper);
        let (lo, hi) = match (numeric_bound(lower), numeric_bound(upper)) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => return Err(ValidateError::Unsupported(format!("range {}", expected))),
        };
        let n = match value {
            Value::Number(n) => n,
            _ => return Err(mismatch(&expected, value)),
        };
        // An integer range only admits integers.
        let integer_bounds = matches!(lower, Type2::UintValue(_) | Type2::IntValue(_))
            && matches!(upper, Type2::UintValue(_) | Type2::IntValue(_));
        if integer_bounds && n.as_i64().is_none() && n.as_u64().is_none() {
            return Err(mismatch(&expected, value));
        }
        let x = n.as_f64().unwrap_or(f64::NAN);
        let ok = if inclusive {
            x >= lo && x <= hi
        } else {
            x >= lo && x < hi
        };
        if ok {
            Ok(())
        } else {
            Err(mismatch(&expected, value))
        }
    }

    fn validate_control(
        &self,
        target: &Type2,
        name: &str,
        controller: &Type2,
        value: &Value,
    ) -> Result<(), ValidateError> {
        match name {
            ".size" => {
                self.validate_type2(target, value)?;
                let len = match value {
                    Value::String(s) => s.len(),
                    _ => {
                        return Err(ValidateError::Unsupported(format!(
                            "control {} on non-string value",
                            name
                        )))
                    }
                };
                let (lo, hi) = match size_bounds(controller) {
                    Some(bounds) => bounds,
                    None => {
                        return Err(ValidateError::Unsupported(format!(
                            "control {} with controller {}",
                            name, controller
                        )))
                    }
                };
                if len >= lo && len <= hi {
                    Ok(())
                } else {
                    Err(mismatch(format!("{} .size {}", target, controller), value))
                }
            }
            // A default value constrains nothing once the member is present.
            ".default" => self.validate_type2(target, value),
            ".and" | ".within" => {
                self.validate_type2(target, value)?;
                self.validate_type2(controller, value)
            }
            ".eq" | ".ne" | ".lt" | ".le" | ".gt" | ".ge" => {
                self.validate_type2(target, value)?;
                let bound = match numeric_bound(controller) {
                    Some(b) => b,
                    None => {
                        return Err(ValidateError::Unsupported(format!(
                            "control {} with controller {}",
                            name, controller
                        )))
                    }
                };
                let x = match value.as_f64() {
                    Some(x) => x,
                    None => return Err(mismatch(format!("{} {} {}", target, name, controller), value)),
                };
                let ok = match name {
                    ".eq" => (x - bound).abs() < f64::EPSILON,
                    ".ne" => (x - bound).abs() >= f64::EPSILON,
                    ".lt" => x < bound,
                    ".le" => x <= bound,
                    ".gt" => x > bound,
                    _ => x >= bound,
                };
                if ok {
                    Ok(())
                } else {
                    Err(mismatch(format!("{} {} {}", target, name, controller), value))
                }
            }
            _ => Err(ValidateError::Unsupported(format!(
                "control operator {}",
                name
            ))),
        }
    }

    // -- Groups -------------------------------------------------

    fn validate_group(
        &self,
        g: &Group,
        occur: Option<&Occur>,
        value: &Value,
    ) -> Result<(), ValidateError> {
        let mut errors = Vec::new();
        for gc in &g.0 {
            match self.validate_group_choice(gc, occur, value) {
                Ok(()) => return Ok(()),
                Err(e) => errors.push(e),
            }
        }
        collapse(errors)
    }

    fn validate_group_choice(
        &self,
        gc: &GroupChoice,
        outer: Option<&Occur>,
        value: &Value,
    ) -> Result<(), ValidateError> {
        match value {
            Value::Array(values) => self.validate_array_choice(gc, values),
            Value::Object(_) => self.validate_object_choice(gc, outer, value),
            // Group rules used in type position wrap a single entry.
            _ => {
                if gc.0.len() == 1 {
                    self.validate_entry_value(&gc.0[0], value)
                } else {
                    Err(mismatch(gc, value))
                }
            }
        }
    }

    /// Arrays come in two shapes: a single entry with an occurrence
    /// describing every element, or a positional list of entries where
    /// occurrences consume a bounded run of elements.
    fn validate_array_choice(
        &self,
        gc: &GroupChoice,
        values: &[Value],
    ) -> Result<(), ValidateError> {
        if gc.0.len() == 1 {
            let entry = &gc.0[0];
            if let Some(occur) = entry_occur(entry) {
                self.check_count(occur, &entry.to_string(), values.len())?;
                let mut errors = Vec::new();
                for v in values {
                    if let Err(e) = self.validate_entry_value(entry, v) {
                        errors.push(e);
                    }
                }
                return collapse(errors);
            }
        }

        let mut idx = 0;
        for entry in &gc.0 {
            match entry_occur(entry) {
                None => match values.get(idx) {
                    Some(v) => {
                        self.validate_entry_value(entry, v)?;
                        idx += 1;
                    }
                    None => {
                        return Err(ValidateError::Occurrence(format!(
                            "array is missing an element for {}",
                            entry
                        )))
                    }
                },
                Some(occur) => {
                    let (min, max) = occur_bounds(occur);
                    let mut taken = 0;
                    while taken < max && idx < values.len() {
                        if self.validate_entry_value(entry, &values[idx]).is_err() {
                            break;
                        }
                        idx += 1;
                        taken += 1;
                    }
                    if taken < min {
                        return Err(ValidateError::Occurrence(format!(
                            "expected at least {} values of {}, got {}",
                            min, entry, taken
                        )));
                    }
                }
            }
        }
        if idx != values.len() {
            return Err(ValidateError::Occurrence(format!(
                "array has {} elements, {} of them unmatched",
                values.len(),
                values.len() - idx
            )));
        }
        Ok(())
    }

    fn validate_object_choice(
        &self,
        gc: &GroupChoice,
        outer: Option<&Occur>,
        value: &Value,
    ) -> Result<(), ValidateError> {
        let map = match value {
            Value::Object(map) => map,
            _ => return Err(mismatch(gc, value)),
        };

        // Keys claimed by named entries; wildcard entries skip these.
        let mut named: HashSet<&str> = HashSet::new();
        for entry in &gc.0 {
            if let GroupEntry::ValueMemberKey {
                member_key: Some(mk),
                ..
            } = entry
            {
                match mk {
                    MemberKey::Bareword(id) => {
                        named.insert(id.ident.as_str());
                    }
                    MemberKey::Text(s) => {
                        named.insert(s.as_str());
                    }
                    MemberKey::Type1 { key, .. } => {
                        if let Type2::TextValue(s) = &key.type2 {
                            named.insert(s.as_str());
                        }
                    }
                }
            }
        }

        let mut errors = Vec::new();
        for entry in &gc.0 {
            if let Err(e) = self.validate_object_entry(entry, outer, &named, map, value) {
                errors.push(e);
            }
        }
        collapse(errors)
    }

    fn validate_object_entry(
        &self,
        entry: &GroupEntry,
        outer: Option<&Occur>,
        named: &HashSet<&str>,
        map: &Map<String, Value>,
        value: &Value,
    ) -> Result<(), ValidateError> {
        match entry {
            GroupEntry::ValueMemberKey {
                occur,
                member_key: Some(mk),
                entry_type,
            } => {
                let eff = occur.as_ref().or(outer);
                match mk {
                    MemberKey::Bareword(id) => self.validate_member(&id.ident, entry_type, eff, map),
                    MemberKey::Text(key) => self.validate_member(key, entry_type, eff, map),
                    MemberKey::Type1 { key, .. } => match &key.type2 {
                        Type2::TextValue(k) => self.validate_member(k, entry_type, eff, map),
                        Type2::Typename { name, .. }
                            if name.ident == "tstr" || name.ident == "text" =>
                        {
                            let mut matched = 0;
                            let mut errors = Vec::new();
                            for (k, v) in map {
                                if named.contains(k.as_str()) {
                                    continue;
                                }
                                matched += 1;
                                if let Err(e) = self.validate_type(entry_type, v) {
                                    errors.push(e);
                                }
                            }
                            if let Some(o) = eff {
                                let (min, _) = occur_bounds(o);
                                if matched < min {
                                    return Err(ValidateError::Occurrence(format!(
                                        "expected at least {} members matching {}, got {}",
                                        min, mk, matched
                                    )));
                                }
                            }
                            collapse(errors)
                        }
                        _ => Err(ValidateError::Unsupported(format!("member key {}", mk))),
                    },
                }
            }
            GroupEntry::ValueMemberKey {
                member_key: None,
                entry_type,
                ..
            } => self.validate_type(entry_type, value),
            GroupEntry::TypeGroupname { occur, name, .. } => {
                let eff = occur.as_ref().or(outer);
                if is_prelude_name(&name.ident) {
                    self.validate_typename(&name.ident, value)
                } else {
                    self.validate_rule_named(&name.ident, eff, value)
                }
            }
            GroupEntry::InlineGroup { occur, group } => {
                let eff = occur.as_ref().or(outer);
                self.validate_group(group, eff, value)
            }
        }
    }

    fn validate_member(
        &self,
        key: &str,
        entry_type: &Type,
        occur: Option<&Occur>,
        map: &Map<String, Value>,
    ) -> Result<(), ValidateError> {
        match map.get(key) {
            Some(v) => self.validate_type(entry_type, v),
            None => {
                if occur.map_or(false, |o| occur_bounds(o).0 == 0) {
                    Ok(())
                } else {
                    Err(ValidateError::Occurrence(format!(
                        "missing required member '{}'",
                        key
                    )))
                }
            }
        }
    }

    fn validate_entry_value(
        &self,
        entry: &GroupEntry,
        value: &Value,
    ) -> Result<(), ValidateError> {
        match entry {
            GroupEntry::ValueMemberKey { entry_type, .. } => self.validate_type(entry_type, value),
            GroupEntry::TypeGroupname { name, .. } => self.validate_typename(&name.ident, value),
            GroupEntry::InlineGroup { group, .. } => self.validate_group(group, None, value),
        }
    }

    fn check_count(&self, occur: &Occur, label: &str, count: usize) -> Result<(), ValidateError> {
        let (min, max) = occur_bounds(occur);
        if count < min {
            return Err(ValidateError::Occurrence(format!(
                "expected at least {} values of {}, got {}",
                min, label, count
            )));
        }
        if count > max {
            return Err(ValidateError::Occurrence(format!(
                "expected at most {} values of {}, got {}",
                max, label, count
            )));
        }
        Ok(())
    }
}

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn collapse(mut errors: Vec<ValidateError>) -> Result<(), ValidateError> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidateError::Multi(errors)),
    }
}

fn mismatch(expected: impl ToString, value: &Value) -> ValidateError {
    ValidateError::Mismatch {
        expected: expected.to_string(),
        actual: render_value(value),
    }
}

fn render_value(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<unprintable>".into())
}

fn entry_occur(entry: &GroupEntry) -> Option<&Occur> {
    match entry {
        GroupEntry::ValueMemberKey { occur, .. } => occur.as_ref(),
        GroupEntry::TypeGroupname { occur, .. } => occur.as_ref(),
        GroupEntry::InlineGroup { occur, .. } => occur.as_ref(),
    }
}

fn occur_bounds(occur: &Occur) -> (usize, usize) {
    match occur {
        Occur::Optional => (0, 1),
        Occur::ZeroOrMore => (0, usize::MAX),
        Occur::OneOrMore => (1, usize::MAX),
        Occur::Exact { lower, upper } => (
            lower.map_or(0, |n| n as usize),
            upper.map_or(usize::MAX, |n| n as usize),
        ),
    }
}

fn numeric_bound(t2: &Type2) -> Option<f64> {
    match t2 {
        Type2::UintValue(n) => Some(*n as f64),
        Type2::IntValue(n) => Some(*n as f64),
        Type2::FloatValue(f) => Some(*f),
        _ => None,
    }
}

fn size_bounds(controller: &Type2) -> Option<(usize, usize)> {
    match controller {
        Type2::UintValue(n) => Some((*n as usize, *n as usize)),
        Type2::Parenthesized(t) if t.0.len() == 1 => {
            let t1 = &t.0[0];
            let op = t1.operator.as_ref()?;
            let lo = numeric_bound(&t1.type2)? as usize;
            let hi = numeric_bound(&op.controller)? as usize;
            match op.kind {
                OperatorKind::RangeInclusive => Some((lo, hi)),
                OperatorKind::RangeExclusive => Some((lo, hi.saturating_sub(1))),
                OperatorKind::Control(_) => None,
            }
        }
        _ => None,
    }
}

fn is_prelude_name(name: &str) -> bool {
    matches!(
        name,
        "any"
            | "uint"
            | "nint"
            | "int"
            | "bstr"
            | "bytes"
            | "tstr"
            | "text"
            | "tdate"
            | "time"
            | "number"
            | "biguint"
            | "bignint"
            | "bigint"
            | "integer"
            | "unsigned"
            | "decfrac"
            | "bigfloat"
            | "eb64url"
            | "eb64legacy"
            | "eb16"
            | "encoded-cbor"
            | "uri"
            | "b64url"
            | "b64legacy"
            | "regexp"
            | "mime-message"
            | "cbor-any"
            | "float16"
            | "float32"
            | "float64"
            | "float16-32"
            | "float32-64"
            | "float"
            | "false"
            | "true"
            | "bool"
            | "nil"
            | "null"
            | "undefined"
    )
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
