//! Declarative input validation.
//!
//! Each request type declares a static [`Schema`] of field rules and exposes
//! its raw field values by name; [`Validate::validate`] checks the whole
//! schema, collecting every failing field before building the typed output.

use serde_json::Value;

use crate::error::{FieldError, FieldLocation, LedgerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Field must be present.
    Present,
    /// Trimmed text must have at least this many characters.
    MinLen(usize),
    /// Text (or number rendered as text) must be all ASCII digits, at least
    /// this many of them.
    Digits { min: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub param: &'static str,
    pub rule: Rule,
    pub msg: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub location: FieldLocation,
    pub rules: &'static [FieldRule],
}

impl Schema {
    pub const fn body(rules: &'static [FieldRule]) -> Self {
        Self {
            location: FieldLocation::Body,
            rules,
        }
    }

    /// Run every rule, returning all failures at once.
    pub fn check(&self, lookup: impl Fn(&str) -> Option<Value>) -> Result<(), LedgerError> {
        let errors: Vec<FieldError> = self
            .rules
            .iter()
            .filter_map(|r| {
                let value = lookup(r.param);
                (!r.rule.accepts(value.as_ref())).then(|| FieldError {
                    value,
                    msg: r.msg.to_string(),
                    param: r.param.to_string(),
                    location: self.location,
                })
            })
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::Validation(errors))
        }
    }
}

impl Rule {
    fn accepts(&self, value: Option<&Value>) -> bool {
        let text = value.and_then(as_text);
        match self {
            Self::Present => value.is_some_and(|v| !v.is_null()),
            Self::MinLen(min) => text.is_some_and(|t| t.trim().chars().count() >= *min),
            Self::Digits { min } => text.is_some_and(|t| {
                let t = t.trim();
                t.len() >= *min && t.bytes().all(|b| b.is_ascii_digit())
            }),
        }
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A request body that validates into a typed value.
pub trait Validate: Sized {
    type Output;

    const SCHEMA: Schema;

    /// Raw value of a field, as received.
    fn field(&self, param: &str) -> Option<Value>;

    /// Build the output. Only called once the schema has passed.
    fn build(self) -> Result<Self::Output, LedgerError>;

    fn validate(self) -> Result<Self::Output, LedgerError> {
        Self::SCHEMA.check(|p| self.field(p))?;
        self.build()
    }
}
