//! # Shape-Checked Field Access
//!
//! Every structural assertion in the linters goes through here. [`expect`]
//! is the pure form: it returns the typed view ([`Shaped`]) or a
//! [`ShapeMismatch`]. The `expect_*` methods on [`Diagnostics`] are what the
//! linters call: they record the mismatch as a `Shape` diagnostic and return
//! `None`, and the caller skips whatever depended on that field.
//!
//! Kind names follow JSON vocabulary. An absent key reports as `missing`.
//! Booleans are never integers, and a number with a fractional part (or
//! outside the `i64` range) reports as `number`.

use std::fmt;

use serde_json::{Map, Value};

use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// The structural kinds a field can be required to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Object,
    List,
    String,
    Integer,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::List => "list",
            Self::String => "string",
            Self::Integer => "integer",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that passed its kind check, borrowed from the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shaped<'a> {
    Object(&'a Map<String, Value>),
    List(&'a [Value]),
    String(&'a str),
    Integer(i64),
}

/// A value did not have the kind its context requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatch {
    /// Dotted field path the value was read from.
    pub context: String,
    pub expected: Kind,
    /// Kind name of what was actually found.
    pub actual: &'static str,
}

impl fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.context, self.expected, self.actual
        )
    }
}

impl std::error::Error for ShapeMismatch {}

/// Kind name of an optional value, as used in shape messages.
pub fn kind_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "missing",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(n)) if n.as_i64().is_some() => "integer",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "list",
        Some(Value::Object(_)) => "object",
    }
}

/// Check `value` against `kind`.
pub fn expect<'a>(
    value: Option<&'a Value>,
    kind: Kind,
    context: &str,
) -> Result<Shaped<'a>, ShapeMismatch> {
    let shaped = match (kind, value) {
        (Kind::Object, Some(Value::Object(map))) => Some(Shaped::Object(map)),
        (Kind::List, Some(Value::Array(items))) => Some(Shaped::List(items.as_slice())),
        (Kind::String, Some(Value::String(s))) => Some(Shaped::String(s.as_str())),
        (Kind::Integer, Some(Value::Number(n))) => n.as_i64().map(Shaped::Integer),
        _ => None,
    };
    shaped.ok_or_else(|| ShapeMismatch {
        context: context.to_string(),
        expected: kind,
        actual: kind_name(value),
    })
}

impl Diagnostics {
    fn expect_kind<'a>(
        &mut self,
        value: Option<&'a Value>,
        kind: Kind,
        context: &str,
    ) -> Option<Shaped<'a>> {
        match expect(value, kind, context) {
            Ok(shaped) => Some(shaped),
            Err(mismatch) => {
                self.report(DiagnosticKind::Shape, mismatch.to_string());
                None
            }
        }
    }

    /// Require an object; record a shape diagnostic otherwise.
    pub fn expect_object<'a>(
        &mut self,
        value: Option<&'a Value>,
        context: &str,
    ) -> Option<&'a Map<String, Value>> {
        match self.expect_kind(value, Kind::Object, context)? {
            Shaped::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Require a list; record a shape diagnostic otherwise.
    pub fn expect_list<'a>(&mut self, value: Option<&'a Value>, context: &str) -> Option<&'a [Value]> {
        match self.expect_kind(value, Kind::List, context)? {
            Shaped::List(items) => Some(items),
            _ => None,
        }
    }

    /// Require a string (possibly empty); record a shape diagnostic otherwise.
    pub fn expect_str<'a>(&mut self, value: Option<&'a Value>, context: &str) -> Option<&'a str> {
        match self.expect_kind(value, Kind::String, context)? {
            Shaped::String(s) => Some(s),
            _ => None,
        }
    }

    /// Require an integer; record a shape diagnostic otherwise.
    pub fn expect_integer(&mut self, value: Option<&Value>, context: &str) -> Option<i64> {
        match self.expect_kind(value, Kind::Integer, context)? {
            Shaped::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// Require a non-empty string. A wrong kind records the shape
    /// diagnostic; an empty string records `<context>: missing or empty string`.
    pub fn expect_non_empty_str<'a>(
        &mut self,
        value: Option<&'a Value>,
        context: &str,
    ) -> Option<&'a str> {
        let s = self.expect_str(value, context)?;
        if s.is_empty() {
            self.report(
                DiagnosticKind::Shape,
                format!("{context}: missing or empty string"),
            );
            return None;
        }
        Some(s)
    }
}

/// A non-empty string at `value`, without recording anything.
pub fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
