//! # Diagnostics
//!
//! The ordered collection every check appends to. One [`Diagnostics`] value
//! is created per linter, nested linters hand theirs back and the caller
//! folds it in with [`Diagnostics::merge`], so the final list follows
//! document traversal order.
//!
//! A finding never aborts the run. The only fatal path in the whole linter
//! (an unreadable top-level manifest) is decided by the pipeline, not here.

use std::fmt;

use serde::Serialize;

/// Classification of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A referenced file is missing or unreadable.
    Io,
    /// A referenced file exists but is not valid JSON.
    Parse,
    /// A field is present with the wrong structural kind, or is empty.
    Shape,
    /// An identifier or path does not resolve to its declared target.
    Reference,
    /// A value that must be unique was seen before.
    Uniqueness,
    /// A numeric or enumerated value lies outside its allowed domain.
    Range,
}

impl DiagnosticKind {
    /// Lowercase label used in structured output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Io => "io",
            Self::Parse => "parse",
            Self::Shape => "shape",
            Self::Reference => "reference",
            Self::Uniqueness => "uniqueness",
            Self::Range => "range",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single lint finding. Renders as its message alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered collection of lint findings. Serializes as a plain list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finding.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Append a finding built from its parts.
    pub fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.push(Diagnostic::new(kind, message));
    }

    /// Fold another collector in, preserving its order after ours.
    pub fn merge(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.items
    }

    /// Rendered messages, in order.
    pub fn messages(&self) -> Vec<String> {
        self.items.iter().map(|d| d.message.clone()).collect()
    }

    /// Number of findings of the given kind.
    pub fn count_kind(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}
