use std::fmt;

use serde::Serialize;

use crate::span::Span;

/// A compilation failure, optionally attributed to a source location.
///
/// Every stage of the pipeline reports failures through this one type.
/// Per-declaration error recovery (when the driver re-invokes the core per
/// declaration) aggregates individual failures into the `Multiple` kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileError {
    pub kind: CompileErrorKind,
    /// Source location the failure is attributed to, when known.
    pub origin: Option<Span>,
}

/// The taxonomy of compile failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CompileErrorKind {
    /// Malformed input. Raised only by the front end; carried here so the
    /// aggregate kind can hold front-end failures alongside core ones.
    Syntax(String),
    /// Incompatible or unresolvable types, including arity mismatches.
    Type(String),
    /// Reference to an undeclared name.
    Scope(String),
    /// Unresolvable module path or missing stdlib entry.
    Import(String),
    /// Internal consistency failure (e.g. no dispatch rule matched a node).
    Internal(String),
    /// Several recoverable per-declaration failures collected together.
    Multiple(Vec<CompileError>),
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, origin: Option<Span>) -> Self {
        CompileError { kind, origin }
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(CompileErrorKind::Syntax(message.into()), None)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(CompileErrorKind::Type(message.into()), None)
    }

    pub fn scope(message: impl Into<String>) -> Self {
        Self::new(CompileErrorKind::Scope(message.into()), None)
    }

    pub fn import(message: impl Into<String>) -> Self {
        Self::new(CompileErrorKind::Import(message.into()), None)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(CompileErrorKind::Internal(message.into()), None)
    }

    /// Collect several failures into one aggregate error.
    ///
    /// A single error passes through unchanged so callers never see a
    /// one-element aggregate.
    pub fn multiple(mut errors: Vec<CompileError>) -> Self {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            Self::new(CompileErrorKind::Multiple(errors), None)
        }
    }

    /// Re-wrap a failure surfacing from a lower stage, attaching `origin`
    /// when the inner error has none. The original attribution wins.
    pub fn with_origin(mut self, origin: Span) -> Self {
        if self.origin.is_none() {
            self.origin = Some(origin);
        }
        self
    }

    /// Number of individual failures carried (1 unless `Multiple`).
    pub fn error_count(&self) -> usize {
        match &self.kind {
            CompileErrorKind::Multiple(errors) => {
                errors.iter().map(CompileError::error_count).sum()
            }
            _ => 1,
        }
    }
}

impl fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(msg) => write!(f, "syntax error: {msg}"),
            Self::Type(msg) => write!(f, "type error: {msg}"),
            Self::Scope(msg) => write!(f, "scope error: {msg}"),
            Self::Import(msg) => write!(f, "import error: {msg}"),
            Self::Internal(msg) => write!(f, "internal error: {msg}"),
            Self::Multiple(errors) => {
                write!(f, "{} error(s)", errors.len())?;
                for err in errors {
                    write!(f, "\n  {err}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            Some(span) => write!(f, "{} (at {span})", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for CompileError {}
