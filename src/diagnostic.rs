//! Advisory results.
//!
//! Some operations succeed but produce something the caller may want to
//! reject, such as a singular matrix after a form conversion. Those values
//! come back wrapped in [`Diagnosed`], and each attached [`Diagnostic`] is
//! also logged at warn level when it is raised.

use crate::error::{Error, Result};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A form conversion produced a singular matrix
    DegenerateConversion,
    /// A series connection of multiports may break the port condition
    SeriesPortCondition,
    /// An inverse transform contains impulses or their derivatives
    ImpulsiveResponse,
    /// Impulses were dropped while sampling a time response
    UnsampledImpulse,
}

impl DiagnosticKind {
    pub fn to_str(&self) -> &str {
        match self {
            DiagnosticKind::DegenerateConversion => "degenerate conversion",
            DiagnosticKind::SeriesPortCondition => "series port condition",
            DiagnosticKind::ImpulsiveResponse => "impulsive response",
            DiagnosticKind::UnsampledImpulse => "unsampled impulse",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
}

impl Diagnostic {
    /// Raise a diagnostic, logging it as a warning
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Diagnostic {
        let diag = Diagnostic {
            kind,
            message: message.into(),
        };
        log::warn!("{}", diag);
        diag
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.to_str(), self.message)
    }
}

/// A value plus the diagnostics raised while computing it
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnosed<T> {
    value: T,
    diagnostics: Vec<Diagnostic>,
}

impl<T> Diagnosed<T> {
    pub fn clean(value: T) -> Diagnosed<T> {
        Diagnosed {
            value,
            diagnostics: vec![],
        }
    }

    pub fn with(value: T, diagnostics: Vec<Diagnostic>) -> Diagnosed<T> {
        Diagnosed { value, diagnostics }
    }

    pub fn push(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }

    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }

    /// Reject the value if anything was raised
    pub fn strict(self) -> Result<T> {
        match self.diagnostics.first() {
            None => Ok(self.value),
            Some(diag) => Err(Error::DegenerateResult(diag.to_string())),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Diagnosed<U> {
        Diagnosed {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    /// Chain a fallible step, keeping the diagnostics of both
    pub fn and_then<U, F>(self, f: F) -> Result<Diagnosed<U>>
    where
        F: FnOnce(T) -> Result<Diagnosed<U>>,
    {
        let (value, mut diagnostics) = self.into_parts();
        let (next, more) = f(value)?.into_parts();
        diagnostics.extend(more);
        Ok(Diagnosed::with(next, diagnostics))
    }
}
