//! Diagnostics collected while generating adapters.
//!
//! Every validation failure below the driver is recorded here instead of
//! being returned as an error, so one bad parameter only costs its method
//! and one bad method only costs itself.

use std::fmt;

use colored::Colorize;
use tracing::debug;

use crate::errors::ParameterRef;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => f.write_str("note"),
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Where a diagnostic points: contract, then optionally method and parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticContext {
    /// Qualified contract name, or a file path for scan failures.
    pub contract: String,
    pub method: Option<String>,
    pub parameter: Option<ParameterRef>,
}

impl DiagnosticContext {
    pub fn contract(contract: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            method: None,
            parameter: None,
        }
    }

    pub fn method(contract: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            method: Some(method.into()),
            parameter: None,
        }
    }

    pub fn with_parameter(mut self, parameter: Option<ParameterRef>) -> Self {
        self.parameter = parameter;
        self
    }
}

impl fmt::Display for DiagnosticContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.contract)?;
        if let Some(method) = &self.method {
            write!(f, "::{method}")?;
        }
        if let Some(parameter) = &self.parameter {
            write!(f, " parameter {parameter}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub context: DiagnosticContext,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.severity, self.message, self.context)
    }
}

/// Ordered diagnostic sink.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and mirrors it to the debug log. Callers decide
    /// how to present the collected list.
    pub fn report(&mut self, severity: Severity, message: impl Into<String>, context: DiagnosticContext) {
        let message = message.into();
        debug!(%severity, context = %context, "{message}");
        self.entries.push(Diagnostic {
            severity,
            message,
            context,
        });
    }

    pub fn error(&mut self, message: impl Into<String>, context: DiagnosticContext) {
        self.report(Severity::Error, message, context);
    }

    pub fn warning(&mut self, message: impl Into<String>, context: DiagnosticContext) {
        self.report(Severity::Warning, message, context);
    }

    pub fn note(&mut self, message: impl Into<String>, context: DiagnosticContext) {
        self.report(Severity::Note, message, context);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity == severity).count()
    }

    /// True when at least one error-severity diagnostic was reported.
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    /// Renders all diagnostics for a terminal, one per line.
    pub fn render_colored(&self) -> String {
        let mut out = String::new();
        for diagnostic in &self.entries {
            let label = match diagnostic.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
                Severity::Note => "note".cyan(),
            };
            out.push_str(&format!(
                "{label}: {}\n  {} {}\n",
                diagnostic.message,
                "-->".blue(),
                diagnostic.context
            ));
        }
        out
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
