//! Error types for the courier generator.
//!
//! [`GeneratorError`] is returned by the driver for failures that stop a run
//! before any contract is processed. Everything that affects a single
//! parameter, method or contract is a [`ModelError`] or [`SynthesisError`]
//! and travels as a diagnostic instead.

use std::fmt;

use thiserror::Error;

/// Errors that abort a generator run.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A configured scan root does not exist
    #[error("Scan path does not exist: {0}")]
    ScanRootNotFound(String),

    /// Generated code failed to parse as Rust
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to write an output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the configuration file
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::GeneratorConfig`]
    #[error("Invalid config file '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The requested backend is not registered
    #[error("Unknown backend '{requested}'. Available backends: {}", .available.join(", "))]
    UnknownBackend {
        requested: String,
        available: Vec<String>,
    },
}

/// Identifies a parameter in diagnostics by name and 0-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRef {
    pub name: String,
    pub index: usize,
}

impl ParameterRef {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

impl fmt::Display for ParameterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` (#{})", self.name, self.index)
    }
}

/// Invalid date/time pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatePatternError {
    #[error("date pattern is empty")]
    Empty,

    #[error("unsupported pattern letter '{letter}' (x{count}) in \"{pattern}\"")]
    UnknownLetter {
        letter: char,
        count: usize,
        pattern: String,
    },

    #[error("unterminated quoted literal in \"{pattern}\"")]
    UnterminatedQuote { pattern: String },

    #[error("\"{pattern}\" prints fields a {type_name} does not carry")]
    Incompatible {
        pattern: String,
        type_name: &'static str,
    },
}

/// A method could not be turned into a [`crate::model::MethodModel`].
///
/// Binding errors are reported per method; the method is left out of the
/// adapter and generation continues with its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("method `{method}` has no HTTP verb attribute (#[get], #[post], ...)")]
    MissingVerb { method: String },

    #[error("method `{method}` has no `self` receiver")]
    MissingReceiver { method: String },

    #[error("parameter {parameter} of `{method}` has conflicting bindings: {}", .roles.join(", "))]
    AmbiguousBinding {
        method: String,
        parameter: ParameterRef,
        roles: Vec<&'static str>,
    },

    #[error("parameter {parameter} of `{method}` is not a valid identifier")]
    InvalidParameterName {
        method: String,
        parameter: ParameterRef,
    },

    #[error("parameter {parameter} of `{method}` has an invalid date pattern: {source}")]
    InvalidDatePattern {
        method: String,
        parameter: ParameterRef,
        #[source]
        source: DatePatternError,
    },

    #[error("method `{method}` has a malformed path template \"{template}\": {reason}")]
    MalformedPathTemplate {
        method: String,
        template: String,
        reason: String,
    },

    #[error("method `{method}` declares more than one #[body] parameter: {}", .parameters.join(", "))]
    DuplicateBody {
        method: String,
        parameters: Vec<String>,
    },

    #[error("path placeholder `{{{placeholder}}}` of `{method}` has no matching #[path] parameter")]
    UnmatchedPlaceholder { method: String, placeholder: String },

    #[error(
        "path placeholder `{{{placeholder}}}` of `{method}` is bound by several parameters: {}",
        .parameters.join(", ")
    )]
    DuplicatePlaceholderBinding {
        method: String,
        placeholder: String,
        parameters: Vec<String>,
    },
}

impl ModelError {
    /// The parameter the error points at, when there is exactly one.
    pub fn parameter(&self) -> Option<&ParameterRef> {
        match self {
            ModelError::AmbiguousBinding { parameter, .. }
            | ModelError::InvalidParameterName { parameter, .. }
            | ModelError::InvalidDatePattern { parameter, .. } => Some(parameter),
            _ => None,
        }
    }
}

/// The type position a backend could not map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSlot {
    Return,
    Parameter(ParameterRef),
}

impl fmt::Display for TypeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSlot::Return => f.write_str("return type"),
            TypeSlot::Parameter(parameter) => write!(f, "parameter {parameter}"),
        }
    }
}

/// A backend could not emit a call body for a method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("unsupported {slot} `{ty}` in `{method}`: {reason}")]
    UnsupportedType {
        method: String,
        slot: TypeSlot,
        ty: String,
        reason: String,
    },

    #[error("backend `{backend}` cannot implement {} method `{method}`", asyncness(.is_async))]
    UnsupportedAsyncness {
        method: String,
        backend: &'static str,
        is_async: bool,
    },
}

fn asyncness(is_async: &bool) -> &'static str {
    if *is_async { "async" } else { "synchronous" }
}

impl SynthesisError {
    pub fn parameter(&self) -> Option<&ParameterRef> {
        match self {
            SynthesisError::UnsupportedType {
                slot: TypeSlot::Parameter(parameter),
                ..
            } => Some(parameter),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_placeholder_message_shows_braces() {
        let err = ModelError::UnmatchedPlaceholder {
            method: "get_user".to_string(),
            placeholder: "id".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "path placeholder `{id}` of `get_user` has no matching #[path] parameter"
        );
    }

    #[test]
    fn unknown_backend_lists_alternatives() {
        let err = GeneratorError::UnknownBackend {
            requested: "hyper".to_string(),
            available: vec!["reqwest-async".to_string(), "reqwest-blocking".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown backend 'hyper'. Available backends: reqwest-async, reqwest-blocking"
        );
    }

    #[test]
    fn unsupported_type_names_slot() {
        let err = SynthesisError::UnsupportedType {
            method: "upload".to_string(),
            slot: TypeSlot::Parameter(ParameterRef::new("file", 1)),
            ty: "impl Read".to_string(),
            reason: "opaque types cannot be rendered".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported parameter `file` (#1) `impl Read` in `upload`: opaque types cannot be rendered"
        );
        assert_eq!(err.parameter(), Some(&ParameterRef::new("file", 1)));
    }
}
