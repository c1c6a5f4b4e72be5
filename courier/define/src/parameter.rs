//! Parameter declarations and their binding annotations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A Rust type rendered as source text (e.g. `Option<chrono::NaiveDate>`).
///
/// The declaration view keeps types as text so it does not depend on any
/// particular parser; the generator re-parses them when it needs structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The unit type `()`.
    pub fn unit() -> Self {
        Self("()".to_string())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TypeRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A parameter-level binding marker.
///
/// The optional string overrides the wire name (placeholder, query key or
/// header name); without it the parameter name is used.
///
/// ## Examples
///
/// ```
/// use courier_define::BindingAnnotation;
///
/// let query = BindingAnnotation::Query(Some("page_size".into()));
/// assert_eq!(query.attribute_name(), "query");
/// assert_eq!(query.explicit_name(), Some("page_size"));
/// assert_eq!(BindingAnnotation::Body.explicit_name(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "name", rename_all = "snake_case")]
pub enum BindingAnnotation {
    /// `#[path]` / `#[path("name")]` - substituted into a `{placeholder}`.
    Path(Option<String>),
    /// `#[query]` / `#[query("key")]` - appended to the query string.
    Query(Option<String>),
    /// `#[header]` / `#[header("X-Name")]` - sent as a request header.
    Header(Option<String>),
    /// `#[body]` - the request payload.
    Body,
}

impl BindingAnnotation {
    /// The attribute name used to declare this binding.
    pub fn attribute_name(&self) -> &'static str {
        match self {
            BindingAnnotation::Path(_) => "path",
            BindingAnnotation::Query(_) => "query",
            BindingAnnotation::Header(_) => "header",
            BindingAnnotation::Body => "body",
        }
    }

    pub fn explicit_name(&self) -> Option<&str> {
        match self {
            BindingAnnotation::Path(name)
            | BindingAnnotation::Query(name)
            | BindingAnnotation::Header(name) => name.as_deref(),
            BindingAnnotation::Body => None,
        }
    }
}

/// One formal parameter of a contract method (the receiver excluded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    /// Identifier as written; `None` when the pattern is not a plain identifier.
    pub name: Option<String>,
    pub ty: TypeRef,
    /// Every binding marker found on the parameter, in source order.
    #[serde(default)]
    pub annotations: Vec<BindingAnnotation>,
    /// Per-parameter `#[date_format("...")]` override.
    #[serde(default)]
    pub date_format: Option<String>,
}

impl ParameterDeclaration {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: Some(name.into()),
            ty: ty.into(),
            annotations: Vec::new(),
            date_format: None,
        }
    }

    /// A parameter whose pattern does not bind a usable name (e.g. `_`).
    pub fn unnamed(ty: impl Into<TypeRef>) -> Self {
        Self {
            name: None,
            ty: ty.into(),
            annotations: Vec::new(),
            date_format: None,
        }
    }

    pub fn with_annotation(mut self, annotation: BindingAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = Some(pattern.into());
        self
    }
}
