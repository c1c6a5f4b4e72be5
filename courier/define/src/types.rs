//! Contract and method declarations.
//!
//! - [`ContractDeclaration`] - The top-level contract (one annotated trait)
//! - [`MethodDeclaration`] - Individual contract methods
//! - [`HttpVerb`] - HTTP method enumeration

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::parameter::{ParameterDeclaration, TypeRef};

/// HTTP verbs a contract method can be bound to.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use courier_define::HttpVerb;
///
/// assert_eq!(HttpVerb::from_str("DELETE").unwrap(), HttpVerb::Delete);
/// assert_eq!(HttpVerb::Patch.to_string(), "PATCH");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpVerb {
    /// The lowercase attribute name that declares this verb (`#[get(...)]`).
    pub fn attribute_name(&self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
            HttpVerb::Patch => "patch",
            HttpVerb::Delete => "delete",
            HttpVerb::Head => "head",
            HttpVerb::Options => "options",
        }
    }

    /// Resolves a method-level attribute name to a verb.
    pub fn from_attribute_name(name: &str) -> Option<Self> {
        match name {
            "get" => Some(HttpVerb::Get),
            "post" => Some(HttpVerb::Post),
            "put" => Some(HttpVerb::Put),
            "patch" => Some(HttpVerb::Patch),
            "delete" => Some(HttpVerb::Delete),
            "head" => Some(HttpVerb::Head),
            "options" => Some(HttpVerb::Options),
            _ => None,
        }
    }
}

/// How a contract method receives `self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Receiver {
    /// `&self`
    #[default]
    Ref,
    /// `&mut self`
    RefMut,
    /// `self`
    Value,
    /// No receiver (an associated function).
    None,
}

/// A contract: one trait marked with `#[http_client]`.
///
/// Declarations are produced by the collector and are treated as immutable
/// by everything downstream of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDeclaration {
    /// Full Rust path of the trait (e.g. `crate::users::UserClient`).
    pub qualified_name: String,
    /// Module path that contains the trait (e.g. `crate::users`).
    pub package_name: String,
    /// The client qualifier from `#[http_client(name = "...")]`.
    ///
    /// Either a bare service name (`user-service`, addressed as
    /// `http://user-service`) or an absolute base URL.
    pub base_name: String,
    /// Default date/time pattern for temporal parameters.
    ///
    /// Empty means "not configured".
    #[serde(default)]
    pub date_pattern: String,
    /// Methods in declaration order.
    pub methods: Vec<MethodDeclaration>,
    /// Doc comment lines attached to the trait.
    #[serde(default)]
    pub docs: Vec<String>,
}

impl ContractDeclaration {
    /// Creates a contract with no methods.
    ///
    /// The package name is everything before the last `::` of the qualified
    /// name, or `crate` when the name has no module prefix.
    pub fn new(qualified_name: impl Into<String>, base_name: impl Into<String>) -> Self {
        let qualified_name = qualified_name.into();
        let package_name = match qualified_name.rsplit_once("::") {
            Some((package, _)) => package.to_string(),
            None => "crate".to_string(),
        };
        Self {
            qualified_name,
            package_name,
            base_name: base_name.into(),
            date_pattern: String::new(),
            methods: Vec::new(),
            docs: Vec::new(),
        }
    }

    /// The trait's simple name (the last path segment).
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit("::")
            .next()
            .unwrap_or(&self.qualified_name)
    }

    /// The default date pattern, if one was configured.
    pub fn default_date_pattern(&self) -> Option<&str> {
        let pattern = self.date_pattern.trim();
        (!pattern.is_empty()).then_some(pattern)
    }

    pub fn with_date_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.date_pattern = pattern.into();
        self
    }

    pub fn with_method(mut self, method: MethodDeclaration) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_docs(mut self, docs: Vec<String>) -> Self {
        self.docs = docs;
        self
    }
}

/// A single contract method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    /// Method identifier as written (raw identifiers keep their `r#` prefix).
    pub name: String,
    /// Verb from the method attribute; `None` when the attribute is missing.
    pub verb: Option<HttpVerb>,
    /// Path template, relative to the client's base URL (e.g. `users/{id}`).
    pub path: Option<String>,
    /// Request content type hint (`consumes = "..."`).
    pub consumes: Option<String>,
    /// Response content type hint (`produces = "..."`).
    pub produces: Option<String>,
    #[serde(default)]
    pub receiver: Receiver,
    #[serde(default)]
    pub is_async: bool,
    /// Whether the trait provides a default body for this method.
    #[serde(default)]
    pub has_default_body: bool,
    /// Declared return type; `()` when the signature has none.
    pub return_type: TypeRef,
    /// Parameters in declaration order, excluding the receiver.
    pub parameters: Vec<ParameterDeclaration>,
    #[serde(default)]
    pub docs: Vec<String>,
}

impl MethodDeclaration {
    /// Creates an unbound `&self` method with no parameters.
    pub fn new(name: impl Into<String>, return_type: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            verb: None,
            path: None,
            consumes: None,
            produces: None,
            receiver: Receiver::Ref,
            is_async: false,
            has_default_body: false,
            return_type: return_type.into(),
            parameters: Vec::new(),
            docs: Vec::new(),
        }
    }

    pub fn with_verb(mut self, verb: HttpVerb, path: impl Into<String>) -> Self {
        self.verb = Some(verb);
        self.path = Some(path.into());
        self
    }

    pub fn with_consumes(mut self, content_type: impl Into<String>) -> Self {
        self.consumes = Some(content_type.into());
        self
    }

    pub fn with_produces(mut self, content_type: impl Into<String>) -> Self {
        self.produces = Some(content_type.into());
        self
    }

    pub fn with_receiver(mut self, receiver: Receiver) -> Self {
        self.receiver = receiver;
        self
    }

    pub fn with_async(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn with_default_body(mut self) -> Self {
        self.has_default_body = true;
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDeclaration) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_docs(mut self, docs: Vec<String>) -> Self {
        self.docs = docs;
        self
    }
}
