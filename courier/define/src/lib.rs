//! Courier Declaration Library
//!
//! This crate provides the read-only declaration view that the courier
//! generator consumes. A declaration describes an HTTP contract (a trait
//! annotated with `#[http_client]`) without tying the generator to any
//! particular source-parsing API.
//!
//! ## Core Types
//!
//! - [`ContractDeclaration`] - A contract: its Rust path, client name, default date pattern and methods
//! - [`MethodDeclaration`] - A single contract method with its HTTP verb and path template
//! - [`ParameterDeclaration`] - A formal parameter with its binding annotations
//! - [`BindingAnnotation`] - The parameter-level markers (`#[path]`, `#[query]`, `#[header]`, `#[body]`)
//! - [`HttpVerb`] - HTTP methods (GET, POST, PUT, ...)
//! - [`TypeRef`] - A Rust type rendered as source text
//!
//! ## Examples
//!
//! ```
//! use courier_define::{
//!     BindingAnnotation, ContractDeclaration, HttpVerb, MethodDeclaration, ParameterDeclaration,
//! };
//!
//! let contract = ContractDeclaration::new("crate::users::UserClient", "user-service")
//!     .with_method(
//!         MethodDeclaration::new("get_user", "Result<User, reqwest::Error>")
//!             .with_verb(HttpVerb::Get, "users/{id}")
//!             .with_parameter(
//!                 ParameterDeclaration::new("id", "u64").with_annotation(BindingAnnotation::Path(None)),
//!             ),
//!     );
//!
//! assert_eq!(contract.package_name, "crate::users");
//! assert_eq!(contract.simple_name(), "UserClient");
//! assert_eq!(contract.methods.len(), 1);
//! ```

pub mod parameter;
pub mod types;

pub use parameter::{BindingAnnotation, ParameterDeclaration, TypeRef};
pub use types::{ContractDeclaration, HttpVerb, MethodDeclaration, Receiver};
