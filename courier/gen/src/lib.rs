//! Courier adapter generator library.
//!
//! This crate turns HTTP contracts, traits annotated with
//! `#[http_client]` from `courier-macros`, into adapter types that implement
//! the trait by driving a `reqwest` client. The generated code includes:
//!
//! - An adapter struct holding the client and a base URL
//! - `new()` and `with_base_url()` constructors and a `DEFAULT_BASE_URL`
//! - One method per contract method: URL construction, path/query/header
//!   binding, body encoding and response decoding
//!
//! ## Modules
//!
//! - [`collector`] - Finds contracts in Rust sources and builds declarations
//! - [`model`] - Validated method and parameter models
//! - [`backend`] - Pluggable call-body synthesis and the backend registry
//! - [`assembler`] - Builds one adapter per contract
//! - [`output`] - Validation, formatting and atomic file writing
//! - [`generator`] - The driver used by `build.rs` and the CLI
//! - [`diagnostics`] - Per-contract, per-method and per-parameter findings
//! - [`config`] - `courier.toml` handling
//! - [`date_pattern`] - Date pattern translation
//! - [`parser`] - Path template parsing
//! - [`errors`] - Error types
//!
//! ## Example Usage
//!
//! ```
//! use courier_define::{BindingAnnotation, ContractDeclaration, HttpVerb, MethodDeclaration, ParameterDeclaration};
//! use courier_gen::assembler::AssemblerOptions;
//! use courier_gen::backend::BackendRegistry;
//! use courier_gen::generate_adapters;
//! use courier_gen::output::render_adapter;
//!
//! let contract = ContractDeclaration::new("crate::users::UserClient", "user-service").with_method(
//!     MethodDeclaration::new("get_user", "Result<User, reqwest::Error>")
//!         .with_verb(HttpVerb::Get, "users/{id}")
//!         .with_parameter(ParameterDeclaration::new("id", "u64").with_annotation(BindingAnnotation::Path(None))),
//! );
//!
//! let registry = BackendRegistry::builtin();
//! let backend = registry.resolve("reqwest-blocking").unwrap();
//! let (adapters, diagnostics) = generate_adapters(&[contract], backend, &AssemblerOptions::default());
//!
//! assert!(!diagnostics.has_errors());
//! let code = render_adapter(&adapters[0]).unwrap();
//! assert!(code.contains("impl crate::users::UserClient for UserClientImpl"));
//! ```
//!
//! ## Generated Code Structure
//!
//! ```text
//! use crate::users::*;
//!
//! const PATH_SEGMENT: &percent_encoding::AsciiSet = ...;
//!
//! pub struct UserClientImpl {
//!     client: reqwest::blocking::Client,
//!     base_url: String,
//! }
//!
//! impl UserClientImpl {
//!     pub const DEFAULT_BASE_URL: &str = "http://user-service";
//!     pub fn new(client: reqwest::blocking::Client) -> Self;
//!     pub fn with_base_url(client: reqwest::blocking::Client, base_url: impl Into<String>) -> Self;
//! }
//!
//! impl crate::users::UserClient for UserClientImpl {
//!     fn get_user(&self, id: u64) -> Result<User, reqwest::Error> { ... }
//! }
//! ```

pub mod assembler;
pub mod backend;
pub mod collector;
pub mod config;
pub mod date_pattern;
pub mod diagnostics;
pub mod errors;
pub mod generator;
pub mod model;
pub mod output;
pub mod parser;

#[cfg(test)]
pub(crate) mod test_utils;

pub use generator::{GenerationReport, Generator, generate_adapters};
