//! Pluggable call-body synthesis.
//!
//! A [`Backend`] turns one [`MethodModel`] into the statements of a method
//! body for a specific transport, and contributes the fields, constructors
//! and helper items the adapter type needs. Backends are looked up by id in
//! a [`BackendRegistry`]; adding a transport means registering another
//! implementation, the assembler never changes.
//!
//! ## Shipped backends
//!
//! - [`ReqwestBlocking`] (`reqwest-blocking`, the default) drives a
//!   `reqwest::blocking::Client` from synchronous methods
//! - [`ReqwestAsync`] (`reqwest-async`) drives a `reqwest::Client` from
//!   `async fn` methods
//!
//! Both share the request planning in [`plan`].

use std::collections::BTreeMap;

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::assembler::AdapterType;
use crate::errors::{GeneratorError, SynthesisError};
use crate::model::MethodModel;

pub mod plan;
pub mod reqwest_async;
pub mod reqwest_blocking;

pub use reqwest_async::ReqwestAsync;
pub use reqwest_blocking::ReqwestBlocking;

/// Id of the backend used when none is configured.
pub const DEFAULT_BACKEND: &str = "reqwest-blocking";

/// The synthesized body of one adapter method.
#[derive(Debug, Clone)]
pub struct CallBody {
    pub tokens: TokenStream,
    /// Whether the body percent-encodes path segments through the
    /// adapter's `PATH_SEGMENT` set.
    pub encodes_path: bool,
}

/// A private field of the adapter struct.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: Ident,
    pub ty: TokenStream,
}

impl FieldSpec {
    pub fn new(name: &str, ty: TokenStream) -> Self {
        Self {
            name: format_ident!("{}", name),
            ty,
        }
    }

    pub fn to_tokens(&self) -> TokenStream {
        let name = &self.name;
        let ty = &self.ty;
        quote! { #name: #ty }
    }
}

/// What a backend adds to an adapter once every method body exists.
#[derive(Debug, Clone, Default)]
pub struct AdapterScaffold {
    pub fields: Vec<FieldSpec>,
    /// Items inside the inherent `impl` block: constructors and helpers.
    pub inherent: Vec<TokenStream>,
    /// Module-level items emitted next to the adapter.
    pub items: Vec<TokenStream>,
}

/// A transport technology that adapter bodies can be written against.
pub trait Backend {
    /// Stable id used in configuration and on the command line.
    fn id(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Emits the body of one adapter method.
    ///
    /// Must be deterministic: the same model always yields the same tokens.
    ///
    /// ## Errors
    ///
    /// Returns a [`SynthesisError`] when a parameter or return type cannot be
    /// mapped, or when the method's asyncness does not fit the transport.
    fn emit_call(&self, method: &MethodModel) -> Result<CallBody, SynthesisError>;

    /// Contributes fields, constructors and helper items for the finished
    /// adapter.
    fn finalize(&self, adapter: &AdapterType) -> AdapterScaffold;
}

/// Backends keyed by id.
pub struct BackendRegistry {
    backends: BTreeMap<&'static str, Box<dyn Backend>>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            backends: BTreeMap::new(),
        }
    }

    /// A registry holding both reqwest backends.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(ReqwestBlocking);
        registry.register(ReqwestAsync);
        registry
    }

    /// Adds a backend, returning the one previously registered under the
    /// same id.
    pub fn register(&mut self, backend: impl Backend + 'static) -> Option<Box<dyn Backend>> {
        self.backends.insert(backend.id(), Box::new(backend))
    }

    pub fn get(&self, id: &str) -> Option<&dyn Backend> {
        self.backends.get(id).map(|backend| backend.as_ref())
    }

    /// Looks up a backend, failing with the list of known ids.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::UnknownBackend`] when `id` is not registered.
    pub fn resolve(&self, id: &str) -> Result<&dyn Backend, GeneratorError> {
        self.get(id).ok_or_else(|| GeneratorError::UnknownBackend {
            requested: id.to_string(),
            available: self.ids().into_iter().map(String::from).collect(),
        })
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> Vec<&'static str> {
        self.backends.keys().copied().collect()
    }

    /// `(id, description)` pairs in sorted order.
    pub fn describe(&self) -> Vec<(&'static str, &'static str)> {
        self.backends
            .values()
            .map(|backend| (backend.id(), backend.description()))
            .collect()
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
