//! Backend-agnostic models of contract methods and their parameters.
//!
//! Models are built fresh from declarations for each synthesis pass and are
//! never mutated afterwards. Construction is where binding errors surface:
//! a model that exists is safe to hand to any backend.

pub mod method;
pub mod parameter;
pub mod types;

pub use method::{ContentKind, MethodModel};
pub use parameter::{BindingRole, ParameterModel};
pub use types::{TemporalKind, TypeShape};
