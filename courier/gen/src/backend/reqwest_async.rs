//! `async fn` adapters over `reqwest::Client`.
//!
//! Same request planning as the blocking backend; every transport call is
//! awaited. Contract methods must be declared `async fn`.

use crate::assembler::AdapterType;
use crate::backend::plan::{self, Transport};
use crate::backend::{AdapterScaffold, Backend, CallBody};
use crate::errors::SynthesisError;
use crate::model::MethodModel;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestAsync;

impl Backend for ReqwestAsync {
    fn id(&self) -> &'static str {
        "reqwest-async"
    }

    fn description(&self) -> &'static str {
        "async fn methods over reqwest::Client"
    }

    fn emit_call(&self, method: &MethodModel) -> Result<CallBody, SynthesisError> {
        plan::emit_call(method, Transport::Async, self.id())
    }

    fn finalize(&self, adapter: &AdapterType) -> AdapterScaffold {
        plan::scaffold(adapter, Transport::Async)
    }
}
