//! Synchronous adapters over `reqwest::blocking::Client`.
//!
//! The generated crate needs `reqwest` with the `blocking` and `json`
//! features, plus `percent-encoding` when any path has placeholders.
//!
//! ## Generated shape
//!
//! ```ignore
//! pub struct UserClientImpl {
//!     client: reqwest::blocking::Client,
//!     base_url: String,
//! }
//!
//! impl crate::users::UserClient for UserClientImpl {
//!     fn get_user(&self, id: u64) -> Result<User, reqwest::Error> {
//!         let path = format!("users/{}", percent_encoding::utf8_percent_encode(&id.to_string(), PATH_SEGMENT));
//!         let request = self.client.request(reqwest::Method::GET, self.endpoint(&path));
//!         let response = request.send()?;
//!         Ok(response.error_for_status()?.json::<User>()?)
//!     }
//! }
//! ```

use crate::assembler::AdapterType;
use crate::backend::plan::{self, Transport};
use crate::backend::{AdapterScaffold, Backend, CallBody};
use crate::errors::SynthesisError;
use crate::model::MethodModel;

/// Blocking reqwest backend, the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestBlocking;

impl Backend for ReqwestBlocking {
    fn id(&self) -> &'static str {
        "reqwest-blocking"
    }

    fn description(&self) -> &'static str {
        "Synchronous methods over reqwest::blocking::Client"
    }

    fn emit_call(&self, method: &MethodModel) -> Result<CallBody, SynthesisError> {
        plan::emit_call(method, Transport::Blocking, self.id())
    }

    fn finalize(&self, adapter: &AdapterType) -> AdapterScaffold {
        plan::scaffold(adapter, Transport::Blocking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{build_method, get, item_code, make_adapter};

    #[test]
    fn scaffold_holds_a_blocking_client() {
        let adapter = make_adapter("crate::users::UserClient", "user-service");
        let scaffold = ReqwestBlocking.finalize(&adapter);

        let fields: Vec<String> = scaffold.fields.iter().map(|f| f.to_tokens().to_string()).collect();
        assert_eq!(fields, vec!["client : reqwest :: blocking :: Client", "base_url : String"]);

        let code = item_code(&scaffold.inherent);
        assert!(code.contains("pub const DEFAULT_BASE_URL: &str = \"http://user-service\";"));
        assert!(code.contains("pub fn new(client: reqwest::blocking::Client) -> Self"));
        assert!(code.contains("pub fn with_base_url("));
        assert!(code.contains("fn endpoint(&self, path: &str) -> String"));
        assert!(scaffold.items.is_empty());
    }

    #[test]
    fn rejects_async_methods() {
        let method = build_method(get("ping", "ping", "Result<(), reqwest::Error>").with_async());
        assert!(matches!(
            ReqwestBlocking.emit_call(&method),
            Err(SynthesisError::UnsupportedAsyncness { is_async: true, .. })
        ));
    }
}
