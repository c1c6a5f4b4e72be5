//! Marker attribute for courier HTTP contracts.
//!
//! `#[http_client]` marks a trait as a contract for `courier-gen`, which reads
//! the annotated source at build time and writes the adapter. At compile
//! time the attribute only removes the inert binding markers so the trait is
//! plain Rust again.
//!
//! ## Examples
//!
//! ```ignore
//! use courier_macros::http_client;
//!
//! #[http_client(name = "user-service", date_pattern = "yyyy-MM-dd")]
//! pub trait UserClient {
//!     #[get("users/{id}")]
//!     fn get_user(&self, #[path] id: u64) -> Result<User, reqwest::Error>;
//!
//!     #[get("users", produces = "application/json")]
//!     fn search(
//!         &self,
//!         #[query] name: Option<String>,
//!         #[query] #[date_format("yyyy")] since: Option<chrono::NaiveDate>,
//!     ) -> Result<Vec<User>, reqwest::Error>;
//! }
//! ```

use proc_macro::TokenStream;

mod strip;

/// Marks a trait as an HTTP contract.
///
/// ## Arguments
///
/// - `name = "..."` (or a single string literal) - client qualifier, a service name or base URL
/// - `date_pattern = "..."` - default format for date/time parameters
///
/// Method attributes: `#[get]`, `#[post]`, `#[put]`, `#[patch]`, `#[delete]`,
/// `#[head]`, `#[options]`, each taking a path template plus optional
/// `consumes = "..."` / `produces = "..."`.
///
/// Parameter attributes: `#[path]`, `#[query]`, `#[header]`, `#[body]`,
/// `#[date_format("...")]`.
#[proc_macro_attribute]
pub fn http_client(attr: TokenStream, item: TokenStream) -> TokenStream {
    strip::http_client_impl(attr.into(), item.into()).into()
}
