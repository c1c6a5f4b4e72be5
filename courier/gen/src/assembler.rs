//! Adapter assembly.
//!
//! [`AdapterAssembler`] turns one contract into one [`AdapterType`]: it
//! builds a model per method, asks the backend for a body, copies the
//! signature, and finally lets the backend add its fields, constructors and
//! helper items. A method that fails to model or synthesize is left out and
//! reported; the rest of the contract is still assembled.

use courier_define::{ContractDeclaration, Receiver};
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::Type;
use tracing::debug;

use crate::backend::{Backend, FieldSpec};
use crate::diagnostics::{DiagnosticContext, Diagnostics};
use crate::errors::GeneratorError;
use crate::model::MethodModel;

/// Suffix appended to the contract name when none is configured.
pub const DEFAULT_ADAPTER_SUFFIX: &str = "Impl";

/// Options that shape every adapter of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerOptions {
    pub adapter_suffix: String,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            adapter_suffix: DEFAULT_ADAPTER_SUFFIX.to_string(),
        }
    }
}

/// One synthesized adapter method.
#[derive(Debug, Clone)]
pub struct MethodImpl {
    pub name: String,
    pub signature: TokenStream,
    pub body: TokenStream,
    pub encodes_path: bool,
}

impl MethodImpl {
    pub fn to_tokens(&self) -> TokenStream {
        let signature = &self.signature;
        let body = &self.body;
        quote! {
            #signature {
                #body
            }
        }
    }
}

/// A generated adapter, ready to be rendered.
#[derive(Debug, Clone)]
pub struct AdapterType {
    /// Adapter type name, e.g. `UserClientImpl`.
    pub name: String,
    /// Simple name of the implemented contract.
    pub contract_name: String,
    /// Full path of the contract trait.
    pub contract_path: String,
    /// Module path of the contract.
    pub package: String,
    /// The contract's configured base name.
    pub base_name: String,
    pub backend: &'static str,
    /// Paths glob-imported into the generated module.
    pub imports: Vec<String>,
    pub fields: Vec<FieldSpec>,
    pub inherent: Vec<TokenStream>,
    pub methods: Vec<MethodImpl>,
    pub items: Vec<TokenStream>,
}

impl AdapterType {
    /// An adapter with no methods and no backend contributions yet.
    pub fn new(contract: &ContractDeclaration, backend: &'static str, options: &AssemblerOptions) -> Self {
        let contract_name = contract.simple_name().to_string();
        Self {
            name: format!("{}{}", contract_name, options.adapter_suffix),
            contract_name,
            contract_path: contract.qualified_name.clone(),
            package: contract.package_name.clone(),
            base_name: contract.base_name.clone(),
            backend,
            imports: vec![contract.package_name.clone()],
            fields: Vec::new(),
            inherent: Vec::new(),
            methods: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Adapters are unique per contract package and simple name.
    pub fn identity(&self) -> String {
        format!("{}::{}", self.package, self.contract_name)
    }

    /// File stem of the generated module: package segments after `crate`,
    /// then the snake-cased adapter name.
    ///
    /// ## Examples
    ///
    /// ```
    /// use courier_define::ContractDeclaration;
    /// use courier_gen::assembler::{AdapterType, AssemblerOptions};
    ///
    /// let contract = ContractDeclaration::new("crate::api::users::UserClient", "user-service");
    /// let adapter = AdapterType::new(&contract, "reqwest-blocking", &AssemblerOptions::default());
    /// assert_eq!(adapter.module_name(), "api_users_user_client_impl");
    /// ```
    pub fn module_name(&self) -> String {
        let mut parts: Vec<String> = self
            .package
            .split("::")
            .filter(|segment| !segment.is_empty() && *segment != "crate" && *segment != "self")
            .map(|segment| segment.trim_start_matches("r#").to_lowercase())
            .collect();
        parts.push(to_snake_case(&self.name));
        parts.join("_")
    }

    pub fn encodes_path(&self) -> bool {
        self.methods.iter().any(|method| method.encodes_path)
    }

    /// The complete generated module.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::CodeGenError`] when the adapter name, the
    /// contract path or an import is not valid Rust.
    pub fn to_tokens(&self) -> Result<TokenStream, GeneratorError> {
        let name: Ident = syn::parse_str(&self.name).map_err(|e| {
            GeneratorError::CodeGenError(format!("Invalid adapter name `{}`: {}", self.name, e))
        })?;
        let contract: syn::Path = syn::parse_str(&self.contract_path).map_err(|e| {
            GeneratorError::CodeGenError(format!("Invalid contract path `{}`: {}", self.contract_path, e))
        })?;
        let imports = self
            .imports
            .iter()
            .map(|import| {
                syn::parse_str::<syn::Path>(import).map_err(|e| {
                    GeneratorError::CodeGenError(format!("Invalid import `{}`: {}", import, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let doc = format!(
            " HTTP adapter for [`{}`] using the `{}` backend.",
            self.contract_path, self.backend
        );
        let fields = self.fields.iter().map(FieldSpec::to_tokens);
        let inherent = &self.inherent;
        let items = &self.items;
        let methods = self.methods.iter().map(MethodImpl::to_tokens);

        Ok(quote! {
            #(
                #[allow(unused_imports)]
                use #imports::*;
            )*

            #(#items)*

            #[doc = #doc]
            pub struct #name {
                #(#fields),*
            }

            impl #name {
                #(#inherent)*
            }

            impl #contract for #name {
                #(#methods)*
            }
        })
    }
}

/// Builds adapters for one backend.
pub struct AdapterAssembler<'a> {
    backend: &'a dyn Backend,
    options: &'a AssemblerOptions,
}

impl<'a> AdapterAssembler<'a> {
    pub fn new(backend: &'a dyn Backend, options: &'a AssemblerOptions) -> Self {
        Self { backend, options }
    }

    /// Assembles the adapter for `contract`, reporting per-method failures
    /// to `diagnostics`. Methods keep their declaration order.
    pub fn assemble(&self, contract: &ContractDeclaration, diagnostics: &mut Diagnostics) -> AdapterType {
        let mut adapter = AdapterType::new(contract, self.backend.id(), self.options);
        let contract_date_pattern = contract.default_date_pattern();

        for decl in &contract.methods {
            let context = DiagnosticContext::method(&contract.qualified_name, &decl.name);

            if decl.has_default_body {
                diagnostics.note("skipped: method has a default body in the contract", context);
                continue;
            }

            let model = match MethodModel::build(decl, contract_date_pattern) {
                Ok(model) => model,
                Err(err) => {
                    let parameter = err.parameter().cloned();
                    diagnostics.error(err.to_string(), context.with_parameter(parameter));
                    continue;
                }
            };
            for warning in &model.warnings {
                diagnostics.warning(warning.clone(), context.clone());
            }

            let body = match self.backend.emit_call(&model) {
                Ok(body) => body,
                Err(err) => {
                    let parameter = err.parameter().cloned();
                    diagnostics.error(err.to_string(), context.with_parameter(parameter));
                    continue;
                }
            };
            let signature = match signature(&model) {
                Ok(signature) => signature,
                Err(reason) => {
                    diagnostics.error(reason, context);
                    continue;
                }
            };

            debug!(
                contract = %contract.qualified_name,
                method = %model.name,
                "Synthesized method"
            );
            adapter.methods.push(MethodImpl {
                name: model.name.clone(),
                signature,
                body: body.tokens,
                encodes_path: body.encodes_path,
            });
        }

        let scaffold = self.backend.finalize(&adapter);
        adapter.fields = scaffold.fields;
        adapter.inherent = scaffold.inherent;
        adapter.items = scaffold.items;
        adapter
    }
}

/// Re-creates the contract method's signature from its model.
fn signature(model: &MethodModel) -> Result<TokenStream, String> {
    let name: Ident = syn::parse_str(&model.name)
        .map_err(|e| format!("method name `{}` is not an identifier: {}", model.name, e))?;
    let receiver = match model.receiver {
        Receiver::Ref => quote!(&self),
        Receiver::RefMut => quote!(&mut self),
        Receiver::Value => quote!(self),
        Receiver::None => return Err(format!("method `{}` has no receiver", model.name)),
    };
    let parameters = model
        .parameters
        .iter()
        .map(|parameter| {
            let ident = parameter.ident();
            let ty: Type = syn::parse_str(parameter.ty.as_str())
                .map_err(|e| format!("parameter type `{}` does not parse: {}", parameter.ty, e))?;
            Ok(quote! { #ident: #ty })
        })
        .collect::<Result<Vec<_>, String>>()?;
    let output: Type = syn::parse_str(model.return_type.as_str())
        .map_err(|e| format!("return type `{}` does not parse: {}", model.return_type, e))?;
    let asyncness = model.is_async.then(|| quote!(async));

    Ok(quote! {
        #asyncness fn #name(#receiver #(, #parameters)*) -> #output
    })
}

/// `UserClientImpl` -> `user_client_impl`, keeping acronyms together
/// (`HTTPClient` -> `http_client`).
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            if i > 0 && (prev_lower || (prev_upper && next_lower)) && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendRegistry, ReqwestBlocking};
    use crate::diagnostics::Severity;
    use crate::test_utils::{file_code, get, param, user_client};
    use courier_define::{BindingAnnotation, HttpVerb, MethodDeclaration};

    fn assemble(contract: &ContractDeclaration) -> (AdapterType, Diagnostics) {
        let options = AssemblerOptions::default();
        let mut diagnostics = Diagnostics::new();
        let adapter = AdapterAssembler::new(&ReqwestBlocking, &options).assemble(contract, &mut diagnostics);
        (adapter, diagnostics)
    }

    #[test]
    fn user_client_scenario() {
        let (adapter, diagnostics) = assemble(&user_client());
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(adapter.name, "UserClientImpl");
        assert_eq!(adapter.methods.len(), 1);

        let code = file_code(&adapter.to_tokens().unwrap());
        assert!(code.contains("use crate::users::*;"));
        assert!(code.contains("pub struct UserClientImpl {"));
        assert!(code.contains("impl crate::users::UserClient for UserClientImpl {"));
        assert!(code.contains("fn get_user(&self, id: u64) -> Result<User, reqwest::Error> {"));
        assert!(code.contains("const PATH_SEGMENT: &percent_encoding::AsciiSet"));
        assert!(code.contains("\"http://user-service\""));
    }

    #[test]
    fn methods_keep_declaration_order() {
        let contract = ContractDeclaration::new("crate::Catalog", "catalog")
            .with_method(get("list", "items", "Result<Vec<Item>, reqwest::Error>"))
            .with_method(
                MethodDeclaration::new("create", "Result<Item, reqwest::Error>")
                    .with_verb(HttpVerb::Post, "items")
                    .with_parameter(param("item", "NewItem", BindingAnnotation::Body)),
            )
            .with_method(get("count", "items/count", "Result<u64, reqwest::Error>"));

        let (adapter, diagnostics) = assemble(&contract);
        assert!(diagnostics.is_empty());
        let names: Vec<&str> = adapter.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["list", "create", "count"]);
        assert!(!adapter.encodes_path());
    }

    #[test]
    fn double_body_omits_the_method() {
        let contract = ContractDeclaration::new("crate::Orders", "orders").with_method(
            MethodDeclaration::new("place", "Result<(), reqwest::Error>")
                .with_verb(HttpVerb::Post, "orders")
                .with_parameter(param("a", "Order", BindingAnnotation::Body))
                .with_parameter(param("b", "Order", BindingAnnotation::Body)),
        );
        let (adapter, diagnostics) = assemble(&contract);

        assert!(adapter.methods.is_empty());
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.context.method.as_deref(), Some("place"));
    }

    #[test]
    fn synthesis_errors_carry_the_parameter() {
        let contract = ContractDeclaration::new("crate::Files", "files").with_method(
            get("read", "files/{path}", "Result<String, reqwest::Error>")
                .with_parameter(param("path", "Vec<u8>", BindingAnnotation::Path(None))),
        );
        let (adapter, diagnostics) = assemble(&contract);
        assert!(adapter.methods.is_empty());
        let diagnostic = diagnostics.iter().next().unwrap();
        let parameter = diagnostic.context.parameter.as_ref().unwrap();
        assert_eq!((parameter.name.as_str(), parameter.index), ("path", 0));
    }

    #[test]
    fn default_methods_are_skipped_with_a_note() {
        let contract = ContractDeclaration::new("crate::Health", "health")
            .with_method(get("ping", "ping", "Result<(), reqwest::Error>").with_default_body())
            .with_method(get("check", "check", "Result<(), reqwest::Error>"));
        let (adapter, diagnostics) = assemble(&contract);
        assert_eq!(adapter.methods.len(), 1);
        assert_eq!(diagnostics.count(Severity::Note), 1);
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn unused_path_parameter_warns_but_keeps_the_method() {
        let contract = ContractDeclaration::new("crate::Health", "health").with_method(
            get("check", "check", "Result<(), reqwest::Error>")
                .with_parameter(param("id", "u64", BindingAnnotation::Path(None))),
        );
        let (adapter, diagnostics) = assemble(&contract);
        assert_eq!(adapter.methods.len(), 1);
        assert_eq!(diagnostics.count(Severity::Warning), 1);
    }

    #[test]
    fn receivers_and_asyncness_are_copied() {
        let contract = ContractDeclaration::new("crate::Stream", "stream").with_method(
            get("next", "next", "Result<String, reqwest::Error>")
                .with_receiver(Receiver::RefMut)
                .with_async(),
        );
        let registry = BackendRegistry::builtin();
        let backend = registry.resolve("reqwest-async").unwrap();
        let options = AssemblerOptions {
            adapter_suffix: "Http".to_string(),
        };
        let mut diagnostics = Diagnostics::new();
        let adapter = AdapterAssembler::new(backend, &options).assemble(&contract, &mut diagnostics);

        assert_eq!(adapter.name, "StreamHttp");
        let code = file_code(&adapter.to_tokens().unwrap());
        assert!(code.contains("async fn next(&mut self) -> Result<String, reqwest::Error>"));
        assert!(code.contains("client: reqwest::Client,"));
    }

    #[test]
    fn snake_case_names() {
        assert_eq!(to_snake_case("UserClientImpl"), "user_client_impl");
        assert_eq!(to_snake_case("HTTPClient"), "http_client");
        assert_eq!(to_snake_case("Health"), "health");
        assert_eq!(to_snake_case("V2Api"), "v2_api");
    }

    #[test]
    fn crate_root_contracts_use_the_adapter_name_as_module() {
        let contract = ContractDeclaration::new("crate::Health", "health");
        let adapter = AdapterType::new(&contract, "reqwest-blocking", &AssemblerOptions::default());
        assert_eq!(adapter.module_name(), "health_impl");
        assert_eq!(adapter.identity(), "crate::Health");
    }
}
