//! Source scanner for `#[http_client]` contracts.
//!
//! Walks the configured directories, parses every `.rs` file with `syn` and
//! turns each trait carrying the `http_client` marker into a
//! [`ContractDeclaration`]. The module path of a contract comes from its
//! file location (`src/users/mod.rs` -> `crate::users`) and is extended by
//! inline `mod` blocks.
//!
//! Problems found here are structural and reported as error diagnostics. A
//! malformed method is left out of its contract; a malformed contract (or
//! the whole file, for parse failures) is excluded. Binding problems inside
//! well-formed methods are left to the model builders.

use std::fs;
use std::path::{Path, PathBuf};

use courier_define::{
    BindingAnnotation, ContractDeclaration, HttpVerb, MethodDeclaration, ParameterDeclaration, Receiver,
    TypeRef,
};
use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, ExprLit, FnArg, Item, Lit, Meta, Pat, ReturnType, Token, TraitItem};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::diagnostics::{DiagnosticContext, Diagnostics};
use crate::errors::GeneratorError;

/// Name of the contract marker attribute.
pub const CONTRACT_MARKER: &str = "http_client";

const PARAM_MARKERS: &[&str] = &["path", "query", "header", "body"];

/// Scans `root` recursively for contracts.
///
/// Files under `target/`, hidden directories and any path in `exclude` are
/// skipped. Files are visited in name order so results are stable.
///
/// ## Errors
///
/// Returns [`GeneratorError::ScanRootNotFound`] when `root` does not exist.
/// Unreadable or unparseable files are reported to `diagnostics` instead.
pub fn collect_contracts(
    root: &Path,
    exclude: &[PathBuf],
    diagnostics: &mut Diagnostics,
) -> Result<Vec<ContractDeclaration>, GeneratorError> {
    if !root.exists() {
        return Err(GeneratorError::ScanRootNotFound(root.display().to_string()));
    }

    let base = module_base(root);
    let mut contracts = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry.path(), root, exclude))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "rs"));

    for entry in walker {
        let path = entry.path();
        debug!("Scanning {}", path.display());
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                diagnostics.error(
                    format!("failed to read source file: {err}"),
                    DiagnosticContext::contract(path.display().to_string()),
                );
                continue;
            }
        };
        let module_path = compute_module_path(path, &base);
        contracts.extend(collect_from_source(
            &source,
            &module_path,
            &path.display().to_string(),
            diagnostics,
        ));
    }

    info!(count = contracts.len(), root = %root.display(), "Collected contracts");
    Ok(contracts)
}

/// Collects the contracts of one source file whose items live in
/// `module_path`. `origin` names the file in diagnostics.
pub fn collect_from_source(
    source: &str,
    module_path: &str,
    origin: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<ContractDeclaration> {
    match syn::parse_file(source) {
        Ok(file) => {
            let mut contracts = Vec::new();
            collect_items(&file.items, module_path, diagnostics, &mut contracts);
            contracts
        }
        Err(err) => {
            diagnostics.error(
                format!("failed to parse source file: {err}"),
                DiagnosticContext::contract(origin),
            );
            Vec::new()
        }
    }
}

fn collect_items(
    items: &[Item],
    module_path: &str,
    diagnostics: &mut Diagnostics,
    contracts: &mut Vec<ContractDeclaration>,
) {
    for item in items {
        match item {
            Item::Trait(item_trait) if has_marker(&item_trait.attrs) => {
                let qualified = format!("{}::{}", module_path, item_trait.ident);
                match parse_contract(item_trait, &qualified) {
                    Ok((contract, rejected)) => {
                        for (method, err) in rejected {
                            diagnostics.error(err.to_string(), DiagnosticContext::method(&qualified, method));
                        }
                        debug!(contract = %qualified, methods = contract.methods.len(), "Found contract");
                        contracts.push(contract);
                    }
                    Err(err) => diagnostics.error(err.to_string(), DiagnosticContext::contract(qualified)),
                }
            }
            Item::Mod(item_mod) => {
                let nested = format!("{}::{}", module_path, item_mod.ident);
                if has_marker(&item_mod.attrs) {
                    diagnostics.error(
                        "#[http_client] can only be applied to a trait",
                        DiagnosticContext::contract(&nested),
                    );
                }
                if let Some((_, items)) = &item_mod.content {
                    collect_items(items, &nested, diagnostics, contracts);
                }
            }
            other => {
                if let Some((attrs, name)) = marked_item(other)
                    && has_marker(attrs)
                {
                    diagnostics.error(
                        "#[http_client] can only be applied to a trait",
                        DiagnosticContext::contract(format!("{module_path}::{name}")),
                    );
                }
            }
        }
    }
}

/// Attributes and display name of items that could wrongly carry the marker.
fn marked_item(item: &Item) -> Option<(&[Attribute], String)> {
    match item {
        Item::Struct(s) => Some((&s.attrs, s.ident.to_string())),
        Item::Enum(e) => Some((&e.attrs, e.ident.to_string())),
        Item::Union(u) => Some((&u.attrs, u.ident.to_string())),
        Item::Fn(f) => Some((&f.attrs, f.sig.ident.to_string())),
        Item::Type(t) => Some((&t.attrs, t.ident.to_string())),
        Item::Impl(i) => Some((&i.attrs, i.self_ty.to_token_stream().to_string())),
        Item::Const(c) => Some((&c.attrs, c.ident.to_string())),
        Item::Static(s) => Some((&s.attrs, s.ident.to_string())),
        _ => None,
    }
}

fn has_marker(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| attr_name(attr).as_deref() == Some(CONTRACT_MARKER))
}

/// Last path segment of an attribute, so `#[courier::http_client]` matches too.
fn attr_name(attr: &Attribute) -> Option<String> {
    attr.path().segments.last().map(|segment| segment.ident.to_string())
}

/// Methods whose attributes are malformed, with the reason.
type RejectedMethods = Vec<(String, syn::Error)>;

/// Parses a marked trait. Contract-level problems fail the whole contract;
/// a malformed method is returned in the rejected list and left out.
fn parse_contract(item: &syn::ItemTrait, qualified: &str) -> syn::Result<(ContractDeclaration, RejectedMethods)> {
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new(
            item.generics.span(),
            "generic contracts cannot be implemented by a generated adapter",
        ));
    }

    let mut base_name = None;
    let mut date_pattern = None;
    for attr in item.attrs.iter().filter(|attr| attr_name(attr).as_deref() == Some(CONTRACT_MARKER)) {
        let Meta::List(_) = &attr.meta else {
            return Err(syn::Error::new(attr.span(), "#[http_client] requires a client name"));
        };
        for arg in attr.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)? {
            let (key, value) = named_string(&arg)?;
            match key.as_deref() {
                None | Some("name") => base_name = Some(value),
                Some("date_pattern") => date_pattern = Some(value),
                Some(other) => {
                    return Err(syn::Error::new(
                        arg.span(),
                        format!("unknown http_client option `{other}`, expected `name` or `date_pattern`"),
                    ));
                }
            }
        }
    }
    let base_name = base_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| syn::Error::new(item.ident.span(), "#[http_client] requires a client name"))?;

    let mut contract = ContractDeclaration::new(qualified, base_name).with_docs(doc_lines(&item.attrs));
    if let Some(pattern) = date_pattern {
        contract = contract.with_date_pattern(pattern);
    }

    let mut rejected = Vec::new();
    for trait_item in &item.items {
        match trait_item {
            TraitItem::Fn(method) => match parse_method(method) {
                Ok(decl) => contract = contract.with_method(decl),
                Err(err) => rejected.push((method.sig.ident.to_string(), err)),
            },
            TraitItem::Type(ty) if ty.default.is_none() => {
                return Err(syn::Error::new(
                    ty.span(),
                    format!("associated type `{}` cannot be implemented by a generated adapter", ty.ident),
                ));
            }
            TraitItem::Const(constant) if constant.default.is_none() => {
                return Err(syn::Error::new(
                    constant.span(),
                    format!(
                        "associated const `{}` cannot be implemented by a generated adapter",
                        constant.ident
                    ),
                ));
            }
            _ => {}
        }
    }

    Ok((contract, rejected))
}

fn parse_method(method: &syn::TraitItemFn) -> syn::Result<MethodDeclaration> {
    let sig = &method.sig;
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new(
            sig.generics.span(),
            format!("generic method `{}` cannot be implemented by a generated adapter", sig.ident),
        ));
    }

    let return_type = match &sig.output {
        ReturnType::Default => TypeRef::unit(),
        ReturnType::Type(_, ty) => TypeRef::new(render_type(ty)),
    };
    let mut decl = MethodDeclaration::new(sig.ident.to_string(), return_type)
        .with_receiver(receiver(sig))
        .with_docs(doc_lines(&method.attrs));
    if sig.asyncness.is_some() {
        decl = decl.with_async();
    }
    if method.default.is_some() {
        decl = decl.with_default_body();
    }

    let mut verb_seen = false;
    for attr in &method.attrs {
        let Some(verb) = attr_name(attr).and_then(|name| HttpVerb::from_attribute_name(&name)) else {
            continue;
        };
        if verb_seen {
            return Err(syn::Error::new(
                attr.span(),
                format!("method `{}` declares more than one HTTP verb", sig.ident),
            ));
        }
        verb_seen = true;
        decl = apply_verb(decl, verb, attr)?;
    }

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            decl = decl.with_parameter(parse_parameter(pat_type)?);
        }
    }

    Ok(decl)
}

/// Reads `#[get("path", consumes = "...", produces = "...")]`.
fn apply_verb(mut decl: MethodDeclaration, verb: HttpVerb, attr: &Attribute) -> syn::Result<MethodDeclaration> {
    let mut path = String::new();
    if let Meta::List(_) = &attr.meta {
        for arg in attr.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)? {
            let (key, value) = named_string(&arg)?;
            match key.as_deref() {
                None | Some("path") => path = value,
                Some("consumes") => decl = decl.with_consumes(value),
                Some("produces") => decl = decl.with_produces(value),
                Some(other) => {
                    return Err(syn::Error::new(
                        arg.span(),
                        format!(
                            "unknown #[{}] option `{other}`, expected `path`, `consumes` or `produces`",
                            verb.attribute_name()
                        ),
                    ));
                }
            }
        }
    }
    Ok(decl.with_verb(verb, path))
}

fn parse_parameter(pat_type: &syn::PatType) -> syn::Result<ParameterDeclaration> {
    let ty = TypeRef::new(render_type(&pat_type.ty));
    let mut parameter = match pat_type.pat.as_ref() {
        Pat::Ident(pat_ident) => ParameterDeclaration::new(pat_ident.ident.to_string(), ty),
        _ => ParameterDeclaration::unnamed(ty),
    };

    for attr in &pat_type.attrs {
        let Some(name) = attr_name(attr) else {
            continue;
        };
        if name == "date_format" {
            let value: syn::LitStr = attr.parse_args().map_err(|err| {
                syn::Error::new(err.span(), "#[date_format] expects a single string pattern")
            })?;
            parameter = parameter.with_date_format(value.value());
            continue;
        }
        if !PARAM_MARKERS.contains(&name.as_str()) {
            continue;
        }

        let explicit = match &attr.meta {
            Meta::Path(_) => None,
            Meta::List(_) if name == "body" => {
                return Err(syn::Error::new(attr.span(), "#[body] takes no arguments"));
            }
            Meta::List(_) => {
                let arg: Expr = attr.parse_args()?;
                let (key, value) = named_string(&arg)?;
                match key.as_deref() {
                    None | Some("name") => Some(value),
                    Some(other) => {
                        return Err(syn::Error::new(
                            arg.span(),
                            format!("unknown #[{name}] option `{other}`, expected `name`"),
                        ));
                    }
                }
            }
            Meta::NameValue(_) => {
                return Err(syn::Error::new(attr.span(), format!("use #[{name}(\"...\")] to rename")));
            }
        };
        let annotation = match name.as_str() {
            "path" => BindingAnnotation::Path(explicit),
            "query" => BindingAnnotation::Query(explicit),
            "header" => BindingAnnotation::Header(explicit),
            _ => BindingAnnotation::Body,
        };
        parameter = parameter.with_annotation(annotation);
    }

    Ok(parameter)
}

/// Splits `"value"` and `key = "value"` arguments.
fn named_string(expr: &Expr) -> syn::Result<(Option<String>, String)> {
    match expr {
        Expr::Lit(ExprLit { lit: Lit::Str(value), .. }) => Ok((None, value.value())),
        Expr::Assign(assign) => {
            let Expr::Path(key) = assign.left.as_ref() else {
                return Err(syn::Error::new(assign.left.span(), "expected an option name"));
            };
            let Expr::Lit(ExprLit { lit: Lit::Str(value), .. }) = assign.right.as_ref() else {
                return Err(syn::Error::new(assign.right.span(), "expected a string literal"));
            };
            let key = key
                .path
                .get_ident()
                .map(|ident| ident.to_string())
                .ok_or_else(|| syn::Error::new(key.span(), "expected an option name"))?;
            Ok((Some(key), value.value()))
        }
        other => Err(syn::Error::new(other.span(), "expected a string literal or `key = \"value\"`")),
    }
}

fn receiver(sig: &syn::Signature) -> Receiver {
    match sig.receiver() {
        None => Receiver::None,
        Some(receiver) if receiver.reference.is_some() && receiver.mutability.is_some() => Receiver::RefMut,
        Some(receiver) if receiver.reference.is_some() => Receiver::Ref,
        Some(_) => Receiver::Value,
    }
}

fn doc_lines(attrs: &[Attribute]) -> Vec<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit { lit: Lit::Str(doc), .. }) => Some(doc.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

/// Type text without the token spacing of `to_string()`.
pub fn render_type(ty: &syn::Type) -> String {
    ty.to_token_stream()
        .to_string()
        .replace(" :: ", "::")
        .replace(":: ", "::")
        .replace(" <", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace("& ", "&")
}

fn is_skipped(path: &Path, root: &Path, exclude: &[PathBuf]) -> bool {
    if path == root {
        return false;
    }
    let hidden_or_target = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == "target" || name.starts_with('.'));
    hidden_or_target || exclude.iter().any(|excluded| path.starts_with(excluded))
}

/// Directory module paths are computed from: the crate's `src` directory
/// when the scan root is inside one, otherwise the scan root itself.
fn module_base(root: &Path) -> PathBuf {
    root.ancestors()
        .find(|dir| {
            dir.file_name().is_some_and(|name| name == "src")
                && dir.parent().is_some_and(|parent| parent.join("Cargo.toml").is_file())
        })
        .unwrap_or(root)
        .to_path_buf()
}

/// Module path of a file relative to the module base.
/// e.g. "src/users/api.rs" -> "crate::users::api"
fn compute_module_path(file_path: &Path, root: &Path) -> String {
    let relative = file_path.strip_prefix(root).unwrap_or(file_path);
    let without_extension = relative.with_extension("");
    let mut parts: Vec<&str> = without_extension
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();

    if parts.len() == 1 && matches!(parts[0], "lib" | "main") {
        parts.pop();
    } else if parts.last() == Some(&"mod") {
        parts.pop();
    }

    if parts.is_empty() {
        "crate".to_string()
    } else {
        format!("crate::{}", parts.join("::"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use std::fs;
    use tempfile::TempDir;

    fn collect(source: &str) -> (Vec<ContractDeclaration>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let contracts = collect_from_source(source, "crate::users", "users.rs", &mut diagnostics);
        (contracts, diagnostics)
    }

    const USER_CLIENT: &str = r#"
        use courier_macros::http_client;

        /// Talks to the user service.
        #[http_client(name = "user-service", date_pattern = "yyyy-MM-dd")]
        pub trait UserClient {
            #[get("users/{id}", produces = "application/json")]
            fn get_user(&self, #[path] id: u64) -> Result<User, reqwest::Error>;

            #[post("users", consumes = "application/json")]
            async fn create(&mut self, #[body] user: NewUser, #[header("X-Trace")] trace: Option<String>) -> Result<User, reqwest::Error>;

            #[get("events")]
            fn events(&self, #[query] #[date_format("dd.MM.yyyy")] since: NaiveDate, _: u8) -> Result<Vec<Event>, reqwest::Error>;

            fn helper(&self) -> u32 {
                1
            }
        }
    "#;

    #[test]
    fn collects_contract_metadata() {
        let (contracts, diagnostics) = collect(USER_CLIENT);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(contracts.len(), 1);

        let contract = &contracts[0];
        assert_eq!(contract.qualified_name, "crate::users::UserClient");
        assert_eq!(contract.package_name, "crate::users");
        assert_eq!(contract.base_name, "user-service");
        assert_eq!(contract.default_date_pattern(), Some("yyyy-MM-dd"));
        assert_eq!(contract.docs, vec!["Talks to the user service."]);
        let names: Vec<&str> = contract.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["get_user", "create", "events", "helper"]);
    }

    #[test]
    fn collects_method_and_parameter_markers() {
        let (contracts, _) = collect(USER_CLIENT);
        let methods = &contracts[0].methods;

        let get_user = &methods[0];
        assert_eq!(get_user.verb, Some(HttpVerb::Get));
        assert_eq!(get_user.path.as_deref(), Some("users/{id}"));
        assert_eq!(get_user.produces.as_deref(), Some("application/json"));
        assert_eq!(get_user.return_type.as_str(), "Result<User, reqwest::Error>");
        assert_eq!(get_user.parameters[0].annotations, vec![BindingAnnotation::Path(None)]);

        let create = &methods[1];
        assert!(create.is_async);
        assert_eq!(create.receiver, Receiver::RefMut);
        assert_eq!(create.consumes.as_deref(), Some("application/json"));
        assert_eq!(create.parameters[0].annotations, vec![BindingAnnotation::Body]);
        assert_eq!(create.parameters[1].ty.as_str(), "Option<String>");
        assert_eq!(
            create.parameters[1].annotations,
            vec![BindingAnnotation::Header(Some("X-Trace".into()))]
        );

        let events = &methods[2];
        assert_eq!(events.parameters[0].date_format.as_deref(), Some("dd.MM.yyyy"));
        assert_eq!(events.parameters[1].name, None);

        assert!(methods[3].has_default_body);
        assert_eq!(methods[3].verb, None);
    }

    #[test]
    fn bare_name_form() {
        let (contracts, _) = collect(
            r#"
            #[courier_macros::http_client("https://api.example.com")]
            trait Health {
                #[head("health")]
                fn check(&self) -> Result<(), reqwest::Error>;
            }
            "#,
        );
        assert_eq!(contracts[0].base_name, "https://api.example.com");
        assert_eq!(contracts[0].default_date_pattern(), None);
    }

    #[test]
    fn marker_on_a_struct_is_a_structural_error() {
        let (contracts, diagnostics) = collect("#[http_client(\"x\")] struct NotATrait;");
        assert!(contracts.is_empty());
        assert_eq!(diagnostics.count(Severity::Error), 1);
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.context.contract, "crate::users::NotATrait");
        assert!(diagnostic.message.contains("can only be applied to a trait"));
    }

    #[test]
    fn malformed_contract_attributes_exclude_the_contract() {
        let cases = [
            "#[http_client] trait A {}",
            "#[http_client(base = \"x\")] trait A {}",
            "#[http_client(\"x\")] trait A { type Item; }",
            "#[http_client(\"x\")] trait A<T> {}",
        ];
        for source in cases {
            let (contracts, diagnostics) = collect(source);
            assert!(contracts.is_empty(), "{source}");
            assert_eq!(diagnostics.count(Severity::Error), 1, "{source}");
        }
    }

    #[test]
    fn malformed_method_attributes_only_drop_that_method() {
        let bad_methods = [
            "#[get(\"a\")] #[post(\"b\")] fn bad(&self) -> Result<(), E>;",
            "#[get(\"a\", verbose = \"yes\")] fn bad(&self) -> Result<(), E>;",
            "#[get(\"a\")] fn bad(&self, #[body(\"b\")] b: B) -> Result<(), E>;",
            "#[get(\"a\")] fn bad(&self, #[query] #[date_format(1)] at: NaiveDate) -> Result<(), E>;",
            "#[get(\"a\")] fn bad<T>(&self, t: T) -> Result<(), E>;",
        ];
        for bad in bad_methods {
            let source = format!(
                "#[http_client(\"svc\")] trait Svc {{ #[get(\"ok\")] fn good(&self) -> Result<(), E>; {bad} }}"
            );
            let (contracts, diagnostics) = collect(&source);

            assert_eq!(contracts.len(), 1, "{bad}");
            let names: Vec<&str> = contracts[0].methods.iter().map(|m| m.name.as_str()).collect();
            assert_eq!(names, vec!["good"], "{bad}");
            assert_eq!(diagnostics.count(Severity::Error), 1, "{bad}");
            let diagnostic = diagnostics.iter().next().unwrap();
            assert_eq!(diagnostic.context.contract, "crate::users::Svc");
            assert_eq!(diagnostic.context.method.as_deref(), Some("bad"), "{bad}");
        }
    }

    #[test]
    fn inline_modules_extend_the_path() {
        let (contracts, _) = collect(
            r#"
            mod admin {
                #[http_client("admin")]
                pub trait AdminClient {}
            }
            "#,
        );
        assert_eq!(contracts[0].qualified_name, "crate::users::admin::AdminClient");
    }

    #[test]
    fn unparseable_source_is_reported() {
        let (contracts, diagnostics) = collect("trait {");
        assert!(contracts.is_empty());
        assert_eq!(diagnostics.iter().next().unwrap().context.contract, "users.rs");
    }

    #[test]
    fn module_paths_follow_file_layout() {
        let root = Path::new("src");
        assert_eq!(compute_module_path(Path::new("src/lib.rs"), root), "crate");
        assert_eq!(compute_module_path(Path::new("src/main.rs"), root), "crate");
        assert_eq!(compute_module_path(Path::new("src/users/mod.rs"), root), "crate::users");
        assert_eq!(compute_module_path(Path::new("src/users/api.rs"), root), "crate::users::api");
    }

    #[test]
    fn nested_scan_roots_keep_crate_relative_module_paths() {
        let dir = TempDir::new().unwrap();
        let api = dir.path().join("src/api");
        fs::create_dir_all(&api).unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"svc\"\n").unwrap();
        fs::write(api.join("users.rs"), USER_CLIENT).unwrap();

        let mut diagnostics = Diagnostics::new();
        let contracts = collect_contracts(&api, &[], &mut diagnostics).unwrap();

        assert_eq!(module_base(&api), dir.path().join("src"));
        assert_eq!(contracts.len(), 1);
        assert_eq!(contracts[0].qualified_name, "crate::api::users::UserClient");
    }

    #[test]
    fn scan_roots_outside_a_crate_are_their_own_base() {
        let dir = TempDir::new().unwrap();
        let contracts_dir = dir.path().join("contracts");
        fs::create_dir_all(&contracts_dir).unwrap();
        assert_eq!(module_base(&contracts_dir), contracts_dir);
    }

    #[test]
    fn scans_directories_and_skips_excluded_paths() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("users")).unwrap();
        fs::create_dir_all(src.join("generated")).unwrap();
        fs::write(src.join("lib.rs"), "pub mod users;").unwrap();
        fs::write(src.join("users/mod.rs"), USER_CLIENT).unwrap();
        fs::write(src.join("broken.rs"), "fn {").unwrap();
        fs::write(
            src.join("generated/mod.rs"),
            "#[http_client(\"stale\")] trait Stale {}",
        )
        .unwrap();

        let mut diagnostics = Diagnostics::new();
        let contracts = collect_contracts(&src, &[src.join("generated")], &mut diagnostics).unwrap();

        assert_eq!(contracts.len(), 1);
        assert_eq!(contracts[0].qualified_name, "crate::users::UserClient");
        assert_eq!(diagnostics.count(Severity::Error), 1);
    }

    #[test]
    fn missing_root_is_a_driver_error() {
        let mut diagnostics = Diagnostics::new();
        let err = collect_contracts(Path::new("/definitely/not/here"), &[], &mut diagnostics).unwrap_err();
        assert!(matches!(err, GeneratorError::ScanRootNotFound(_)));
    }

    #[test]
    fn render_type_tidies_spacing() {
        let ty: syn::Type = syn::parse_str("Result<Vec<Option<u8>>, std::io::Error>").unwrap();
        assert_eq!(render_type(&ty), "Result<Vec<Option<u8>>, std::io::Error>");
        let ty: syn::Type = syn::parse_str("&'a str").unwrap();
        assert_eq!(render_type(&ty), "&'a str");
    }
}
