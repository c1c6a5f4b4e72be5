//! Implementation of the `#[http_client]` attribute.

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Error, Expr, FnArg, Item, Lit, Result, Token, TraitItem};

const METHOD_MARKERS: &[&str] = &["get", "post", "put", "patch", "delete", "head", "options"];
const PARAM_MARKERS: &[&str] = &["path", "query", "header", "body", "date_format"];
const CONTRACT_KEYS: &[&str] = &["name", "date_pattern"];

pub fn http_client_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    match http_client_inner(attr, item) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn http_client_inner(attr: TokenStream, item: TokenStream) -> Result<TokenStream> {
    check_contract_args(attr)?;

    let mut trait_item = match syn::parse2::<Item>(item)? {
        Item::Trait(trait_item) => trait_item,
        other => {
            return Err(Error::new_spanned(
                other,
                "#[http_client] can only be applied to a trait",
            ));
        }
    };

    for item in &mut trait_item.items {
        if let TraitItem::Fn(method) = item {
            method.attrs.retain(|attr| !is_marker(attr, METHOD_MARKERS));
            for input in &mut method.sig.inputs {
                if let FnArg::Typed(pat_type) = input {
                    pat_type.attrs.retain(|attr| !is_marker(attr, PARAM_MARKERS));
                }
            }
        }
    }

    Ok(quote! { #trait_item })
}

fn is_marker(attr: &Attribute, markers: &[&str]) -> bool {
    attr.path()
        .get_ident()
        .is_some_and(|ident| markers.iter().any(|marker| ident == marker))
}

/// Accepts `"name"`, `name = "..."` and `date_pattern = "..."`.
fn check_contract_args(attr: TokenStream) -> Result<()> {
    if attr.is_empty() {
        return Ok(());
    }

    let args = Punctuated::<Expr, Token![,]>::parse_terminated.parse2(attr)?;
    for arg in args {
        match &arg {
            Expr::Lit(lit) if matches!(lit.lit, Lit::Str(_)) => {}
            Expr::Assign(assign) => {
                let known = matches!(
                    &*assign.left,
                    Expr::Path(path) if CONTRACT_KEYS.iter().any(|key| path.path.is_ident(key))
                );
                if !known {
                    return Err(Error::new_spanned(
                        &assign.left,
                        "expected `name` or `date_pattern`",
                    ));
                }
            }
            other => {
                return Err(Error::new_spanned(
                    other,
                    "expected a string literal or `key = \"value\"`",
                ));
            }
        }
    }
    Ok(())
}
