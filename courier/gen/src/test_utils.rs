//! Shared test fixtures for courier-gen tests.

use courier_define::{
    BindingAnnotation, ContractDeclaration, HttpVerb, MethodDeclaration, ParameterDeclaration,
};
use proc_macro2::TokenStream;
use quote::quote;

use crate::assembler::{AdapterType, AssemblerOptions};
use crate::model::MethodModel;

/// A GET method declaration.
pub fn get(name: &str, path: &str, return_type: &str) -> MethodDeclaration {
    MethodDeclaration::new(name, return_type).with_verb(HttpVerb::Get, path)
}

/// A named parameter with a single binding marker.
pub fn param(name: &str, ty: &str, annotation: BindingAnnotation) -> ParameterDeclaration {
    ParameterDeclaration::new(name, ty).with_annotation(annotation)
}

/// Builds a method model, panicking on binding errors.
pub fn build_method(decl: MethodDeclaration) -> MethodModel {
    MethodModel::build(&decl, None).expect("method should build")
}

/// `UserClient { get_user(id) -> GET users/{id} }` served by `user-service`.
pub fn user_client() -> ContractDeclaration {
    ContractDeclaration::new("crate::users::UserClient", "user-service").with_method(
        get("get_user", "users/{id}", "Result<User, reqwest::Error>")
            .with_parameter(param("id", "u64", BindingAnnotation::Path(None))),
    )
}

/// An adapter with no methods for the given contract path and base name.
pub fn make_adapter(contract: &str, base_name: &str) -> AdapterType {
    let contract = ContractDeclaration::new(contract, base_name);
    AdapterType::new(&contract, "test", &AssemblerOptions::default())
}

/// Formats method-body statements by wrapping them in a function.
pub fn body_code(tokens: &TokenStream) -> String {
    file_code(&quote! {
        fn body() {
            #tokens
        }
    })
}

/// Formats inherent items by wrapping them in an `impl` block.
pub fn item_code(items: &[TokenStream]) -> String {
    file_code(&quote! {
        impl Probe {
            #(#items)*
        }
    })
}

/// Parses and formats a whole file.
pub fn file_code(tokens: &TokenStream) -> String {
    let file: syn::File = syn::parse2(tokens.clone()).expect("generated code should parse");
    prettyplease::unparse(&file)
}

/// Removes all whitespace, for assertions that must not depend on line breaks.
pub fn squash(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}
