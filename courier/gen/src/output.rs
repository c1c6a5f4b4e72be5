//! Rendering and writing of generated adapters.
//!
//! ## Output Structure
//!
//! One module per adapter plus an index:
//! ```text
//! src/generated/
//! ├── mod.rs                    # `pub mod` line per adapter
//! ├── users_user_client_impl.rs
//! └── health_impl.rs
//! ```
//!
//! ## Safety Guarantees
//!
//! - **Validation**: generated code is parsed with `syn` before it is written
//! - **Formatting**: output is formatted with `prettyplease`
//! - **Atomic writes**: temp file + rename, so readers never see partial files

use std::fs;
use std::path::{Path, PathBuf};

use proc_macro2::TokenStream;
use quote::quote;
use tracing::info;

use crate::assembler::AdapterType;
use crate::diagnostics::{DiagnosticContext, Diagnostics};
use crate::errors::GeneratorError;

const GENERATED_NOTICE: &str = "// This code was automatically generated by courier-gen. Do not edit manually.";

/// Validates generated code using syn.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the code fails to parse.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Formats a parsed file with prettyplease, prepending the generated notice.
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!("{}\n\n{}", GENERATED_NOTICE, formatted)
}

/// Validated, formatted source of one adapter module.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` when the adapter does not render
/// to valid Rust.
pub fn render_adapter(adapter: &AdapterType) -> Result<String, GeneratorError> {
    let tokens = adapter.to_tokens()?;
    let file = validate_code(&tokens)?;
    Ok(format_code(&file))
}

/// `mod.rs` declaring every rendered module, in the given order.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if a module name is not an identifier.
pub fn render_mod_index(modules: &[String]) -> Result<String, GeneratorError> {
    let declarations = modules
        .iter()
        .map(|module| {
            let ident: syn::Ident = syn::parse_str(module).map_err(|e| {
                GeneratorError::CodeGenError(format!("Invalid module name `{}`: {}", module, e))
            })?;
            Ok(quote! { pub mod #ident; })
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;
    let file = validate_code(&quote! { #(#declarations)* })?;
    Ok(format_code(&file))
}

/// Writes content to a file atomically using temp file + rename.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if:
/// - Parent directories cannot be created
/// - The temp file cannot be written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Renders and writes every adapter plus `mod.rs` into `output_dir`.
///
/// A failure to render or write one adapter is reported against its
/// contract and does not stop the others. `mod.rs` lists only the modules
/// that were produced. With `dry_run`, files are printed instead.
///
/// Returns the paths written (or that would have been written).
pub fn write_adapters(
    adapters: &[AdapterType],
    output_dir: &Path,
    dry_run: bool,
    diagnostics: &mut Diagnostics,
) -> Vec<PathBuf> {
    let mut written = Vec::new();
    let mut modules = Vec::new();

    for adapter in adapters {
        let module = adapter.module_name();
        let path = output_dir.join(format!("{}.rs", module));
        let result = render_adapter(adapter).and_then(|content| emit(&path, &content, dry_run));
        match result {
            Ok(()) => {
                info!(adapter = %adapter.name, path = %path.display(), "Wrote adapter");
                modules.push(module);
                written.push(path);
            }
            Err(err) => diagnostics.error(err.to_string(), DiagnosticContext::contract(&adapter.contract_path)),
        }
    }

    let index_path = output_dir.join("mod.rs");
    match render_mod_index(&modules).and_then(|content| emit(&index_path, &content, dry_run)) {
        Ok(()) => written.push(index_path),
        Err(err) => diagnostics.error(err.to_string(), DiagnosticContext::contract(index_path.display().to_string())),
    }

    written
}

fn emit(path: &Path, content: &str, dry_run: bool) -> Result<(), GeneratorError> {
    if dry_run {
        println!("=== {} ===\n{}\n", path.display(), content);
        Ok(())
    } else {
        write_atomic(path, content)
    }
}
