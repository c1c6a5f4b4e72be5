//! Parameter model construction.

use courier_define::{BindingAnnotation, ParameterDeclaration, TypeRef};
use proc_macro2::Ident;

use crate::date_pattern::DateFormat;
use crate::errors::{DatePatternError, ModelError, ParameterRef};
use crate::model::types::TypeShape;

/// The part of the HTTP request a parameter feeds.
///
/// Keyed roles carry the wire name: placeholder, query key or header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingRole {
    PathVariable(String),
    QueryParam(String),
    Header(String),
    RequestBody,
    Unbound,
}

impl BindingRole {
    pub fn key(&self) -> Option<&str> {
        match self {
            BindingRole::PathVariable(key) | BindingRole::QueryParam(key) | BindingRole::Header(key) => {
                Some(key)
            }
            BindingRole::RequestBody | BindingRole::Unbound => None,
        }
    }
}

/// One formal parameter, ready for synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterModel {
    /// Identifier used in the generated signature.
    pub name: String,
    /// 0-based position in the declaration.
    pub index: usize,
    pub role: BindingRole,
    pub ty: TypeRef,
    pub shape: TypeShape,
    /// Per-parameter override, else the contract default when it fits the
    /// type. Only set for temporal types; `None` means the backend baseline
    /// applies.
    pub date_format: Option<DateFormat>,
}

impl ParameterModel {
    /// Builds the model for the parameter at `index` of `method`.
    ///
    /// ## Errors
    ///
    /// - [`ModelError::InvalidParameterName`] when the name is not an identifier
    /// - [`ModelError::AmbiguousBinding`] when more than one binding marker is present
    /// - [`ModelError::InvalidDatePattern`] when the effective date pattern does not parse,
    ///   or when a `#[date_format]` override prints fields the type lacks
    pub fn build(
        decl: &ParameterDeclaration,
        index: usize,
        method: &str,
        contract_date_pattern: Option<&str>,
    ) -> Result<Self, ModelError> {
        let name = decl.name.clone().unwrap_or_else(|| format!("arg{index}"));
        let reference = ParameterRef::new(&name, index);

        if syn::parse_str::<Ident>(&name).is_err() {
            return Err(ModelError::InvalidParameterName {
                method: method.to_string(),
                parameter: reference,
            });
        }

        let role = match decl.annotations.as_slice() {
            [] => BindingRole::Unbound,
            [annotation] => role_for(annotation, &name),
            many => {
                return Err(ModelError::AmbiguousBinding {
                    method: method.to_string(),
                    parameter: reference,
                    roles: many.iter().map(BindingAnnotation::attribute_name).collect(),
                });
            }
        };

        let shape = TypeShape::of(&decl.ty);
        let date_format = match shape.temporal_kind() {
            Some(kind) => {
                let invalid = |source: DatePatternError| ModelError::InvalidDatePattern {
                    method: method.to_string(),
                    parameter: reference.clone(),
                    source,
                };
                match (decl.date_format.as_deref(), contract_date_pattern) {
                    (Some(pattern), _) => {
                        let format = DateFormat::parse(pattern).map_err(invalid)?;
                        if !format.fits(kind) {
                            return Err(invalid(DatePatternError::Incompatible {
                                pattern: format.pattern,
                                type_name: kind.type_name(),
                            }));
                        }
                        Some(format)
                    }
                    // a contract default that does not fit leaves the baseline in charge
                    (None, Some(pattern)) => Some(DateFormat::parse(pattern).map_err(invalid)?)
                        .filter(|format| format.fits(kind)),
                    (None, None) => None,
                }
            }
            None => None,
        };

        Ok(Self {
            name,
            index,
            role,
            ty: decl.ty.clone(),
            shape,
            date_format,
        })
    }

    /// The parameter's identifier token. Validated when the model is built.
    pub fn ident(&self) -> Ident {
        syn::parse_str(&self.name).unwrap_or_else(|_| quote::format_ident!("arg{}", self.index))
    }

    pub fn reference(&self) -> ParameterRef {
        ParameterRef::new(&self.name, self.index)
    }
}

fn role_for(annotation: &BindingAnnotation, name: &str) -> BindingRole {
    let wire_name = name.strip_prefix("r#").unwrap_or(name);
    match annotation {
        BindingAnnotation::Path(key) => {
            BindingRole::PathVariable(key.clone().unwrap_or_else(|| wire_name.to_string()))
        }
        BindingAnnotation::Query(key) => {
            BindingRole::QueryParam(key.clone().unwrap_or_else(|| wire_name.to_string()))
        }
        BindingAnnotation::Header(key) => {
            BindingRole::Header(key.clone().unwrap_or_else(|| wire_name.replace('_', "-")))
        }
        BindingAnnotation::Body => BindingRole::RequestBody,
    }
}
