//! Method model construction and validation.

use courier_define::{HttpVerb, MethodDeclaration, Receiver, TypeRef};

use crate::errors::ModelError;
use crate::model::parameter::{BindingRole, ParameterModel};
use crate::parser::{Segment, parse_template, placeholders, positional_index};

/// How the request body is encoded, from the `consumes` hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentKind {
    #[default]
    Json,
    Form,
    Text,
    Binary,
}

impl ContentKind {
    /// Maps a media type to a body encoding. Unknown types fall back to JSON.
    pub fn from_hint(hint: Option<&str>) -> Self {
        let Some(hint) = hint else {
            return ContentKind::Json;
        };
        let media_type = hint
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match media_type.as_str() {
            "application/x-www-form-urlencoded" | "form" => ContentKind::Form,
            "application/octet-stream" | "binary" => ContentKind::Binary,
            "text" => ContentKind::Text,
            other if other.starts_with("text/") => ContentKind::Text,
            _ => ContentKind::Json,
        }
    }
}

/// A validated contract method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodModel {
    pub name: String,
    pub verb: HttpVerb,
    pub path_template: String,
    pub segments: Vec<Segment>,
    pub consumes: ContentKind,
    /// The declared `consumes` media type, sent as `Content-Type` for text and binary bodies.
    pub content_type: Option<String>,
    pub produces: Option<String>,
    pub receiver: Receiver,
    pub is_async: bool,
    pub return_type: TypeRef,
    pub parameters: Vec<ParameterModel>,
    /// Non-fatal findings, e.g. a `#[path]` parameter the template never uses.
    pub warnings: Vec<String>,
}

impl MethodModel {
    /// Builds every parameter in order, then validates the set against the
    /// path template.
    ///
    /// ## Errors
    ///
    /// Structural problems (missing verb, missing receiver, malformed
    /// template), any parameter error, then in order: more than one body,
    /// a placeholder without a `#[path]` parameter, a placeholder bound by
    /// several parameters.
    pub fn build(
        decl: &MethodDeclaration,
        contract_date_pattern: Option<&str>,
    ) -> Result<Self, ModelError> {
        let method = decl.name.as_str();

        let Some(verb) = decl.verb else {
            return Err(ModelError::MissingVerb {
                method: method.to_string(),
            });
        };
        if decl.receiver == Receiver::None {
            return Err(ModelError::MissingReceiver {
                method: method.to_string(),
            });
        }

        let parameters = decl
            .parameters
            .iter()
            .enumerate()
            .map(|(index, param)| ParameterModel::build(param, index, method, contract_date_pattern))
            .collect::<Result<Vec<_>, _>>()?;

        let path_template = decl.path.clone().unwrap_or_default();
        let segments =
            parse_template(&path_template).map_err(|reason| ModelError::MalformedPathTemplate {
                method: method.to_string(),
                template: path_template.clone(),
                reason,
            })?;

        let bodies: Vec<String> = parameters
            .iter()
            .filter(|p| p.role == BindingRole::RequestBody)
            .map(|p| p.name.clone())
            .collect();
        if bodies.len() > 1 {
            return Err(ModelError::DuplicateBody {
                method: method.to_string(),
                parameters: bodies,
            });
        }

        let mut distinct: Vec<&str> = Vec::new();
        for name in placeholders(&segments) {
            if !distinct.contains(&name) {
                distinct.push(name);
            }
        }

        for placeholder in &distinct {
            if bound_parameters(&parameters, placeholder).is_empty() {
                return Err(ModelError::UnmatchedPlaceholder {
                    method: method.to_string(),
                    placeholder: placeholder.to_string(),
                });
            }
        }
        for placeholder in &distinct {
            let bound = bound_parameters(&parameters, placeholder);
            if bound.len() > 1 {
                return Err(ModelError::DuplicatePlaceholderBinding {
                    method: method.to_string(),
                    placeholder: placeholder.to_string(),
                    parameters: bound.iter().map(|p| p.name.clone()).collect(),
                });
            }
        }

        let mut warnings: Vec<String> = parameters
            .iter()
            .filter(|p| matches!(p.role, BindingRole::PathVariable(_)))
            .filter(|p| !distinct.iter().any(|name| binds(p, name)))
            .map(|p| {
                format!(
                    "#[path] parameter `{}` is not referenced by template \"{}\"",
                    p.name, path_template
                )
            })
            .collect();
        if let Some(pattern) = contract_date_pattern {
            for (param, model) in decl.parameters.iter().zip(&parameters) {
                let Some(kind) = model.shape.temporal_kind() else {
                    continue;
                };
                if param.date_format.is_none() && model.date_format.is_none() {
                    warnings.push(format!(
                        "date pattern \"{pattern}\" does not fit {} parameter `{}`, using the default format",
                        kind.type_name(),
                        model.name
                    ));
                }
            }
        }

        Ok(Self {
            name: method.to_string(),
            verb,
            path_template,
            segments,
            consumes: ContentKind::from_hint(decl.consumes.as_deref()),
            content_type: decl.consumes.clone(),
            produces: decl.produces.clone(),
            receiver: decl.receiver,
            is_async: decl.is_async,
            return_type: decl.return_type.clone(),
            parameters,
            warnings,
        })
    }

    /// The parameter bound to a placeholder. Unique once the model is built.
    pub fn resolve_placeholder(&self, placeholder: &str) -> Option<&ParameterModel> {
        self.parameters.iter().find(|p| binds(p, placeholder))
    }

    /// Whether some placeholder of the template is bound to `parameter`.
    pub fn references(&self, parameter: &ParameterModel) -> bool {
        placeholders(&self.segments).into_iter().any(|name| binds(parameter, name))
    }

    /// Parameters with the given role kind, in declaration order.
    pub fn parameters_where<'a>(
        &'a self,
        predicate: impl Fn(&BindingRole) -> bool + 'a,
    ) -> impl Iterator<Item = &'a ParameterModel> + 'a {
        self.parameters.iter().filter(move |p| predicate(&p.role))
    }

    pub fn body(&self) -> Option<&ParameterModel> {
        self.parameters.iter().find(|p| p.role == BindingRole::RequestBody)
    }
}

fn binds(parameter: &ParameterModel, placeholder: &str) -> bool {
    match &parameter.role {
        BindingRole::PathVariable(key) => {
            key == placeholder || positional_index(placeholder) == Some(parameter.index)
        }
        _ => false,
    }
}

fn bound_parameters<'a>(parameters: &'a [ParameterModel], placeholder: &str) -> Vec<&'a ParameterModel> {
    parameters.iter().filter(|p| binds(p, placeholder)).collect()
}
