//! Request planning shared by the reqwest backends.
//!
//! The two reqwest backends build identical requests; they differ only in
//! the client type and in whether transport calls are awaited. Everything
//! else lives here:
//!
//! 1. URL: placeholders are rendered, percent-encoded as path segments and
//!    joined to the adapter's base URL through its private `endpoint` helper
//! 2. Headers: `#[header]` parameters in declaration order, then `Accept`
//!    from the `produces` hint
//! 3. Query: `#[query]` parameters in declaration order; `None` is omitted
//!    and sequences repeat the key
//! 4. Body: the single `#[body]` parameter, encoded by the `consumes` kind
//! 5. Response: decoded according to the success type of the `Result`

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Type;

use crate::assembler::AdapterType;
use crate::backend::{AdapterScaffold, CallBody, FieldSpec};
use crate::date_pattern::DateFormat;
use crate::errors::{SynthesisError, TypeSlot};
use crate::model::types::{first_type_argument, result_ok_type};
use crate::model::{BindingRole, ContentKind, MethodModel, ParameterModel, TemporalKind, TypeShape};
use crate::parser::Segment;

/// Which flavour of reqwest the generated code drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Blocking,
    Async,
}

impl Transport {
    fn client_type(self) -> TokenStream {
        match self {
            Transport::Blocking => quote!(reqwest::blocking::Client),
            Transport::Async => quote!(reqwest::Client),
        }
    }

    fn awaited(self) -> TokenStream {
        match self {
            Transport::Blocking => TokenStream::new(),
            Transport::Async => quote!(.await),
        }
    }
}

/// Emits the body of `method` for `transport`.
pub fn emit_call(
    method: &MethodModel,
    transport: Transport,
    backend: &'static str,
) -> Result<CallBody, SynthesisError> {
    if method.is_async != (transport == Transport::Async) {
        return Err(SynthesisError::UnsupportedAsyncness {
            method: method.name.clone(),
            backend,
            is_async: method.is_async,
        });
    }
    let response = ResponsePlan::for_method(method)?;
    let route = Route::plan(method)?;
    let verb = format_ident!("{}", method.verb.to_string());
    let url = &route.url;
    let client = quote! { self.client.request(reqwest::Method::#verb, #url) };

    // parameters that never reach the request
    let mut statements: Vec<TokenStream> = method
        .parameters
        .iter()
        .filter(|parameter| match parameter.role {
            BindingRole::Unbound => true,
            BindingRole::PathVariable(_) => !method.references(parameter),
            _ => false,
        })
        .map(|parameter| {
            let ident = parameter.ident();
            quote! { let _ = &#ident; }
        })
        .collect();

    let mut steps = Vec::new();
    for parameter in method.parameters_where(|role| matches!(role, BindingRole::Header(_))) {
        let key = parameter.role.key().unwrap_or_default();
        let bound = bind_parameter(method, parameter, |value| {
            quote! { request = request.header(#key, #value); }
        })?;
        steps.push(bound);
    }
    if let Some(produces) = &method.produces {
        steps.push(quote! { request = request.header(reqwest::header::ACCEPT, #produces); });
    }

    let mut query = Vec::new();
    for parameter in method.parameters_where(|role| matches!(role, BindingRole::QueryParam(_))) {
        let key = parameter.role.key().unwrap_or_default();
        query.push(bind_parameter(method, parameter, |value| {
            quote! { query.push((#key, #value)); }
        })?);
    }
    if !query.is_empty() {
        steps.push(quote! {
            let mut query: Vec<(&str, String)> = Vec::new();
            #(#query)*
            request = request.query(&query);
        });
    }

    if let Some(body) = method.body() {
        steps.push(body_step(method, body)?);
    }

    statements.extend(route.prelude);
    if steps.is_empty() {
        statements.push(quote! { let request = #client; });
    } else {
        statements.push(quote! {
            let mut request = #client;
            #(#steps)*
        });
    }

    let awaited = transport.awaited();
    statements.push(quote! { let response = request.send()#awaited?; });
    statements.push(response.finish(transport));

    Ok(CallBody {
        tokens: quote! { #(#statements)* },
        encodes_path: route.encodes_path,
    })
}

/// Fields, constructors and helpers shared by both reqwest adapters.
pub fn scaffold(adapter: &AdapterType, transport: Transport) -> AdapterScaffold {
    let client = transport.client_type();
    let base_url = default_base_url(&adapter.base_name);

    let inherent = vec![
        quote! {
            /// Base URL used by [`Self::new`].
            pub const DEFAULT_BASE_URL: &str = #base_url;
        },
        quote! {
            /// Creates an adapter that sends requests to [`Self::DEFAULT_BASE_URL`].
            pub fn new(client: #client) -> Self {
                Self::with_base_url(client, Self::DEFAULT_BASE_URL)
            }
        },
        quote! {
            /// Creates an adapter that sends requests to `base_url`.
            pub fn with_base_url(client: #client, base_url: impl Into<String>) -> Self {
                Self {
                    client,
                    base_url: base_url.into(),
                }
            }
        },
        quote! {
            fn endpoint(&self, path: &str) -> String {
                format!(
                    "{}/{}",
                    self.base_url.trim_end_matches('/'),
                    path.trim_start_matches('/')
                )
            }
        },
    ];

    let items = if adapter.encodes_path() {
        vec![quote! {
            const PATH_SEGMENT: &percent_encoding::AsciiSet = &percent_encoding::CONTROLS
                .add(b' ')
                .add(b'"')
                .add(b'#')
                .add(b'%')
                .add(b'/')
                .add(b'<')
                .add(b'>')
                .add(b'?')
                .add(b'`')
                .add(b'{')
                .add(b'}');
        }]
    } else {
        Vec::new()
    };

    AdapterScaffold {
        fields: vec![
            FieldSpec::new("client", client),
            FieldSpec::new("base_url", quote!(String)),
        ],
        inherent,
        items,
    }
}

/// The contract name is a URL when it has a scheme, otherwise a host.
pub fn default_base_url(base_name: &str) -> String {
    let base_name = base_name.trim().trim_end_matches('/');
    if base_name.contains("://") {
        base_name.to_string()
    } else {
        format!("http://{base_name}")
    }
}

/// How the request URL is built.
struct Route {
    /// Statement computing `path`, when the template has placeholders.
    prelude: Option<TokenStream>,
    url: TokenStream,
    encodes_path: bool,
}

impl Route {
    fn plan(method: &MethodModel) -> Result<Self, SynthesisError> {
        if !method
            .segments
            .iter()
            .any(|segment| matches!(segment, Segment::Placeholder(_)))
        {
            let path = &method.path_template;
            return Ok(Self {
                prelude: None,
                url: quote! { self.endpoint(#path) },
                encodes_path: false,
            });
        }

        let mut format = String::new();
        let mut arguments = Vec::new();
        for segment in &method.segments {
            match segment {
                Segment::Literal(text) => format.push_str(text),
                Segment::Placeholder(name) => match method.resolve_placeholder(name) {
                    Some(parameter) => {
                        let ident = parameter.ident();
                        let rendered = render_leaf(&parameter.shape, quote!(#ident), &strftime_for(parameter))
                            .map_err(|reason| unsupported_parameter(method, parameter, reason))?;
                        format.push_str("{}");
                        arguments.push(quote! {
                            percent_encoding::utf8_percent_encode(&#rendered, PATH_SEGMENT)
                        });
                    }
                    None => {
                        format.push_str("{{");
                        format.push_str(name);
                        format.push_str("}}");
                    }
                },
            }
        }

        Ok(Self {
            prelude: Some(quote! { let path = format!(#format, #(#arguments),*); }),
            url: quote! { self.endpoint(&path) },
            encodes_path: true,
        })
    }
}

/// Emits the statements feeding one header or query parameter to `sink`.
///
/// `Option` values are guarded with `if let Some(..)` so `None` sends
/// nothing; sequences emit one entry per element.
fn bind_parameter(
    method: &MethodModel,
    parameter: &ParameterModel,
    sink: impl Fn(TokenStream) -> TokenStream,
) -> Result<TokenStream, SynthesisError> {
    let ident = parameter.ident();
    let value = match parameter.shape {
        TypeShape::Optional(_) | TypeShape::Sequence(_) => quote!(&#ident),
        _ => quote!(#ident),
    };
    bind_values(&parameter.shape, value, &strftime_for(parameter), &sink)
        .map_err(|reason| unsupported_parameter(method, parameter, reason))
}

fn bind_values(
    shape: &TypeShape,
    value: TokenStream,
    strftime: &str,
    sink: &dyn Fn(TokenStream) -> TokenStream,
) -> Result<TokenStream, String> {
    match shape {
        TypeShape::Optional(inner) => {
            let body = bind_values(inner, quote!(value), strftime, sink)?;
            Ok(quote! {
                if let Some(value) = #value {
                    #body
                }
            })
        }
        TypeShape::Sequence(inner) => {
            let body = bind_values(inner, quote!(item), strftime, sink)?;
            Ok(quote! {
                for item in #value {
                    #body
                }
            })
        }
        leaf => Ok(sink(render_leaf(leaf, value, strftime)?)),
    }
}

/// Renders a single value as a `String` expression.
fn render_leaf(shape: &TypeShape, value: TokenStream, strftime: &str) -> Result<TokenStream, String> {
    match shape {
        TypeShape::Text | TypeShape::Scalar | TypeShape::Named(_) => Ok(quote! { #value.to_string() }),
        TypeShape::Temporal(_) => Ok(quote! { #value.format(#strftime).to_string() }),
        TypeShape::Bytes => Err("byte buffers have no textual form".to_string()),
        TypeShape::Unit => Err("`()` carries no value".to_string()),
        TypeShape::Optional(_) | TypeShape::Sequence(_) => {
            Err("a path segment needs exactly one value".to_string())
        }
        TypeShape::Unsupported(reason) => Err(reason.clone()),
    }
}

/// The strftime string for a temporal parameter.
///
/// An explicit or contract-level format wins. Otherwise date-times use the
/// baseline format and plain dates or times use its date or time half.
fn strftime_for(parameter: &ParameterModel) -> String {
    if let Some(format) = &parameter.date_format {
        return format.strftime.clone();
    }
    let baseline = DateFormat::baseline().strftime;
    match parameter.shape.temporal_kind() {
        Some(TemporalKind::Date) => baseline.split('T').next().unwrap_or_default().to_string(),
        Some(TemporalKind::Time) => baseline.split('T').nth(1).unwrap_or_default().to_string(),
        _ => baseline,
    }
}

fn body_step(method: &MethodModel, parameter: &ParameterModel) -> Result<TokenStream, SynthesisError> {
    let ident = parameter.ident();
    let (optional, shape) = match &parameter.shape {
        TypeShape::Optional(inner) => (true, inner.as_ref()),
        shape => (false, shape),
    };
    let (borrowed, owned) = if optional {
        (quote!(body), quote!(body))
    } else {
        (quote!(&#ident), quote!(#ident))
    };

    let content_type = match method.consumes {
        ContentKind::Text => Some(declared_media_type(method, "text/plain; charset=utf-8")),
        ContentKind::Binary => Some(declared_media_type(method, "application/octet-stream")),
        ContentKind::Json | ContentKind::Form => None,
    };
    let content_type = content_type.map(|media_type| {
        quote! { request = request.header(reqwest::header::CONTENT_TYPE, #media_type); }
    });

    let reject = |reason: &str| Err(unsupported_parameter(method, parameter, reason.to_string()));
    let send = match (method.consumes, shape) {
        (_, TypeShape::Unit) => return reject("`()` carries no value"),
        (ContentKind::Json, _) => quote! { request = request.json(#borrowed); },
        (ContentKind::Form, _) => quote! { request = request.form(#borrowed); },
        (ContentKind::Text, TypeShape::Bytes | TypeShape::Sequence(_)) => {
            return reject("text bodies need a single `Display` value");
        }
        (ContentKind::Text, TypeShape::Unsupported(reason)) => return reject(reason.as_str()),
        (ContentKind::Text, _) => quote! { request = request.body(#owned.to_string()); },
        (ContentKind::Binary, TypeShape::Bytes) => quote! { request = request.body(#owned.to_vec()); },
        (ContentKind::Binary, _) => {
            return reject("binary bodies need `Vec<u8>`, `Bytes` or `&[u8]`");
        }
    };

    if optional {
        Ok(quote! {
            if let Some(body) = &#ident {
                #content_type
                #send
            }
        })
    } else {
        Ok(quote! {
            #content_type
            #send
        })
    }
}

/// The declared `consumes` media type, or `fallback` for the shorthand forms.
fn declared_media_type(method: &MethodModel, fallback: &str) -> String {
    match method.content_type.as_deref() {
        Some(declared) if declared.contains('/') => declared.to_string(),
        _ => fallback.to_string(),
    }
}

/// How the success value is produced from the response.
#[derive(Debug, Clone)]
enum ResponsePlan {
    Status,
    Text,
    Bytes { owned_vec: bool },
    Json(Type),
    Optional(Box<ResponsePlan>),
}

impl ResponsePlan {
    fn for_method(method: &MethodModel) -> Result<Self, SynthesisError> {
        let unsupported = |reason: &str| SynthesisError::UnsupportedType {
            method: method.name.clone(),
            slot: TypeSlot::Return,
            ty: method.return_type.to_string(),
            reason: reason.to_string(),
        };
        let ty: Type = syn::parse_str(method.return_type.as_str())
            .map_err(|_| unsupported("not a Rust type"))?;
        let ok = result_ok_type(&ty)
            .ok_or_else(|| unsupported("adapter methods must return a `Result`"))?;
        Self::for_type(ok).map_err(|reason| unsupported(&reason))
    }

    fn for_type(ty: &Type) -> Result<Self, String> {
        if matches!(ty, Type::Reference(_)) {
            return Err("borrowed values cannot be decoded from a response".to_string());
        }
        match TypeShape::classify(ty) {
            TypeShape::Unit if matches!(ty, Type::Tuple(_)) => Ok(ResponsePlan::Status),
            TypeShape::Text => Ok(ResponsePlan::Text),
            TypeShape::Bytes => Ok(ResponsePlan::Bytes {
                owned_vec: last_segment_is(ty, "Vec"),
            }),
            TypeShape::Optional(_) => match option_inner(ty) {
                Some(inner) => Ok(ResponsePlan::Optional(Box::new(Self::for_type(inner)?))),
                None => Ok(ResponsePlan::Json(ty.clone())),
            },
            TypeShape::Unsupported(reason) => Err(reason),
            _ => Ok(ResponsePlan::Json(ty.clone())),
        }
    }

    /// Statements ending in the method's `Ok(..)` expression.
    fn finish(&self, transport: Transport) -> TokenStream {
        match self {
            ResponsePlan::Status => quote! {
                response.error_for_status()?;
                Ok(())
            },
            ResponsePlan::Optional(inner) => {
                let value = inner.decode(transport);
                quote! {
                    if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Ok(None);
                    }
                    Ok(Some(#value))
                }
            }
            plan => {
                let value = plan.decode(transport);
                quote! { Ok(#value) }
            }
        }
    }

    fn decode(&self, transport: Transport) -> TokenStream {
        let awaited = transport.awaited();
        match self {
            ResponsePlan::Status => quote! { response.error_for_status().map(|_| ())? },
            ResponsePlan::Text => quote! { response.error_for_status()?.text()#awaited?.into() },
            ResponsePlan::Bytes { owned_vec: true } => {
                quote! { response.error_for_status()?.bytes()#awaited?.to_vec() }
            }
            ResponsePlan::Bytes { owned_vec: false } => {
                quote! { response.error_for_status()?.bytes()#awaited? }
            }
            ResponsePlan::Json(ty) => quote! { response.error_for_status()?.json::<#ty>()#awaited? },
            ResponsePlan::Optional(inner) => inner.decode(transport),
        }
    }
}

fn last_segment_is(ty: &Type, name: &str) -> bool {
    matches!(ty, Type::Path(path) if path.path.segments.last().is_some_and(|s| s.ident == name))
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let last = path.path.segments.last()?;
    if last.ident != "Option" {
        return None;
    }
    first_type_argument(&last.arguments)
}

fn unsupported_parameter(method: &MethodModel, parameter: &ParameterModel, reason: String) -> SynthesisError {
    SynthesisError::UnsupportedType {
        method: method.name.clone(),
        slot: TypeSlot::Parameter(parameter.reference()),
        ty: parameter.ty.to_string(),
        reason,
    }
}
