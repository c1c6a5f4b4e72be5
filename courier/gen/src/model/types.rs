//! Classification of declared Rust types.
//!
//! Backends never look at raw type text; they decide what they can bind or
//! decode from the [`TypeShape`] computed here.

use courier_define::TypeRef;
use quote::ToTokens;
use syn::{GenericArgument, PathArguments, Type};

/// Date/time types whose values are rendered through a date format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    /// `NaiveDate`
    Date,
    /// `NaiveTime`
    Time,
    /// `NaiveDateTime`
    DateTime,
    /// `DateTime<Tz>`, the only kind with an offset.
    Zoned,
}

impl TemporalKind {
    pub fn type_name(self) -> &'static str {
        match self {
            TemporalKind::Date => "NaiveDate",
            TemporalKind::Time => "NaiveTime",
            TemporalKind::DateTime => "NaiveDateTime",
            TemporalKind::Zoned => "DateTime",
        }
    }
}

/// What a declared type looks like to a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// `()`
    Unit,
    /// `String`, `&str`, `Cow<str>`
    Text,
    /// Numbers, `bool`, `char` and other `Display` primitives.
    Scalar,
    /// chrono date/time values.
    Temporal(TemporalKind),
    /// `Vec<u8>`, `bytes::Bytes`, `&[u8]`
    Bytes,
    /// `Option<T>`
    Optional(Box<TypeShape>),
    /// `Vec<T>`, `&[T]`, `HashSet<T>`, ...
    Sequence(Box<TypeShape>),
    /// Any other named type; bound through `Display` or serde.
    Named(String),
    /// A type no backend can bind, with the reason.
    Unsupported(String),
}

const SCALARS: &[&str] = &[
    "bool", "char", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64", "i128",
    "isize", "f32", "f64", "Uuid", "NonZeroU32", "NonZeroU64", "Decimal", "IpAddr", "Url",
];
const TEXT: &[&str] = &["String", "str", "Cow"];
const SEQUENCES: &[&str] = &["Vec", "VecDeque", "HashSet", "BTreeSet"];
const NOT_RENDERABLE: &[&str] = &["SystemTime", "Instant", "Duration", "PathBuf", "Path"];

impl TypeShape {
    /// Classifies type text; text that does not parse is unsupported.
    pub fn of(ty: &TypeRef) -> Self {
        match syn::parse_str::<Type>(ty.as_str()) {
            Ok(parsed) => Self::classify(&parsed),
            Err(err) => TypeShape::Unsupported(format!("not a Rust type: {err}")),
        }
    }

    pub fn classify(ty: &Type) -> Self {
        match ty {
            Type::Tuple(tuple) if tuple.elems.is_empty() => TypeShape::Unit,
            Type::Tuple(_) => TypeShape::Unsupported("tuples have no wire representation".into()),
            Type::Paren(inner) => Self::classify(&inner.elem),
            Type::Group(inner) => Self::classify(&inner.elem),
            Type::Reference(reference) => match &*reference.elem {
                Type::Slice(slice) => Self::slice(&slice.elem),
                other => Self::classify(other),
            },
            Type::Slice(slice) => Self::slice(&slice.elem),
            Type::Path(path) if path.qself.is_none() => Self::path(&path.path),
            Type::ImplTrait(_) | Type::TraitObject(_) => {
                TypeShape::Unsupported("opaque types cannot be serialized".into())
            }
            Type::Array(_) => TypeShape::Unsupported("use a Vec instead of an array".into()),
            Type::BareFn(_) => TypeShape::Unsupported("function pointers cannot be sent".into()),
            other => TypeShape::Unsupported(format!(
                "`{}` has no wire representation",
                other.to_token_stream()
            )),
        }
    }

    fn slice(elem: &Type) -> Self {
        match Self::classify(elem) {
            TypeShape::Scalar if is_u8(elem) => TypeShape::Bytes,
            inner => TypeShape::Sequence(Box::new(inner)),
        }
    }

    fn path(path: &syn::Path) -> Self {
        let Some(last) = path.segments.last() else {
            return TypeShape::Unsupported("empty type path".into());
        };
        let name = last.ident.to_string();
        let first_arg = first_type_argument(&last.arguments);

        match name.as_str() {
            "Option" => match first_arg {
                Some(inner) => match Self::classify(inner) {
                    TypeShape::Optional(_) => {
                        TypeShape::Unsupported("nested Option is ambiguous".into())
                    }
                    inner => TypeShape::Optional(Box::new(inner)),
                },
                None => TypeShape::Unsupported("Option without a type argument".into()),
            },
            "Vec" if first_arg.is_some_and(is_u8) => TypeShape::Bytes,
            "Bytes" => TypeShape::Bytes,
            name if SEQUENCES.contains(&name) => match first_arg {
                Some(inner) => TypeShape::Sequence(Box::new(Self::classify(inner))),
                None => TypeShape::Unsupported(format!("{name} without a type argument")),
            },
            "Box" | "Arc" | "Rc" => match first_arg {
                Some(inner) => Self::classify(inner),
                None => TypeShape::Unsupported(format!("{name} without a type argument")),
            },
            "NaiveDate" => TypeShape::Temporal(TemporalKind::Date),
            "NaiveTime" => TypeShape::Temporal(TemporalKind::Time),
            "NaiveDateTime" => TypeShape::Temporal(TemporalKind::DateTime),
            "DateTime" => TypeShape::Temporal(TemporalKind::Zoned),
            name if TEXT.contains(&name) => TypeShape::Text,
            name if SCALARS.contains(&name) => TypeShape::Scalar,
            name if NOT_RENDERABLE.contains(&name) => {
                TypeShape::Unsupported(format!("{name} has no textual form"))
            }
            _ => TypeShape::Named(path.to_token_stream().to_string().replace(' ', "")),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, TypeShape::Optional(_))
    }

    pub fn is_temporal(&self) -> bool {
        self.temporal_kind().is_some()
    }

    /// The date/time kind, looking through `Option` and sequences.
    pub fn temporal_kind(&self) -> Option<TemporalKind> {
        match self {
            TypeShape::Temporal(kind) => Some(*kind),
            TypeShape::Optional(inner) | TypeShape::Sequence(inner) => inner.temporal_kind(),
            _ => None,
        }
    }
}

pub(crate) fn first_type_argument(arguments: &PathArguments) -> Option<&Type> {
    match arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    }
}

fn is_u8(ty: &Type) -> bool {
    matches!(ty, Type::Path(path) if path.path.is_ident("u8"))
}

/// Splits `Result<T, E>` (or a `...::Result<T>` alias) into its success type.
///
/// Returns `None` when the type is not a `Result`.
pub fn result_ok_type(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let last = path.path.segments.last()?;
    if last.ident != "Result" {
        return None;
    }
    first_type_argument(&last.arguments)
}
