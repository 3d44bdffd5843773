//! Declarative schema for configuration trees.
//!
//! A [`Schema`] is plain data: a list of [`Field`]s, each naming a key, whether
//! it is required, and the [`FieldKind`] constraints its value must satisfy.
//! [`validate`] walks a tree against it and collects every violation.

mod app;
mod validator;

pub use app::app_schema;
pub use validator::validate;

/// Root schema: the fields of the top-level object.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

/// One declared key of an object.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl Field {
    pub fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: true,
            kind,
        }
    }

    pub fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: false,
            kind,
        }
    }
}

/// Expected type of a value plus its constraints.
#[derive(Debug, Clone)]
pub enum FieldKind {
    String(StringRule),
    /// Whole number within optional inclusive bounds.
    Integer { min: Option<i64>, max: Option<i64> },
    /// Any number within optional inclusive bounds; `positive` requires `> 0`.
    Number {
        min: Option<f64>,
        max: Option<f64>,
        positive: bool,
    },
    Bool,
    Array(Box<FieldKind>),
    Object(Vec<Field>),
    /// Object with arbitrary keys and string values.
    StringMap,
    /// Value must satisfy at least one alternative.
    OneOf(Vec<FieldKind>),
}

/// Constraints on string values. Empty strings are always rejected.
#[derive(Debug, Clone, Default)]
pub struct StringRule {
    pub min_len: Option<usize>,
    pub allowed: Option<&'static [&'static str]>,
    pub format: StringFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StringFormat {
    #[default]
    Any,
    /// Absolute URI with a scheme.
    Uri,
    /// DNS hostname or IP address.
    Hostname,
}

impl FieldKind {
    /// Short description used in alternative-mismatch messages.
    pub fn describe(&self) -> String {
        match self {
            FieldKind::String(rule) => match rule.format {
                StringFormat::Any => "string".to_string(),
                StringFormat::Uri => "uri string".to_string(),
                StringFormat::Hostname => "hostname string".to_string(),
            },
            FieldKind::Integer { .. } => "integer".to_string(),
            FieldKind::Number { .. } => "number".to_string(),
            FieldKind::Bool => "bool".to_string(),
            FieldKind::Array(item) => format!("array of {}", item.describe()),
            FieldKind::Object(_) | FieldKind::StringMap => "object".to_string(),
            FieldKind::OneOf(kinds) => kinds
                .iter()
                .map(FieldKind::describe)
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }
}

pub fn string() -> FieldKind {
    FieldKind::String(StringRule::default())
}

pub fn string_min(min_len: usize) -> FieldKind {
    FieldKind::String(StringRule {
        min_len: Some(min_len),
        ..StringRule::default()
    })
}

pub fn one_of_strings(allowed: &'static [&'static str]) -> FieldKind {
    FieldKind::String(StringRule {
        allowed: Some(allowed),
        ..StringRule::default()
    })
}

pub fn uri() -> FieldKind {
    FieldKind::String(StringRule {
        format: StringFormat::Uri,
        ..StringRule::default()
    })
}

pub fn hostname() -> FieldKind {
    FieldKind::String(StringRule {
        format: StringFormat::Hostname,
        ..StringRule::default()
    })
}

pub fn integer_range(min: i64, max: i64) -> FieldKind {
    FieldKind::Integer {
        min: Some(min),
        max: Some(max),
    }
}

pub fn positive_integer() -> FieldKind {
    FieldKind::Integer {
        min: Some(1),
        max: None,
    }
}

/// Positive integer that fits a `u32` model field.
pub fn positive_u32() -> FieldKind {
    integer_range(1, i64::from(u32::MAX))
}

/// Non-negative integer that fits a `u32` model field.
pub fn non_negative_u32() -> FieldKind {
    integer_range(0, i64::from(u32::MAX))
}

/// TCP/UDP port number.
pub fn port() -> FieldKind {
    integer_range(0, 65535)
}

pub fn positive_number() -> FieldKind {
    FieldKind::Number {
        min: None,
        max: None,
        positive: true,
    }
}

/// Fraction in `0.0..=1.0`.
pub fn ratio() -> FieldKind {
    FieldKind::Number {
        min: Some(0.0),
        max: Some(1.0),
        positive: false,
    }
}

pub fn boolean() -> FieldKind {
    FieldKind::Bool
}

pub fn array_of(item: FieldKind) -> FieldKind {
    FieldKind::Array(Box::new(item))
}

pub fn object(fields: Vec<Field>) -> FieldKind {
    FieldKind::Object(fields)
}

pub fn string_map() -> FieldKind {
    FieldKind::StringMap
}

pub fn alternatives(kinds: Vec<FieldKind>) -> FieldKind {
    FieldKind::OneOf(kinds)
}
