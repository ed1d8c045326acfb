//! Setting values.
//!
//! Defaults and overrides may hold values of any shape, so settings are
//! represented by an open, tagged [`SettingValue`]. Type requirements are only
//! checked where a typed getter needs them (see [`TypeRequirement`]).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single setting value, as found in a defaults table or an override store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Explicitly empty value.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Text, including dotted import paths and model references.
    String(String),
    /// Ordered sequence, e.g. a list of `(value, label)` pairs.
    List(Vec<SettingValue>),
    /// Nested key/value table.
    Table(BTreeMap<String, SettingValue>),
}

/// The kind of a [`SettingValue`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    /// [`SettingValue::Null`]
    Null,
    /// [`SettingValue::Bool`]
    Bool,
    /// [`SettingValue::Integer`]
    Integer,
    /// [`SettingValue::Float`]
    Float,
    /// [`SettingValue::String`]
    String,
    /// [`SettingValue::List`]
    List,
    /// [`SettingValue::Table`]
    Table,
}

impl ValueKind {
    /// Lower-case name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::List => "list",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl SettingValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::List(_) => ValueKind::List,
            Self::Table(_) => ValueKind::Table,
        }
    }

    /// Returns the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an integer.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the boolean payload, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Parses a value written as a TOML literal (`42`, `true`, `"text"`,
    /// `[1, 2]`). Anything that is not a valid literal is kept as a plain string.
    ///
    /// Used for sources that only carry text, such as environment variables.
    #[must_use]
    pub fn parse_literal(raw: &str) -> Self {
        toml::from_str::<toml::Table>(&format!("v = {raw}"))
            .ok()
            .and_then(|mut table| table.remove("v"))
            .map_or_else(|| Self::String(raw.to_string()), Self::from)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "'{s}'"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Table(entries) => {
                f.write_str("{")?;
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// TOML datetimes become their RFC 3339 text.
impl From<toml::Value> for SettingValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Self::String(s),
            toml::Value::Integer(i) => Self::Integer(i),
            toml::Value::Float(x) => Self::Float(x),
            toml::Value::Boolean(b) => Self::Bool(b),
            toml::Value::Datetime(dt) => Self::String(dt.to_string()),
            toml::Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            toml::Value::Table(entries) => Self::Table(
                entries
                    .into_iter()
                    .map(|(key, item)| (key, Self::from(item)))
                    .collect(),
            ),
        }
    }
}

impl<T: Into<Self>> From<Vec<T>> for SettingValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// The value kind(s) a lookup requires.
///
/// A requirement is either a single kind or a set of acceptable kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRequirement {
    /// Exactly this kind.
    One(ValueKind),
    /// Any of these kinds.
    AnyOf(Vec<ValueKind>),
}

impl TypeRequirement {
    /// Returns `true` if `value` satisfies this requirement.
    #[must_use]
    pub fn accepts(&self, value: &SettingValue) -> bool {
        match self {
            Self::One(kind) => value.kind() == *kind,
            Self::AnyOf(kinds) => kinds.contains(&value.kind()),
        }
    }

    /// Builds the human-readable part of a type mismatch message.
    #[must_use]
    pub fn mismatch_text(&self, found: ValueKind) -> String {
        match self {
            Self::One(kind) => format!(
                "The value is expected to be a '{kind}', but a value of type '{found}' was found."
            ),
            Self::AnyOf(kinds) => {
                let names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
                format!(
                    "The value is expected to be one of the following types, but a value of \
                     type '{found}' was found: {}.",
                    names.join(", ")
                )
            }
        }
    }
}

impl From<ValueKind> for TypeRequirement {
    fn from(kind: ValueKind) -> Self {
        Self::One(kind)
    }
}

impl<const N: usize> From<[ValueKind; N]> for TypeRequirement {
    fn from(kinds: [ValueKind; N]) -> Self {
        Self::AnyOf(kinds.to_vec())
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
