use std::fmt::Display;

/// A single table value after type inference.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Missing value
    Null,
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

/// Hashable view of a value used for row comparison.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub(crate) enum ValueKey<'a> {
    Null,
    Number(u64),
    Text(&'a str),
}

impl Value {
    /// Returns true for a missing value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the numeric payload, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Compares numbers by value: `-0.0` and `0.0` share a key.
    pub(crate) fn key(&self) -> ValueKey<'_> {
        match self {
            Value::Null => ValueKey::Null,
            Value::Number(number) if *number == 0.0 => ValueKey::Number(0f64.to_bits()),
            Value::Number(number) => ValueKey::Number(number.to_bits()),
            Value::Text(text) => ValueKey::Text(text),
        }
    }
}

impl Display for Value {
    /// Missing values render as the empty string, numbers in their shortest
    /// round-trip form (`3` rather than `3.0`).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Number(number) => write!(f, "{}", number),
            Value::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
