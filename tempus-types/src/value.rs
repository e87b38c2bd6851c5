use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload stored against an attribute for one time window.
///
/// # Examples
///
/// ```
/// use tempus_types::value::Value;
///
/// let weight = Value::from(13.37);
/// assert_eq!(weight.as_number(), Some(13.37));
///
/// // No payload means "the attribute is present".
/// assert_eq!(Value::combine(Vec::new()), Value::Flag(true));
///
/// let pair = Value::combine(vec![Value::from(1.0), Value::from("a")]);
/// assert_eq!(pair.as_composite().map(|v| v.len()), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Number(f64),
    Text(String),
    Flag(bool),
    /// Several payloads written together in one call.
    Composite(Vec<Value>),
}

impl Value {
    /// Fold the payload list of a single write into one value.
    ///
    /// An empty list becomes `Flag(true)`, a single payload is kept as is and
    /// anything longer becomes a `Composite`.
    pub fn combine(mut values: Vec<Value>) -> Self {
        match values.len() {
            0 => Value::Flag(true),
            1 => values.remove(0),
            _ => Value::Composite(values),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&[Value]> {
        match self {
            Value::Composite(values) => Some(values),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Flag(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Same folding as [`Value::combine`].
impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::combine(values)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Flag(b) => write!(f, "{}", b),
            Value::Composite(values) => {
                write!(f, "(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, ")")
            }
        }
    }
}
