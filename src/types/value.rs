use std::borrow::Cow;
use std::fmt;

/// A frontmatter value as supplied by the host's metadata extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A UTF-8 string.
    Text(String),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A YAML sequence.
    List(Vec<Value>),
    /// An explicit null, or a shape the engine does not model.
    Null,
}

impl Value {
    /// Render this value as text a step pattern can be matched against.
    ///
    /// Returns `None` for values that can never match: empty text, zero,
    /// `NaN`, `false`, lists and nulls.
    #[must_use]
    pub fn as_match_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Text(s) if s.is_empty() => None,
            Value::Text(s) => Some(Cow::Borrowed(s)),
            Value::Int(0) | Value::Bool(false) => None,
            Value::Int(v) => Some(Cow::Owned(v.to_string())),
            Value::Float(v) if *v == 0.0 || v.is_nan() => None,
            Value::Float(v) if v.is_infinite() => Some(Cow::Borrowed(if *v > 0.0 {
                "Infinity"
            } else {
                "-Infinity"
            })),
            Value::Float(v) => Some(Cow::Owned(float_text(*v))),
            Value::Bool(true) => Some(Cow::Borrowed("true")),
            Value::List(_) | Value::Null => None,
        }
    }
}

/// Shortest round-trip digits, switching to exponent form (`1e+21`, `1e-7`)
/// outside `[1e-6, 1e21)` like a host script engine's number formatting.
fn float_text(v: f64) -> String {
    let magnitude = v.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return v.to_string();
    }
    let text = format!("{v:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => text,
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null | serde_json::Value::Object(_) => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(v) => write!(f, "\"{v}\""),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Null => write!(f, "null"),
        }
    }
}
