use std::collections::HashMap;

/// A value to place into a region
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Boolean(bool),
    #[default]
    Absent,
}

/// Values keyed by region name. Read-only to the renderer
pub type ValueMap = HashMap<String, Value>;

static ABSENT: Value = Value::Absent;

impl Value {
    /// Look a value up by region name; a missing entry is [Value::Absent]
    pub fn lookup<'a>(values: &'a ValueMap, name: &str) -> &'a Value {
        values.get(name).unwrap_or(&ABSENT)
    }

    /// The text drawn for this value. Whole numbers are written without a fractional
    /// part, absent values are empty.
    pub fn to_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Absent => String::new(),
        }
    }

    /// Only an actual boolean `true` checks a checkbox; the string `"true"` does not
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Boolean(true))
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
        Value::Boolean(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Absent)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Absent,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or_default(),
            serde_json::Value::String(s) => Value::Text(s),
            composite => Value::Text(composite.to_string()),
        }
    }
}
