use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar kind of a registered option (or of each element of an array option).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Str,
    Int,
    Float,
    Bool,
}

impl OptionKind {
    pub fn name(self) -> &'static str {
        match self {
            OptionKind::Str => "string",
            OptionKind::Int => "int",
            OptionKind::Float => "float",
            OptionKind::Bool => "bool",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<OptionValue>),
}

impl OptionValue {
    /// Kind of the value; `None` for arrays.
    pub fn kind(&self) -> Option<OptionKind> {
        match self {
            OptionValue::Str(_) => Some(OptionKind::Str),
            OptionValue::Int(_) => Some(OptionKind::Int),
            OptionValue::Float(_) => Some(OptionKind::Float),
            OptionValue::Bool(_) => Some(OptionKind::Bool),
            OptionValue::Array(_) => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind().map_or("array", OptionKind::name)
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Str(s) => write!(f, "{s:?}"),
            OptionValue::Int(i) => write!(f, "{i}"),
            OptionValue::Float(x) => write!(f, "{x:?}"),
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Array(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Str(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Str(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Float(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}
