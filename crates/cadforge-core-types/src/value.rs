//! Parameter values carried by structured commands

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ordered parameter mapping (name → value)
///
/// A BTreeMap keeps parameter iteration deterministic, which matters for
/// history export and replay comparisons.
pub type Params = BTreeMap<String, ParamValue>;

/// A single parameter value in a structured command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Numeric value (dimensions, angles, factors)
    Number(f64),
    /// Text value (axis names, labels)
    Text(String),
}

impl ParamValue {
    /// Interpret as a number, if this value is numeric
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Text(_) => None,
        }
    }

    /// Interpret as text, if this value is textual
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Number(_) => None,
            ParamValue::Text(s) => Some(s),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

/// Principal axis for rotations and translations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    /// Parse an axis name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Some(Axis::X),
            "Y" => Some(Axis::Y),
            "Z" => Some(Axis::Z),
            _ => None,
        }
    }

    /// Canonical single-letter name
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_value_accessors() {
        assert_eq!(ParamValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(ParamValue::Number(2.5).as_text(), None);
        assert_eq!(ParamValue::from("Z").as_text(), Some("Z"));
    }

    #[test]
    fn test_param_value_untagged_json() {
        let v: ParamValue = serde_json::from_str("10.5").unwrap();
        assert_eq!(v, ParamValue::Number(10.5));
        let v: ParamValue = serde_json::from_str("\"X\"").unwrap();
        assert_eq!(v, ParamValue::Text("X".to_string()));
    }

    #[test]
    fn test_axis_parse() {
        assert_eq!(Axis::parse("x"), Some(Axis::X));
        assert_eq!(Axis::parse(" Z "), Some(Axis::Z));
        assert_eq!(Axis::parse("w"), None);
    }
}
