//! Runtime form values and loose coercion semantics.
//!
//! Form values come from user input and schema JSON, and conditions
//! compare them the way a browser form runtime would: numeric strings
//! equal numbers, anything coerces to a string, and non-numeric values
//! coerce to zero in ordering comparisons. These coercions are the
//! contract the condition evaluator is built on; keep them loose.

use std::collections::BTreeMap;

/// Current values of the whole form, keyed by field_key.
pub type FormValues = BTreeMap<String, Value>;

/// A single field's runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    /// Convert from schema/initial-data JSON. JSON objects have no
    /// meaning as a field value and collapse to `Null`.
    pub fn from_json(value: &serde_json::Value) -> Value {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(_) => Value::Null,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }

    /// Emptiness as the `is_empty` condition operator sees it: falsy or
    /// zero length. Note this is distinct from the required-field
    /// presence check, which trims whitespace.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => *n == 0.0 || n.is_nan(),
            Value::Text(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
        }
    }

    /// String coercion: booleans render as `true`/`false`, integral
    /// numbers without a fractional part, lists as comma-joined items.
    pub fn coerce_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(Value::coerce_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Numeric coercion for ordering comparisons. Non-numeric values
    /// coerce to 0.
    pub fn coerce_number(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }

    /// Strict-ish numeric reading: `None` when the value has no numeric
    /// interpretation (used to decide whether two values compare
    /// numerically or textually).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            Value::List(_) => None,
        }
    }

    /// Loose equality: same-type values compare directly; mixed types
    /// compare numerically when both sides read as numbers, otherwise
    /// by string coercion.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a == b,
                _ => self.coerce_text() == other.coerce_text(),
            },
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_string_equals_number() {
        assert!(Value::Text("42".to_string()).loose_eq(&Value::Number(42.0)));
        assert!(Value::Number(42.0).loose_eq(&Value::Text(" 42 ".to_string())));
        assert!(!Value::Text("42a".to_string()).loose_eq(&Value::Number(42.0)));
    }

    #[test]
    fn bool_coercions() {
        assert!(Value::Bool(true).loose_eq(&Value::Text("1".to_string())));
        assert!(Value::Bool(true).loose_eq(&Value::Text("true".to_string())));
        assert!(!Value::Bool(false).loose_eq(&Value::Bool(true)));
        assert_eq!(Value::Bool(true).coerce_text(), "true");
    }

    #[test]
    fn emptiness_is_falsy_or_zero_length() {
        assert!(Value::Null.is_empty());
        assert!(Value::Bool(false).is_empty());
        assert!(Value::Number(0.0).is_empty());
        assert!(Value::Text(String::new()).is_empty());
        assert!(Value::List(vec![]).is_empty());
        assert!(!Value::Text(" ".to_string()).is_empty());
        assert!(!Value::Number(-1.0).is_empty());
    }

    #[test]
    fn non_numeric_coerces_to_zero() {
        assert_eq!(Value::Text("abc".to_string()).coerce_number(), 0.0);
        assert_eq!(Value::Null.coerce_number(), 0.0);
        assert_eq!(Value::Text("3.5".to_string()).coerce_number(), 3.5);
    }

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(Value::Number(5.0).coerce_text(), "5");
        assert_eq!(Value::Number(5.25).coerce_text(), "5.25");
    }

    #[test]
    fn json_round_trip_drops_objects() {
        let v = Value::from_json(&serde_json::json!({"a": 1}));
        assert_eq!(v, Value::Null);
        let list = Value::from_json(&serde_json::json!(["a", 2, true]));
        assert_eq!(
            list,
            Value::List(vec![
                Value::Text("a".to_string()),
                Value::Number(2.0),
                Value::Bool(true)
            ])
        );
        assert_eq!(list.to_json(), serde_json::json!(["a", 2.0, true]));
    }
}
