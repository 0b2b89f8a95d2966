//! Single-condition evaluation against current form values.
//!
//! This is the leaf of the visibility pipeline: one condition, one
//! boolean, no side effects. A condition naming a field with no stored
//! value evaluates against `Null`; an operator outside the supported
//! set passes. Both lenient paths are reported by the schema lint, not
//! here.

use intake_schema::Condition;

use crate::values::{FormValues, Value};

/// Evaluate one condition. Never fails.
pub fn evaluate(condition: &Condition, values: &FormValues) -> bool {
    let actual = values
        .get(condition.field.as_str())
        .cloned()
        .unwrap_or(Value::Null);
    let expected = Value::from_json(&condition.value);

    match condition.operator.as_str() {
        "equals" => actual.loose_eq(&expected),
        "not_equals" => !actual.loose_eq(&expected),
        "contains" => contains(&actual, &expected),
        "not_contains" => !contains(&actual, &expected),
        "greater_than" => actual.coerce_number() > expected.coerce_number(),
        "less_than" => actual.coerce_number() < expected.coerce_number(),
        "is_empty" => actual.is_empty(),
        "is_not_empty" => !actual.is_empty(),
        "starts_with" => actual.coerce_text().starts_with(&expected.coerce_text()),
        "ends_with" => actual.coerce_text().ends_with(&expected.coerce_text()),
        // Unknown operators pass. Misconfigured logic must not lock a
        // field invisible.
        _ => true,
    }
}

/// Membership for lists, substring for everything else.
fn contains(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::List(items) => items.iter().any(|item| item.loose_eq(expected)),
        other => other.coerce_text().contains(&expected.coerce_text()),
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
