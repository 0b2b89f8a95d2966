//! Field visibility as a derived computation.
//!
//! Visibility is a pure function of `(schema, values)`. It is
//! recomputed on demand rather than cached behind manual invalidation:
//! several fields can gate on overlapping condition sets, so any value
//! change can flip any field, and a stale cache is the one way this
//! design goes wrong. The computation is a handful of loose
//! comparisons per field; recomputing is cheap.

use intake_schema::{ConditionalLogic, FormSchema, MatchMode, VisibilityAction};

use crate::condition;
use crate::values::FormValues;

/// Whether the named field is currently shown.
///
/// Fields without conditional logic, with disabled logic, with an empty
/// condition list, or absent from the schema entirely are visible.
pub fn is_visible(schema: &FormSchema, field_key: &str, values: &FormValues) -> bool {
    match schema.field(field_key) {
        Some(field) => match &field.conditional_logic {
            Some(logic) => logic_allows(logic, values),
            None => true,
        },
        None => true,
    }
}

/// Keys of all currently visible interactive fields, in document order.
pub fn visible_keys(schema: &FormSchema, values: &FormValues) -> Vec<String> {
    schema
        .fields
        .iter()
        .filter(|f| f.is_interactive() && is_visible(schema, &f.field_key, values))
        .map(|f| f.field_key.clone())
        .collect()
}

fn logic_allows(logic: &ConditionalLogic, values: &FormValues) -> bool {
    if !logic.enabled || logic.conditions.is_empty() {
        return true;
    }
    let matched = match logic.match_mode {
        MatchMode::All => logic.conditions.iter().all(|c| condition::evaluate(c, values)),
        MatchMode::Any => logic.conditions.iter().any(|c| condition::evaluate(c, values)),
    };
    match logic.action {
        VisibilityAction::Show => matched,
        VisibilityAction::Hide => !matched,
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
