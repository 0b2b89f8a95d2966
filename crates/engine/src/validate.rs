//! Type-dispatched field validation.
//!
//! One field validates in a fixed order: presence first (only when
//! required), then a trivial pass for empty optional values, then the
//! kind-specific checks. The first failure wins and becomes the
//! field's entry in the shared error map. Hidden fields are never
//! validated; the step and full-form wrappers consult the visibility
//! resolver and also clear stale errors for fields that have become
//! hidden, so the error map only ever names visible failing fields.

use std::sync::OnceLock;

use regex::Regex;
use time::macros::format_description;

use intake_schema::{
    CheckboxMode, DateRules, FieldDefinition, FieldKind, FormSchema, NumberRules, SelectionRules,
    TextRules,
};

use crate::config::EngineConfig;
use crate::messages::MessageCatalog;
use crate::state::FormState;
use crate::values::Value;
use crate::visibility;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"))
}

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://\S+$").expect("url regex"))
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9()\s\-]+$").expect("phone regex"))
}

/// Validate one field against the current state. Returns the error
/// message, or `None` when the field passes. Does not consult
/// visibility; callers skip hidden fields.
pub fn validate_field(
    field: &FieldDefinition,
    state: &FormState,
    catalog: &MessageCatalog,
) -> Option<String> {
    if !field.is_interactive() {
        return None;
    }

    let value = state.value(&field.field_key);
    let present = is_present(field, value, state);

    if !present {
        if field.is_required {
            return Some(required_message(field, catalog));
        }
        // Empty and optional: trivially valid, no further checks.
        return None;
    }

    match &field.kind {
        FieldKind::Text { validation, .. } | FieldKind::Textarea { validation, .. } => {
            check_text(value, validation, catalog)
        }
        FieldKind::Email { .. } => {
            let text = coerced(value);
            (!email_re().is_match(text.trim()))
                .then(|| contact_message(field, "invalid_email", catalog))
        }
        FieldKind::Url { .. } => {
            let text = coerced(value);
            (!url_re().is_match(text.trim()))
                .then(|| contact_message(field, "invalid_url", catalog))
        }
        FieldKind::Phone { .. } => {
            let text = coerced(value);
            let trimmed = text.trim();
            (!phone_re().is_match(trimmed) || trimmed.chars().count() < 6)
                .then(|| contact_message(field, "invalid_phone", catalog))
        }
        FieldKind::Number { validation, .. } => check_number(value, validation, catalog),
        FieldKind::Date { validation, .. } => check_date(value, validation, catalog),
        FieldKind::Checkbox {
            settings,
            validation,
        } => match settings.mode {
            CheckboxMode::Single => None,
            CheckboxMode::Multi => check_selections(value, validation, catalog),
        },
        // Size/type were enforced when the files were attached;
        // presence was enforced above.
        FieldKind::File { .. } => None,
        FieldKind::Heading => None,
    }
}

/// Validate one field and record the outcome in the error map. Returns
/// `true` when the field passes.
pub fn check_field(field: &FieldDefinition, state: &mut FormState, catalog: &MessageCatalog) -> bool {
    match validate_field(field, state, catalog) {
        Some(message) => {
            state.errors.insert(field.field_key.clone(), message);
            false
        }
        None => {
            state.errors.remove(&field.field_key);
            true
        }
    }
}

/// Validate the visible fields of the step at a 1-based position.
/// Hidden fields are skipped and their stale errors cleared.
pub fn validate_step(
    schema: &FormSchema,
    config: &EngineConfig,
    state: &mut FormState,
    position: usize,
) -> bool {
    let step_fields: Vec<String> = schema
        .fields_in_step(position)
        .iter()
        .map(|f| f.field_key.clone())
        .collect();
    let mut all_valid = true;
    for key in step_fields {
        if !check_visible_field(schema, config, state, &key) {
            all_valid = false;
        }
    }
    all_valid
}

/// Validate every visible interactive field in document order. Returns
/// the key of the first failing field, or `None` when the whole form is
/// valid.
pub fn validate_all(
    schema: &FormSchema,
    config: &EngineConfig,
    state: &mut FormState,
) -> Option<String> {
    let keys: Vec<String> = schema
        .fields
        .iter()
        .filter(|f| f.is_interactive())
        .map(|f| f.field_key.clone())
        .collect();
    let mut first_invalid = None;
    for key in keys {
        if !check_visible_field(schema, config, state, &key) && first_invalid.is_none() {
            first_invalid = Some(key);
        }
    }
    first_invalid
}

/// Validate one field if visible; clear its error if hidden. Returns
/// `true` unless the field is visible and failing.
fn check_visible_field(
    schema: &FormSchema,
    config: &EngineConfig,
    state: &mut FormState,
    field_key: &str,
) -> bool {
    if !visibility::is_visible(schema, field_key, &state.values) {
        state.errors.remove(field_key);
        return true;
    }
    match schema.field(field_key) {
        Some(field) => check_field(field, state, &config.messages),
        None => true,
    }
}

// ──────────────────────────────────────────────
// Presence
// ──────────────────────────────────────────────

/// Type-aware presence: booleans must be `true`, strings must contain
/// non-whitespace, lists must be non-empty, file fields must have at
/// least one accepted file, and missing values always fail.
fn is_present(field: &FieldDefinition, value: Option<&Value>, state: &FormState) -> bool {
    if matches!(field.kind, FieldKind::File { .. }) {
        return !state.files_for(&field.field_key).is_empty();
    }
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Text(s)) => !s.trim().is_empty(),
        Some(Value::List(items)) => !items.is_empty(),
        Some(Value::Number(_)) => true,
    }
}

fn required_message(field: &FieldDefinition, catalog: &MessageCatalog) -> String {
    if let Some(custom) = field.custom_error() {
        return custom.to_string();
    }
    if matches!(field.kind, FieldKind::File { .. }) {
        catalog.get("file_required")
    } else {
        catalog.get("required")
    }
}

fn contact_message(field: &FieldDefinition, key: &str, catalog: &MessageCatalog) -> String {
    field
        .custom_error()
        .map(str::to_string)
        .unwrap_or_else(|| catalog.get(key))
}

// ──────────────────────────────────────────────
// Kind-specific checks
// ──────────────────────────────────────────────

fn coerced(value: Option<&Value>) -> String {
    value.map(Value::coerce_text).unwrap_or_default()
}

fn check_text(
    value: Option<&Value>,
    rules: &TextRules,
    catalog: &MessageCatalog,
) -> Option<String> {
    let text = coerced(value);
    let count = text.chars().count();

    if let Some(min) = rules.min_length {
        if count < min {
            return Some(catalog.render("min_length", &[("min", min.to_string())]));
        }
    }
    if let Some(max) = rules.max_length {
        if count > max {
            return Some(catalog.render("max_length", &[("max", max.to_string())]));
        }
    }
    if let Some(pattern) = &rules.pattern {
        // An uncompilable pattern is a schema bug the lint reports; at
        // runtime the check is skipped rather than failing the field.
        if let Ok(re) = Regex::new(pattern) {
            if !re.is_match(&text) {
                return Some(
                    rules
                        .custom_error
                        .clone()
                        .unwrap_or_else(|| catalog.get("pattern")),
                );
            }
        }
    }
    None
}

fn check_number(
    value: Option<&Value>,
    rules: &NumberRules,
    catalog: &MessageCatalog,
) -> Option<String> {
    let number = match value.and_then(Value::as_number) {
        Some(n) if n.is_finite() => n,
        _ => return Some(catalog.get("invalid_number")),
    };
    if let Some(min) = rules.min {
        if number < min {
            return Some(catalog.render("number_min", &[("min", Value::Number(min).coerce_text())]));
        }
    }
    if let Some(max) = rules.max {
        if number > max {
            return Some(catalog.render("number_max", &[("max", Value::Number(max).coerce_text())]));
        }
    }
    None
}

fn check_date(
    value: Option<&Value>,
    rules: &DateRules,
    catalog: &MessageCatalog,
) -> Option<String> {
    let text = coerced(value);
    let trimmed = text.trim();
    let iso = format_description!("[year]-[month]-[day]");
    if time::Date::parse(trimmed, &iso).is_err() {
        return Some(catalog.get("invalid_date"));
    }
    // ISO dates order lexicographically, so bounds compare as strings.
    if let Some(min) = &rules.min_date {
        if trimmed < min.as_str() {
            return Some(catalog.render("date_min", &[("min", min.clone())]));
        }
    }
    if let Some(max) = &rules.max_date {
        if trimmed > max.as_str() {
            return Some(catalog.render("date_max", &[("max", max.clone())]));
        }
    }
    None
}

fn check_selections(
    value: Option<&Value>,
    rules: &SelectionRules,
    catalog: &MessageCatalog,
) -> Option<String> {
    let count = match value {
        Some(Value::List(items)) => items.len(),
        _ => return None,
    };
    if let Some(min) = rules.min_selections {
        if count < min {
            return Some(catalog.render("min_selections", &[("min", min.to_string())]));
        }
    }
    if let Some(max) = rules.max_selections {
        if count > max {
            return Some(catalog.render("max_selections", &[("max", max.to_string())]));
        }
    }
    None
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
