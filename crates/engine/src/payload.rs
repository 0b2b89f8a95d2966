//! Submission payload assembly.
//!
//! The payload is an ordered list of multipart parts derived from the
//! schema and the state at submit time. Visibility is re-resolved
//! here: a hidden field's stored value never reaches the wire. The
//! `_visible_fields` metadata part lists every key that was visible,
//! so the receiving side can tell "omitted because hidden" apart from
//! "omitted because empty".

use intake_schema::{FieldKind, FormSchema};

use crate::files::FileHandle;
use crate::state::FormState;
use crate::values::Value;
use crate::visibility;

/// Part key carrying the JSON array of visible field keys.
pub const VISIBLE_FIELDS_KEY: &str = "_visible_fields";

/// Part key for the anti-spam decoy input.
pub const DECOY_KEY: &str = "_decoy";

/// Part key for the anti-spam render timestamp.
pub const RENDERED_AT_KEY: &str = "_rendered_at";

/// One part of the multipart submission body.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadPart {
    /// A text part: scalar values, JSON-encoded lists, metadata.
    Field { key: String, value: String },
    /// A file part, keyed `field_key[]` so repeats form an array.
    File { key: String, file: FileHandle },
}

/// Anti-spam values rendered and populated outside the engine, read
/// from the DOM immediately before submit and passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoneypotCapture {
    /// The hidden decoy input's value (empty for humans).
    pub decoy_value: String,
    /// The page-load timestamp the collaborator rendered.
    pub rendered_at: String,
}

/// Build the multipart part list for the current state.
pub fn assemble(
    schema: &FormSchema,
    state: &FormState,
    honeypot: Option<&HoneypotCapture>,
) -> Vec<PayloadPart> {
    let mut parts = Vec::new();
    let mut visible = Vec::new();

    for field in &schema.fields {
        if !field.is_interactive() {
            continue;
        }
        if !visibility::is_visible(schema, &field.field_key, &state.values) {
            continue;
        }
        visible.push(field.field_key.clone());

        if matches!(field.kind, FieldKind::File { .. }) {
            for file in state.files_for(&field.field_key) {
                parts.push(PayloadPart::File {
                    key: format!("{}[]", field.field_key),
                    file: file.clone(),
                });
            }
            continue;
        }

        match state.value(&field.field_key) {
            None | Some(Value::Null) => {}
            Some(Value::List(items)) => {
                let json = serde_json::Value::Array(items.iter().map(Value::to_json).collect());
                parts.push(PayloadPart::Field {
                    key: field.field_key.clone(),
                    value: json.to_string(),
                });
            }
            Some(scalar) => {
                parts.push(PayloadPart::Field {
                    key: field.field_key.clone(),
                    value: scalar.coerce_text(),
                });
            }
        }
    }

    parts.push(PayloadPart::Field {
        key: VISIBLE_FIELDS_KEY.to_string(),
        value: serde_json::Value::Array(
            visible.into_iter().map(serde_json::Value::String).collect(),
        )
        .to_string(),
    });

    if let Some(capture) = honeypot {
        parts.push(PayloadPart::Field {
            key: DECOY_KEY.to_string(),
            value: capture.decoy_value.clone(),
        });
        parts.push(PayloadPart::Field {
            key: RENDERED_AT_KEY.to_string(),
            value: capture.rendered_at.clone(),
        });
    }

    parts
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> FormSchema {
        FormSchema::from_json(&json!({
            "fields": [
                { "field_key": "title", "type": "heading" },
                { "field_key": "name", "type": "text" },
                { "field_key": "remote", "type": "checkbox" },
                { "field_key": "skills", "type": "checkbox", "settings": { "mode": "multi" } },
                {
                    "field_key": "office",
                    "type": "text",
                    "conditional_logic": {
                        "action": "hide",
                        "conditions": [{ "field": "remote", "operator": "equals", "value": true }]
                    }
                },
                { "field_key": "cv", "type": "file" }
            ]
        }))
        .unwrap()
    }

    fn text_part<'a>(parts: &'a [PayloadPart], key: &str) -> Option<&'a str> {
        parts.iter().find_map(|p| match p {
            PayloadPart::Field { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    #[test]
    fn hidden_field_value_never_reaches_payload() {
        let schema = schema();
        let mut state = FormState::mount(&schema);
        state.set_value("remote", Value::Bool(true));
        state.set_value("office", Value::Text("Amsterdam HQ".to_string()));

        let parts = assemble(&schema, &state, None);
        assert!(text_part(&parts, "office").is_none());
        let visible = text_part(&parts, VISIBLE_FIELDS_KEY).unwrap();
        assert!(!visible.contains("office"));
        assert!(visible.contains("name"));
    }

    #[test]
    fn booleans_serialize_as_literal_strings() {
        let schema = schema();
        let mut state = FormState::mount(&schema);
        state.set_value("remote", Value::Bool(true));
        let parts = assemble(&schema, &state, None);
        assert_eq!(text_part(&parts, "remote"), Some("true"));
    }

    #[test]
    fn lists_serialize_as_json() {
        let schema = schema();
        let mut state = FormState::mount(&schema);
        state.set_value("remote", Value::Bool(false));
        state.set_value(
            "skills",
            Value::List(vec![
                Value::Text("rust".to_string()),
                Value::Text("sql".to_string()),
            ]),
        );
        let parts = assemble(&schema, &state, None);
        assert_eq!(text_part(&parts, "skills"), Some(r#"["rust","sql"]"#));
    }

    #[test]
    fn files_repeat_under_array_key() {
        let schema = schema();
        let mut state = FormState::mount(&schema);
        for name in ["cv.pdf", "letter.pdf"] {
            state
                .files
                .entry("cv".to_string())
                .or_default()
                .push(FileHandle::new(name, "application/pdf", vec![0u8; 4]));
        }
        let parts = assemble(&schema, &state, None);
        let file_keys: Vec<&str> = parts
            .iter()
            .filter_map(|p| match p {
                PayloadPart::File { key, .. } => Some(key.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(file_keys, vec!["cv[]", "cv[]"]);
    }

    #[test]
    fn heading_and_empty_fields_are_omitted_but_listed_when_visible() {
        let schema = schema();
        let state = FormState::mount(&schema);
        let parts = assemble(&schema, &state, None);
        assert!(text_part(&parts, "title").is_none());
        assert!(text_part(&parts, "name").is_none());
        let visible = text_part(&parts, VISIBLE_FIELDS_KEY).unwrap();
        // Headings are not payload fields; name was visible but empty.
        assert!(!visible.contains("title"));
        assert!(visible.contains("name"));
    }

    #[test]
    fn honeypot_values_pass_through_verbatim() {
        let schema = schema();
        let state = FormState::mount(&schema);
        let capture = HoneypotCapture {
            decoy_value: String::new(),
            rendered_at: "1756300000".to_string(),
        };
        let parts = assemble(&schema, &state, Some(&capture));
        assert_eq!(text_part(&parts, DECOY_KEY), Some(""));
        assert_eq!(text_part(&parts, RENDERED_AT_KEY), Some("1756300000"));
    }
}
