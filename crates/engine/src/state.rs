//! Mutable form state.
//!
//! Created once at mount from the schema's defaults and initial data,
//! then mutated by user input, step navigation, and submission. The
//! error map only ever holds keys for fields that are visible and
//! currently failing; validation and navigation maintain that
//! invariant.

use std::collections::BTreeMap;

use intake_schema::{FieldDefinition, FieldKind, FormSchema};

use crate::config::EngineConfig;
use crate::files::{check_file, FileCheck, FileHandle};
use crate::values::{FormValues, Value};

/// Where the form is in its submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Submitted,
    Failed,
}

/// The whole mutable state of one mounted form.
#[derive(Debug, Clone)]
pub struct FormState {
    /// 1-based current step index.
    pub current_step: usize,
    pub values: FormValues,
    /// Accepted files per file field, in selection order.
    pub files: BTreeMap<String, Vec<FileHandle>>,
    /// Per-field error messages for visible failing fields.
    pub errors: BTreeMap<String, String>,
    pub status: SubmissionStatus,
}

impl Default for FormState {
    /// Empty state at step 1. The step index is 1-based even for state
    /// that never came from `mount`.
    fn default() -> FormState {
        FormState {
            current_step: 1,
            values: FormValues::new(),
            files: BTreeMap::new(),
            errors: BTreeMap::new(),
            status: SubmissionStatus::Idle,
        }
    }
}

impl FormState {
    /// Build initial state: per-field defaults first, then the schema's
    /// `initial_data` on top.
    pub fn mount(schema: &FormSchema) -> FormState {
        let mut values = FormValues::new();
        for field in &schema.fields {
            if let Some(value) = default_value(field) {
                values.insert(field.field_key.clone(), value);
            }
        }
        for (key, json) in &schema.initial_data {
            values.insert(key.clone(), Value::from_json(json));
        }
        FormState {
            values,
            ..FormState::default()
        }
    }

    pub fn value(&self, field_key: &str) -> Option<&Value> {
        self.values.get(field_key)
    }

    /// Store a value and drop the field's stale error, if any.
    pub fn set_value(&mut self, field_key: &str, value: Value) {
        self.values.insert(field_key.to_string(), value);
        self.errors.remove(field_key);
    }

    pub fn files_for(&self, field_key: &str) -> &[FileHandle] {
        self.files.get(field_key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Try to attach a file to a file field. The count limit is checked
    /// first; a refusal never disturbs already-accepted files. Size and
    /// type rules are checked per file.
    pub fn attach_file(
        &mut self,
        field: &FieldDefinition,
        file: FileHandle,
        config: &EngineConfig,
    ) -> FileCheck {
        let rules = match &field.kind {
            FieldKind::File { validation } => Some(validation),
            _ => None,
        };

        let max_files = rules
            .and_then(|r| r.max_files)
            .unwrap_or(config.max_files);
        let accepted = self.files_for(&field.field_key).len();
        if accepted >= max_files {
            return FileCheck::rejected(
                config
                    .messages
                    .render("file_limit", &[("max", max_files.to_string())]),
            );
        }

        let check = check_file(&file, rules, config.max_file_size_bytes, &config.messages);
        if check.valid {
            self.files
                .entry(field.field_key.clone())
                .or_default()
                .push(file);
            self.errors.remove(&field.field_key);
        }
        check
    }

    /// Remove one accepted file by position. Out-of-range indexes are
    /// ignored.
    pub fn remove_file(&mut self, field_key: &str, index: usize) {
        if let Some(list) = self.files.get_mut(field_key) {
            if index < list.len() {
                list.remove(index);
            }
        }
    }
}

/// The mount-time default for a field, if it declares one.
fn default_value(field: &FieldDefinition) -> Option<Value> {
    match &field.kind {
        FieldKind::Text { settings, .. }
        | FieldKind::Textarea { settings, .. }
        | FieldKind::Email { settings, .. }
        | FieldKind::Url { settings, .. }
        | FieldKind::Phone { settings, .. } => {
            settings.default_value.clone().map(Value::Text)
        }
        FieldKind::Number { settings, .. } => settings.default_value.map(Value::Number),
        FieldKind::Date { settings, .. } => settings.default_value.clone().map(Value::Text),
        FieldKind::Checkbox { settings, .. } => {
            settings.default_value.as_ref().map(Value::from_json)
        }
        FieldKind::File { .. } | FieldKind::Heading => None,
    }
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
                { "field_key": "name", "type": "text", "settings": { "default_value": "Anon" } },
                { "field_key": "years", "type": "number", "settings": { "default_value": 2 } },
                { "field_key": "consent", "type": "checkbox", "settings": { "default_value": false } },
                { "field_key": "cv", "type": "file", "validation": { "max_files": 1 } }
            ],
            "initial_data": { "name": "Robin" }
        }))
        .unwrap()
    }

    #[test]
    fn default_state_starts_at_step_one() {
        let state = FormState::default();
        assert_eq!(state.current_step, 1);
        assert_eq!(state.status, SubmissionStatus::Idle);
        assert!(state.values.is_empty());
    }

    #[test]
    fn mount_applies_defaults_then_initial_data() {
        let state = FormState::mount(&schema());
        assert_eq!(state.current_step, 1);
        assert_eq!(state.status, SubmissionStatus::Idle);
        assert_eq!(state.value("name"), Some(&Value::Text("Robin".to_string())));
        assert_eq!(state.value("years"), Some(&Value::Number(2.0)));
        assert_eq!(state.value("consent"), Some(&Value::Bool(false)));
        assert_eq!(state.value("cv"), None);
    }

    #[test]
    fn set_value_clears_stale_error() {
        let mut state = FormState::mount(&schema());
        state
            .errors
            .insert("name".to_string(), "This field is required.".to_string());
        state.set_value("name", Value::Text("Kim".to_string()));
        assert!(state.errors.is_empty());
    }

    #[test]
    fn attach_file_enforces_count_limit_without_disturbing_accepted() {
        let schema = schema();
        let config = EngineConfig::new("https://example.test/apply");
        let field = schema.field("cv").unwrap();
        let mut state = FormState::mount(&schema);

        let first = FileHandle::new("cv.pdf", "application/pdf", vec![0u8; 64]);
        assert!(state.attach_file(field, first, &config).valid);

        let second = FileHandle::new("extra.pdf", "application/pdf", vec![0u8; 64]);
        let check = state.attach_file(field, second, &config);
        assert!(!check.valid);
        assert!(check.message.unwrap().contains('1'));
        assert_eq!(state.files_for("cv").len(), 1);
        assert_eq!(state.files_for("cv")[0].name, "cv.pdf");
    }

    #[test]
    fn rejected_file_is_not_stored() {
        let schema = schema();
        let mut config = EngineConfig::new("https://example.test/apply");
        config.max_file_size_bytes = 16;
        let field = schema.field("cv").unwrap();
        let mut state = FormState::mount(&schema);

        let too_big = FileHandle::new("cv.pdf", "application/pdf", vec![0u8; 64]);
        assert!(!state.attach_file(field, too_big, &config).valid);
        assert!(state.files_for("cv").is_empty());
    }

    #[test]
    fn remove_file_by_index() {
        let schema = FormSchema::from_json(&json!({
            "fields": [{ "field_key": "docs", "type": "file" }]
        }))
        .unwrap();
        let config = EngineConfig::new("https://example.test/apply");
        let field = schema.field("docs").unwrap();
        let mut state = FormState::mount(&schema);
        for name in ["a.pdf", "b.pdf"] {
            state.attach_file(
                field,
                FileHandle::new(name, "application/pdf", vec![0u8; 8]),
                &config,
            );
        }
        state.remove_file("docs", 0);
        assert_eq!(state.files_for("docs").len(), 1);
        assert_eq!(state.files_for("docs")[0].name, "b.pdf");
        // Out-of-range removals are no-ops.
        state.remove_file("docs", 9);
        assert_eq!(state.files_for("docs").len(), 1);
    }
}
