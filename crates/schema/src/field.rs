//! Field, step, and conditional-logic definitions.
//!
//! A field's type-specific settings and validation rules form a closed
//! tagged union (`FieldKind`), so every consumer matches exhaustively
//! instead of probing for optional properties. The union is internally
//! tagged on the schema's `type` key; per-kind `settings` and
//! `validation` objects deserialize into their own structs with
//! defaults, so sparse schemas stay valid.

use serde::Deserialize;

// ──────────────────────────────────────────────
// Field definition
// ──────────────────────────────────────────────

/// One schema-defined input unit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldDefinition {
    /// Unique key identifying the field across the whole form.
    pub field_key: String,
    /// Human-readable label, used for rendering and generic messages.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub conditional_logic: Option<ConditionalLogic>,
    /// Owning step. Absent in single-step forms; in a multi-step form a
    /// field with no `step_id` belongs to no step and is excluded from
    /// per-step validation.
    #[serde(default)]
    pub step_id: Option<String>,
}

impl FieldDefinition {
    /// Whether the field accepts user input. Headings are display-only:
    /// never validated, never part of the submission payload.
    pub fn is_interactive(&self) -> bool {
        !matches!(self.kind, FieldKind::Heading)
    }

    /// The field-specific error message override, if configured.
    pub fn custom_error(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Text { validation, .. } | FieldKind::Textarea { validation, .. } => {
                validation.custom_error.as_deref()
            }
            FieldKind::Email { validation, .. }
            | FieldKind::Url { validation, .. }
            | FieldKind::Phone { validation, .. } => validation.custom_error.as_deref(),
            FieldKind::Number { validation, .. } => validation.custom_error.as_deref(),
            FieldKind::Date { validation, .. } => validation.custom_error.as_deref(),
            FieldKind::Checkbox { validation, .. } => validation.custom_error.as_deref(),
            FieldKind::File { validation, .. } => validation.custom_error.as_deref(),
            FieldKind::Heading => None,
        }
    }
}

// ──────────────────────────────────────────────
// Field kinds
// ──────────────────────────────────────────────

/// Closed union of field types with their per-kind settings and rules.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text {
        #[serde(default)]
        settings: TextSettings,
        #[serde(default)]
        validation: TextRules,
    },
    Textarea {
        #[serde(default)]
        settings: TextSettings,
        #[serde(default)]
        validation: TextRules,
    },
    Email {
        #[serde(default)]
        settings: TextSettings,
        #[serde(default)]
        validation: ContactRules,
    },
    Url {
        #[serde(default)]
        settings: TextSettings,
        #[serde(default)]
        validation: ContactRules,
    },
    Phone {
        #[serde(default)]
        settings: TextSettings,
        #[serde(default)]
        validation: ContactRules,
    },
    Number {
        #[serde(default)]
        settings: NumberSettings,
        #[serde(default)]
        validation: NumberRules,
    },
    Date {
        #[serde(default)]
        settings: DateSettings,
        #[serde(default)]
        validation: DateRules,
    },
    Checkbox {
        #[serde(default)]
        settings: CheckboxSettings,
        #[serde(default)]
        validation: SelectionRules,
    },
    File {
        #[serde(default)]
        validation: FileRules,
    },
    /// Non-interactive section heading.
    Heading,
}

impl FieldKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text { .. } => "text",
            FieldKind::Textarea { .. } => "textarea",
            FieldKind::Email { .. } => "email",
            FieldKind::Url { .. } => "url",
            FieldKind::Phone { .. } => "phone",
            FieldKind::Number { .. } => "number",
            FieldKind::Date { .. } => "date",
            FieldKind::Checkbox { .. } => "checkbox",
            FieldKind::File { .. } => "file",
            FieldKind::Heading => "heading",
        }
    }
}

// ──────────────────────────────────────────────
// Per-kind settings
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TextSettings {
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct NumberSettings {
    #[serde(default)]
    pub default_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DateSettings {
    /// ISO `YYYY-MM-DD` default.
    #[serde(default)]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CheckboxSettings {
    #[serde(default)]
    pub mode: CheckboxMode,
    /// Choice labels for multi mode. Empty for a single consent box.
    #[serde(default)]
    pub options: Vec<String>,
    /// `bool` in single mode, array of selected options in multi mode.
    #[serde(default)]
    pub default_value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckboxMode {
    #[default]
    Single,
    Multi,
}

// ──────────────────────────────────────────────
// Per-kind validation rules
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TextRules {
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Regular expression the full value must match.
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub custom_error: Option<String>,
}

/// Rules for email/url/phone fields, which carry only a format check.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ContactRules {
    #[serde(default)]
    pub custom_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct NumberRules {
    /// Inclusive lower bound.
    #[serde(default)]
    pub min: Option<f64>,
    /// Inclusive upper bound.
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub custom_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DateRules {
    /// Inclusive ISO `YYYY-MM-DD` bounds, compared lexicographically.
    #[serde(default)]
    pub min_date: Option<String>,
    #[serde(default)]
    pub max_date: Option<String>,
    #[serde(default)]
    pub custom_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SelectionRules {
    #[serde(default)]
    pub min_selections: Option<usize>,
    #[serde(default)]
    pub max_selections: Option<usize>,
    #[serde(default)]
    pub custom_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FileRules {
    /// Per-field override of the engine-wide maximum file size.
    #[serde(default)]
    pub max_file_size_bytes: Option<u64>,
    /// Allow-list entries: an extension (`pdf` / `.pdf`), an exact MIME
    /// type (`application/pdf`), or a MIME wildcard (`image/*`). Empty
    /// means any type is accepted.
    #[serde(default)]
    pub allowed_types: Vec<String>,
    /// Per-field override of the engine-wide file count limit.
    #[serde(default)]
    pub max_files: Option<usize>,
    #[serde(default)]
    pub custom_error: Option<String>,
}

// ──────────────────────────────────────────────
// Conditional logic
// ──────────────────────────────────────────────

/// Visibility rule set attached to a field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConditionalLogic {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// How condition results combine: `all` = AND, `any` = OR.
    #[serde(default, rename = "match")]
    pub match_mode: MatchMode,
    /// Whether a matching rule set shows or hides the field.
    #[serde(default)]
    pub action: VisibilityAction,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    All,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityAction {
    #[default]
    Show,
    Hide,
}

/// One test against another field's current value.
///
/// `operator` stays a raw string: unknown operators must deserialize
/// and evaluate permissively rather than fail the schema. The lint pass
/// reports operators outside the supported set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    /// Key of the field whose value is tested.
    pub field: String,
    pub operator: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

// ──────────────────────────────────────────────
// Steps
// ──────────────────────────────────────────────

/// A page of the form. Ordinal position is list order in the schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
