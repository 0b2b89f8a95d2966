//! Structural lint over a form schema.
//!
//! The runtime is deliberately permissive: unknown condition operators
//! evaluate as a pass, conditions may reference fields that do not
//! exist, and a field may name a step that was never declared. None of
//! that fails the form. This pass is the distinguishable channel for
//! those misconfigurations: it walks the schema once and reports each
//! one as a structured finding the host can log or display.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::field::{CheckboxMode, FieldKind};
use crate::schema::FormSchema;

/// Condition operators the evaluator implements. Anything else passes
/// silently at runtime and is reported here as a warning.
pub const KNOWN_OPERATORS: [&str; 10] = [
    "equals",
    "not_equals",
    "contains",
    "not_contains",
    "greater_than",
    "less_than",
    "is_empty",
    "is_not_empty",
    "starts_with",
    "ends_with",
];

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FindingSeverity {
    Info,
    Warning,
}

/// One notable schema issue.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub severity: FindingSeverity,
    /// Key of the field the finding concerns, when field-scoped.
    pub field_key: Option<String>,
    pub message: String,
}

impl Finding {
    fn warning(field_key: &str, message: String) -> Finding {
        Finding {
            severity: FindingSeverity::Warning,
            field_key: Some(field_key.to_string()),
            message,
        }
    }

    fn info(field_key: &str, message: String) -> Finding {
        Finding {
            severity: FindingSeverity::Info,
            field_key: Some(field_key.to_string()),
            message,
        }
    }
}

/// Walk the schema and report structural problems. Never fails.
pub fn lint(schema: &FormSchema) -> Vec<Finding> {
    let mut findings = Vec::new();
    let known_keys: BTreeSet<&str> = schema.fields.iter().map(|f| f.field_key.as_str()).collect();

    let mut seen = BTreeSet::new();
    for field in &schema.fields {
        let key = field.field_key.as_str();

        if !seen.insert(key) {
            findings.push(Finding::warning(
                key,
                format!("duplicate field_key '{}'", key),
            ));
        }

        if let Some(step_id) = field.step_id.as_deref() {
            if schema.is_multi_step() && !schema.steps.iter().any(|s| s.id == step_id) {
                findings.push(Finding::warning(
                    key,
                    format!(
                        "step_id '{}' does not match any declared step; field is excluded from per-step validation",
                        step_id
                    ),
                ));
            }
        }

        if field.is_required && !field.is_interactive() {
            findings.push(Finding::info(
                key,
                "heading fields are display-only; is_required has no effect".to_string(),
            ));
        }

        lint_rules(field.field_key.as_str(), &field.kind, &mut findings);

        if let Some(logic) = &field.conditional_logic {
            if logic.enabled && logic.conditions.is_empty() {
                findings.push(Finding::info(
                    key,
                    "conditional_logic is enabled with no conditions; field is always visible"
                        .to_string(),
                ));
            }
            for cond in &logic.conditions {
                if !KNOWN_OPERATORS.contains(&cond.operator.as_str()) {
                    findings.push(Finding::warning(
                        key,
                        format!(
                            "unknown condition operator '{}'; the condition always passes",
                            cond.operator
                        ),
                    ));
                }
                if !known_keys.contains(cond.field.as_str()) {
                    findings.push(Finding::warning(
                        key,
                        format!(
                            "condition references field '{}' which is not in the schema; it evaluates against an empty value",
                            cond.field
                        ),
                    ));
                }
            }
        }
    }

    findings
}

/// Per-kind rule sanity checks: inverted bounds, uncompilable patterns.
fn lint_rules(key: &str, kind: &FieldKind, findings: &mut Vec<Finding>) {
    match kind {
        FieldKind::Text { validation, .. } | FieldKind::Textarea { validation, .. } => {
            if let (Some(min), Some(max)) = (validation.min_length, validation.max_length) {
                if min > max {
                    findings.push(Finding::warning(
                        key,
                        format!("min_length {} exceeds max_length {}", min, max),
                    ));
                }
            }
            if let Some(pattern) = &validation.pattern {
                if regex::Regex::new(pattern).is_err() {
                    findings.push(Finding::warning(
                        key,
                        format!(
                            "pattern '{}' is not a valid regular expression; the check is skipped",
                            pattern
                        ),
                    ));
                }
            }
        }
        FieldKind::Number { validation, .. } => {
            if let (Some(min), Some(max)) = (validation.min, validation.max) {
                if min > max {
                    findings.push(Finding::warning(
                        key,
                        format!("min {} exceeds max {}", min, max),
                    ));
                }
            }
        }
        FieldKind::Checkbox {
            settings,
            validation,
        } => {
            if let (Some(min), Some(max)) = (validation.min_selections, validation.max_selections)
            {
                if min > max {
                    findings.push(Finding::warning(
                        key,
                        format!("min_selections {} exceeds max_selections {}", min, max),
                    ));
                }
            }
            if settings.mode == CheckboxMode::Single
                && (validation.min_selections.is_some() || validation.max_selections.is_some())
            {
                findings.push(Finding::info(
                    key,
                    "selection bounds only apply to multi-mode checkboxes".to_string(),
                ));
            }
        }
        _ => {}
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
