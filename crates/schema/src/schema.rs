//! The top-level form schema: field list, step list, initial data.
//!
//! Schemas arrive as JSON from the hosting application and are
//! deserialized once at form mount. All lookup helpers preserve
//! document order, which is also the order fields are rendered,
//! validated, and serialized in.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::SchemaError;
use crate::field::{FieldDefinition, Step};

/// A complete form schema as supplied by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormSchema {
    pub fields: Vec<FieldDefinition>,
    /// Ordered step list. Empty means a single-step form.
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Partial map of field_key to pre-filled value.
    #[serde(default)]
    pub initial_data: BTreeMap<String, serde_json::Value>,
}

impl FormSchema {
    /// Deserialize a schema from JSON.
    pub fn from_json(value: &serde_json::Value) -> Result<FormSchema, SchemaError> {
        serde_json::from_value(value.clone()).map_err(|e| SchemaError::Deserialize {
            message: e.to_string(),
        })
    }

    /// Look up a field by key. Returns `None` for unknown keys; callers
    /// treat unknown fields permissively (always visible, never
    /// validated).
    pub fn field(&self, field_key: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.field_key == field_key)
    }

    pub fn is_multi_step(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Number of steps, treating a step-less schema as one implicit step.
    pub fn total_steps(&self) -> usize {
        self.steps.len().max(1)
    }

    /// The step at a 1-based position.
    pub fn step_at(&self, position: usize) -> Option<&Step> {
        position.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    /// Interactive fields belonging to the step at a 1-based position,
    /// in document order.
    ///
    /// In a single-step form every interactive field belongs to the one
    /// implicit step. In a multi-step form, fields without a `step_id`
    /// (or with a `step_id` naming no declared step) belong to no step
    /// and are excluded here; they still take part in full-form
    /// validation and submission.
    pub fn fields_in_step(&self, position: usize) -> Vec<&FieldDefinition> {
        if !self.is_multi_step() {
            return if position == 1 {
                self.fields.iter().filter(|f| f.is_interactive()).collect()
            } else {
                Vec::new()
            };
        }
        match self.step_at(position) {
            Some(step) => self
                .fields
                .iter()
                .filter(|f| f.is_interactive() && f.step_id.as_deref() == Some(step.id.as_str()))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Interactive fields with no owning step in a multi-step form.
    pub fn unstepped_fields(&self) -> Vec<&FieldDefinition> {
        if !self.is_multi_step() {
            return Vec::new();
        }
        self.fields
            .iter()
            .filter(|f| {
                f.is_interactive()
                    && !f
                        .step_id
                        .as_deref()
                        .is_some_and(|id| self.steps.iter().any(|s| s.id == id))
            })
            .collect()
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
