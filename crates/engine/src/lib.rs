//! Schema-driven application form engine.
//!
//! The engine drives a multi-step form from a server-supplied schema:
//! it resolves per-field conditional visibility, validates fields by
//! type, gates step navigation on validation outcomes, manages
//! per-field file attachments under size/count/type constraints, and
//! assembles a visibility-aware multipart submission payload.
//!
//! Everything is synchronous and side-effect-free apart from mutating
//! the [`FormState`] passed in; the one async operation is the network
//! submission behind the [`Submitter`](submit::Submitter) seam.
//! Construction takes the schema and an explicit [`EngineConfig`];
//! there is no ambient state.

pub mod condition;
pub mod config;
pub mod files;
pub mod messages;
pub mod navigator;
pub mod payload;
pub mod state;
pub mod submit;
pub mod validate;
pub mod values;
pub mod visibility;

pub use config::EngineConfig;
pub use files::{FileCheck, FileHandle, DEFAULT_MAX_FILES, DEFAULT_MAX_FILE_BYTES};
pub use messages::MessageCatalog;
pub use payload::{HoneypotCapture, PayloadPart};
pub use state::{FormState, SubmissionStatus};
pub use submit::{
    StaticSubmitter, SubmissionCoordinator, SubmitError, SubmitOutcome, SubmitReply, Submitter,
};
pub use values::{FormValues, Value};

#[cfg(feature = "client")]
pub use submit::HttpSubmitter;

use intake_schema::{FieldDefinition, FormSchema};

/// One mounted form: the schema plus runtime configuration. State is
/// owned by the host and passed into each call, so the engine itself
/// stays immutable after construction.
pub struct FormEngine {
    schema: FormSchema,
    config: EngineConfig,
}

impl FormEngine {
    pub fn new(schema: FormSchema, config: EngineConfig) -> FormEngine {
        FormEngine { schema, config }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the initial state from schema defaults and initial data.
    pub fn mount(&self) -> FormState {
        FormState::mount(&self.schema)
    }

    /// Whether a field is currently shown, derived from the schema and
    /// the state's values.
    pub fn is_visible(&self, field_key: &str, state: &FormState) -> bool {
        visibility::is_visible(&self.schema, field_key, &state.values)
    }

    /// Store a user-entered value, clearing the field's stale error.
    ///
    /// A value change can flip the visibility of any field, so errors
    /// that now name hidden fields are dropped here as well: the error
    /// map only ever holds visible failing fields.
    pub fn set_value(&self, state: &mut FormState, field_key: &str, value: Value) {
        state.set_value(field_key, value);
        let hidden: Vec<String> = state
            .errors
            .keys()
            .filter(|key| !visibility::is_visible(&self.schema, key, &state.values))
            .cloned()
            .collect();
        for key in hidden {
            state.errors.remove(&key);
        }
    }

    /// Validate one field immediately (for on-blur feedback), writing
    /// the outcome into the error map. Hidden fields always pass.
    pub fn validate_field(&self, state: &mut FormState, field_key: &str) -> bool {
        if !self.is_visible(field_key, state) {
            state.errors.remove(field_key);
            return true;
        }
        match self.schema.field(field_key) {
            Some(field) => validate::check_field(field, state, &self.config.messages),
            None => true,
        }
    }

    /// Attach a file to a file field, enforcing count, size, and type
    /// constraints.
    pub fn attach_file(
        &self,
        state: &mut FormState,
        field_key: &str,
        file: FileHandle,
    ) -> FileCheck {
        match self.schema.field(field_key) {
            Some(field) => state.attach_file(field, file, &self.config),
            None => FileCheck::rejected(format!("unknown field '{}'", field_key)),
        }
    }

    pub fn remove_file(&self, state: &mut FormState, field_key: &str, index: usize) {
        state.remove_file(field_key, index);
    }

    pub fn next_step(&self, state: &mut FormState) -> bool {
        navigator::next_step(&self.schema, &self.config, state)
    }

    pub fn prev_step(&self, state: &mut FormState) {
        navigator::prev_step(state);
    }

    pub fn go_to_step(&self, state: &mut FormState, target: usize) -> usize {
        navigator::go_to_step(&self.schema, &self.config, state, target)
    }

    pub fn progress_percent(&self, state: &FormState) -> u8 {
        navigator::progress_percent(&self.schema, state)
    }

    /// Validate every visible field; returns the first failing key in
    /// document order.
    pub fn validate_all(&self, state: &mut FormState) -> Option<String> {
        validate::validate_all(&self.schema, &self.config, state)
    }

    /// Assemble the multipart payload for the current state.
    pub fn assemble_payload(
        &self,
        state: &FormState,
        honeypot: Option<&HoneypotCapture>,
    ) -> Vec<PayloadPart> {
        payload::assemble(&self.schema, state, honeypot)
    }

    /// Run a full submission attempt through the given coordinator.
    pub async fn submit<S: Submitter>(
        &self,
        coordinator: &SubmissionCoordinator<S>,
        state: &mut FormState,
        honeypot: Option<&HoneypotCapture>,
    ) -> SubmitOutcome {
        coordinator
            .submit(&self.schema, &self.config, state, honeypot)
            .await
    }

    /// Fields of the step at a 1-based position, for rendering.
    pub fn fields_in_step(&self, position: usize) -> Vec<&FieldDefinition> {
        self.schema.fields_in_step(position)
    }
}
