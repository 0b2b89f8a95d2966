//! Form schema model for the intake application-form engine.
//!
//! This crate owns the static side of the engine: the typed field/step
//! model deserialized from schema JSON, and a structural lint pass that
//! surfaces misconfiguration the runtime deliberately tolerates. The
//! runtime (visibility, validation, navigation, submission) lives in
//! `intake-engine`.

pub mod error;
pub mod field;
pub mod lint;
pub mod schema;

pub use error::SchemaError;
pub use field::{
    CheckboxMode, CheckboxSettings, Condition, ConditionalLogic, ContactRules, DateRules,
    DateSettings, FieldDefinition, FieldKind, FileRules, MatchMode, NumberRules, NumberSettings,
    SelectionRules, Step, TextRules, TextSettings, VisibilityAction,
};
pub use lint::{lint, Finding, FindingSeverity, KNOWN_OPERATORS};
pub use schema::FormSchema;
