//! Localized fallback messages for validation failures.
//!
//! Every generic message the engine emits goes through this catalog so
//! hosts can swap in translated templates. Templates use `{name}`
//! placeholders filled at render time. A field's own `custom_error`
//! always wins over the catalog.

use std::collections::BTreeMap;

/// Message catalog keyed by message id.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    templates: BTreeMap<String, String>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        let mut templates = BTreeMap::new();
        for (key, text) in [
            ("required", "This field is required."),
            ("invalid_email", "Enter a valid email address."),
            ("invalid_url", "Enter a valid URL."),
            ("invalid_phone", "Enter a valid phone number."),
            ("invalid_number", "Enter a valid number."),
            ("number_min", "Value must be at least {min}."),
            ("number_max", "Value must be at most {max}."),
            ("min_length", "Use at least {min} characters."),
            ("max_length", "Use no more than {max} characters."),
            ("pattern", "This value has an invalid format."),
            ("invalid_date", "Enter a valid date (YYYY-MM-DD)."),
            ("date_min", "Date must be on or after {min}."),
            ("date_max", "Date must be on or before {max}."),
            ("file_required", "Attach at least one file."),
            ("min_selections", "Select at least {min} options."),
            ("max_selections", "Select no more than {max} options."),
            ("file_too_large", "File exceeds the maximum size of {max}."),
            ("file_type", "This file type is not allowed."),
            ("file_limit", "No more than {max} files can be attached."),
            ("submit_failed", "Submission failed. Please try again."),
        ] {
            templates.insert(key.to_string(), text.to_string());
        }
        MessageCatalog { templates }
    }
}

impl MessageCatalog {
    /// Default catalog with host-supplied template overrides applied.
    /// Unknown keys are accepted and simply never rendered.
    pub fn with_overrides(overrides: BTreeMap<String, String>) -> MessageCatalog {
        let mut catalog = MessageCatalog::default();
        catalog.templates.extend(overrides);
        catalog
    }

    /// Render a template, substituting `{name}` placeholders.
    pub fn render(&self, key: &str, args: &[(&str, String)]) -> String {
        let mut text = self
            .templates
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string());
        for (name, value) in args {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }

    pub fn get(&self, key: &str) -> String {
        self.render(key, &[])
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_placeholders() {
        let catalog = MessageCatalog::default();
        assert_eq!(
            catalog.render("number_min", &[("min", "5".to_string())]),
            "Value must be at least 5."
        );
    }

    #[test]
    fn overrides_replace_defaults() {
        let mut overrides = BTreeMap::new();
        overrides.insert("required".to_string(), "Verplicht veld.".to_string());
        let catalog = MessageCatalog::with_overrides(overrides);
        assert_eq!(catalog.get("required"), "Verplicht veld.");
        assert_eq!(catalog.get("invalid_email"), "Enter a valid email address.");
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        let catalog = MessageCatalog::default();
        assert_eq!(catalog.get("no_such_message"), "no_such_message");
    }
}
