//! Engine configuration.
//!
//! Everything the engine needs from its host is passed in through this
//! struct at construction. There is no ambient or process-wide
//! configuration anywhere in the engine.

use crate::files::{DEFAULT_MAX_FILES, DEFAULT_MAX_FILE_BYTES};
use crate::messages::MessageCatalog;

/// Host-supplied runtime configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Submission endpoint URL.
    pub endpoint: String,
    /// Maximum file size when a field declares no override.
    pub max_file_size_bytes: u64,
    /// Maximum files per field when a field declares no override.
    pub max_files: usize,
    /// Fallback message templates.
    pub messages: MessageCatalog,
}

impl EngineConfig {
    pub fn new(endpoint: impl Into<String>) -> EngineConfig {
        EngineConfig {
            endpoint: endpoint.into(),
            max_file_size_bytes: DEFAULT_MAX_FILE_BYTES,
            max_files: DEFAULT_MAX_FILES,
            messages: MessageCatalog::default(),
        }
    }

    pub fn with_messages(mut self, messages: MessageCatalog) -> EngineConfig {
        self.messages = messages;
        self
    }
}
