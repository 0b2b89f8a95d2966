//! Per-file constraint checking.
//!
//! A file is checked once, at selection time, against the size limit
//! and type allow-list. The count limit lives with the caller
//! (`FormState::attach_file`): a file that would exceed it is refused
//! without touching already-accepted files. Later validation only asks
//! whether a required file field has at least one accepted entry.

use intake_schema::FileRules;

use crate::messages::MessageCatalog;

/// Engine-wide default maximum file size: 10 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Engine-wide default maximum number of files per field.
pub const DEFAULT_MAX_FILES: usize = 5;

/// A selected file: name, declared MIME type, and content.
#[derive(Debug, Clone, PartialEq)]
pub struct FileHandle {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> FileHandle {
        FileHandle {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }

    /// Lower-cased extension, without the dot.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// Outcome of checking one file against its field's rules.
#[derive(Debug, Clone, PartialEq)]
pub struct FileCheck {
    pub valid: bool,
    pub message: Option<String>,
}

impl FileCheck {
    pub fn ok() -> FileCheck {
        FileCheck {
            valid: true,
            message: None,
        }
    }

    pub fn rejected(message: String) -> FileCheck {
        FileCheck {
            valid: false,
            message: Some(message),
        }
    }
}

/// Check a single file against size and type rules. Size first, then
/// the allow-list; the first failure wins.
pub fn check_file(
    file: &FileHandle,
    rules: Option<&FileRules>,
    default_max_bytes: u64,
    catalog: &MessageCatalog,
) -> FileCheck {
    let max_bytes = rules
        .and_then(|r| r.max_file_size_bytes)
        .unwrap_or(default_max_bytes);
    if file.size_bytes() > max_bytes {
        return FileCheck::rejected(
            catalog.render("file_too_large", &[("max", format_bytes(max_bytes))]),
        );
    }

    if let Some(rules) = rules {
        if !rules.allowed_types.is_empty() && !type_allowed(file, &rules.allowed_types) {
            let message = rules
                .custom_error
                .clone()
                .unwrap_or_else(|| catalog.get("file_type"));
            return FileCheck::rejected(message);
        }
    }

    FileCheck::ok()
}

/// An allow-list entry matches by extension (`pdf` / `.pdf`), exact
/// MIME type, or MIME wildcard prefix (`image/*`).
fn type_allowed(file: &FileHandle, allowed: &[String]) -> bool {
    let extension = file.extension();
    let mime = file.mime_type.to_ascii_lowercase();

    allowed.iter().any(|entry| {
        let entry = entry.trim().to_ascii_lowercase();
        if let Some(prefix) = entry.strip_suffix("/*") {
            return mime.starts_with(&format!("{}/", prefix));
        }
        if entry.contains('/') {
            return mime == entry;
        }
        let entry_ext = entry.trim_start_matches('.');
        extension.as_deref() == Some(entry_ext)
    })
}

fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB {
        if bytes % MIB == 0 {
            format!("{} MB", bytes / MIB)
        } else {
            format!("{:.1} MB", bytes as f64 / MIB as f64)
        }
    } else if bytes >= KIB {
        format!("{} KB", bytes / KIB)
    } else {
        format!("{} bytes", bytes)
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(json: serde_json::Value) -> FileRules {
        serde_json::from_value(json).unwrap()
    }

    fn pdf(size: usize) -> FileHandle {
        FileHandle::new("resume.pdf", "application/pdf", vec![0u8; size])
    }

    #[test]
    fn oversized_file_is_rejected_with_size_message() {
        let catalog = MessageCatalog::default();
        let check = check_file(&pdf(11 * 1024 * 1024), None, DEFAULT_MAX_FILE_BYTES, &catalog);
        assert!(!check.valid);
        assert!(check.message.unwrap().contains("10 MB"));
    }

    #[test]
    fn field_override_tightens_size_limit() {
        let catalog = MessageCatalog::default();
        let r = rules(serde_json::json!({ "max_file_size_bytes": 1024 }));
        let check = check_file(&pdf(2048), Some(&r), DEFAULT_MAX_FILE_BYTES, &catalog);
        assert!(!check.valid);
        assert!(check_file(&pdf(512), Some(&r), DEFAULT_MAX_FILE_BYTES, &catalog).valid);
    }

    #[test]
    fn sub_megabyte_limits_render_in_whole_units() {
        let catalog = MessageCatalog::default();
        let r = rules(serde_json::json!({ "max_file_size_bytes": 2048 }));
        let check = check_file(&pdf(4096), Some(&r), DEFAULT_MAX_FILE_BYTES, &catalog);
        assert_eq!(
            check.message.unwrap(),
            "File exceeds the maximum size of 2 KB."
        );

        let tiny = rules(serde_json::json!({ "max_file_size_bytes": 100 }));
        let check = check_file(&pdf(200), Some(&tiny), DEFAULT_MAX_FILE_BYTES, &catalog);
        assert!(check.message.unwrap().contains("100 bytes"));
    }

    #[test]
    fn allow_list_matches_extension_mime_and_wildcard() {
        let catalog = MessageCatalog::default();
        let r = rules(serde_json::json!({ "allowed_types": ["pdf", "image/*"] }));

        assert!(check_file(&pdf(10), Some(&r), DEFAULT_MAX_FILE_BYTES, &catalog).valid);

        let png = FileHandle::new("photo.png", "image/png", vec![0u8; 10]);
        assert!(check_file(&png, Some(&r), DEFAULT_MAX_FILE_BYTES, &catalog).valid);

        let exe = FileHandle::new("tool.exe", "application/octet-stream", vec![0u8; 10]);
        let check = check_file(&exe, Some(&r), DEFAULT_MAX_FILE_BYTES, &catalog);
        assert!(!check.valid);
        assert_eq!(check.message.unwrap(), "This file type is not allowed.");
    }

    #[test]
    fn exact_mime_entry_with_dot_extension() {
        let catalog = MessageCatalog::default();
        let r = rules(serde_json::json!({ "allowed_types": [".docx", "application/pdf"] }));
        let docx = FileHandle::new(
            "cv.DOCX",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            vec![0u8; 10],
        );
        assert!(check_file(&docx, Some(&r), DEFAULT_MAX_FILE_BYTES, &catalog).valid);
        assert!(check_file(&pdf(10), Some(&r), DEFAULT_MAX_FILE_BYTES, &catalog).valid);
    }

    #[test]
    fn empty_allow_list_accepts_any_type() {
        let catalog = MessageCatalog::default();
        let exe = FileHandle::new("tool.exe", "application/octet-stream", vec![0u8; 10]);
        assert!(check_file(&exe, None, DEFAULT_MAX_FILE_BYTES, &catalog).valid);
    }

    #[test]
    fn custom_error_wins_for_type_rejection() {
        let catalog = MessageCatalog::default();
        let r = rules(serde_json::json!({
            "allowed_types": ["pdf"],
            "custom_error": "PDF only, please."
        }));
        let png = FileHandle::new("photo.png", "image/png", vec![0u8; 10]);
        let check = check_file(&png, Some(&r), DEFAULT_MAX_FILE_BYTES, &catalog);
        assert_eq!(check.message.unwrap(), "PDF only, please.");
    }
}
