//! File validation before any document reaches the classifier.
//!
//! Rejects path traversal, oversized files, and content that is not what
//! its extension claims. Classified documents are constructed only from
//! paths that passed this gate.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use licita_core::{Error, Result};

const MAX_FILENAME_LENGTH: usize = 255;

const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "txt"];

// Filename patterns that must never be accepted.
static DANGEROUS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\.\./").unwrap(),
        Regex::new(r"\.\.\\").unwrap(),
        Regex::new(r"^\.").unwrap(),
        Regex::new(r#"[<>:"|?*]"#).unwrap(),
        Regex::new(r"[\x00-\x1f]").unwrap(),
    ]
});

/// Validate a filename for length, traversal and character safety.
pub fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty() {
        return Err(Error::Validation("filename cannot be empty".into()));
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(Error::Validation(format!(
            "filename too long: {} chars (max {})",
            filename.len(),
            MAX_FILENAME_LENGTH
        )));
    }

    for pattern in DANGEROUS_PATTERNS.iter() {
        if pattern.is_match(filename) {
            return Err(Error::Validation(format!(
                "filename contains dangerous pattern: {filename}"
            )));
        }
    }

    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(Error::Validation(format!(
            "invalid file extension: .{extension} (allowed: .pdf, .txt)"
        )));
    }

    Ok(())
}

/// Validate file content: existence, size, and PDF magic bytes.
pub fn validate_content(path: &Path, max_size_bytes: u64) -> Result<()> {
    if !path.exists() {
        return Err(Error::Validation(format!(
            "file does not exist: {}",
            path.display()
        )));
    }

    if !path.is_file() {
        return Err(Error::Validation(format!(
            "path is not a file: {}",
            path.display()
        )));
    }

    let size = std::fs::metadata(path)?.len();
    if size == 0 {
        return Err(Error::Validation("file is empty".into()));
    }
    if size > max_size_bytes {
        return Err(Error::Validation(format!(
            "file too large: {:.2}MB (max {:.0}MB)",
            size as f64 / 1024.0 / 1024.0,
            max_size_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if extension == "pdf" {
        let bytes = std::fs::read(path)?;
        if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
            return Err(Error::Validation(
                "file does not appear to be a valid PDF".into(),
            ));
        }
    }

    Ok(())
}

/// Complete file validation: filename plus content.
pub fn validate_file(path: &Path, max_size_bytes: u64) -> Result<()> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Validation(format!("unreadable filename: {}", path.display())))?;

    validate_filename(filename)?;
    validate_content(path, max_size_bytes)?;

    info!("File validation passed: {}", filename);
    Ok(())
}
