//! Text extraction contract for document files.

use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use licita_core::Result;

use crate::sanitize::sanitize_text;

/// How the text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Direct text read.
    Regular,
    /// OCR output ingested via a sidecar file.
    Ocr,
}

/// Result of a text extraction attempt.
///
/// `success == false` means "no text available" — callers degrade to
/// filename-only handling, they never treat this as fatal.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedText {
    pub text: String,
    pub method: ExtractionMethod,
    pub success: bool,
}

impl ExtractedText {
    fn empty() -> Self {
        Self {
            text: String::new(),
            method: ExtractionMethod::Regular,
            success: false,
        }
    }
}

/// Extract text from a document file.
///
/// `.txt` files are read directly. For a `.pdf`, a sidecar `.txt` with the
/// same stem (produced by the external PDF/OCR collaborator) is honored as
/// the document's text; without one there is no text and the result is
/// unsuccessful.
pub fn extract_text(path: &Path) -> Result<ExtractedText> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" => {
            let content = std::fs::read_to_string(path)?;
            let text = sanitize_text(&content);
            let success = text.len() > 50;
            debug!(
                "Read {} chars from {}",
                text.len(),
                path.display()
            );
            Ok(ExtractedText {
                text,
                method: ExtractionMethod::Regular,
                success,
            })
        }
        "pdf" => {
            let sidecar = path.with_extension("txt");
            if sidecar.is_file() {
                let content = std::fs::read_to_string(&sidecar)?;
                let text = sanitize_text(&content);
                let success = text.len() > 50;
                debug!(
                    "Read {} chars of OCR sidecar text for {}",
                    text.len(),
                    path.display()
                );
                return Ok(ExtractedText {
                    text,
                    method: ExtractionMethod::Ocr,
                    success,
                });
            }
            warn!(
                "No extracted text available for {}; falling back to filename heuristics",
                path.display()
            );
            Ok(ExtractedText::empty())
        }
        _ => Ok(ExtractedText::empty()),
    }
}

/// SHA-256 hex digest of a text, for dedup and integrity checks.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_txt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certidao.txt");
        std::fs::write(
            &path,
            "CERTIDÃO NEGATIVA DE DÉBITOS. Válida até 15/03/2025. Emitida pela Receita Federal.",
        )
        .unwrap();

        let result = extract_text(&path).unwrap();
        assert!(result.success);
        assert_eq!(result.method, ExtractionMethod::Regular);
        assert!(result.text.contains("CERTIDÃO"));
    }

    #[test]
    fn test_extract_pdf_with_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("cnd_federal.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();
        std::fs::write(
            dir.path().join("cnd_federal.txt"),
            "Certidão negativa de débitos relativos aos tributos federais e à dívida ativa.",
        )
        .unwrap();

        let result = extract_text(&pdf).unwrap();
        assert!(result.success);
        assert_eq!(result.method, ExtractionMethod::Ocr);
    }

    #[test]
    fn test_extract_pdf_without_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("alvara.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();

        let result = extract_text(&pdf).unwrap();
        assert!(!result.success);
        assert!(result.text.is_empty());
    }

    #[test]
    fn test_short_text_is_unsuccessful() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curto.txt");
        std::fs::write(&path, "pouco texto").unwrap();

        let result = extract_text(&path).unwrap();
        assert!(!result.success);
    }

    #[test]
    fn test_content_hash_stable() {
        let a = content_hash("mesmo conteúdo");
        let b = content_hash("mesmo conteúdo");
        let c = content_hash("outro conteúdo");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
