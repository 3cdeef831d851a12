//! Classified document entity.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use licita_core::Category;

/// Validity status of a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Valid,
    ExpiresSoon,
    Expired,
    Unknown,
}

/// A company document after classification.
///
/// Created once per batch run and never mutated afterwards; `confidence`
/// reflects classification certainty (not match quality) and is later
/// multiplied into match scores.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedDocument {
    pub file_path: PathBuf,
    pub file_name: String,
    pub document_type: String,
    pub category: Category,
    pub confidence: f64,
    pub expiration_date: Option<NaiveDate>,
    pub is_expired: bool,
    pub days_until_expiration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
}

impl ClassifiedDocument {
    /// Minimal constructor for a document with no expiration metadata.
    pub fn new(
        file_path: impl Into<PathBuf>,
        document_type: impl Into<String>,
        category: Category,
        confidence: f64,
    ) -> Self {
        let file_path: PathBuf = file_path.into();
        let file_name = file_name_of(&file_path);
        Self {
            file_path,
            file_name,
            document_type: document_type.into(),
            category,
            confidence,
            expiration_date: None,
            is_expired: false,
            days_until_expiration: None,
            text_content: None,
        }
    }

    pub fn status(&self) -> DocumentStatus {
        if self.is_expired {
            return DocumentStatus::Expired;
        }
        if self.expiration_date.is_some() {
            if let Some(days) = self.days_until_expiration {
                if days < 30 {
                    return DocumentStatus::ExpiresSoon;
                }
                return DocumentStatus::Valid;
            }
        }
        DocumentStatus::Unknown
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("desconhecido")
        .to_string()
}
