//! Document classification pipeline: validate → extract text → classify →
//! attach expiration metadata.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info, warn};

use licita_core::{Category, Error, Result};
use licita_dates::{days_until, find_validity_date, is_expired, IssuanceValidator};
use licita_llm::{prompts, LlmBackend, LlmOutcome};

use crate::patterns::{expiration_policy, ExpirationPolicy, FILENAME_PATTERNS};
use crate::types::{file_name_of, ClassifiedDocument};

/// Result of a batch classification run.
#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub documents: Vec<ClassifiedDocument>,
    /// Files that failed classification, with the reason.
    pub failures: Vec<(PathBuf, String)>,
}

/// Classifies company documents for bid compliance.
pub struct DocumentClassifier {
    backend: Option<Arc<dyn LlmBackend>>,
    issuance_validator: IssuanceValidator,
    max_size_bytes: u64,
}

impl DocumentClassifier {
    pub fn new(max_size_bytes: u64) -> Self {
        Self {
            backend: None,
            issuance_validator: IssuanceValidator::default(),
            max_size_bytes,
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn LlmBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Classify a document based on its filename alone.
    ///
    /// First category with any keyword hit wins at fixed confidence 0.6;
    /// no hit classifies as `outros` at 0.3.
    pub fn classify_by_filename(&self, filename: &str) -> (Category, f64) {
        let filename_lower = filename.to_lowercase();

        for (category, patterns) in FILENAME_PATTERNS {
            if patterns.iter().any(|p| filename_lower.contains(p)) {
                return (*category, 0.6);
            }
        }

        (Category::Other, 0.3)
    }

    /// Rule-based content classification. First matching rule wins.
    pub fn classify_by_content_rules(
        &self,
        text_content: &str,
        filename: &str,
    ) -> (String, Category, f64) {
        let text_lower = text_content.to_lowercase();

        if text_lower.contains("contrato social") || text_lower.contains("cnpj") {
            return (
                "Contrato Social / CNPJ".into(),
                Category::LegalQualification,
                0.7,
            );
        }

        if text_lower.contains("certidão") || text_lower.contains("certidao") {
            if text_lower.contains("regularidade fiscal") || text_lower.contains("fazenda") {
                return (
                    "Certidão de Regularidade Fiscal".into(),
                    Category::TaxCompliance,
                    0.7,
                );
            } else if text_lower.contains("fgts") {
                return (
                    "Certidão de Regularidade do FGTS".into(),
                    Category::TaxCompliance,
                    0.7,
                );
            } else if text_lower.contains("trabalhista") {
                return (
                    "Certidão Negativa Trabalhista".into(),
                    Category::TaxCompliance,
                    0.7,
                );
            }
        }

        if text_lower.contains("atestado")
            && (text_lower.contains("capacidade") || text_lower.contains("técnica"))
        {
            return (
                "Atestado de Capacidade Técnica".into(),
                Category::TechnicalQualification,
                0.7,
            );
        }

        if text_lower.contains("balanço")
            || text_lower.contains("balanco")
            || text_lower.contains("demonstração contábil")
        {
            return (
                "Demonstração Contábil / Balanço".into(),
                Category::EconomicQualification,
                0.7,
            );
        }

        // Fallback to filename classification, scaled down.
        let (category, confidence) = self.classify_by_filename(filename);
        (filename.to_string(), category, confidence * 0.8)
    }

    /// LLM content classification. Invalid category coerces to `outros`
    /// and halves the confidence.
    fn classify_by_content_llm(
        &self,
        backend: &dyn LlmBackend,
        text_content: &str,
        filename: &str,
    ) -> std::result::Result<(String, Category, f64), String> {
        let prompt = prompts::classify_document(text_content, filename);

        let value = match backend.generate_json(&prompt) {
            LlmOutcome::Ok(value) => value,
            LlmOutcome::Unavailable(e) => return Err(format!("backend unavailable: {e}")),
            LlmOutcome::Malformed(e) => return Err(format!("malformed output: {e}")),
        };

        let document_type = value
            .get("document_type")
            .and_then(|v| v.as_str())
            .unwrap_or("Documento não identificado")
            .to_string();
        let category_raw = value
            .get("category")
            .and_then(|v| v.as_str())
            .unwrap_or("outros");
        let mut confidence = value
            .get("confidence")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.5)
            .clamp(0.0, 1.0);

        let category = match Category::parse(category_raw) {
            Some(cat) => cat,
            None => {
                warn!("Invalid category '{}', setting to 'outros'", category_raw);
                confidence *= 0.5;
                Category::Other
            }
        };

        Ok((document_type, category, confidence))
    }

    /// Complete classification pipeline for one file.
    pub fn classify(&self, path: &Path, today: NaiveDate) -> Result<ClassifiedDocument> {
        info!("Classifying document: {}", path.display());

        licita_ingest::validate_file(path, self.max_size_bytes)
            .map_err(|e| Error::Classification(format!("failed to classify document: {e}")))?;

        let extracted = licita_ingest::extract_text(path)
            .map_err(|e| Error::Classification(format!("failed to classify document: {e}")))?;
        let text_content = extracted.success.then_some(extracted.text);

        let filename = file_name_of(path);

        let (document_type, category, confidence) = match (&text_content, &self.backend) {
            (Some(text), Some(backend)) => {
                match self.classify_by_content_llm(backend.as_ref(), text, &filename) {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("LLM classification failed, using rules: {}", e);
                        self.classify_by_content_rules(text, &filename)
                    }
                }
            }
            (Some(text), None) => self.classify_by_content_rules(text, &filename),
            (None, _) => {
                let (category, confidence) = self.classify_by_filename(&filename);
                (filename.clone(), category, confidence)
            }
        };

        let (expiration_date, expired, days_remaining) =
            self.resolve_expiration(&filename, text_content.as_deref(), today);

        let classified = ClassifiedDocument {
            file_path: path.to_path_buf(),
            file_name: filename,
            document_type,
            category,
            confidence,
            expiration_date,
            is_expired: expired,
            days_until_expiration: days_remaining,
            text_content,
        };

        info!(
            "Classified: {} -> {} (confidence {:.2}, status {:?})",
            classified.file_name,
            classified.category,
            classified.confidence,
            classified.status()
        );

        Ok(classified)
    }

    /// Apply the expiration policy the filename selects.
    fn resolve_expiration(
        &self,
        filename: &str,
        text_content: Option<&str>,
        today: NaiveDate,
    ) -> (Option<NaiveDate>, bool, Option<i64>) {
        let filename_lower = filename.to_lowercase();

        match expiration_policy(&filename_lower) {
            // Charters, registrations and attestations do not expire.
            ExpirationPolicy::NonExpiring => (None, false, None),
            ExpirationPolicy::IssuanceDated => match text_content {
                Some(text) => {
                    let check = self.issuance_validator.validate(text, today);
                    (
                        check.expiration_date,
                        check.is_expired,
                        check.days_remaining,
                    )
                }
                None => (None, false, None),
            },
            ExpirationPolicy::Generic => match text_content {
                Some(text) => {
                    let expiration = find_validity_date(text, today);
                    (
                        expiration,
                        is_expired(expiration, today),
                        days_until(expiration, today),
                    )
                }
                None => (None, false, None),
            },
        }
    }

    /// Classify multiple documents. A failing file never aborts the batch.
    pub fn classify_batch(&self, paths: &[PathBuf], today: NaiveDate) -> BatchOutcome {
        info!("Classifying {} documents", paths.len());

        let mut documents = Vec::new();
        let mut failures = Vec::new();

        for path in paths {
            match self.classify(path, today) {
                Ok(doc) => documents.push(doc),
                Err(e) => {
                    error!("Failed to classify {}: {}", path.display(), e);
                    failures.push((path.clone(), e.to_string()));
                }
            }
        }

        info!(
            "Classification complete: {} successful, {} failed",
            documents.len(),
            failures.len()
        );

        BatchOutcome {
            documents,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: u64 = 50 * 1024 * 1024;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn write_doc(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_classify_by_filename() {
        let classifier = DocumentClassifier::new(MAX);
        assert_eq!(
            classifier.classify_by_filename("contrato_social.pdf"),
            (Category::LegalQualification, 0.6)
        );
        assert_eq!(
            classifier.classify_by_filename("cnd_federal.pdf"),
            (Category::TaxCompliance, 0.6)
        );
        assert_eq!(
            classifier.classify_by_filename("balanco_2024.pdf"),
            (Category::EconomicQualification, 0.6)
        );
        assert_eq!(
            classifier.classify_by_filename("foto_ferias.pdf"),
            (Category::Other, 0.3)
        );
    }

    #[test]
    fn test_content_rules_order() {
        let classifier = DocumentClassifier::new(MAX);

        let (doc_type, category, confidence) = classifier.classify_by_content_rules(
            "Contrato social da empresa XYZ Ltda, CNPJ 00.000.000/0001-00",
            "arquivo.pdf",
        );
        assert_eq!(doc_type, "Contrato Social / CNPJ");
        assert_eq!(category, Category::LegalQualification);
        assert_eq!(confidence, 0.7);

        let (doc_type, category, _) = classifier.classify_by_content_rules(
            "Certidão de regularidade perante o FGTS",
            "arquivo.pdf",
        );
        assert_eq!(doc_type, "Certidão de Regularidade do FGTS");
        assert_eq!(category, Category::TaxCompliance);

        let (doc_type, category, _) = classifier.classify_by_content_rules(
            "Atestado de capacidade técnica emitido pela contratante",
            "arquivo.pdf",
        );
        assert_eq!(doc_type, "Atestado de Capacidade Técnica");
        assert_eq!(category, Category::TechnicalQualification);
    }

    #[test]
    fn test_content_rules_fallback_scales_confidence() {
        let classifier = DocumentClassifier::new(MAX);
        let (doc_type, category, confidence) =
            classifier.classify_by_content_rules("texto genérico sem indicadores", "cnd_municipal.pdf");
        assert_eq!(doc_type, "cnd_municipal.pdf");
        assert_eq!(category, Category::TaxCompliance);
        assert!((confidence - 0.48).abs() < 1e-9);
    }

    #[test]
    fn test_classify_txt_with_validity_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(
            dir.path(),
            "cnd_federal.txt",
            "Certidão negativa de débitos emitida pela fazenda nacional. VALIDADE: 15/03/2025.",
        );

        let classifier = DocumentClassifier::new(MAX);
        let doc = classifier.classify(&path, day(2025, 1, 10)).unwrap();

        assert_eq!(doc.category, Category::TaxCompliance);
        assert_eq!(doc.expiration_date, Some(day(2025, 3, 15)));
        assert!(!doc.is_expired);
        assert_eq!(doc.days_until_expiration, Some(64));
    }

    #[test]
    fn test_non_expiring_skips_dates() {
        let dir = tempfile::tempdir().unwrap();
        // Text carries an old date that must be ignored for this type.
        let path = write_doc(
            dir.path(),
            "contrato_social.txt",
            "Contrato social consolidado, registrado na junta comercial em 10/05/2015.",
        );

        let classifier = DocumentClassifier::new(MAX);
        let doc = classifier.classify(&path, day(2025, 1, 10)).unwrap();

        assert_eq!(doc.expiration_date, None);
        assert!(!doc.is_expired);
        assert_eq!(doc.days_until_expiration, None);
    }

    #[test]
    fn test_issuance_dated_expired() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(
            dir.path(),
            "certidao_falencia.txt",
            "Certidão negativa de falência e concordata, emitida em 01/01/2025 pelo distribuidor judicial.",
        );

        let classifier = DocumentClassifier::new(MAX);
        // More than 90 days after emission.
        let doc = classifier.classify(&path, day(2025, 6, 1)).unwrap();
        assert!(doc.is_expired);
        assert_eq!(doc.expiration_date, Some(day(2025, 4, 1)));
    }

    #[test]
    fn test_pdf_without_text_uses_filename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atestado_capacidade.pdf");
        std::fs::write(&path, b"%PDF-1.4 binario").unwrap();

        let classifier = DocumentClassifier::new(MAX);
        let doc = classifier.classify(&path, day(2025, 1, 10)).unwrap();

        assert_eq!(doc.category, Category::TechnicalQualification);
        assert_eq!(doc.confidence, 0.6);
        assert_eq!(doc.document_type, "atestado_capacidade.pdf");
        assert!(doc.text_content.is_none());
    }

    #[test]
    fn test_llm_invalid_category_halves_confidence() {
        struct WeirdBackend;
        impl LlmBackend for WeirdBackend {
            fn generate(&self, _p: &str) -> LlmOutcome<String> {
                LlmOutcome::Ok(String::new())
            }
            fn generate_json(&self, _p: &str) -> LlmOutcome<serde_json::Value> {
                LlmOutcome::Ok(serde_json::json!({
                    "document_type": "Documento Misterioso",
                    "category": "categoria_invalida",
                    "confidence": 0.8
                }))
            }
            fn is_available(&self) -> bool {
                true
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(
            dir.path(),
            "documento.txt",
            "Texto longo o suficiente para passar pela extração de conteúdo do arquivo.",
        );

        let classifier = DocumentClassifier::new(MAX).with_backend(Arc::new(WeirdBackend));
        let doc = classifier.classify(&path, day(2025, 1, 10)).unwrap();
        assert_eq!(doc.category, Category::Other);
        assert!((doc.confidence - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_llm_failure_falls_back_to_rules() {
        struct DownBackend;
        impl LlmBackend for DownBackend {
            fn generate(&self, _p: &str) -> LlmOutcome<String> {
                LlmOutcome::Unavailable("down".into())
            }
            fn generate_json(&self, _p: &str) -> LlmOutcome<serde_json::Value> {
                LlmOutcome::Unavailable("down".into())
            }
            fn is_available(&self) -> bool {
                false
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(
            dir.path(),
            "certidao.txt",
            "Certidão de regularidade fiscal emitida pela fazenda estadual do estado.",
        );

        let classifier = DocumentClassifier::new(MAX).with_backend(Arc::new(DownBackend));
        let doc = classifier.classify(&path, day(2025, 1, 10)).unwrap();
        assert_eq!(doc.document_type, "Certidão de Regularidade Fiscal");
        assert_eq!(doc.category, Category::TaxCompliance);
    }

    #[test]
    fn test_batch_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_doc(
            dir.path(),
            "cnd_federal.txt",
            "Certidão negativa de débitos relativos aos tributos federais, validade 15/03/2025.",
        );
        let missing = dir.path().join("nao_existe.pdf");
        let bad_ext = write_doc(dir.path(), "planilha.xlsx", "dados");

        let classifier = DocumentClassifier::new(MAX);
        let outcome =
            classifier.classify_batch(&[good, missing, bad_ext], day(2025, 1, 10));

        assert_eq!(outcome.documents.len(), 1);
        assert_eq!(outcome.failures.len(), 2);
    }
}
