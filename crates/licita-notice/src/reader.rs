//! Notice reader: extracts document requirements from edital text.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use licita_core::{Category, Error, Result};
use licita_llm::{prompts, LlmBackend, LlmOutcome};

use crate::corpus::ExampleCorpus;
use crate::patterns::{canonical_label, DOCUMENT_PATTERNS};
use crate::types::BidRequirement;

/// Which strategy produced the requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Llm,
    RuleBased,
}

/// Result of a full notice analysis.
#[derive(Debug, Clone, Serialize)]
pub struct NoticeAnalysis {
    pub file_name: String,
    pub requirements: Vec<BidRequirement>,
    pub total_requirements: usize,
    pub extraction_method: ExtractionMethod,
    pub categories_found: Vec<Category>,
}

// Case-insensitive matchers for the rule tables, compiled once.
static PATTERN_MATCHERS: Lazy<Vec<(Category, Vec<(&'static str, Regex)>)>> = Lazy::new(|| {
    DOCUMENT_PATTERNS
        .iter()
        .map(|(category, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| {
                    let regex = Regex::new(&format!("(?i){}", regex::escape(p))).unwrap();
                    (*p, regex)
                })
                .collect();
            (*category, compiled)
        })
        .collect()
});

/// Reads bid notices and extracts their document requirements.
///
/// Attempts the injected language-model backend first when present; any
/// backend failure falls back to rule-based pattern search. An empty
/// requirement list is a valid outcome, never an error.
pub struct NoticeReader {
    backend: Option<Arc<dyn LlmBackend>>,
    corpus: ExampleCorpus,
    few_shot_examples: usize,
}

impl Default for NoticeReader {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeReader {
    /// Rule-based-only reader.
    pub fn new() -> Self {
        Self {
            backend: None,
            corpus: ExampleCorpus::default(),
            few_shot_examples: 2,
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn LlmBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_corpus(mut self, corpus: ExampleCorpus) -> Self {
        self.corpus = corpus;
        self
    }

    /// Extract all requirements from notice text.
    pub fn extract(&self, notice_text: &str) -> Vec<BidRequirement> {
        self.extract_with_method(notice_text).0
    }

    /// Extract requirements, reporting which strategy produced them.
    pub fn extract_with_method(
        &self,
        notice_text: &str,
    ) -> (Vec<BidRequirement>, ExtractionMethod) {
        if let Some(backend) = &self.backend {
            match self.extract_with_llm(backend.as_ref(), notice_text) {
                Ok(requirements) => return (requirements, ExtractionMethod::Llm),
                Err(e) => {
                    warn!("LLM extraction failed, falling back to rules: {}", e);
                }
            }
        }

        (
            self.extract_rule_based(notice_text),
            ExtractionMethod::RuleBased,
        )
    }

    /// LLM strategy: structured-JSON prompt, optionally augmented with
    /// similar historical examples.
    fn extract_with_llm(
        &self,
        backend: &dyn LlmBackend,
        notice_text: &str,
    ) -> std::result::Result<Vec<BidRequirement>, String> {
        info!("Analyzing notice with LLM backend");

        // Few-shot augmentation is best-effort; an empty corpus just
        // produces an empty block.
        let few_shot = self
            .corpus
            .few_shot_block(notice_text, self.few_shot_examples);

        let prompt = prompts::extract_bid_requirements(notice_text, &few_shot);

        let value = match backend.generate_json(&prompt) {
            LlmOutcome::Ok(value) => value,
            LlmOutcome::Unavailable(e) => return Err(format!("backend unavailable: {e}")),
            LlmOutcome::Malformed(e) => return Err(format!("malformed output: {e}")),
        };

        let documents = value
            .get("documents")
            .and_then(|v| v.as_array())
            .ok_or_else(|| "response missing 'documents' array".to_string())?;

        info!("LLM identified {} required documents", documents.len());

        let mut requirements = Vec::new();
        for doc in documents {
            match BidRequirement::from_json(doc) {
                Some(req) => requirements.push(req),
                None => warn!("Skipping unusable requirement entry: {}", doc),
            }
        }

        Ok(requirements)
    }

    /// Rule-based strategy: ordered pattern tables, one requirement per
    /// canonical document name.
    pub fn extract_rule_based(&self, notice_text: &str) -> Vec<BidRequirement> {
        info!("Using rule-based requirement extraction");

        let mut requirements = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (category, matchers) in PATTERN_MATCHERS.iter() {
            for (pattern, regex) in matchers {
                let Some(m) = regex.find(notice_text) else {
                    continue;
                };

                let name = canonical_label(pattern);
                if !seen.insert(name.clone()) {
                    continue;
                }

                let start = floor_char_boundary(notice_text, m.start().saturating_sub(100));
                let end = ceil_char_boundary(notice_text, (m.end() + 250).min(notice_text.len()));
                let context = notice_text[start..end].trim().to_string();

                requirements.push(BidRequirement {
                    name,
                    category: *category,
                    description: format!("Documento identificado: {pattern}"),
                    requirements_text: context,
                    is_mandatory: true,
                });
            }
        }

        info!(
            "Rule-based extraction found {} documents",
            requirements.len()
        );
        if requirements.is_empty() {
            warn!("No documents identified by rule-based extraction");
        }

        requirements
    }

    /// Full analysis pipeline: validate + read the notice file, extract
    /// requirements, group by category.
    pub fn analyze(&self, path: &Path, max_size_bytes: u64) -> Result<NoticeAnalysis> {
        info!("Starting notice analysis: {}", path.display());

        licita_ingest::validate_file(path, max_size_bytes)?;
        let extracted = licita_ingest::extract_text(path)?;

        if !extracted.success || extracted.text.trim().len() < 100 {
            return Err(Error::Notice(
                "notice appears to be empty or text extraction failed".into(),
            ));
        }

        let (requirements, extraction_method) = self.extract_with_method(&extracted.text);

        let mut categories_found = Vec::new();
        for req in &requirements {
            if !categories_found.contains(&req.category) {
                categories_found.push(req.category);
            }
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("desconhecido")
            .to_string();

        info!(
            "Notice analysis complete: {} requirements found",
            requirements.len()
        );

        Ok(NoticeAnalysis {
            file_name,
            total_requirements: requirements.len(),
            extraction_method,
            categories_found,
            requirements,
        })
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
