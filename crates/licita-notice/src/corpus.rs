//! Historical extraction examples used for few-shot prompt augmentation.
//!
//! Loaded once per process from a directory of JSON files; read-only during
//! matching. Everything here is best-effort: a missing or broken corpus
//! never blocks extraction.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One manually verified extraction from a past notice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    #[serde(rename = "notice_name", alias = "edital_name")]
    pub notice_name: String,
    #[serde(default)]
    pub requirements: Vec<serde_json::Value>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// In-memory example corpus.
#[derive(Debug, Clone, Default)]
pub struct ExampleCorpus {
    examples: Vec<TrainingExample>,
}

impl ExampleCorpus {
    /// Load every `*.json` example in `dir`. Broken files are skipped with
    /// a warning; a missing directory yields an empty corpus.
    pub fn load(dir: &Path) -> Self {
        let mut examples = Vec::new();

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => {
                info!("No example corpus at {}", dir.display());
                return Self::default();
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|content| {
                    serde_json::from_str::<TrainingExample>(&content).map_err(|e| e.to_string())
                }) {
                Ok(example) => {
                    info!("Loaded example: {}", example.notice_name);
                    examples.push(example);
                }
                Err(e) => warn!("Failed to load example {}: {}", path.display(), e),
            }
        }

        info!("Loaded {} training examples", examples.len());
        Self { examples }
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Examples most similar to `notice_text` by keyword overlap of their
    /// requirement names and descriptions.
    pub fn similar(&self, notice_text: &str, limit: usize) -> Vec<&TrainingExample> {
        if self.examples.is_empty() {
            return Vec::new();
        }

        let notice_keywords: HashSet<String> = notice_text
            .to_lowercase()
            .split_whitespace()
            .map(|w| w.to_string())
            .collect();

        let mut scored: Vec<(f64, &TrainingExample)> = self
            .examples
            .iter()
            .map(|example| {
                let req_text = example
                    .requirements
                    .iter()
                    .map(|req| {
                        format!(
                            "{} {}",
                            req.get("name").and_then(|v| v.as_str()).unwrap_or(""),
                            req.get("description").and_then(|v| v.as_str()).unwrap_or("")
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase();
                let req_keywords: HashSet<String> =
                    req_text.split_whitespace().map(|w| w.to_string()).collect();

                let intersection = notice_keywords.intersection(&req_keywords).count();
                let union = notice_keywords.union(&req_keywords).count();
                let similarity = if union > 0 {
                    intersection as f64 / union as f64
                } else {
                    0.0
                };
                (similarity, example)
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().take(limit).map(|(_, e)| e).collect()
    }

    /// Render a few-shot prompt block from the most similar examples.
    /// Empty string when there is nothing to show.
    pub fn few_shot_block(&self, notice_text: &str, num_examples: usize) -> String {
        let similar = self.similar(notice_text, num_examples);
        if similar.is_empty() {
            return String::new();
        }

        let mut parts = vec![
            "Aqui estão exemplos de extrações corretas de outros editais:".to_string(),
            String::new(),
        ];

        for (i, example) in similar.iter().enumerate() {
            parts.push(format!("### Exemplo {}: {}", i + 1, example.notice_name));
            parts.push("Documentos extraídos:".to_string());
            // First 5 requirements keep the prompt manageable.
            let sample: Vec<_> = example.requirements.iter().take(5).collect();
            parts.push(serde_json::to_string_pretty(&sample).unwrap_or_default());
            parts.push(String::new());
        }

        parts.push("Agora extraia os documentos do edital abaixo de forma similar:".to_string());
        parts.join("\n")
    }
}
