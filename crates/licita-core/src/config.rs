//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Paths to all Licita data directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Incoming notice files (`data/editais/`).
    pub notices: PathBuf,
    /// Company document pool (`data/documentos/`).
    pub documents: PathBuf,
    /// Generated reports and organized folders (`data/saida/`).
    pub output: PathBuf,
    /// Few-shot example corpus (`data/exemplos/`).
    pub corpus: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            notices: root.join("editais"),
            documents: root.join("documentos"),
            output: root.join("saida"),
            corpus: root.join("exemplos"),
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    /// Create all required directories.
    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.notices)?;
        std::fs::create_dir_all(&self.documents)?;
        std::fs::create_dir_all(&self.output)?;
        std::fs::create_dir_all(&self.corpus)?;
        Ok(())
    }
}

/// Top-level Licita configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicitaConfig {
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Minimum similarity for a requirement↔document match.
    pub similarity_threshold: f64,
    /// Base URL of the OpenAI-compatible LLM server, if any.
    pub llm_endpoint: Option<String>,
    /// Model name passed to the LLM server.
    pub llm_model: String,
    /// Maximum accepted document size in megabytes.
    pub max_file_size_mb: u64,
    /// Whether OCR-extracted sidecar text is honored.
    pub ocr_enabled: bool,
    /// Maximum documents classified per batch run.
    pub max_documents_per_batch: usize,
}

impl LicitaConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let similarity_threshold = std::env::var("LICITA_SIMILARITY_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.5);

        let llm_endpoint = std::env::var("LICITA_LLM_ENDPOINT").ok();
        let llm_model = std::env::var("LICITA_LLM_MODEL")
            .unwrap_or_else(|_| "llama-3-8b".to_string());

        let max_file_size_mb = std::env::var("LICITA_MAX_FILE_SIZE_MB")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(50);

        let ocr_enabled = std::env::var("LICITA_OCR_ENABLED")
            .map(|v| v != "0" && v.to_lowercase() != "false")
            .unwrap_or(true);

        let max_documents_per_batch = std::env::var("LICITA_MAX_BATCH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(50);

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            data_paths,
            similarity_threshold,
            llm_endpoint,
            llm_model,
            max_file_size_mb,
            ocr_enabled,
            max_documents_per_batch,
        })
    }

    /// Maximum document size in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}
