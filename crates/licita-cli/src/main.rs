//! Licita CLI — analyze bid notices, classify company documents, and
//! produce compliance reports.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use licita_classify::DocumentClassifier;
use licita_core::LicitaConfig;
use licita_llm::{HttpBackend, LlmBackend};
use licita_match::Comparator;
use licita_notice::{ExampleCorpus, NoticeReader};
use licita_report::OutputFolder;

#[derive(Parser)]
#[command(name = "licita", version, about = "Organizador de documentos para licitações")]
struct Cli {
    /// Data directory (corpus, output).
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Emit JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a bid notice and list its document requirements.
    Analyze {
        /// Notice file (.pdf with sidecar .txt, or .txt).
        notice: PathBuf,
    },
    /// Classify the documents in a directory.
    Classify {
        /// Directory with company document files.
        docs_dir: PathBuf,
    },
    /// Full compliance check: notice + documents → report.
    Check {
        /// Notice file.
        notice: PathBuf,
        /// Directory with company document files.
        docs_dir: PathBuf,
        /// Also generate the organized output folder.
        #[arg(long)]
        organize: bool,
        /// Copy expired documents into the organized folder too.
        #[arg(long)]
        include_expired: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = LicitaConfig::from_env(&cli.data_dir).context("loading configuration")?;
    let today = Local::now().date_naive();

    match cli.command {
        Command::Analyze { notice } => analyze(&cli_reader(&config), &config, &notice, cli.json),
        Command::Classify { docs_dir } => {
            classify(&cli_classifier(&config), &docs_dir, today, cli.json)
        }
        Command::Check {
            notice,
            docs_dir,
            organize,
            include_expired,
        } => check(
            &config,
            &notice,
            &docs_dir,
            today,
            organize,
            include_expired,
            cli.json,
        ),
    }
}

/// Backend from configuration, when the endpoint answers.
fn backend_from_config(config: &LicitaConfig) -> Option<Arc<dyn LlmBackend>> {
    let endpoint = config.llm_endpoint.as_ref()?;
    let backend = HttpBackend::new(endpoint.as_str(), config.llm_model.as_str());
    if backend.is_available() {
        info!("LLM backend available at {}", endpoint);
        Some(Arc::new(backend))
    } else {
        warn!("LLM endpoint {} not reachable, using rule-based mode", endpoint);
        None
    }
}

fn cli_reader(config: &LicitaConfig) -> NoticeReader {
    let mut reader =
        NoticeReader::new().with_corpus(ExampleCorpus::load(&config.data_paths.corpus));
    if let Some(backend) = backend_from_config(config) {
        reader = reader.with_backend(backend);
    }
    reader
}

fn cli_classifier(config: &LicitaConfig) -> DocumentClassifier {
    let mut classifier = DocumentClassifier::new(config.max_file_size_bytes());
    if let Some(backend) = backend_from_config(config) {
        classifier = classifier.with_backend(backend);
    }
    classifier
}

/// Document files in a directory, sorted by name for stable scan order.
fn document_paths(docs_dir: &PathBuf) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(docs_dir)
        .with_context(|| format!("reading {}", docs_dir.display()))?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("pdf") | Some("txt")
            )
        })
        .collect();
    paths.sort();
    Ok(paths)
}

fn analyze(
    reader: &NoticeReader,
    config: &LicitaConfig,
    notice: &PathBuf,
    json: bool,
) -> anyhow::Result<()> {
    let analysis = reader.analyze(notice, config.max_file_size_bytes())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!(
        "Edital: {} ({} documentos exigidos, método: {:?})\n",
        analysis.file_name, analysis.total_requirements, analysis.extraction_method
    );
    for req in &analysis.requirements {
        let tag = if req.is_mandatory { "obrigatório" } else { "opcional" };
        println!("- [{}] {} ({})", req.category, req.name, tag);
        if !req.description.is_empty() {
            println!("    {}", req.description);
        }
    }
    Ok(())
}

fn classify(
    classifier: &DocumentClassifier,
    docs_dir: &PathBuf,
    today: chrono::NaiveDate,
    json: bool,
) -> anyhow::Result<()> {
    let paths = document_paths(docs_dir)?;
    let outcome = classifier.classify_batch(&paths, today);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    for doc in &outcome.documents {
        println!(
            "- {} -> {} [{}] (confiança {:.2}, situação {:?})",
            doc.file_name,
            doc.document_type,
            doc.category,
            doc.confidence,
            doc.status()
        );
    }
    if !outcome.failures.is_empty() {
        println!("\nFalhas:");
        for (path, reason) in &outcome.failures {
            println!("- {}: {}", path.display(), reason);
        }
    }
    Ok(())
}

fn check(
    config: &LicitaConfig,
    notice: &PathBuf,
    docs_dir: &PathBuf,
    today: chrono::NaiveDate,
    organize: bool,
    include_expired: bool,
    json: bool,
) -> anyhow::Result<()> {
    let reader = cli_reader(config);
    let analysis = reader.analyze(notice, config.max_file_size_bytes())?;

    let classifier = cli_classifier(config);
    let paths = document_paths(docs_dir)?;
    let outcome = classifier.classify_batch(&paths, today);

    let comparator = Comparator::new(config.similarity_threshold);
    let report = comparator.compare(&analysis.requirements, &outcome.documents);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&licita_report::report_json(&report))?
        );
    } else {
        println!("{}", licita_report::checklist_text(&report, today));
    }

    if organize {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let bid_name = notice
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("edital");
        let folder = OutputFolder::new(&config.data_paths.output).generate(
            &report,
            bid_name,
            &timestamp,
            today,
            include_expired,
        )?;
        println!("\nPasta organizada: {}", folder.display());
    }

    Ok(())
}
