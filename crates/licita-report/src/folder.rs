//! Organized submission folder generation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use licita_core::{Category, Error, Result};
use licita_ingest::sanitize_filename;
use licita_match::ComplianceReport;

use crate::checklist::{checklist_text, summary_text};
use crate::json::report_json;

/// Category subdirectory names, in presentation order.
const CATEGORY_FOLDERS: &[(Category, &str)] = &[
    (Category::LegalQualification, "01_Habilitacao_Juridica"),
    (Category::TaxCompliance, "02_Regularidade_Fiscal"),
    (Category::TechnicalQualification, "03_Qualificacao_Tecnica"),
    (Category::EconomicQualification, "04_Qualificacao_Economica"),
    (Category::CommercialProposal, "05_Proposta_Comercial"),
    (Category::Other, "06_Outros"),
];

/// Generates the organized output folder for a bid submission.
pub struct OutputFolder {
    base_dir: PathBuf,
}

impl OutputFolder {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Generate the complete folder: category subdirectories, copies of the
    /// matched documents, checklist, summary, JSON report and README.
    ///
    /// `timestamp` names the output directory (e.g. `20250110_143000`);
    /// expired documents are copied only when `include_expired` is set.
    pub fn generate(
        &self,
        report: &ComplianceReport,
        bid_name: &str,
        timestamp: &str,
        today: NaiveDate,
        include_expired: bool,
    ) -> Result<PathBuf> {
        info!("Generating organized folder structure");

        let dir_name = if bid_name.is_empty() {
            format!("licitacao_{timestamp}")
        } else {
            format!("licitacao_{}_{timestamp}", sanitize_filename(bid_name))
        };
        let output_dir = self.base_dir.join(dir_name);
        std::fs::create_dir_all(&output_dir)?;

        let category_paths = self.create_category_folders(&output_dir)?;

        let mut copied = 0usize;
        let mut skipped = 0usize;

        for m in &report.matches {
            let Some(document) = &m.matched_document else {
                continue;
            };

            if document.is_expired && !include_expired {
                warn!("Skipping expired document: {}", document.file_name);
                skipped += 1;
                continue;
            }

            let dest_folder = category_paths
                .get(&document.category)
                .unwrap_or_else(|| &category_paths[&Category::Other]);

            copy_document(&document.file_path, dest_folder)?;
            copied += 1;
        }

        info!("Copied {} documents, skipped {}", copied, skipped);

        std::fs::write(
            output_dir.join("CHECKLIST.txt"),
            checklist_text(report, today),
        )?;
        std::fs::write(output_dir.join("RESUMO.txt"), summary_text(report, today))?;

        let json = serde_json::to_string_pretty(&serde_json::json!({
            "generated_at": today.format("%Y-%m-%d").to_string(),
            "compliance_report": report_json(report),
        }))?;
        std::fs::write(output_dir.join("relatorio.json"), json)?;

        std::fs::write(output_dir.join("LEIA-ME.txt"), readme_text(report, today))?;

        info!("Folder generation complete: {}", output_dir.display());
        Ok(output_dir)
    }

    fn create_category_folders(
        &self,
        output_dir: &Path,
    ) -> Result<HashMap<Category, PathBuf>> {
        let mut paths = HashMap::new();
        for (category, folder_name) in CATEGORY_FOLDERS {
            let folder = output_dir.join(folder_name);
            std::fs::create_dir_all(&folder)?;
            debug!("Created category folder: {}", folder_name);
            paths.insert(*category, folder);
        }
        Ok(paths)
    }
}

/// Copy a document, numbering the destination on name collisions.
fn copy_document(source: &Path, dest_folder: &Path) -> Result<PathBuf> {
    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Report(format!("unreadable filename: {}", source.display())))?;

    let mut dest = dest_folder.join(file_name);
    if dest.exists() {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("documento");
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let mut counter = 1;
        while dest.exists() {
            dest = dest_folder.join(format!("{stem}_{counter}{ext}"));
            counter += 1;
        }
    }

    std::fs::copy(source, &dest)?;
    debug!("Copied: {} -> {}", file_name, dest.display());
    Ok(dest)
}

fn readme_text(report: &ComplianceReport, today: NaiveDate) -> String {
    format!(
        "PASTA ORGANIZADA PARA LICITAÇÃO\n\
         Gerada automaticamente em {}\n\
         \n\
         ESTRUTURA DA PASTA:\n\
         \n\
         \x20 01_Habilitacao_Juridica/    - Documentos de habilitação jurídica\n\
         \x20 02_Regularidade_Fiscal/     - Certidões e regularidades fiscais\n\
         \x20 03_Qualificacao_Tecnica/    - Atestados e qualificações técnicas\n\
         \x20 04_Qualificacao_Economica/  - Balanços e qualificações econômicas\n\
         \x20 05_Proposta_Comercial/      - Proposta comercial (se aplicável)\n\
         \x20 06_Outros/                  - Outros documentos\n\
         \n\
         ARQUIVOS DE CONTROLE:\n\
         \n\
         \x20 CHECKLIST.txt   - Lista completa de documentos exigidos\n\
         \x20 RESUMO.txt      - Resumo executivo da análise\n\
         \x20 relatorio.json  - Relatório técnico completo (JSON)\n\
         \n\
         STATUS DA DOCUMENTAÇÃO:\n\
         \n\
         {}\n\
         \n\
         IMPORTANTE:\n\
         \n\
         1. Esta organização foi gerada automaticamente\n\
         2. REVISE MANUALMENTE todos os documentos antes do envio\n\
         3. Verifique se os documentos correspondem às exigências do edital\n\
         4. Confira datas de validade e informações nos documentos\n\
         5. A responsabilidade final pela conformidade é do usuário\n",
        today.format("%d/%m/%Y"),
        report.summary()
    )
}
