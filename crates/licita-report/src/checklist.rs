//! Human-readable checklist and summary renderers.

use chrono::NaiveDate;

use licita_core::Category;
use licita_match::{ComplianceReport, MatchStatus, RequirementMatch};

const RULE: &str = "======================================================================";
const THIN_RULE: &str = "----------------------------------------------------------------------";

fn status_icon(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::Ok => "✅",
        MatchStatus::Expired => "❌",
        MatchStatus::Missing => "❓",
        MatchStatus::Warning => "⚠️",
    }
}

/// Matches grouped by requirement category, in checklist order.
fn matches_by_category(report: &ComplianceReport) -> Vec<(Category, Vec<&RequirementMatch>)> {
    Category::all()
        .into_iter()
        .filter_map(|category| {
            let matches: Vec<&RequirementMatch> = report
                .matches
                .iter()
                .filter(|m| m.requirement.category == category)
                .collect();
            (!matches.is_empty()).then_some((category, matches))
        })
        .collect()
}

/// Render the full document checklist.
pub fn checklist_text(report: &ComplianceReport, today: NaiveDate) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(RULE.into());
    lines.push("CHECKLIST DE DOCUMENTOS PARA LICITAÇÃO".into());
    lines.push(RULE.into());
    lines.push(String::new());
    lines.push(format!("Data de verificação: {}", today.format("%Y-%m-%d")));
    lines.push(String::new());
    lines.push(report.summary());
    lines.push(String::new());
    lines.push(RULE.into());
    lines.push("DOCUMENTOS EXIGIDOS".into());
    lines.push(RULE.into());

    for (category, matches) in matches_by_category(report) {
        lines.push(String::new());
        lines.push(category.display_name().into());
        lines.push(THIN_RULE.into());

        for m in matches {
            lines.push(String::new());
            lines.push(format!("{} {}", status_icon(m.status), m.requirement.name));

            if let Some(document) = &m.matched_document {
                lines.push(format!("   Arquivo: {}", document.file_name));
            }

            for obs in m.observations() {
                lines.push(format!("   → {obs}"));
            }
        }
    }

    if !report.unmatched_documents.is_empty() {
        lines.push(String::new());
        lines.push(RULE.into());
        lines.push("DOCUMENTOS NÃO ASSOCIADOS".into());
        lines.push(RULE.into());
        lines.push(String::new());

        for document in &report.unmatched_documents {
            lines.push(format!("- {}", document.file_name));
            lines.push(format!("  Tipo: {}", document.document_type));
            lines.push(format!("  Categoria: {}", document.category));
            lines.push(String::new());
        }
    }

    lines.push(RULE.into());
    lines.push("OBSERVAÇÕES IMPORTANTES".into());
    lines.push(RULE.into());
    lines.push(String::new());
    lines.push("⚠️  Este checklist foi gerado automaticamente.".into());
    lines.push("⚠️  REVISE MANUALMENTE todos os documentos antes do envio.".into());
    lines.push("⚠️  A responsabilidade final pela conformidade é do usuário.".into());
    lines.push(String::new());

    lines.join("\n")
}

/// Render the executive summary.
pub fn summary_text(report: &ComplianceReport, today: NaiveDate) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(RULE.into());
    lines.push("RESUMO DA ANÁLISE DE LICITAÇÃO".into());
    lines.push(RULE.into());
    lines.push(String::new());
    lines.push(format!("Data: {}", today.format("%d/%m/%Y")));
    lines.push(String::new());
    lines.push(report.summary());
    lines.push(String::new());
    lines.push(RULE.into());
    lines.push("AÇÕES NECESSÁRIAS".into());
    lines.push(RULE.into());
    lines.push(String::new());

    if report.statistics.requirements_missing > 0 {
        lines.push("❌ DOCUMENTOS FALTANTES:".into());
        for m in &report.matches {
            if m.status == MatchStatus::Missing {
                lines.push(format!("   - {}", m.requirement.name));
            }
        }
        lines.push(String::new());
    }

    if report.statistics.requirements_expired > 0 {
        lines.push("⏰ DOCUMENTOS VENCIDOS:".into());
        for m in &report.matches {
            if m.status == MatchStatus::Expired {
                if let Some(document) = &m.matched_document {
                    lines.push(format!("   - {}", document.file_name));
                    if let Some(date) = document.expiration_date {
                        lines.push(format!("     Vencido em: {}", date.format("%Y-%m-%d")));
                    }
                }
            }
        }
        lines.push(String::new());
    }

    if report.statistics.requirements_warning > 0 {
        lines.push("⚠️  DOCUMENTOS COM AVISO:".into());
        for m in &report.matches {
            if m.status == MatchStatus::Warning {
                if let Some(document) = &m.matched_document {
                    lines.push(format!("   - {}", document.file_name));
                    for obs in m.observations() {
                        lines.push(format!("     {obs}"));
                    }
                }
            }
        }
        lines.push(String::new());
    }

    if report.is_compliant() {
        lines.push("✅ SITUAÇÃO: DOCUMENTAÇÃO COMPLETA E VÁLIDA".into());
    } else {
        lines.push("❌ SITUAÇÃO: DOCUMENTAÇÃO INCOMPLETA OU COM PENDÊNCIAS".into());
    }

    lines.push(String::new());
    lines.push(RULE.into());
    lines.push("IMPORTANTE".into());
    lines.push(RULE.into());
    lines.push(String::new());
    lines.push("⚠️  Revise manualmente todos os documentos antes do envio.".into());
    lines.push("⚠️  Verifique o edital para requisitos específicos não detectados.".into());
    lines.push("⚠️  Este relatório é apenas uma ferramenta de apoio.".into());
    lines.push(String::new());

    lines.join("\n")
}
