//! Document categories used by Brazilian procurement notices.

use serde::{Deserialize, Serialize};

/// Closed set of procurement document categories.
///
/// Both bid requirements and classified documents carry one of these.
/// Values outside the set are coerced to [`Category::Other`] at the
/// boundary, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Habilitação jurídica — corporate/legal standing documents.
    #[serde(rename = "habilitacao_juridica")]
    LegalQualification,
    /// Regularidade fiscal — tax compliance certificates.
    #[serde(rename = "regularidade_fiscal")]
    TaxCompliance,
    /// Qualificação técnica — technical capability attestations.
    #[serde(rename = "qualificacao_tecnica")]
    TechnicalQualification,
    /// Qualificação econômico-financeira — balance sheets, solvency.
    #[serde(rename = "qualificacao_economica")]
    EconomicQualification,
    /// Proposta comercial.
    #[serde(rename = "proposta_comercial")]
    CommercialProposal,
    #[serde(rename = "outros")]
    Other,
}

impl Category {
    /// Canonical slug as used in notices, reports and corpus files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LegalQualification => "habilitacao_juridica",
            Self::TaxCompliance => "regularidade_fiscal",
            Self::TechnicalQualification => "qualificacao_tecnica",
            Self::EconomicQualification => "qualificacao_economica",
            Self::CommercialProposal => "proposta_comercial",
            Self::Other => "outros",
        }
    }

    /// Human-readable section title for checklists.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LegalQualification => "HABILITAÇÃO JURÍDICA",
            Self::TaxCompliance => "REGULARIDADE FISCAL",
            Self::TechnicalQualification => "QUALIFICAÇÃO TÉCNICA",
            Self::EconomicQualification => "QUALIFICAÇÃO ECONÔMICO-FINANCEIRA",
            Self::CommercialProposal => "PROPOSTA COMERCIAL",
            Self::Other => "OUTROS",
        }
    }

    /// Parse a slug into a category. Unknown values return `None`;
    /// callers decide the coercion policy (and any confidence penalty).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "habilitacao_juridica" => Some(Self::LegalQualification),
            "regularidade_fiscal" => Some(Self::TaxCompliance),
            "qualificacao_tecnica" => Some(Self::TechnicalQualification),
            "qualificacao_economica" => Some(Self::EconomicQualification),
            "proposta_comercial" => Some(Self::CommercialProposal),
            "outros" => Some(Self::Other),
            _ => None,
        }
    }

    /// All categories, in checklist order.
    pub fn all() -> [Self; 6] {
        [
            Self::LegalQualification,
            Self::TaxCompliance,
            Self::TechnicalQualification,
            Self::EconomicQualification,
            Self::CommercialProposal,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
