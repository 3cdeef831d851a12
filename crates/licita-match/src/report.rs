//! Match and report types.

use serde::Serialize;

use licita_classify::ClassifiedDocument;
use licita_notice::BidRequirement;

/// Status of a single requirement after allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Ok,
    Expired,
    Missing,
    Warning,
}

/// One requirement paired with at most one document.
#[derive(Debug, Clone, Serialize)]
pub struct RequirementMatch {
    pub requirement: BidRequirement,
    pub matched_document: Option<ClassifiedDocument>,
    pub match_confidence: f64,
    pub status: MatchStatus,
}

impl RequirementMatch {
    pub fn missing(requirement: BidRequirement) -> Self {
        Self {
            requirement,
            matched_document: None,
            match_confidence: 0.0,
            status: MatchStatus::Missing,
        }
    }

    /// Human-readable notes about this match, for checklists and review.
    pub fn observations(&self) -> Vec<String> {
        let mut observations = Vec::new();

        match self.status {
            MatchStatus::Missing => observations.push("Documento não encontrado".to_string()),
            MatchStatus::Expired => {
                match self
                    .matched_document
                    .as_ref()
                    .and_then(|d| d.expiration_date)
                {
                    Some(date) => {
                        observations.push(format!("Documento vencido em {}", date.format("%Y-%m-%d")))
                    }
                    None => observations.push("Documento vencido".to_string()),
                }
            }
            MatchStatus::Warning => {
                if let Some(days) = self
                    .matched_document
                    .as_ref()
                    .and_then(|d| d.days_until_expiration)
                {
                    if days > 0 {
                        observations.push(format!("Documento vence em {days} dias"));
                    }
                }
            }
            MatchStatus::Ok => {
                if let Some(date) = self
                    .matched_document
                    .as_ref()
                    .and_then(|d| d.expiration_date)
                {
                    observations.push(format!("Documento válido até {}", date.format("%Y-%m-%d")));
                }
            }
        }

        // Sub-0.7 matches always carry the exact confidence so a reviewer
        // can prioritize re-checking them.
        if self.match_confidence < 0.7 && self.matched_document.is_some() {
            observations.push(format!(
                "Baixa confiança na correspondência ({:.2})",
                self.match_confidence
            ));
        }

        observations
    }
}

/// Per-status and per-document counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Statistics {
    pub total_requirements: usize,
    pub requirements_ok: usize,
    pub requirements_expired: usize,
    pub requirements_missing: usize,
    pub requirements_warning: usize,
    pub total_documents: usize,
    pub documents_matched: usize,
    pub documents_unmatched: usize,
}

/// Aggregate result of matching all requirements against all documents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComplianceReport {
    pub matches: Vec<RequirementMatch>,
    pub unmatched_documents: Vec<ClassifiedDocument>,
    pub statistics: Statistics,
}

impl ComplianceReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a match, keeping the counters consistent.
    pub fn add_match(&mut self, m: RequirementMatch) {
        self.statistics.total_requirements += 1;
        match m.status {
            MatchStatus::Ok => self.statistics.requirements_ok += 1,
            MatchStatus::Expired => self.statistics.requirements_expired += 1,
            MatchStatus::Missing => self.statistics.requirements_missing += 1,
            MatchStatus::Warning => self.statistics.requirements_warning += 1,
        }
        if m.matched_document.is_some() {
            self.statistics.documents_matched += 1;
        }
        self.matches.push(m);
    }

    pub fn set_unmatched_documents(&mut self, documents: Vec<ClassifiedDocument>) {
        self.statistics.documents_unmatched = documents.len();
        self.unmatched_documents = documents;
    }

    /// Compliance holds when nothing is missing and nothing is expired;
    /// warnings do not block it.
    pub fn is_compliant(&self) -> bool {
        self.statistics.requirements_missing == 0 && self.statistics.requirements_expired == 0
    }

    /// Percentage of requirements in `ok` status (0 when empty).
    pub fn compliance_rate(&self) -> f64 {
        let total = self.statistics.total_requirements;
        if total == 0 {
            return 0.0;
        }
        (self.statistics.requirements_ok as f64 / total as f64) * 100.0
    }

    /// Human-readable counter block.
    pub fn summary(&self) -> String {
        format!(
            "Compliance Report:\n\
             \x20 ✅ OK: {}\n\
             \x20 ⚠️  Warning: {}\n\
             \x20 ❌ Expired: {}\n\
             \x20 ❓ Missing: {}\n\
             \x20 📊 Compliance Rate: {:.1}%",
            self.statistics.requirements_ok,
            self.statistics.requirements_warning,
            self.statistics.requirements_expired,
            self.statistics.requirements_missing,
            self.compliance_rate()
        )
    }
}
