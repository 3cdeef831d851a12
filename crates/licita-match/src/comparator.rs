//! Greedy requirement/document allocation.
//!
//! Requirements are resolved most-specific first so they claim the
//! best-fitting document before shorter, generic requirements steal it.
//! This is deliberately not a globally optimal assignment: greedy,
//! priority-ordered, no backtracking.

use std::collections::HashSet;

use tracing::{info, warn};

use licita_classify::ClassifiedDocument;
use licita_notice::BidRequirement;

use crate::report::{ComplianceReport, MatchStatus, RequirementMatch};
use crate::similarity::similarity;

/// Compares bid requirements against classified documents.
pub struct Comparator {
    similarity_threshold: f64,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Comparator {
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            similarity_threshold,
        }
    }

    /// Specificity weight: longer, mandatory requirements resolve first.
    /// Whitespace word count is the contract.
    fn specificity_weight(requirement: &BidRequirement) -> usize {
        let words = requirement.name.split_whitespace().count();
        words * if requirement.is_mandatory { 2 } else { 1 }
    }

    /// Best unclaimed document for `requirement`, scanning in input order.
    ///
    /// Strictly-higher score wins, so the first document scanned keeps a
    /// tie. Returns the document index and its score.
    fn find_best_match(
        &self,
        requirement: &BidRequirement,
        documents: &[ClassifiedDocument],
        claimed: &HashSet<usize>,
    ) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;

        for (index, document) in documents.iter().enumerate() {
            if claimed.contains(&index) {
                continue;
            }

            let score = similarity(requirement, document);
            if score >= self.similarity_threshold
                && best.map(|(_, s)| score > s).unwrap_or(true)
            {
                best = Some((index, score));
            }
        }

        best
    }

    /// Status of an accepted match.
    fn determine_status(document: &ClassifiedDocument, score: f64) -> MatchStatus {
        if document.is_expired {
            return MatchStatus::Expired;
        }

        if let Some(days) = document.days_until_expiration {
            if days > 0 && days < 30 {
                return MatchStatus::Warning;
            }
        }

        if score < 0.7 {
            return MatchStatus::Warning;
        }

        MatchStatus::Ok
    }

    /// Match every requirement against the document pool.
    ///
    /// Each run constructs a fresh claimed set, so repeated calls over the
    /// same immutable inputs produce identical reports.
    pub fn compare(
        &self,
        requirements: &[BidRequirement],
        documents: &[ClassifiedDocument],
    ) -> ComplianceReport {
        info!(
            "Comparing {} requirements against {} documents",
            requirements.len(),
            documents.len()
        );

        let mut report = ComplianceReport::new();
        report.statistics.total_documents = documents.len();

        let mut claimed: HashSet<usize> = HashSet::new();

        // Stable sort keeps input order between equal weights.
        let mut sorted: Vec<&BidRequirement> = requirements.iter().collect();
        sorted.sort_by_key(|r| std::cmp::Reverse(Self::specificity_weight(r)));

        for requirement in sorted {
            let m = match self.find_best_match(requirement, documents, &claimed) {
                Some((index, score)) => {
                    // Defensive re-check: the effective minimum acceptance
                    // score is 0.5 even with a lower configured threshold.
                    if score < 0.5 {
                        warn!(
                            "Match confidence too low for {}: {:.2}, rejecting match",
                            requirement.name, score
                        );
                        RequirementMatch::missing(requirement.clone())
                    } else {
                        claimed.insert(index);
                        let document = &documents[index];
                        RequirementMatch {
                            requirement: requirement.clone(),
                            matched_document: Some(document.clone()),
                            match_confidence: score,
                            status: Self::determine_status(document, score),
                        }
                    }
                }
                None => RequirementMatch::missing(requirement.clone()),
            };

            report.add_match(m);
        }

        let unmatched: Vec<ClassifiedDocument> = documents
            .iter()
            .enumerate()
            .filter(|(index, _)| !claimed.contains(index))
            .map(|(_, d)| d.clone())
            .collect();
        report.set_unmatched_documents(unmatched);

        info!("Comparison complete:\n{}", report.summary());

        report
    }
}
