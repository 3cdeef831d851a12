//! JSON rendering of the compliance report.

use licita_match::ComplianceReport;

/// Full report as a JSON value, including derived fields and per-match
/// observations. The shape is part of the contract with report consumers.
pub fn report_json(report: &ComplianceReport) -> serde_json::Value {
    let matches: Vec<serde_json::Value> = report
        .matches
        .iter()
        .map(|m| {
            serde_json::json!({
                "requirement": m.requirement,
                "matched_document": m.matched_document,
                "match_confidence": m.match_confidence,
                "status": m.status,
                "observations": m.observations(),
            })
        })
        .collect();

    serde_json::json!({
        "matches": matches,
        "unmatched_documents": report.unmatched_documents,
        "statistics": report.statistics,
        "is_compliant": report.is_compliant(),
        "compliance_rate": report.compliance_rate(),
        "summary": report.summary(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use licita_classify::ClassifiedDocument;
    use licita_core::Category;
    use licita_match::{MatchStatus, RequirementMatch};
    use licita_notice::BidRequirement;

    #[test]
    fn test_report_json_shape() {
        let mut report = ComplianceReport::new();
        report.add_match(RequirementMatch {
            requirement: BidRequirement::new("CND Federal", Category::TaxCompliance),
            matched_document: Some(ClassifiedDocument::new(
                "cnd_federal.pdf",
                "CND Federal",
                Category::TaxCompliance,
                0.95,
            )),
            match_confidence: 0.65,
            status: MatchStatus::Warning,
        });

        let value = report_json(&report);
        assert_eq!(value["statistics"]["total_requirements"], 1);
        assert_eq!(value["matches"][0]["status"], "warning");
        assert_eq!(
            value["matches"][0]["requirement"]["category"],
            "regularidade_fiscal"
        );
        assert!(value["is_compliant"].as_bool().unwrap());
        // Low-confidence observation is rendered with the exact value.
        let observations = value["matches"][0]["observations"].as_array().unwrap();
        assert!(observations
            .iter()
            .any(|o| o.as_str().unwrap().contains("0.65")));
    }

    #[test]
    fn test_report_json_empty() {
        let value = report_json(&ComplianceReport::new());
        assert_eq!(value["compliance_rate"], 0.0);
        assert!(value["matches"].as_array().unwrap().is_empty());
    }
}
