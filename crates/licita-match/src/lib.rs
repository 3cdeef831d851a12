//! Licita Match — pairs bid requirements with classified documents and
//! produces the compliance report.

pub mod comparator;
pub mod report;
pub mod similarity;

pub use comparator::Comparator;
pub use report::{ComplianceReport, MatchStatus, RequirementMatch, Statistics};
pub use similarity::similarity;
