//! Requirement entity produced by notice analysis.

use serde::{Deserialize, Serialize};
use tracing::warn;

use licita_core::Category;

/// A single document requirement from a bid notice.
///
/// Immutable once produced; the comparator consumes it read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidRequirement {
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    /// Specific conditions quoted from the notice.
    #[serde(default, rename = "requirements")]
    pub requirements_text: String,
    #[serde(default = "default_mandatory")]
    pub is_mandatory: bool,
}

fn default_mandatory() -> bool {
    true
}

impl BidRequirement {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            description: String::new(),
            requirements_text: String::new(),
            is_mandatory: true,
        }
    }

    /// Build from an untrusted JSON object (LLM output, corpus file).
    ///
    /// The category string is validated against the closed set; anything
    /// unknown coerces to `outros` with a warning. Missing name yields
    /// `None` — a requirement without a name is unusable.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let name = value.get("name")?.as_str()?.trim();
        if name.is_empty() {
            return None;
        }

        let category_raw = value
            .get("category")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let category = match Category::parse(category_raw) {
            Some(cat) => cat,
            None => {
                warn!(
                    "Invalid category '{}' for requirement '{}', coercing to 'outros'",
                    category_raw, name
                );
                Category::Other
            }
        };

        Some(Self {
            name: name.to_string(),
            category,
            description: value
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            requirements_text: value
                .get("requirements")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            is_mandatory: value
                .get("is_mandatory")
                .and_then(|v| v.as_bool())
                .unwrap_or(true),
        })
    }
}
