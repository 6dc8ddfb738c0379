use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Required top-level keys of a classifier response document.
pub const REQUIRED_KEYS: [&str; 4] = ["entities", "tone", "style", "safety_flags"];

/// Named entities grouped by category, each an ordered list with no
/// duplicates after merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityMap {
    pub people: Vec<String>,
    pub tools: Vec<String>,
    pub brands: Vec<String>,
    pub products: Vec<String>,
    pub organizations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tone {
    pub primary: String,
    pub secondary: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub primary: String,
    pub confidence: f64,
}

/// Severity of flagged content. Variant order defines merge precedence.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    #[serde(alias = "")]
    None,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyFlags {
    pub sensitive_domains: Vec<String>,
    pub severity: Severity,
    pub requires_review: bool,
}

/// One classification result, produced per transcript chunk and never
/// mutated afterwards. `Default` is the identity value that seeds the
/// aggregate before any chunk is folded in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationDocument {
    pub entities: EntityMap,
    pub tone: Tone,
    pub style: Style,
    pub safety_flags: SafetyFlags,
}

/// The persisted unit: the merged document plus run identifiers and a
/// timestamp. Written to the results file and the database row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub analysis_id: String,
    pub transcript_id: String,
    pub creator_id: String,
    #[serde(flatten)]
    pub document: ClassificationDocument,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

/// Shallow schema check: only the presence of the four required top-level
/// keys. Nested types, ranges and enum membership are deliberately not
/// inspected here.
pub fn has_required_keys(value: &serde_json::Value) -> bool {
    match value.as_object() {
        Some(map) => REQUIRED_KEYS.iter().all(|key| map.contains_key(*key)),
        None => false,
    }
}
