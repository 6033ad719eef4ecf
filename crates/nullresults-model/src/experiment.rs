use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

/// Names of the fields that must be present and non-empty at creation time,
/// in declaration order.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "title",
    "summary",
    "what_tried",
    "what_went_wrong",
    "what_learned",
];

/// A full experiment record as persisted. Immutable after creation; the
/// store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub what_tried: String,
    pub what_went_wrong: String,
    pub what_learned: String,
    pub tags: Option<String>,
    pub author_name: Option<String>,
    pub created_at: String,
}

/// List projection of an experiment. Narrative fields are deliberately
/// absent; list views never see them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub tags: Option<String>,
    pub author_name: Option<String>,
    pub created_at: String,
}

/// Create-request payload. Required fields are optional at the type level
/// so that absence and emptiness can be reported as one validation error
/// instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExperiment {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub what_tried: Option<String>,
    #[serde(default)]
    pub what_went_wrong: Option<String>,
    #[serde(default)]
    pub what_learned: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
}

impl NewExperiment {
    /// Names of required fields that are absent, null, or empty. A
    /// whitespace-only value counts as present; trimming is the caller's
    /// job, not the endpoint's.
    #[must_use]
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let present = [
            &self.title,
            &self.summary,
            &self.what_tried,
            &self.what_went_wrong,
            &self.what_learned,
        ];
        REQUIRED_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Parses a path-supplied experiment identifier. Accepts positive integers
/// only; anything else is rejected before the store is consulted.
pub fn parse_experiment_id(input: &str) -> Result<i64, ValidationError> {
    let id = input
        .parse::<i64>()
        .map_err(|_| ValidationError("Invalid experiment id".to_string()))?;
    if id <= 0 {
        return Err(ValidationError("Invalid experiment id".to_string()));
    }
    Ok(id)
}
