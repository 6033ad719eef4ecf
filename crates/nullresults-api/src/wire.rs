use nullresults_model::{Experiment, ExperimentSummary};
use serde::{Deserialize, Serialize};

/// Body of a successful create: the store-assigned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatedResponse {
    pub id: i64,
}

/// Body of the list endpoint: newest first, capped at the recent window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentListResponse {
    pub experiments: Vec<ExperimentSummary>,
}

/// Body of the read-by-id endpoint: the full record, narratives included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentResponse {
    pub experiment: Experiment,
}
