//! Flow drivers: one async fn per user action, each awaited once and
//! pattern-matched into a tagged view state. Underlying errors go to the
//! log; the states carry only user-readable text.

use crate::api_client::{ExperimentForm, ExperimentsClient};
use nullresults_model::{Experiment, ExperimentSummary};
use tracing::warn;

/// Submit-flow state machine. `Idle` and `Submitting` exist for callers
/// that render progress; the flow itself resolves to `Success` or `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Success { id: i64 },
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Loaded { entries: Vec<ExperimentSummary> },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Loaded { experiment: Box<Experiment> },
    NotFound,
    Failed { message: String },
}

pub async fn run_submit_flow(client: &ExperimentsClient, form: ExperimentForm) -> SubmitState {
    match client.create_experiment(&form.into_payload()).await {
        Ok(id) => SubmitState::Success { id },
        Err(e) => {
            warn!(error = %e, "experiment submission failed");
            // ClientError always carries a server message or a status-line
            // fallback, so the state maps it through directly.
            SubmitState::Error { message: e.0 }
        }
    }
}

pub async fn run_list_flow(client: &ExperimentsClient) -> ListState {
    match client.fetch_experiments().await {
        Ok(entries) => ListState::Loaded { entries },
        Err(e) => {
            warn!(error = %e, "experiment list failed");
            ListState::Failed {
                message: "Could not load experiments. Please try again later.".to_string(),
            }
        }
    }
}

pub async fn run_detail_flow(client: &ExperimentsClient, raw_id: &str) -> DetailState {
    match client.fetch_experiment(raw_id).await {
        Ok(Some(experiment)) => DetailState::Loaded {
            experiment: Box::new(experiment),
        },
        Ok(None) => DetailState::NotFound,
        Err(e) => {
            warn!(id = raw_id, error = %e, "experiment detail failed");
            DetailState::Failed {
                message: "Could not load experiment. Please try again later.".to_string(),
            }
        }
    }
}
