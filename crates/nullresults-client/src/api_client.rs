use nullresults_model::{Experiment, ExperimentSummary, NewExperiment};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError(pub String);

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for ClientError {}

/// Raw form input for the submit flow. Every field is trimmed before the
/// payload is built; empty optional fields are dropped rather than sent as
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperimentForm {
    pub title: String,
    pub summary: String,
    pub what_tried: String,
    pub what_went_wrong: String,
    pub what_learned: String,
    pub tags: String,
    pub author_name: String,
}

impl ExperimentForm {
    #[must_use]
    pub fn into_payload(self) -> NewExperiment {
        fn required(raw: &str) -> Option<String> {
            Some(raw.trim().to_string())
        }
        fn optional(raw: &str) -> Option<String> {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        NewExperiment {
            title: required(&self.title),
            summary: required(&self.summary),
            what_tried: required(&self.what_tried),
            what_went_wrong: required(&self.what_went_wrong),
            what_learned: required(&self.what_learned),
            tags: optional(&self.tags),
            author_name: optional(&self.author_name),
        }
    }
}

/// Thin wrapper over the store endpoint. Each call is one request; there is
/// no shared state between calls beyond the connection pool.
pub struct ExperimentsClient {
    http: reqwest::Client,
    base_url: String,
}

impl ExperimentsClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates an experiment, returning the assigned identifier. On a
    /// non-success status the error carries the server-reported message
    /// when one is present, otherwise a status-line fallback.
    pub async fn create_experiment(&self, payload: &NewExperiment) -> Result<i64, ClientError> {
        let url = format!("{}/experiments", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ClientError(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError(server_message(resp, status).await));
        }
        let body: Value = resp
            .json()
            .await
            .map_err(|_| ClientError("Malformed response from server".to_string()))?;
        body["id"]
            .as_i64()
            .ok_or_else(|| ClientError("Malformed response from server".to_string()))
    }

    /// Fetches the recent-experiments window.
    pub async fn fetch_experiments(&self) -> Result<Vec<ExperimentSummary>, ClientError> {
        let url = format!("{}/experiments", self.base_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError(format!(
                "Request failed with status {}",
                status.as_u16()
            )));
        }
        let body: Value = resp
            .json()
            .await
            .map_err(|_| ClientError("Malformed response from server".to_string()))?;
        let experiments = body
            .get("experiments")
            .cloned()
            .ok_or_else(|| ClientError("Malformed response from server".to_string()))?;
        serde_json::from_value(experiments)
            .map_err(|_| ClientError("Malformed response from server".to_string()))
    }

    /// Fetches one experiment by its raw path identifier. `Ok(None)` means
    /// the server answered 404; every other failure is an error.
    pub async fn fetch_experiment(&self, raw_id: &str) -> Result<Option<Experiment>, ClientError> {
        let url = format!("{}/experiments/{raw_id}", self.base_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError(e.to_string()))?;
        let status = resp.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ClientError(format!(
                "Request failed with status {}",
                status.as_u16()
            )));
        }
        let body: Value = resp
            .json()
            .await
            .map_err(|_| ClientError("Malformed response from server".to_string()))?;
        let experiment = body
            .get("experiment")
            .cloned()
            .ok_or_else(|| ClientError("Malformed response from server".to_string()))?;
        serde_json::from_value(experiment)
            .map(Some)
            .map_err(|_| ClientError("Malformed response from server".to_string()))
    }
}

async fn server_message(resp: reqwest::Response, status: reqwest::StatusCode) -> String {
    let fallback = format!("Request failed with status {}", status.as_u16());
    match resp.json::<Value>().await {
        Ok(body) => body["error"]["message"]
            .as_str()
            .filter(|m| !m.is_empty())
            .map_or(fallback, ToString::to_string),
        Err(_) => fallback,
    }
}
