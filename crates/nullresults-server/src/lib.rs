#![forbid(unsafe_code)]
//! HTTP store endpoint for experiment records.
//!
//! The storage handle is constructed by the caller and carried in
//! [`AppState`]; handlers never reach for ambient connections. A missing
//! handle is a served condition, not a crash: data routes answer 500 and
//! `/readyz` reports not-ready until a store exists.

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use nullresults_store::ExperimentStore;
use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::sync::Mutex;

mod http;

pub const CRATE_NAME: &str = "nullresults-server";

/// Request bodies larger than this are cut off by axum before any handler
/// runs; an experiment write-up has no business being bigger.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Default)]
pub struct RequestMetrics {
    counts: Mutex<HashMap<(String, u16), u64>>,
}

impl RequestMetrics {
    pub(crate) async fn observe_request(&self, route: &str, status: StatusCode) {
        let mut counts = self.counts.lock().await;
        *counts
            .entry((route.to_string(), status.as_u16()))
            .or_insert(0) += 1;
    }

    /// Plain-text counter lines, sorted for stable scrapes.
    pub async fn render(&self) -> String {
        let counts = self.counts.lock().await;
        let mut lines: Vec<String> = counts
            .iter()
            .map(|((route, status), count)| {
                format!("requests_total{{route=\"{route}\",status=\"{status}\"}} {count}")
            })
            .collect();
        drop(counts);
        lines.sort();
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

#[derive(Clone)]
pub struct AppState {
    /// `None` when the database failed to open at startup; handlers answer
    /// `StoreUnavailable` before looking at the request.
    pub store: Option<Arc<Mutex<ExperimentStore>>>,
    pub metrics: Arc<RequestMetrics>,
    pub request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Option<ExperimentStore>) -> Self {
        Self {
            store: store.map(|s| Arc::new(Mutex::new(s))),
            metrics: Arc::new(RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::handlers::landing_handler))
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/readyz", get(http::handlers::readyz_handler))
        .route("/metrics", get(http::handlers::metrics_handler))
        .route("/v1/version", get(http::handlers::version_handler))
        .route("/v1/openapi.json", get(http::handlers::openapi_handler))
        .route(
            "/experiments",
            get(http::handlers::list_experiments_handler)
                .post(http::handlers::create_experiment_handler),
        )
        .route(
            "/experiments/:id",
            get(http::handlers::read_experiment_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
