use crate::{AppState, CRATE_NAME};
use axum::body::{Body, Bytes};
use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use nullresults_api::{
    map_error_status, openapi_v1_spec, ApiError, CreatedResponse, ExperimentListResponse,
    ExperimentResponse, API_VERSION,
};
use nullresults_model::{parse_experiment_id, NewExperiment};
use serde_json::json;
use std::sync::atomic::Ordering;
use tracing::{info, warn};

pub(crate) fn api_error_response(err: ApiError) -> Response {
    let status = StatusCode::from_u16(map_error_status(err.code))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({"error": err}))).into_response()
}

pub(crate) fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    make_request_id(state)
}

pub(crate) fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(v) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", v);
    }
    response
}

pub(crate) async fn landing_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let request_id = propagated_request_id(&headers, &state);
    let html = format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>nullresults</title></head><body>\
<h1>nullresults.club</h1>\
<p>Version: <code>{}</code></p>\
<p>Everyone publishes their successes. Here we publish the crashes, the flops, \
the null results, and the \"turns out that doesn't work\" moments.</p>\
<ul>\
<li><a href=\"/experiments\">Browse experiments (JSON)</a></li>\
<li><code>POST /experiments</code> to share a failed experiment</li>\
<li><a href=\"/v1/openapi.json\">API description</a></li>\
</ul>\
</body></html>",
        env!("CARGO_PKG_VERSION"),
    );
    let mut resp = Response::new(Body::from(html));
    resp.headers_mut().insert(
        "content-type",
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    state.metrics.observe_request("/", StatusCode::OK).await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn healthz_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let request_id = propagated_request_id(&headers, &state);
    let resp = (StatusCode::OK, "ok").into_response();
    state
        .metrics
        .observe_request("/healthz", StatusCode::OK)
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn readyz_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let request_id = propagated_request_id(&headers, &state);
    let (status, body) = if state.store.is_some() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not-ready")
    };
    let resp = (status, body).into_response();
    state.metrics.observe_request("/readyz", status).await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn metrics_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let request_id = propagated_request_id(&headers, &state);
    let body = state.metrics.render().await;
    state
        .metrics
        .observe_request("/metrics", StatusCode::OK)
        .await;
    with_request_id((StatusCode::OK, body).into_response(), &request_id)
}

pub(crate) async fn version_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let request_id = propagated_request_id(&headers, &state);
    let payload = json!({
        "crate": CRATE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": API_VERSION,
    });
    state
        .metrics
        .observe_request("/v1/version", StatusCode::OK)
        .await;
    with_request_id(Json(payload).into_response(), &request_id)
}

pub(crate) async fn openapi_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let request_id = propagated_request_id(&headers, &state);
    state
        .metrics
        .observe_request("/v1/openapi.json", StatusCode::OK)
        .await;
    with_request_id(Json(openapi_v1_spec()).into_response(), &request_id)
}

/// POST /experiments. Store availability is checked before the body is even
/// parsed; a dead backend must not masquerade as a validation failure.
pub(crate) async fn create_experiment_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);

    let Some(store) = state.store.clone() else {
        warn!(request_id = %request_id, "create rejected: store unavailable");
        return observe_error(&state, "/experiments", ApiError::store_unavailable(), &request_id)
            .await;
    };

    let input: NewExperiment = match serde_json::from_slice(&body) {
        Ok(input) => input,
        Err(e) => {
            return observe_error(
                &state,
                "/experiments",
                ApiError::malformed_body(&e.to_string()),
                &request_id,
            )
            .await;
        }
    };

    let missing = input.missing_required_fields();
    if !missing.is_empty() {
        return observe_error(
            &state,
            "/experiments",
            ApiError::missing_required_fields(&missing),
            &request_id,
        )
        .await;
    }

    let inserted = {
        let guard = store.lock().await;
        guard.insert_experiment(&input)
    };
    match inserted {
        Ok(id) => {
            info!(request_id = %request_id, id, "experiment created");
            let resp =
                (StatusCode::CREATED, Json(CreatedResponse { id })).into_response();
            state
                .metrics
                .observe_request("/experiments", StatusCode::CREATED)
                .await;
            with_request_id(resp, &request_id)
        }
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "experiment insert failed");
            observe_error(&state, "/experiments", ApiError::internal(&e.0), &request_id).await
        }
    }
}

/// GET /experiments. No parameters; a fixed window of the newest records.
pub(crate) async fn list_experiments_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);

    let Some(store) = state.store.clone() else {
        warn!(request_id = %request_id, "list rejected: store unavailable");
        return observe_error(&state, "/experiments", ApiError::store_unavailable(), &request_id)
            .await;
    };

    let listed = {
        let guard = store.lock().await;
        guard.list_recent()
    };
    match listed {
        Ok(experiments) => {
            let resp = Json(ExperimentListResponse { experiments }).into_response();
            state
                .metrics
                .observe_request("/experiments", StatusCode::OK)
                .await;
            with_request_id(resp, &request_id)
        }
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "experiment list failed");
            observe_error(&state, "/experiments", ApiError::internal(&e.0), &request_id).await
        }
    }
}

/// GET /experiments/:id. Identifier validation happens before any query.
pub(crate) async fn read_experiment_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(raw_id): AxumPath<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let route = "/experiments/:id";

    let Some(store) = state.store.clone() else {
        warn!(request_id = %request_id, "read rejected: store unavailable");
        return observe_error(&state, route, ApiError::store_unavailable(), &request_id).await;
    };

    let id = match parse_experiment_id(&raw_id) {
        Ok(id) => id,
        Err(_) => {
            return observe_error(&state, route, ApiError::invalid_id(&raw_id), &request_id).await;
        }
    };

    let fetched = {
        let guard = store.lock().await;
        guard.fetch_experiment(id)
    };
    match fetched {
        Ok(Some(experiment)) => {
            let resp = Json(ExperimentResponse { experiment }).into_response();
            state.metrics.observe_request(route, StatusCode::OK).await;
            with_request_id(resp, &request_id)
        }
        Ok(None) => observe_error(&state, route, ApiError::not_found(id), &request_id).await,
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "experiment fetch failed");
            observe_error(&state, route, ApiError::internal(&e.0), &request_id).await
        }
    }
}

async fn observe_error(
    state: &AppState,
    route: &str,
    err: ApiError,
    request_id: &str,
) -> Response {
    let resp = api_error_response(err);
    state.metrics.observe_request(route, resp.status()).await;
    with_request_id(resp, request_id)
}
