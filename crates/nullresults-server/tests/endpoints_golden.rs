use nullresults_server::{build_router, AppState};
use nullresults_store::ExperimentStore;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn spawn_server(state: AppState) -> std::net::SocketAddr {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

async fn send_raw(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let req = match body {
        Some(payload) => format!(
            "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
            payload.len()
        ),
        None => format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n"),
    };
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, raw_body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    // Chunked transfer coding shows up on JSON routes; de-chunk if needed.
    let body = if head.to_ascii_lowercase().contains("transfer-encoding: chunked") {
        dechunk(raw_body)
    } else {
        raw_body.to_string()
    };
    (status, head.to_string(), body)
}

fn dechunk(raw: &str) -> String {
    let mut out = String::new();
    let mut rest = raw;
    while let Some((size_line, tail)) = rest.split_once("\r\n") {
        let size = usize::from_str_radix(size_line.trim(), 16).unwrap_or(0);
        if size == 0 {
            break;
        }
        out.push_str(&tail[..size]);
        rest = tail[size..].trim_start_matches("\r\n");
    }
    out
}

fn complete_payload(title: &str) -> String {
    serde_json::json!({
        "title": title,
        "summary": "it did not work",
        "what_tried": "plugged A into B",
        "what_went_wrong": "B caught fire",
        "what_learned": "label your power supplies",
        "tags": "ml, hardware,, startup",
        "author_name": "Ada"
    })
    .to_string()
}

fn memory_state() -> AppState {
    AppState::new(Some(
        ExperimentStore::open_in_memory().expect("open in-memory store"),
    ))
}

#[tokio::test]
async fn create_then_read_round_trips_all_fields() {
    let addr = spawn_server(memory_state()).await;

    let (status, head, body) = send_raw(
        addr,
        "POST",
        "/experiments",
        Some(&complete_payload("Ferrofluid cooling")),
    )
    .await;
    assert_eq!(status, 201);
    assert!(
        head.to_ascii_lowercase().contains("x-request-id"),
        "missing request id header"
    );
    let created: serde_json::Value = serde_json::from_str(&body).expect("created json");
    let id = created["id"].as_i64().expect("id field");
    assert!(id > 0);

    let (status, _, body) = send_raw(addr, "GET", &format!("/experiments/{id}"), None).await;
    assert_eq!(status, 200);
    let fetched: serde_json::Value = serde_json::from_str(&body).expect("experiment json");
    let exp = &fetched["experiment"];
    assert_eq!(exp["id"], id);
    assert_eq!(exp["title"], "Ferrofluid cooling");
    assert_eq!(exp["summary"], "it did not work");
    assert_eq!(exp["what_tried"], "plugged A into B");
    assert_eq!(exp["what_went_wrong"], "B caught fire");
    assert_eq!(exp["what_learned"], "label your power supplies");
    assert_eq!(exp["tags"], "ml, hardware,, startup");
    assert_eq!(exp["author_name"], "Ada");
    assert!(exp["created_at"].as_str().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn missing_required_field_is_rejected_without_side_effect() {
    let addr = spawn_server(memory_state()).await;

    let payload = serde_json::json!({
        "title": "No summary",
        "what_tried": "a",
        "what_went_wrong": "b",
        "what_learned": "c"
    })
    .to_string();
    let (status, _, body) = send_raw(addr, "POST", "/experiments", Some(&payload)).await;
    assert_eq!(status, 400);
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "MissingRequiredFields");
    assert_eq!(err["error"]["message"], "Missing required fields");
    assert_eq!(err["error"]["details"]["fields"], serde_json::json!(["summary"]));

    let (_, _, list_body) = send_raw(addr, "GET", "/experiments", None).await;
    let list: serde_json::Value = serde_json::from_str(&list_body).expect("list json");
    assert_eq!(list["experiments"].as_array().expect("array").len(), 0);
}

#[tokio::test]
async fn empty_required_field_counts_as_missing() {
    let addr = spawn_server(memory_state()).await;

    let payload = serde_json::json!({
        "title": "",
        "summary": "s",
        "what_tried": "a",
        "what_went_wrong": "b",
        "what_learned": "c"
    })
    .to_string();
    let (status, _, body) = send_raw(addr, "POST", "/experiments", Some(&payload)).await;
    assert_eq!(status, 400);
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "MissingRequiredFields");
}

#[tokio::test]
async fn malformed_body_is_distinct_from_missing_fields() {
    let addr = spawn_server(memory_state()).await;

    let (status, _, body) = send_raw(addr, "POST", "/experiments", Some("{not json")).await;
    assert_eq!(status, 400);
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "MalformedBody");
    assert_eq!(err["error"]["message"], "Invalid JSON");
}

#[tokio::test]
async fn read_unknown_id_is_not_found_not_server_error() {
    let addr = spawn_server(memory_state()).await;

    let (status, _, body) = send_raw(addr, "GET", "/experiments/999", None).await;
    assert_eq!(status, 404);
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "NotFound");
    assert_eq!(err["error"]["message"], "Experiment not found");
}

#[tokio::test]
async fn non_numeric_and_non_positive_ids_fail_validation() {
    let addr = spawn_server(memory_state()).await;

    for bad in ["abc", "0", "-1", "3.5"] {
        let (status, _, body) = send_raw(addr, "GET", &format!("/experiments/{bad}"), None).await;
        assert_eq!(status, 400, "id {bad:?} should be invalid");
        let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
        assert_eq!(err["error"]["code"], "InvalidId");
        assert_eq!(err["error"]["message"], "Invalid experiment id");
    }
}

#[tokio::test]
async fn list_caps_at_twenty_newest_first_without_narratives() {
    let addr = spawn_server(memory_state()).await;

    let mut ids = Vec::new();
    for i in 0..25 {
        let (status, _, body) = send_raw(
            addr,
            "POST",
            "/experiments",
            Some(&complete_payload(&format!("experiment {i}"))),
        )
        .await;
        assert_eq!(status, 201);
        let created: serde_json::Value = serde_json::from_str(&body).expect("created json");
        ids.push(created["id"].as_i64().expect("id"));
    }

    let (status, _, body) = send_raw(addr, "GET", "/experiments", None).await;
    assert_eq!(status, 200);
    let list: serde_json::Value = serde_json::from_str(&body).expect("list json");
    let entries = list["experiments"].as_array().expect("array");
    assert_eq!(entries.len(), 20);

    let listed_ids: Vec<i64> = entries
        .iter()
        .map(|e| e["id"].as_i64().expect("entry id"))
        .collect();
    let mut expected = ids.clone();
    expected.reverse();
    expected.truncate(20);
    assert_eq!(listed_ids, expected, "list must be newest first");

    for entry in entries {
        assert!(entry.get("what_tried").is_none());
        assert!(entry.get("what_went_wrong").is_none());
        assert!(entry.get("what_learned").is_none());
        assert!(entry.get("title").is_some());
        assert!(entry.get("created_at").is_some());
    }
}

#[tokio::test]
async fn unavailable_store_answers_500_before_validation() {
    let addr = spawn_server(AppState::new(None)).await;

    // Even a request that would fail validation gets the server error.
    let (status, _, body) = send_raw(addr, "POST", "/experiments", Some("{not json")).await;
    assert_eq!(status, 500);
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "StoreUnavailable");
    assert_eq!(err["error"]["message"], "Database not available");

    let (status, _, _) = send_raw(addr, "GET", "/experiments", None).await;
    assert_eq!(status, 500);
    let (status, _, _) = send_raw(addr, "GET", "/experiments/1", None).await;
    assert_eq!(status, 500);

    let (status, _, body) = send_raw(addr, "GET", "/readyz", None).await;
    assert_eq!(status, 503);
    assert_eq!(body, "not-ready");
}

#[tokio::test]
async fn request_id_header_is_propagated_on_every_route() {
    let addr = spawn_server(memory_state()).await;

    // Data routes and operational routes alike echo the caller's id.
    for path in [
        "/experiments",
        "/",
        "/healthz",
        "/readyz",
        "/metrics",
        "/v1/version",
        "/v1/openapi.json",
    ] {
        let mut stream = tokio::net::TcpStream::connect(addr)
            .await
            .expect("connect server");
        let req = format!(
            "GET {path} HTTP/1.1\r\nHost: {addr}\r\nx-request-id: trace-me-7\r\nConnection: close\r\n\r\n"
        );
        stream.write_all(req.as_bytes()).await.expect("write");
        let mut response = String::new();
        stream.read_to_string(&mut response).await.expect("read");
        assert!(
            response.to_ascii_lowercase().contains("x-request-id: trace-me-7"),
            "request id not echoed on {path}: {response}"
        );
    }
}

#[tokio::test]
async fn operational_endpoints_respond() {
    let addr = spawn_server(memory_state()).await;

    let (status, _, body) = send_raw(addr, "GET", "/healthz", None).await;
    assert_eq!(status, 200);
    assert_eq!(body, "ok");

    let (status, _, body) = send_raw(addr, "GET", "/readyz", None).await;
    assert_eq!(status, 200);
    assert_eq!(body, "ready");

    let (status, _, body) = send_raw(addr, "GET", "/v1/version", None).await;
    assert_eq!(status, 200);
    let version: serde_json::Value = serde_json::from_str(&body).expect("version json");
    assert_eq!(version["api_version"], "v1");

    let (status, _, body) = send_raw(addr, "GET", "/v1/openapi.json", None).await;
    assert_eq!(status, 200);
    let spec: serde_json::Value = serde_json::from_str(&body).expect("openapi json");
    assert!(spec["paths"]["/experiments"].is_object());

    let (status, _, body) = send_raw(addr, "GET", "/", None).await;
    assert_eq!(status, 200);
    assert!(body.contains("nullresults"));

    let (status, _, body) = send_raw(addr, "GET", "/metrics", None).await;
    assert_eq!(status, 200);
    assert!(
        body.contains("requests_total{route=\"/healthz\",status=\"200\"}"),
        "healthz hit not counted: {body}"
    );
}
