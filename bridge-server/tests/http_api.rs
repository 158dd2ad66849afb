//! End-to-end API tests against the in-process router
//!
//! No network, no hardware: file-transport printers write into a
//! tempdir and mock mode covers the rest.

use axum::Router;
use axum::body::Body;
use bridge_server::core::{Config, ServerState, build_app};
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_app(mock: bool) -> (Router, ServerState) {
    let config = Config::with_overrides(8888, mock);
    let state = ServerState::new(config.clone());
    let app = build_app(&config).with_state(state.clone());
    (app, state)
}

async fn send(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health_reports_connected_printers() {
    let (app, _state) = test_app(true);

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["printerLibraryAvailable"], false);
    assert_eq!(body["printersConnected"], 0);
    assert_eq!(body["printerIds"], json!([]));

    let (status, _) = send(
        &app,
        "POST",
        "/printer/connect",
        Some(json!({ "printerId": "a", "type": "network", "config": { "host": "127.0.0.1" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(body["printersConnected"], 1);
    assert_eq!(body["printerIds"], json!(["a"]));
}

#[tokio::test]
async fn test_file_printer_text_job_with_cut() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("receipt.bin");
    let (app, _state) = test_app(false);

    let (status, body) = send(
        &app,
        "POST",
        "/printer/connect",
        Some(json!({
            "printerId": "receipt",
            "name": "Receipt Printer",
            "type": "file",
            "config": { "file": path.to_str().unwrap() }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{:?}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["printerId"], "receipt");
    assert_eq!(body["printerName"], "Receipt Printer");

    let (status, body) = send(
        &app,
        "POST",
        "/printer/print",
        Some(json!({ "printerId": "receipt", "type": "text", "data": "Hello", "cut": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{:?}", body);
    assert_eq!(body["success"], true);

    let written = std::fs::read(&path).unwrap();
    let mut expected = b"Hello".to_vec();
    expected.extend_from_slice(&[0x1D, 0x56, 0x00]);
    assert_eq!(written, expected);
}

#[tokio::test]
async fn test_raw_hex_job_reaches_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.bin");
    let (app, _state) = test_app(false);

    send(
        &app,
        "POST",
        "/printer/connect",
        Some(json!({ "printerId": "r", "type": "file", "config": { "file": path.to_str().unwrap() } })),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        "/printer/print",
        Some(json!({ "printerId": "r", "type": "raw", "data": "0x1B 0x40 0x1B 0x69" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(std::fs::read(&path).unwrap(), vec![0x1B, 0x40, 0x1B, 0x69]);
}

#[tokio::test]
async fn test_escpos_job_emits_format_and_cut_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("escpos.bin");
    let (app, _state) = test_app(false);

    send(
        &app,
        "POST",
        "/printer/connect",
        Some(json!({ "printerId": "e", "type": "file", "config": { "file": path.to_str().unwrap() } })),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        "/printer/print",
        Some(json!({
            "printerId": "e",
            "type": "escpos",
            "commands": [
                { "action": "set", "attribute": "align", "value": "center" },
                { "action": "text", "data": "Hi" },
                { "action": "cut" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let mut expected = vec![0x1B, 0x61, 0x01]; // ESC a 1
    expected.extend_from_slice(b"Hi");
    expected.extend_from_slice(&[0x1D, 0x56, 0x00]);
    assert_eq!(std::fs::read(&path).unwrap(), expected);
}

#[tokio::test]
async fn test_print_to_unknown_printer_is_404() {
    let (app, _state) = test_app(true);

    let (status, body) = send(
        &app,
        "POST",
        "/printer/print",
        Some(json!({ "printerId": "ghost", "type": "text", "data": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn test_malformed_body_is_400_in_uniform_shape() {
    let (app, _state) = test_app(true);

    let request = Request::builder()
        .method("POST")
        .uri("/printer/print")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_invalid_hex_is_400() {
    let (app, _state) = test_app(true);

    send(
        &app,
        "POST",
        "/printer/connect",
        Some(json!({ "printerId": "m", "type": "network", "config": { "host": "h" } })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/printer/print",
        Some(json!({ "printerId": "m", "type": "raw", "data": "not-hex" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_unknown_connection_type_is_400() {
    let (app, _state) = test_app(true);

    let (status, body) = send(
        &app,
        "POST",
        "/printer/connect",
        Some(json!({ "printerId": "x", "type": "bluetooth" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_disconnect_then_print_is_404() {
    let (app, _state) = test_app(true);

    send(
        &app,
        "POST",
        "/printer/connect",
        Some(json!({ "printerId": "a", "type": "network", "config": { "host": "h" } })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/printer/disconnect",
        Some(json!({ "printerId": "a" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send(
        &app,
        "POST",
        "/printer/print",
        Some(json!({ "printerId": "a", "type": "text", "data": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Disconnecting again reports not found too
    let (status, _) = send(
        &app,
        "POST",
        "/printer/disconnect",
        Some(json!({ "printerId": "a" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_disconnect_without_id_removes_everything() {
    let (app, _state) = test_app(true);

    for id in ["a", "b"] {
        send(
            &app,
            "POST",
            "/printer/connect",
            Some(json!({ "printerId": id, "type": "network", "config": { "host": "h" } })),
        )
        .await;
    }

    let (status, body) = send(&app, "POST", "/printer/disconnect", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains('2'));

    let (_, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(body["printersConnected"], 0);
}

#[tokio::test]
async fn test_list_connected_reports_sessions() {
    let (app, _state) = test_app(true);

    send(
        &app,
        "POST",
        "/printer/connect",
        Some(json!({ "printerId": "pos", "name": "POS80", "type": "network", "config": { "host": "h" } })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/printer/list-connected", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["printers"][0]["printerId"], "pos");
    assert_eq!(body["printers"][0]["name"], "POS80");
    assert_eq!(body["printers"][0]["type"], "network");
    assert_eq!(body["printers"][0]["status"], "connected");
}

#[tokio::test]
async fn test_connect_id_falls_back_to_name() {
    let (app, _state) = test_app(true);

    let (status, body) = send(
        &app,
        "POST",
        "/printer/connect",
        Some(json!({ "name": "Front Desk", "type": "network", "config": { "host": "h" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["printerId"], "Front Desk");

    let (status, body) = send(
        &app,
        "POST",
        "/printer/connect",
        Some(json!({ "type": "network", "config": { "host": "h" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["printerId"], "printer_1");
}

#[tokio::test]
async fn test_connect_by_name_unknown_is_404() {
    let (app, state) = test_app(true);

    // /printer/list would normally populate the snapshot; with an empty
    // system there is nothing to match
    let _ = state.discovery.refresh().await;

    let (status, body) = send(
        &app,
        "POST",
        "/printer/connect-by-name",
        Some(json!({ "name": "No Such Printer" })),
    )
    .await;
    // 404 unless the host happens to expose a printer with that name
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_reconnect_replaces_session_and_keeps_printing() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.bin");
    let second = dir.path().join("second.bin");
    let (app, _state) = test_app(false);

    for path in [&first, &second] {
        let (status, _) = send(
            &app,
            "POST",
            "/printer/connect",
            Some(json!({ "printerId": "p", "type": "file", "config": { "file": path.to_str().unwrap() } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    send(
        &app,
        "POST",
        "/printer/print",
        Some(json!({ "printerId": "p", "type": "text", "data": "after" })),
    )
    .await;

    // The replaced session must not receive the job
    assert_eq!(std::fs::read(&first).unwrap(), b"");
    assert_eq!(std::fs::read(&second).unwrap(), b"after");
}
