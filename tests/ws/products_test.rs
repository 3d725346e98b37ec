/// Camila Product API - WebSocket Integration Tests.
///
/// End-to-end tests against a real listening server, using a real
/// WebSocket client. Mirrors the product query protocol: JSON requests
/// tagged by `method`, JSON product frames back.
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use serial_test::serial;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message,
};

use crate::common::TestApp;

/// Response wait budget per frame.
const RESPONSE_TIMEOUT: Duration = Duration::from_millis(5000);

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open a WebSocket connection to the test server.
async fn connect(app: &TestApp) -> WsClient {
    let (ws, _) = connect_async(app.ws_url.as_str())
        .await
        .expect("Failed to connect to test WebSocket server");
    ws
}

/// Send one request frame.
async fn send(ws: &mut WsClient, request: &str) {
    ws.send(Message::Text(request.to_string().into()))
        .await
        .expect("Failed to send request frame");
}

/// Receive the next text frame as JSON, skipping transport pings.
async fn recv_json(ws: &mut WsClient) -> Value {
    loop {
        let msg = timeout(RESPONSE_TIMEOUT, ws.next())
            .await
            .expect("Timed out waiting for response frame")
            .expect("WebSocket stream ended early")
            .expect("WebSocket error");

        match msg {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("Response is not valid JSON");
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("Expected text frame, got {:?}", other),
        }
    }
}

// ==================== Find By Internal Id Tests ====================

/// Point lookup by internal id returns the product as a single frame.
#[tokio::test]
#[serial]
async fn test_find_by_internal_id_ok() {
    let app = TestApp::spawn().await;
    let mut ws = connect(app).await;

    send(
        &mut ws,
        r#"{"method": "FIND_BY_INTERNAL_ID", "internalId": "1"}"#,
    )
    .await;

    let json = recv_json(&mut ws).await;
    assert_eq!(json["internalId"], 1);
    assert_eq!(json["category"], "SHIRT");
    assert_eq!(json["name"], "V-NECH BASIC SHIRT");
}

/// Lookup of an absent id answers with an error frame; the socket stays open.
#[tokio::test]
#[serial]
async fn test_find_by_internal_id_unknown_id() {
    let app = TestApp::spawn().await;
    let mut ws = connect(app).await;

    send(
        &mut ws,
        r#"{"method": "FIND_BY_INTERNAL_ID", "internalId": "999"}"#,
    )
    .await;

    let json = recv_json(&mut ws).await;
    let error = json["error"].as_str().expect("error frame has a message");
    assert!(error.contains("product not found"), "got: {}", error);

    // Connection is still usable after a rejected request
    send(
        &mut ws,
        r#"{"method": "FIND_BY_INTERNAL_ID", "internalId": "2"}"#,
    )
    .await;
    let json = recv_json(&mut ws).await;
    assert_eq!(json["internalId"], 2);
    assert_eq!(json["name"], "CONTRASTING FABRIC T-SHIRT");
}

// ==================== Sort Products Tests ====================

/// Sales-heavy weights rank the lace t-shirt first.
#[tokio::test]
#[serial]
async fn test_sort_products_ok() {
    let app = TestApp::spawn().await;
    let mut ws = connect(app).await;

    send(
        &mut ws,
        r#"{"method": "SORT_PRODUCTS", "salesUnits": "0.8", "stock": "0.2", "page": "0", "size": "10"}"#,
    )
    .await;

    let json = recv_json(&mut ws).await;
    assert_eq!(json["internalId"], 5);
    assert_eq!(json["category"], "SHIRT");
    assert_eq!(json["name"], "CONTRASTING LACE T-SHIRT");
}

/// The full catalog streams one frame per product, score descending.
#[tokio::test]
#[serial]
async fn test_sort_products_full_ranking() {
    let app = TestApp::spawn().await;
    let mut ws = connect(app).await;

    send(
        &mut ws,
        r#"{"method": "SORT_PRODUCTS", "salesUnits": "0.8", "stock": "0.2", "page": "0", "size": "10"}"#,
    )
    .await;

    let mut ids = Vec::new();
    for _ in 0..6 {
        let json = recv_json(&mut ws).await;
        ids.push(json["internalId"].as_i64().expect("internalId is an integer"));
    }
    assert_eq!(ids, vec![5, 1, 3, 2, 6, 4]);
}

/// Pagination skips page * size products.
#[tokio::test]
#[serial]
async fn test_sort_products_pagination() {
    let app = TestApp::spawn().await;
    let mut ws = connect(app).await;

    send(
        &mut ws,
        r#"{"method": "SORT_PRODUCTS", "salesUnits": "0.8", "stock": "0.2", "page": "1", "size": "2"}"#,
    )
    .await;

    let first = recv_json(&mut ws).await;
    let second = recv_json(&mut ws).await;
    assert_eq!(first["internalId"], 3);
    assert_eq!(second["internalId"], 2);
}

/// A page past the end yields no product frames. Verified by issuing a
/// follow-up lookup: the next frame must be its product, not a sort result.
#[tokio::test]
#[serial]
async fn test_sort_products_page_past_end_yields_nothing() {
    let app = TestApp::spawn().await;
    let mut ws = connect(app).await;

    send(
        &mut ws,
        r#"{"method": "SORT_PRODUCTS", "salesUnits": "0.8", "stock": "0.2", "page": "9", "size": "10"}"#,
    )
    .await;
    send(
        &mut ws,
        r#"{"method": "FIND_BY_INTERNAL_ID", "internalId": "6"}"#,
    )
    .await;

    let json = recv_json(&mut ws).await;
    assert_eq!(json["internalId"], 6);
    assert_eq!(json["name"], "SLEEVELESS SHIRT");
}

// ==================== Protocol Error Tests ====================

/// Malformed JSON is answered with an error frame and the session continues.
#[tokio::test]
#[serial]
async fn test_malformed_json_gets_error_frame() {
    let app = TestApp::spawn().await;
    let mut ws = connect(app).await;

    send(&mut ws, "{this is not json").await;

    let json = recv_json(&mut ws).await;
    let error = json["error"].as_str().expect("error frame has a message");
    assert!(error.contains("invalid request"), "got: {}", error);

    send(
        &mut ws,
        r#"{"method": "FIND_BY_INTERNAL_ID", "internalId": "1"}"#,
    )
    .await;
    let json = recv_json(&mut ws).await;
    assert_eq!(json["internalId"], 1);
}

/// Unknown methods are rejected with an error frame.
#[tokio::test]
#[serial]
async fn test_unknown_method_gets_error_frame() {
    let app = TestApp::spawn().await;
    let mut ws = connect(app).await;

    send(&mut ws, r#"{"method": "FIND_BY_NAME", "name": "x"}"#).await;

    let json = recv_json(&mut ws).await;
    let error = json["error"].as_str().expect("error frame has a message");
    assert!(error.contains("invalid request"), "got: {}", error);
}

/// Non-numeric sort parameters are rejected with an error frame.
#[tokio::test]
#[serial]
async fn test_non_numeric_weight_gets_error_frame() {
    let app = TestApp::spawn().await;
    let mut ws = connect(app).await;

    send(
        &mut ws,
        r#"{"method": "SORT_PRODUCTS", "salesUnits": "heavy", "stock": "0.2", "page": "0", "size": "10"}"#,
    )
    .await;

    let json = recv_json(&mut ws).await;
    let error = json["error"].as_str().expect("error frame has a message");
    assert!(error.contains("salesUnits"), "got: {}", error);
}

// ==================== Session Tests ====================

/// Several requests of different methods share one connection.
#[tokio::test]
#[serial]
async fn test_multiple_requests_single_connection() {
    let app = TestApp::spawn().await;
    let mut ws = connect(app).await;

    send(
        &mut ws,
        r#"{"method": "FIND_BY_INTERNAL_ID", "internalId": "3"}"#,
    )
    .await;
    let json = recv_json(&mut ws).await;
    assert_eq!(json["name"], "RAISED PRINT T-SHIRT");

    send(
        &mut ws,
        r#"{"method": "SORT_PRODUCTS", "salesUnits": "0", "stock": "1", "page": "0", "size": "1"}"#,
    )
    .await;
    let json = recv_json(&mut ws).await;
    // Stock-only weights: the pleated t-shirt holds the most units.
    assert_eq!(json["internalId"], 4);
    assert_eq!(json["name"], "PLEATED T-SHIRT");
}

/// Product frames carry the full serialized record.
#[tokio::test]
#[serial]
async fn test_product_frame_shape() {
    let app = TestApp::spawn().await;
    let mut ws = connect(app).await;

    send(
        &mut ws,
        r#"{"method": "FIND_BY_INTERNAL_ID", "internalId": "5"}"#,
    )
    .await;

    let json = recv_json(&mut ws).await;
    assert!(json["id"].is_string());
    assert_eq!(json["salesUnits"], 650);
    assert_eq!(json["stock"]["M"], 1);
}
