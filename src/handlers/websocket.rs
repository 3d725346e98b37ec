/// Camila Product API - WebSocket handlers.
///
/// Handles the product query protocol: each incoming text frame is a JSON
/// request tagged by `method`, and each response is one or more JSON text
/// frames on the same socket.
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::AppState;
use crate::error::AppError;
use crate::models::message::{ErrorFrame, ProductCommand, ProductRequest};

/// Products WebSocket handler.
///
/// Establishes a WebSocket session for the product query protocol.
pub async fn products_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    info!("Product WebSocket connection requested");
    ws.on_upgrade(move |socket| handle_products_socket(socket, state))
}

/// Handle one product WebSocket session.
async fn handle_products_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    info!("Product WebSocket connected");

    // Create ping interval to keep connection alive
    let mut ping_interval =
        interval(Duration::from_secs(state.config.websocket.ping_interval_secs));
    // The first tick completes immediately; consume it so the first ping
    // goes out one full interval after connect.
    ping_interval.tick().await;

    // Flag to track if connection should close
    let mut should_close = false;

    // Main loop: handle incoming requests and keep-alive pings
    loop {
        tokio::select! {
            // Handle incoming messages from client
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        debug!(message = %text.as_str(), "Received product request");
                        if dispatch_request(text.as_str(), &state, &mut sender).await.is_err() {
                            warn!("Failed to send response, closing");
                            should_close = true;
                        }
                    }
                    Some(Ok(Message::Ping(_))) => {
                        debug!("Received WS ping");
                        // Pong is sent automatically by axum
                    }
                    Some(Ok(Message::Pong(_))) => {
                        debug!("Received WS pong");
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Client requested close");
                        should_close = true;
                    }
                    Some(Err(e)) => {
                        error!(error = %e, "WebSocket error");
                        should_close = true;
                    }
                    None => {
                        info!("WebSocket stream ended");
                        should_close = true;
                    }
                    _ => {}
                }
            }

            // Send periodic ping to keep connection alive
            _ = ping_interval.tick() => {
                if sender.send(Message::Ping(vec![].into())).await.is_err() {
                    warn!("Failed to send ping, closing");
                    should_close = true;
                } else {
                    debug!("Sent WS ping");
                }
            }
        }

        if should_close {
            break;
        }
    }

    info!("Product WebSocket disconnected");
}

/// Handle one request frame and send the response frames.
///
/// Request-level failures (malformed frames, unknown ids) are answered
/// with an error frame on the open socket; only transport failures
/// propagate to the caller.
async fn dispatch_request(
    text: &str,
    state: &AppState,
    sender: &mut SplitSink<WebSocket, Message>,
) -> Result<(), axum::Error> {
    let frames = match respond(text, state) {
        Ok(frames) => frames,
        Err(e) => {
            warn!(error = %e, "Product request rejected");
            vec![ErrorFrame::from(&e).to_json()]
        }
    };

    for frame in frames {
        sender.send(Message::Text(frame.into())).await?;
    }
    Ok(())
}

/// Build the JSON response frames for one request frame.
///
/// FIND_BY_INTERNAL_ID yields exactly one frame; SORT_PRODUCTS yields one
/// frame per product in the requested page, score descending.
fn respond(text: &str, state: &AppState) -> Result<Vec<String>, AppError> {
    match ProductRequest::parse(text)?.into_command()? {
        ProductCommand::FindByInternalId { internal_id } => {
            let product = state
                .catalog
                .find_by_internal_id(internal_id)
                .ok_or(AppError::ProductNotFound(internal_id))?;
            Ok(vec![serde_json::to_string(product)?])
        }
        ProductCommand::SortProducts(query) => {
            let products = state
                .catalog
                .sort_products(&query.weights, query.page, query.size);
            debug!(
                page = query.page,
                size = query.size,
                results = products.len(),
                "Sorted products"
            );
            products
                .iter()
                .map(|p| serde_json::to_string(p).map_err(AppError::from))
                .collect()
        }
    }
}
