/// Camila Product API - Main application entry point.
///
/// WebSocket product API built on Axum and Tokio. Clients connect to
/// {base_path}/ws/products and exchange JSON text frames.
use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use camila_product_api::{
    AppState,
    config::{Config, LogFormat},
    handlers,
    services::catalog::CatalogService,
};

/// Timeout for the HTTP surface (health checks and upgrade handshakes).
/// Established WebSocket sessions are not affected.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from TOML files
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    // Initialize tracing based on configuration
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "camila_product_api={},tower_http=info",
            config.logging.level
        )
        .into()
    });

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    tracing::info!(
        environment = %config.environment.as_str(),
        "Starting Camila Product API"
    );

    // Load the product catalog (seed data or configured data file)
    let catalog = CatalogService::from_config(&config)?;
    tracing::info!(products = catalog.len(), "Product catalog ready");

    // Parse address and bind socket
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        eprintln!("Failed to bind to {}: {}", addr, e);
        e
    })?;

    // Create application state
    let state = AppState {
        config: config.clone(),
        catalog,
    };

    // Build application router
    let app = create_app(state);

    tracing::info!(
        address = %addr,
        base_path = %config.server.base_path,
        "WebSocket server listening"
    );

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Create Axum application.
///
/// Routes:
/// - {base_path}/ws/products: the product query WebSocket endpoint
/// - /health: liveness probe
fn create_app(state: AppState) -> Router {
    let base_path = state.config.server.base_path.clone();

    Router::new()
        .route(
            &format!("{}/ws/products", base_path),
            get(handlers::websocket::products_ws),
        )
        .route("/health", get(|| async { "OK" }))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    REQUEST_TIMEOUT_SECS,
                ))),
        )
        .with_state(state)
}
