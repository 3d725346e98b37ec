//! Camila Product API - Library crate exposing all modules.
//!
//! This file makes modules available for integration tests.

// Clippy lints to enforce proper error handling
// Note: Using warn instead of deny to allow #[allow] annotations to work
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]
#![warn(clippy::todo)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use config::Config;
use services::catalog::CatalogService;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Immutable product catalog shared by all WebSocket sessions.
    pub catalog: CatalogService,
}
