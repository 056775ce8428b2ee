//! API Routes
//!
//! JSON endpoints consumed by the rendering front end:
//! - `/api/health` - Health check
//! - `/api/profile`, `/api/metrics`, `/api/group`, `/api/dashboard` - Local pipeline
//! - `/api/chat` - One chat turn over a dataset

pub mod analysis;
pub mod chat;
mod extract;
pub mod health;

use axum::Router;
use tracing::info;

use crate::middleware::{apply_cors, apply_tracing};
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let origins = state.config.server.cors_allowed_origins.clone();
    let router = Router::new()
        .merge(health::router(state.clone()))
        .merge(analysis::router(state.clone()))
        .merge(chat::router(state));

    apply_tracing(apply_cors(router, &origins))
}
