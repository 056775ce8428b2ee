// Insightify - dataset profiling, chart aggregation and dashboard composition

pub mod config;
pub mod types;
pub mod models;
pub mod dataset;
pub mod analysis;
pub mod loader;    // Local CSV / Excel / JSON / XML parsing
pub mod session;   // Auth marker and cached dataset
pub mod backend;   // Cleaning, AI and export service client
pub mod chat;
pub mod routes;
pub mod middleware;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use dataset::{CellValue, Dataset, Record};
pub use models::AppState;
pub use types::{AppError, AppResult};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
