//! HTTP surface: routing and shared state.

pub mod config;
mod error;
mod handlers;

pub use config::ServerConfig;
pub use error::ApiError;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::llm::ClauseAdvisor;
use crate::templates::TemplateStore;

/// Shared application state. Nothing in it is mutated by requests.
#[derive(Clone)]
pub struct AppState {
    pub advisor: ClauseAdvisor,
    pub templates: TemplateStore,
}

/// Builds the router with every route mounted. CORS and request tracing are
/// layered on by the binary.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let api = Router::new()
        .route("/analyze", post(handlers::analyze))
        .route("/templates", get(handlers::list_templates))
        .route("/templates/:name", get(handlers::download_template))
        .route("/generate-document", post(handlers::generate_document))
        .route("/placeholders", post(handlers::placeholders));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
