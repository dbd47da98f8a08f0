//! Clause Redliner API server
//!
//! Serves the analysis, template and regeneration endpoints to the web
//! front end. Configuration comes from the command line, the environment or a
//! `.env` file; startup fails without a Gemini API key.

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use clause_redliner::llm::{ClauseAdvisor, GeminiClient};
use clause_redliner::server::{router, AppState, ServerConfig};
use clause_redliner::templates::TemplateStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let config = ServerConfig::parse();

    let log_level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let model = GeminiClient::with_timeout(config.api_key.clone(), config.model_timeout())?
        .with_model(config.model.as_str());
    info!("Using model {}", model.model());

    let templates = TemplateStore::new(&config.templates_dir);
    info!("Serving templates from {}", templates.dir().display());

    let state = AppState {
        advisor: ClauseAdvisor::new(Arc::new(model)),
        templates,
    };

    let cors = CorsLayer::new()
        .allow_origin(config.allowed_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = router(state, config.max_upload_bytes)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
