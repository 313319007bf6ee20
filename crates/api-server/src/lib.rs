//! HTTP surface for the financial analyzer.
//!
//! `run_server` loads configuration, installs logging, wires the Yahoo
//! provider into the orchestrator and serves the router. `build_router` is
//! separate so tests can drive it with any provider.

use std::sync::Arc;

use analysis_orchestrator::AnalysisOrchestrator;
use anyhow::Context;
use axum::{body::Body, http::Request, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yahoo_client::YahooClient;

pub mod config;
pub mod error;
pub mod request_id;
mod symbol_routes;
mod ticker_routes;

pub use config::ServerConfig;
pub use error::AppError;

const DEFAULT_LOG_FILTER: &str = "api_server=info,analysis_orchestrator=info,yahoo_client=info,tower_http=info";

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AnalysisOrchestrator>,
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Financial Analyzer API v2 is running" }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "financial-analyzer",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = tracing::field::Empty,
        )
    });

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(symbol_routes::symbol_routes())
        .merge(ticker_routes::ticker_routes())
        .layer(cors)
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(trace)
        .with_state(state)
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing(json_logs: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;
    init_tracing(config.json_logs);

    let provider = YahooClient::new(config.yahoo.clone()).context("failed to build market data client")?;
    let state = AppState {
        orchestrator: Arc::new(AnalysisOrchestrator::new(Arc::new(provider))),
    };
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Financial Analyzer API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
