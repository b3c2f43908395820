//! # Ergane - Form & Table Code Generator
//!
//! Ergane turns visually-assembled form and table definitions into runnable,
//! strongly-typed React source code: a component file, a validation-schema
//! file targeting Zod, Valibot, or ArkType, and a deduplicated dependency
//! manifest. The compiler is a pure function of the snapshot it is handed;
//! the HTTP layer around it adds preview validation, a runtime filter
//! engine, bulk CSV/JSON ingestion, and a registry publish endpoint.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ergane::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let settings = Settings::new()?;
//!
//!     // Server will start on configured host:port
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Ergane follows Hexagonal Architecture:
//! - **Domain**: the element model, column model, and filter engine
//! - **Compiler**: detection, schema emission, import resolution, component emission
//! - **Adapters**: HTTP handlers, rate limiting, metrics, the ingestion worker
//! - **Config**: configuration management

pub mod adapters;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod domain;

use crate::adapters::api_handler::{self, ApiState};
use crate::adapters::health_handler::HealthHandler;
use crate::adapters::ingest_worker::IngestWorker;
use crate::adapters::metrics_handler::MetricsCollector;
use crate::adapters::rate_limit;
use crate::config::Settings;
use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Creates the Axum application router with all endpoints configured.
///
/// # Arguments
///
/// * `settings` - Application settings
/// * `health_handler` - Health check handler
/// * `metrics` - Metrics collector
/// * `ingest` - Bulk ingestion worker handle
///
/// # Returns
///
/// Configured Axum Router
pub async fn create_app(
    settings: Arc<RwLock<Settings>>,
    health_handler: Arc<HealthHandler>,
    metrics: Arc<MetricsCollector>,
    ingest: Arc<IngestWorker>,
) -> Router {
    // Public routes (no rate limiting)
    let public_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }))
        .route("/metrics", get({
            let metrics = metrics.clone();
            move || {
                let m = metrics.clone();
                async move {
                    match m.gather() {
                        Ok(text) => (axum::http::StatusCode::OK, text),
                        Err(e) => (
                            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                            e.to_string(),
                        ),
                    }
                }
            }
        }));

    let api_state = ApiState {
        settings: settings.clone(),
        ingest,
        metrics,
    };

    // API routes for the builder front end
    let api_router = Router::new()
        .route("/generate", post(api_handler::generate))
        .route("/preview/validate", post(api_handler::preview_validate))
        .route("/preview/filter", post(api_handler::preview_filter))
        .route("/ingest", post(api_handler::ingest))
        .with_state(api_state.clone());

    // Publish route gets its own rate-limit layer when enabled
    let mut publish_router = Router::new()
        .route("/publish", post(api_handler::publish))
        .with_state(api_state);

    let rate_limit_config = settings.read().await.rate_limit.clone();
    if rate_limit_config.enabled {
        let limiter = rate_limit::create_publish_limiter(rate_limit_config.publish_per_hour);
        publish_router = publish_router.layer(axum::middleware::from_fn_with_state(
            limiter,
            rate_limit::publish_rate_limit_middleware,
        ));
    }

    let router = public_router.nest("/api", api_router.merge(publish_router));

    router.layer(
        tower_http::cors::CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}
