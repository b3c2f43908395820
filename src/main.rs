use clap::Parser;
use ergane::adapters::health_handler::HealthHandler;
use ergane::adapters::ingest_worker::IngestWorker;
use ergane::adapters::metrics_handler::MetricsCollector;
use ergane::cli::Cli;
use ergane::config::Settings;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let max_upload_bytes = settings.generator.max_upload_bytes;

    info!("Starting Ergane code generator on {}:{}", host, port);

    let settings = Arc::new(RwLock::new(settings));

    // Initialize handlers
    let health_handler = Arc::new(HealthHandler::new(settings.clone()));
    let metrics = Arc::new(MetricsCollector::new()?);
    let ingest = Arc::new(IngestWorker::spawn(max_upload_bytes));

    // Create application using the library function
    let app = ergane::create_app(settings, health_handler, metrics, ingest).await;

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
