pub mod api_handler;
pub mod health_handler;
pub mod ingest_worker;
pub mod metrics_handler;
pub mod rate_limit;
