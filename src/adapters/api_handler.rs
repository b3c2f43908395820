//! REST API handlers for the builder front end
//!
//! The builder UI is an external collaborator: it fetches snapshots from its
//! own store and hands them in by value. These handlers expose the compiler,
//! the preview validators, the filter engine, the ingestion worker, and the
//! registry publish contract.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::adapters::ingest_worker::{FileType, IngestWorker, ParseOutcome};
use crate::adapters::metrics_handler::MetricsCollector;
use crate::compiler::schema::ValidationIssue;
use crate::compiler::{self, GenerateRequest, GenerateTarget};
use crate::config::Settings;
use crate::domain::{
    apply_filters, ColumnDefinition, Filter, FormDefinition, GeneratedFile, ValidationLibrary,
};

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub settings: Arc<RwLock<Settings>>,
    pub ingest: Arc<IngestWorker>,
    pub metrics: Arc<MetricsCollector>,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// Generate
// ============================================================================

pub async fn generate(
    State(state): State<ApiState>,
    Json(request): Json<GenerateRequest>,
) -> impl IntoResponse {
    let kind = match request.target {
        GenerateTarget::Form(_) => "form",
        GenerateTarget::Table(_) => "table",
    };
    match compiler::compile(&request) {
        Ok(output) => {
            state
                .metrics
                .generation_runs
                .with_label_values(&[kind, "success"])
                .inc();
            (StatusCode::OK, Json(ApiResponse::success(output))).into_response()
        }
        Err(error) => {
            state
                .metrics
                .generation_runs
                .with_label_values(&[kind, "error"])
                .inc();
            (
                error.status_code(),
                Json(ApiResponse::<compiler::CompileOutput>::error(
                    error.to_string(),
                )),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Preview: validation
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewValidateRequest {
    pub form: FormDefinition,
    #[serde(default)]
    pub validation_library: ValidationLibrary,
    /// When present, validate only this step's scope.
    #[serde(default)]
    pub step: Option<usize>,
    pub values: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewValidateResponse {
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

pub async fn preview_validate(
    Json(request): Json<PreviewValidateRequest>,
) -> impl IntoResponse {
    match compiler::schema::emit(request.validation_library, &request.form) {
        Ok(output) => {
            let issues = match request.step {
                Some(step) => output.live_schema.validate_step(step, &request.values),
                None => output.live_schema.validate(&request.values),
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(PreviewValidateResponse {
                    valid: issues.is_empty(),
                    issues,
                })),
            )
                .into_response()
        }
        Err(error) => (
            error.status_code(),
            Json(ApiResponse::<PreviewValidateResponse>::error(
                error.to_string(),
            )),
        )
            .into_response(),
    }
}

// ============================================================================
// Preview: filters
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewFilterRequest {
    #[serde(default)]
    pub rows: Vec<Value>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
}

pub async fn preview_filter(Json(request): Json<PreviewFilterRequest>) -> impl IntoResponse {
    let rows = apply_filters(&request.rows, &request.filters, &request.columns);
    (StatusCode::OK, Json(ApiResponse::success(rows)))
}

// ============================================================================
// Ingest
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    pub content: String,
    pub file_type: FileType,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub columns: Vec<ColumnDefinition>,
    pub rows: Vec<Value>,
}

pub async fn ingest(
    State(state): State<ApiState>,
    Json(request): Json<IngestRequest>,
) -> impl IntoResponse {
    let sample_limit = state.settings.read().await.generator.detect_sample_limit;
    match state.ingest.parse(request.content, request.file_type).await {
        ParseOutcome::Success { rows } => {
            state
                .metrics
                .ingest_jobs
                .with_label_values(&["success"])
                .inc();
            let columns = compiler::detect::detect_with_limit(&rows, Some(sample_limit));
            (
                StatusCode::OK,
                Json(ApiResponse::success(IngestResponse { columns, rows })),
            )
                .into_response()
        }
        ParseOutcome::Error { error } => {
            state
                .metrics
                .ingest_jobs
                .with_label_values(&["error"])
                .inc();
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::<IngestResponse>::error(error)),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Publish
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub name: String,
    #[serde(default)]
    pub files: Vec<GeneratedFile>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub registry_dependencies: Vec<String>,
}

#[derive(Serialize)]
pub struct PublishData {
    pub id: String,
}

/// Publish contract: `{ data: { id }, error: null }` on success,
/// `{ data: null, error }` on failure.
#[derive(Serialize)]
pub struct PublishResponse {
    pub data: Option<PublishData>,
    pub error: Option<String>,
}

pub async fn publish(
    State(state): State<ApiState>,
    Json(request): Json<PublishRequest>,
) -> impl IntoResponse {
    if request.name.trim().is_empty() {
        state
            .metrics
            .publish_requests
            .with_label_values(&["error"])
            .inc();
        return (
            StatusCode::BAD_REQUEST,
            Json(PublishResponse {
                data: None,
                error: Some("name must not be empty".to_string()),
            }),
        );
    }
    if request.files.is_empty() {
        state
            .metrics
            .publish_requests
            .with_label_values(&["error"])
            .inc();
        return (
            StatusCode::BAD_REQUEST,
            Json(PublishResponse {
                data: None,
                error: Some("at least one file is required".to_string()),
            }),
        );
    }

    let id = uuid::Uuid::new_v4().to_string();
    info!(
        name = %request.name,
        files = request.files.len(),
        dependencies = request.dependencies.len(),
        registry_dependencies = request.registry_dependencies.len(),
        %id,
        "published registry item"
    );
    state
        .metrics
        .publish_requests
        .with_label_values(&["success"])
        .inc();

    (
        StatusCode::OK,
        Json(PublishResponse {
            data: Some(PublishData { id }),
            error: None,
        }),
    )
}
