use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use ergane::adapters::health_handler::HealthHandler;
use ergane::adapters::ingest_worker::IngestWorker;
use ergane::adapters::metrics_handler::MetricsCollector;
use ergane::config::Settings;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::util::ServiceExt;

async fn test_app() -> axum::Router {
    let settings = Arc::new(RwLock::new(Settings::new().expect("settings")));
    let health_handler = Arc::new(HealthHandler::new(settings.clone()));
    let metrics = Arc::new(MetricsCollector::new().expect("metrics"));
    let ingest = Arc::new(IngestWorker::spawn(1024 * 1024));
    ergane::create_app(settings, health_handler, metrics, ingest).await
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = test_app().await;

    for uri in ["/health", "/health/ready", "/health/live"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn test_generate_form_end_to_end() {
    let app = test_app().await;

    let request = post_json(
        "/api/generate",
        json!({
            "framework": "react",
            "validationLibrary": "zod",
            "form": {
                "name": "contact form",
                "fields": [
                    {"id": "1", "name": "Full Name", "kind": "text", "required": true},
                    {"id": "2", "name": "email", "kind": "email", "required": true},
                    {"id": "3", "name": "age", "kind": "number", "min": 18}
                ]
            }
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    let files = body["data"]["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["path"], json!("components/contact-form.tsx"));
    assert!(files[1]["content"]
        .as_str()
        .unwrap()
        .contains("full_name: z.string()"));
    let deps = body["data"]["manifest"]["dependencies"].as_array().unwrap();
    assert!(deps.contains(&json!("zod")));
}

#[tokio::test]
async fn test_generate_rejects_duplicate_field_names() {
    let app = test_app().await;

    let request = post_json(
        "/api/generate",
        json!({
            "form": {
                "name": "broken",
                "fields": [
                    {"id": "1", "name": "Email", "kind": "email", "required": true},
                    {"id": "2", "name": "email!", "kind": "text"}
                ]
            }
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("duplicate field name"));
}

#[tokio::test]
async fn test_generate_rejects_unsupported_framework() {
    let app = test_app().await;

    let request = post_json(
        "/api/generate",
        json!({
            "framework": "vue",
            "form": {
                "name": "x",
                "fields": [{"id": "1", "name": "a", "kind": "text"}]
            }
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_preview_validate_step_scoped() {
    let app = test_app().await;

    let request = post_json(
        "/api/preview/validate",
        json!({
            "form": {
                "name": "wizard",
                "steps": [
                    {"fields": [{"id": "1", "name": "name", "kind": "text", "required": true}]},
                    {"fields": [{"id": "2", "name": "email", "kind": "email", "required": true}]}
                ]
            },
            "step": 0,
            "values": {"name": "Ada"}
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["valid"], json!(true));
}

#[tokio::test]
async fn test_preview_filter_scenario() {
    let app = test_app().await;

    let request = post_json(
        "/api/preview/filter",
        json!({
            "rows": [
                {"id": 1, "name": "John", "age": 25},
                {"id": 2, "name": "Jane", "age": 30}
            ],
            "filters": [{"field": "name", "operator": "contains", "values": ["Jo"]}],
            "columns": [
                {"id": "name", "accessor": "name", "label": "Name", "type": "string", "order": 0}
            ]
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    let body = body_json(response).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], json!(1));
}

#[tokio::test]
async fn test_ingest_csv_detects_columns() {
    let app = test_app().await;

    let request = post_json(
        "/api/ingest",
        json!({
            "content": "name,age,active\nJohn,25,true\nJane,30,false\n",
            "fileType": "csv"
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let columns = body["data"]["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[1]["type"], json!("number"));
    assert_eq!(columns[2]["type"], json!("boolean"));
    assert_eq!(body["data"]["rows"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_ingest_malformed_json_is_422() {
    let app = test_app().await;

    let request = post_json(
        "/api/ingest",
        json!({"content": "{oops", "fileType": "json"}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_publish_contract_and_rate_limit() {
    let app = test_app().await;

    let publish_body = json!({
        "name": "contact-form",
        "files": [{"path": "components/contact-form.tsx", "content": "export {}"}],
        "dependencies": ["zod"],
        "registryDependencies": ["form"]
    });

    // Default quota is 3 per hour.
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(post_json("/api/publish", publish_body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["data"]["id"].as_str().is_some());
        assert_eq!(body["error"], Value::Null);
    }

    let response = app
        .clone()
        .oneshot(post_json("/api/publish", publish_body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response.headers().get("x-ratelimit-remaining").unwrap(),
        "0"
    );
    assert!(response.headers().get("retry-after").is_some());
}

#[tokio::test]
async fn test_publish_rejects_empty_name() {
    let app = test_app().await;

    let response = app
        .oneshot(post_json(
            "/api/publish",
            json!({"name": "  ", "files": [{"path": "a.ts", "content": ""}]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["data"], Value::Null);
    assert!(body["error"].as_str().is_some());
}
