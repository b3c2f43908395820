//! Bulk ingestion worker
//!
//! CSV/JSON parsing of user uploads runs on a dedicated task so large files
//! never block the request path. The protocol is a single request/response
//! message pair per parse job; the worker holds no per-request identifiers,
//! so callers serialize their own requests. Cancellation is coarse-grained:
//! shutting the worker down terminates it entirely.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Supported upload formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Csv,
    Json,
}

/// One parse job sent to the worker.
struct ParseRequest {
    content: String,
    file_type: FileType,
    reply: oneshot::Sender<ParseOutcome>,
}

/// Worker response for one parse job.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParseOutcome {
    Success { rows: Vec<Value> },
    Error { error: String },
}

/// Parse failures, caught at the worker boundary and returned as
/// structured messages rather than crashing the session.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file is empty")]
    Empty,

    #[error("file exceeds the upload limit of {limit} bytes")]
    TooLarge { limit: usize },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of row objects")]
    NotTabular,

    #[error("file contains no rows")]
    NoRows,
}

/// Handle to the ingestion worker task.
pub struct IngestWorker {
    sender: mpsc::Sender<ParseRequest>,
    handle: tokio::task::JoinHandle<()>,
    max_upload_bytes: usize,
}

impl IngestWorker {
    /// Spawn the worker task.
    pub fn spawn(max_upload_bytes: usize) -> Self {
        let (sender, mut receiver) = mpsc::channel::<ParseRequest>(16);
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let outcome = match parse(&request.content, request.file_type) {
                    Ok(rows) => {
                        debug!(rows = rows.len(), "parse job completed");
                        ParseOutcome::Success { rows }
                    }
                    Err(error) => {
                        warn!(%error, "parse job failed");
                        ParseOutcome::Error {
                            error: error.to_string(),
                        }
                    }
                };
                // A dropped caller is not an error; the job is simply moot.
                let _ = request.reply.send(outcome);
            }
        });
        Self {
            sender,
            handle,
            max_upload_bytes,
        }
    }

    /// Submit one parse job and await its outcome.
    pub async fn parse(&self, content: String, file_type: FileType) -> ParseOutcome {
        if content.len() > self.max_upload_bytes {
            return ParseOutcome::Error {
                error: IngestError::TooLarge {
                    limit: self.max_upload_bytes,
                }
                .to_string(),
            };
        }

        let (reply, response) = oneshot::channel();
        let request = ParseRequest {
            content,
            file_type,
            reply,
        };
        if self.sender.send(request).await.is_err() {
            return ParseOutcome::Error {
                error: "ingest worker is not running".to_string(),
            };
        }
        response.await.unwrap_or(ParseOutcome::Error {
            error: "ingest worker dropped the request".to_string(),
        })
    }

    /// Terminate the worker. Any in-flight job is abandoned.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

// ============================================================================
// Parsing
// ============================================================================

fn parse(content: &str, file_type: FileType) -> Result<Vec<Value>, IngestError> {
    if content.trim().is_empty() {
        return Err(IngestError::Empty);
    }
    let rows = match file_type {
        FileType::Json => parse_json(content)?,
        FileType::Csv => parse_csv(content)?,
    };
    if rows.is_empty() {
        return Err(IngestError::NoRows);
    }
    Ok(rows)
}

fn parse_json(content: &str) -> Result<Vec<Value>, IngestError> {
    let value: Value = serde_json::from_str(content)?;
    match value {
        Value::Array(items) => {
            if items.iter().all(Value::is_object) {
                Ok(items)
            } else {
                Err(IngestError::NotTabular)
            }
        }
        Value::Object(_) => Ok(vec![value]),
        _ => Err(IngestError::NotTabular),
    }
}

fn parse_csv(content: &str) -> Result<Vec<Value>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = Map::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.insert(header.to_string(), coerce_cell(cell));
        }
        rows.push(Value::Object(row));
    }
    Ok(rows)
}

/// CSV cells arrive as text; recover the obvious scalar types so the column
/// detector sees numbers and booleans instead of strings.
fn coerce_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = cell.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = cell.parse::<f64>() {
        return Value::from(float);
    }
    match cell.to_ascii_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(cell.to_string()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_csv_round_trip() {
        let worker = IngestWorker::spawn(1024 * 1024);
        let content = "name,age,active\nJohn,25,true\nJane,30,false\n".to_string();
        let outcome = worker.parse(content, FileType::Csv).await;
        let ParseOutcome::Success { rows } = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], json!({"name": "John", "age": 25, "active": true}));
    }

    #[tokio::test]
    async fn test_json_array() {
        let worker = IngestWorker::spawn(1024 * 1024);
        let content = r#"[{"id": 1}, {"id": 2}]"#.to_string();
        let outcome = worker.parse(content, FileType::Json).await;
        assert!(matches!(outcome, ParseOutcome::Success { ref rows } if rows.len() == 2));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_structured_error() {
        let worker = IngestWorker::spawn(1024 * 1024);
        let outcome = worker.parse("{not json".to_string(), FileType::Json).await;
        let ParseOutcome::Error { error } = outcome else {
            panic!("expected error");
        };
        assert!(error.contains("JSON parse error"));
    }

    #[tokio::test]
    async fn test_empty_file_rejected() {
        let worker = IngestWorker::spawn(1024 * 1024);
        let outcome = worker.parse("   \n".to_string(), FileType::Csv).await;
        assert!(matches!(outcome, ParseOutcome::Error { ref error } if error.contains("empty")));
    }

    #[tokio::test]
    async fn test_upload_limit_enforced() {
        let worker = IngestWorker::spawn(8);
        let outcome = worker
            .parse("a,b\n1,2\n3,4\n".to_string(), FileType::Csv)
            .await;
        assert!(matches!(outcome, ParseOutcome::Error { ref error } if error.contains("limit")));
    }

    #[tokio::test]
    async fn test_shutdown_stops_the_worker() {
        let worker = IngestWorker::spawn(1024);
        worker.shutdown();
        // The abort may race the next send; either refusal shape is fine.
        let outcome = worker.parse("a\n1\n".to_string(), FileType::Csv).await;
        if let ParseOutcome::Error { error } = outcome {
            assert!(error.contains("worker"));
        }
    }
}
