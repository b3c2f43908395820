//! Compiler error types

use thiserror::Error;

use crate::domain::Framework;

/// Errors raised by the compiler for genuine data-integrity violations.
///
/// These are never silently repaired: a schema key collision or a malformed
/// template is a correctness issue in the input snapshot, not a UX nicety
/// to smooth over.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Two fields normalize to the same schema key within one scope.
    #[error("duplicate field name '{name}' after normalization")]
    DuplicateFieldName { name: String },

    /// A field group with no members.
    #[error("field group in '{scope}' is empty")]
    EmptyGroup { scope: String },

    /// A repeatable array whose template has no entries.
    #[error("field array '{name}' has an empty template")]
    EmptyArrayTemplate { name: String },

    /// A multi-step form with no steps.
    #[error("form '{name}' has no steps")]
    EmptySteps { name: String },

    /// A table definition without columns and without rows to detect from.
    #[error("table '{name}' has no columns")]
    NoColumns { name: String },

    /// Two columns share an id or accessor.
    #[error("duplicate column accessor '{accessor}'")]
    DuplicateColumn { accessor: String },

    /// Column order is not a dense permutation of indices.
    #[error("column order for table '{name}' is not a dense permutation")]
    InvalidColumnOrder { name: String },

    /// The requested framework has no emitter.
    #[error("framework {0:?} is not supported")]
    UnsupportedFramework(Framework),

    /// Component shell template failed to render.
    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),
}

impl CompileError {
    /// HTTP status for API responses carrying this error.
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}
