use thiserror::Error;

/// Planner-level error type.
///
/// Only boundary problems surface here: a malformed request, a broken layout
/// catalog, or I/O around the binary. Everything the planning core can recover
/// from (collaborator failures, unknown layout ids) is handled locally.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Layout catalog error: {0}")]
    Catalog(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl PlannerError {
    /// Stable machine-readable code, used by the binary's error output.
    pub fn code(&self) -> &'static str {
        match self {
            PlannerError::InvalidRequest(_) => "INVALID_REQUEST",
            PlannerError::Catalog(_) => "CATALOG_ERROR",
            PlannerError::Io(_) => "IO_ERROR",
            PlannerError::Json(_) => "JSON_ERROR",
            PlannerError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
