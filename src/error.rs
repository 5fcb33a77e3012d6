use serde::Serialize;
use thiserror::Error;

/// Cost engine error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostError {
    /// Missing, NaN, negative or out-of-order workload fields
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Malformed or missing pricing entries
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// No storage path connects a start node to an end node
    #[error("Graph unreachable: {0}")]
    GraphUnreachable(String),
}

pub type Result<T> = std::result::Result<T, CostError>;

impl CostError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Stable machine-readable code for an error, used in JSON output
pub fn error_type_name(error: &CostError) -> &'static str {
    match error {
        CostError::InvalidInput(_) => "invalid_input",
        CostError::Configuration(_) => "configuration_error",
        CostError::GraphUnreachable(_) => "graph_unreachable",
    }
}

/// Machine-readable error record, e.g. `{"error": "invalid_input", "message": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub error: &'static str,
    pub message: String,
}

impl From<&CostError> for ErrorReport {
    fn from(error: &CostError) -> Self {
        Self {
            error: error_type_name(error),
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for CostError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(format!("JSON error: {}", err))
    }
}
