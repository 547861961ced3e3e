use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to {operation}: {status_text}")]
    Status {
        operation: &'static str,
        status_text: String,
    },

    #[error("{0}")]
    Ingest(String),

    #[error("ingestion task did not complete: {0}")]
    Aborted(String),

    /// A failure of a request whose result several readers were waiting on.
    #[error(transparent)]
    Shared(Arc<ClientError>),
}

impl ClientError {
    pub fn status(operation: &'static str, status: reqwest::StatusCode) -> Self {
        Self::Status {
            operation,
            status_text: status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string()),
        }
    }

    pub fn from_shared(error: Arc<ClientError>) -> Self {
        Arc::try_unwrap(error).unwrap_or_else(ClientError::Shared)
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
