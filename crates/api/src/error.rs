use std::error::Error as StdError;

/// Failure to read a payload as a JSON:API document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed document: {0}")]
    Malformed(String),
}

impl DocumentError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        DocumentError::Malformed(reason.into())
    }
}

pub type DocumentResult<T> = std::result::Result<T, DocumentError>;

/// Failure reported by a [`crate::Transport`] or by the client while
/// interpreting the transport's response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },
    #[error("{url} responded with HTTP {status}")]
    Status {
        url: String,
        status: u16,
        body: Vec<u8>,
    },
}

impl TransportError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Raised by a [`crate::RecordStrategy`] that cannot turn a set of
/// attributes into its record representation.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ConstructionError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl ConstructionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for ConstructionError {
    fn from(err: serde_json::Error) -> Self {
        ConstructionError::with_source("attributes do not match the record shape", err)
    }
}
