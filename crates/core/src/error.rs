use linkage_api::{ConstructionError, DocumentError, ErrorObject, ResourceIdentifier, TransportError};
use thiserror::Error;

/// Failure while assembling a record graph from a document.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("malformed document: {0}")]
    Malformed(String),
    #[error("relationship `{relationship}` of {owner} points to {target}, which is not in the document")]
    DanglingReference {
        owner: ResourceIdentifier,
        relationship: String,
        target: ResourceIdentifier,
    },
    #[error("could not construct record for {resource}: {source}")]
    Construction {
        resource: ResourceIdentifier,
        #[source]
        source: ConstructionError,
    },
}

impl From<DocumentError> for BuildError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Malformed(reason) => BuildError::Malformed(reason),
            DocumentError::Json(err) => BuildError::Malformed(format!("invalid JSON: {err}")),
        }
    }
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("API responded with HTTP {status} and {} error(s)", .errors.len())]
    Api {
        status: u16,
        errors: Vec<ErrorObject>,
    },
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// The `errors` list of an error document, if that is what the server sent.
    pub fn api_errors(&self) -> Option<&[ErrorObject]> {
        match self {
            ClientError::Api { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
