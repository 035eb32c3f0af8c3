use crate::error::TransportError;
use async_trait::async_trait;
use url::Url;

/// Raw answer of a transport fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBody {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl ResponseBody {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the network fetch for the client.
///
/// Implementations return the response whatever its status; an `Err` means
/// no response was obtained at all.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<ResponseBody, TransportError>;
}
