use std::sync::Arc;

use crate::builder::GraphBuilder;
use crate::config::ClientConfig;
use crate::error::{BuildError, ClientError, Result};
use crate::strategy::PlainStrategy;
use crate::transport::HttpTransport;
use linkage_api::{
    RecordStrategy, ResponseBody, ResponseDocument, SuccessDocument, Transport, TransportError,
};
use url::Url;

/// Client - fetches JSON:API documents and returns linked records
///
/// Every call fetches once through the transport and builds a fresh record
/// graph; calls share no mutable state and may run concurrently.
pub struct Client<S = PlainStrategy> {
    transport: Arc<dyn Transport>,
    builder: GraphBuilder<S>,
    config: ClientConfig,
}

impl Client<PlainStrategy> {
    /// Client with the HTTP transport, plain records and default settings.
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    pub fn builder() -> ClientBuilder<PlainStrategy> {
        ClientBuilder::new()
    }
}

impl<S: RecordStrategy> Client<S> {
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn graph_builder(&self) -> &GraphBuilder<S> {
        &self.builder
    }

    /// Fetch a single resource, e.g. `employees/1?include=current_position`.
    ///
    /// With [`PlainStrategy`], records on a relationship cycle keep each
    /// other alive; call [`crate::PlainRecord::detach_graph`] on the result
    /// when done with it.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, url: &str) -> Result<S::Record> {
        let doc = self.fetch_document(url).await?;
        Ok(self.builder.build_one(&doc)?)
    }

    /// Fetch a resource collection, in the order the server sent it.
    ///
    /// Cyclic [`PlainStrategy`] graphs are freed the same way as for
    /// [`Client::get`].
    #[tracing::instrument(skip(self))]
    pub async fn get_list(&self, url: &str) -> Result<Vec<S::Record>> {
        let doc = self.fetch_document(url).await?;
        Ok(self.builder.build_many(&doc)?)
    }

    /// Fetch and classify a document without building records.
    pub async fn fetch_document(&self, url: &str) -> Result<SuccessDocument> {
        let target = self.config.resolve(url)?;
        let response = self.transport.fetch(&target).await?;
        classify(&target, response)
    }
}

/// Turn a raw response into a success document or the matching error.
fn classify(url: &Url, response: ResponseBody) -> Result<SuccessDocument> {
    let status = response.status;

    if !response.is_success() {
        tracing::warn!(%url, status, "request was not successful");
        return Err(match ResponseDocument::from_slice(&response.body) {
            Ok(ResponseDocument::Error(doc)) => ClientError::Api {
                status,
                errors: doc.errors,
            },
            _ => TransportError::Status {
                url: url.to_string(),
                status,
                body: response.body,
            }
            .into(),
        });
    }

    match ResponseDocument::from_slice(&response.body).map_err(BuildError::from)? {
        ResponseDocument::Success(doc) => Ok(doc),
        ResponseDocument::Error(doc) => {
            tracing::warn!(%url, status, errors = doc.errors.len(), "error document with success status");
            Err(ClientError::Api {
                status,
                errors: doc.errors,
            })
        }
    }
}

pub struct ClientBuilder<S = PlainStrategy> {
    strategy: S,
    transport: Option<Arc<dyn Transport>>,
    config: ClientConfig,
}

impl ClientBuilder<PlainStrategy> {
    pub fn new() -> Self {
        Self {
            strategy: PlainStrategy,
            transport: None,
            config: ClientConfig::default(),
        }
    }
}

impl Default for ClientBuilder<PlainStrategy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RecordStrategy> ClientBuilder<S> {
    /// Use a custom record strategy.
    pub fn strategy<T: RecordStrategy>(self, strategy: T) -> ClientBuilder<T> {
        ClientBuilder {
            strategy,
            transport: self.transport,
            config: self.config,
        }
    }

    /// Use a custom transport instead of HTTP.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: &str) -> Result<Self> {
        self.config = self.config.with_base_url(base_url)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Client<S>> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&self.config)?),
        };

        Ok(Client {
            transport,
            builder: GraphBuilder::new(self.strategy),
            config: self.config,
        })
    }
}
