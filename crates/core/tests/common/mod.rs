use async_trait::async_trait;
use linkage_core::api::{ResponseBody, Transport, TransportError};
use linkage_core::{Client, PlainStrategy};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use url::Url;

/// Stands in for the network: answers registered URLs, records every fetch.
#[derive(Default)]
pub struct StubTransport {
    routes: HashMap<String, Result<ResponseBody, String>>,
    pub requests: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.routes
            .insert(url.to_string(), Ok(ResponseBody::new(status, body)));
        self
    }

    pub fn reply_fixture(self, url: &str, name: &str) -> Self {
        self.reply(url, 200, fixture(name))
    }

    pub fn fail(mut self, url: &str, reason: &str) -> Self {
        self.routes.insert(url.to_string(), Err(reason.to_string()));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn fetch(&self, url: &Url) -> Result<ResponseBody, TransportError> {
        self.requests.lock().unwrap().push(url.to_string());

        match self.routes.get(url.as_str()) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(reason)) => Err(TransportError::Request {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(ResponseBody::new(404, "no route")),
        }
    }
}

pub fn fixture(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(format!("{name}.json"));
    std::fs::read(&path).unwrap_or_else(|e| panic!("missing fixture {}: {e}", path.display()))
}

#[allow(dead_code)]
pub fn client_with(transport: Arc<StubTransport>) -> Client<PlainStrategy> {
    Client::builder().transport(transport).build().unwrap()
}
