pub mod error;
pub mod logging;

pub mod builder;
pub mod config;
pub mod facade;
pub mod strategy;
pub mod transport;

pub use builder::GraphBuilder;
pub use config::ClientConfig;
pub use error::{BuildError, BuildResult, ClientError, Result};
pub use facade::{Client, ClientBuilder};
pub use strategy::{Field, PlainRecord, PlainStrategy};
pub use transport::HttpTransport;

pub use linkage_api as api;
