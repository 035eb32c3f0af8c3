pub mod error;
pub mod models;
pub mod strategy;
pub mod transport;

// Re-export commonly used types
pub use error::{ConstructionError, DocumentError, DocumentResult, TransportError};
pub use models::*;
pub use strategy::{RecordStrategy, Relationships};
pub use transport::{ResponseBody, Transport};
