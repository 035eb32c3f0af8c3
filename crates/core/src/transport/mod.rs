mod http;

pub use http::{HttpTransport, JSONAPI_MEDIA_TYPE};
