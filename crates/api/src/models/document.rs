use super::one_or_many::OneOrMany;
use super::resource::{Links, Meta, ResourceObject, null_as_default};
use crate::error::{DocumentError, DocumentResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Top-level `jsonapi` member.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct JsonApiObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Document carrying primary data, plus the resources it references.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SuccessDocument {
    pub data: OneOrMany<ResourceObject>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub included: Vec<ResourceObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<JsonApiObject>,
}

impl SuccessDocument {
    pub fn new(data: OneOrMany<ResourceObject>) -> Self {
        Self {
            data,
            included: Vec::new(),
            meta: None,
            links: None,
            jsonapi: None,
        }
    }

    pub fn with_included(mut self, included: Vec<ResourceObject>) -> Self {
        self.included = included;
        self
    }

    /// Read a success document, rejecting error documents as malformed.
    pub fn from_value(value: Value) -> DocumentResult<Self> {
        match ResponseDocument::from_value(value)? {
            ResponseDocument::Success(doc) => Ok(doc),
            ResponseDocument::Error(_) => Err(DocumentError::malformed(
                "expected primary `data`, found `errors`",
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ErrorSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

/// One entry of an error document's `errors` array.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ErrorObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<JsonApiObject>,
}

/// Any top-level response: primary data or errors, never both.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ResponseDocument {
    Success(SuccessDocument),
    Error(ErrorDocument),
}

impl ResponseDocument {
    pub fn from_slice(bytes: &[u8]) -> DocumentResult<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Classify a JSON payload by the presence of `data` or `errors`.
    pub fn from_value(value: Value) -> DocumentResult<Self> {
        // (data member present and usable, errors member present)
        let shape = match &value {
            Value::Object(members) => (
                members
                    .get("data")
                    .map(|data| data.is_object() || data.is_array()),
                members.contains_key("errors"),
            ),
            _ => {
                return Err(DocumentError::malformed(
                    "top-level document must be a JSON object",
                ));
            }
        };

        match shape {
            (Some(_), true) => Err(DocumentError::malformed(
                "`data` and `errors` must not coexist",
            )),
            (None, true) => serde_json::from_value(value)
                .map(ResponseDocument::Error)
                .map_err(|e| DocumentError::malformed(e.to_string())),
            (Some(true), false) => match SuccessDocument::deserialize(&value) {
                Ok(doc) => Ok(ResponseDocument::Success(doc)),
                Err(err) => Err(success_error(&value, err)),
            },
            (Some(false), false) => Err(DocumentError::malformed(
                "`data` must be a resource object or an array of resource objects",
            )),
            (None, false) => Err(DocumentError::malformed(
                "document has neither `data` nor `errors`",
            )),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResponseDocument::Error(_))
    }
}

// A bad resource inside `data` only surfaces as "no variant of OneOrMany
// matched"; read the resources one by one to report the actual cause.
fn success_error(value: &Value, err: serde_json::Error) -> DocumentError {
    let detail = match value.get("data") {
        Some(Value::Array(items)) => items.iter().enumerate().find_map(|(i, item)| {
            ResourceObject::deserialize(item)
                .err()
                .map(|e| format!("`data[{i}]`: {e}"))
        }),
        Some(item) => ResourceObject::deserialize(item)
            .err()
            .map(|e| format!("`data`: {e}")),
        None => None,
    };
    DocumentError::malformed(detail.unwrap_or_else(|| err.to_string()))
}

impl<'de> Deserialize<'de> for ResponseDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        ResponseDocument::from_value(value).map_err(serde::de::Error::custom)
    }
}
