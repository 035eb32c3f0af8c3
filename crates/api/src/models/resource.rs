use super::identifier::ResourceIdentifier;
use super::one_or_many::OneOrMany;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Read an explicit `null` member the same as an absent one.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Open attribute bag of a resource object.
pub type Attributes = serde_json::Map<String, Value>;

/// Free-form `meta` member.
pub type Meta = serde_json::Map<String, Value>;

/// A link is either a bare URL or an object with `href` and `meta`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Link {
    Url(String),
    Object {
        href: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<Meta>,
    },
}

impl Link {
    pub fn href(&self) -> &str {
        match self {
            Link::Url(href) | Link::Object { href, .. } => href,
        }
    }
}

/// `links` member; pagination links are commonly `null`.
pub type Links = IndexMap<String, Option<Link>>;

/// Value of one entry in a resource's `relationships` member.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Relationship {
    /// Resource linkage. `None` when the member is absent (links-only
    /// relationship) or `null` (empty to-one).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<OneOrMany<ResourceIdentifier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Relationship {
    pub fn to_one(target: ResourceIdentifier) -> Self {
        Self {
            data: Some(OneOrMany::One(target)),
            ..Self::default()
        }
    }

    pub fn to_many(targets: Vec<ResourceIdentifier>) -> Self {
        Self {
            data: Some(OneOrMany::Many(targets)),
            ..Self::default()
        }
    }
}

/// One node's raw wire data.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Attributes,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub relationships: IndexMap<String, Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl ResourceObject {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            attributes: Attributes::new(),
            relationships: IndexMap::new(),
            links: None,
            meta: None,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_relationship(mut self, key: impl Into<String>, relationship: Relationship) -> Self {
        self.relationships.insert(key.into(), relationship);
        self
    }

    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.resource_type.clone(), self.id.clone())
    }
}
