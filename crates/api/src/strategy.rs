use crate::error::ConstructionError;
use crate::models::{Attributes, OneOrMany};
use indexmap::IndexMap;

/// Resolved relationships of one record, keyed by relationship name in
/// document order.
pub type Relationships<R> = IndexMap<String, OneOrMany<R>>;

/// Turns raw resource data into application records.
///
/// The graph builder calls `construct` once per resource while indexing,
/// then `attach` once per reachable record while linking. Records are
/// shared: every relationship pointing at the same `(type, id)` receives a
/// clone of the same `Record`, so `Record` is expected to be a handle
/// (`Arc`, `Rc`, an arena index) whose clones keep identity.
pub trait RecordStrategy: Send + Sync {
    type Record: Clone;

    /// Build a record from `attributes`, which already contain `id` and
    /// never contain relationships. Must not look at other records.
    fn construct(
        &self,
        resource_type: &str,
        attributes: Attributes,
    ) -> Result<Self::Record, ConstructionError>;

    /// Wire `relationships` into `record` under their names.
    ///
    /// Every target has been constructed, but a target that sits on a
    /// relationship cycle with `record` may not have had its own
    /// relationships attached yet.
    fn attach(&self, record: &Self::Record, relationships: Relationships<Self::Record>);
}
