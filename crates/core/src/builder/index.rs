//! Pass 1: one node per resource, keyed by `(type, id)`.

use crate::error::{BuildError, BuildResult};
use linkage_api::{Attributes, RecordStrategy, ResourceIdentifier, ResourceObject};
use serde_json::Value;
use std::collections::HashMap;

/// Intermediate state of one resource during a build.
pub(crate) struct Node<'doc, R> {
    pub(crate) source: &'doc ResourceObject,
    pub(crate) record: R,
    /// Set before the node's relationships are resolved.
    pub(crate) linked: bool,
}

/// Arena of nodes addressed by `type -> id -> slot`.
pub(crate) struct NodeIndex<'doc, R> {
    nodes: Vec<Node<'doc, R>>,
    slots: HashMap<&'doc str, HashMap<&'doc str, usize>>,
}

impl<'doc, R> NodeIndex<'doc, R> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Construct the record for `resource` and store it.
    ///
    /// A resource whose `(type, id)` is already indexed replaces the earlier
    /// node in place, so slots handed out before stay valid.
    pub(crate) fn add<S>(&mut self, resource: &'doc ResourceObject, strategy: &S) -> BuildResult<usize>
    where
        S: RecordStrategy<Record = R>,
    {
        // `id` leads; an `id` attribute keeps that slot but loses to the identifier.
        let id = Value::String(resource.id.clone());
        let mut attributes = Attributes::with_capacity(resource.attributes.len() + 1);
        attributes.insert("id".to_string(), id.clone());
        attributes.extend(resource.attributes.clone());
        attributes.insert("id".to_string(), id);

        let record = strategy
            .construct(&resource.resource_type, attributes)
            .map_err(|source| BuildError::Construction {
                resource: resource.identifier(),
                source,
            })?;

        let node = Node {
            source: resource,
            record,
            linked: false,
        };

        let by_id = self.slots.entry(resource.resource_type.as_str()).or_default();
        if let Some(&slot) = by_id.get(resource.id.as_str()) {
            tracing::debug!(
                resource = %resource.identifier(),
                "duplicate resource in document, keeping the later one"
            );
            self.nodes[slot] = node;
            return Ok(slot);
        }

        let slot = self.nodes.len();
        by_id.insert(resource.id.as_str(), slot);
        self.nodes.push(node);
        Ok(slot)
    }

    pub(crate) fn lookup(&self, identifier: &ResourceIdentifier) -> Option<usize> {
        self.slots
            .get(identifier.resource_type.as_str())
            .and_then(|by_id| by_id.get(identifier.id.as_str()))
            .copied()
    }

    pub(crate) fn node(&self, slot: usize) -> &Node<'doc, R> {
        &self.nodes[slot]
    }

    pub(crate) fn node_mut(&mut self, slot: usize) -> &mut Node<'doc, R> {
        &mut self.nodes[slot]
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}
