//! Record graph assembly
//!
//! `GraphBuilder` turns a flat JSON:API document (primary `data` plus
//! `included`) into linked application records. It works in two passes:
//!
//! 1. index: construct one record per `(type, id)` through the
//!    [`RecordStrategy`], later duplicates replacing earlier ones;
//! 2. link: walk relationships from each entry point and `attach` the
//!    resolved records, so that every reference to the same `(type, id)`
//!    shares one record, cycles included.

mod index;
mod link;

use crate::error::{BuildError, BuildResult};
use crate::strategy::PlainStrategy;
use index::NodeIndex;
use linkage_api::{OneOrMany, RecordStrategy, SuccessDocument};
use serde_json::Value;

pub struct GraphBuilder<S = PlainStrategy> {
    strategy: S,
}

impl<S: RecordStrategy> GraphBuilder<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Build the document's primary data, keeping its shape.
    pub fn build(&self, doc: &SuccessDocument) -> BuildResult<OneOrMany<S::Record>> {
        let mut index = NodeIndex::new();

        let entries = doc
            .data
            .as_ref()
            .try_map(|resource| index.add(resource, &self.strategy))?;
        for resource in &doc.included {
            index.add(resource, &self.strategy)?;
        }

        tracing::debug!(
            entries = entries.len(),
            nodes = index.len(),
            "indexed document"
        );

        for &entry in entries.iter() {
            link::link_from(&mut index, &self.strategy, entry)?;
        }

        Ok(entries.map(|slot| index.node(slot).record.clone()))
    }

    /// Build a document whose primary data is a single resource.
    pub fn build_one(&self, doc: &SuccessDocument) -> BuildResult<S::Record> {
        if doc.data.is_many() {
            return Err(expected_single());
        }
        match self.build(doc)? {
            OneOrMany::One(record) => Ok(record),
            OneOrMany::Many(_) => Err(expected_single()),
        }
    }

    /// Build a document whose primary data is an array of resources.
    pub fn build_many(&self, doc: &SuccessDocument) -> BuildResult<Vec<S::Record>> {
        if !doc.data.is_many() {
            return Err(BuildError::Malformed(
                "expected an array in `data`, found a single resource".to_string(),
            ));
        }
        Ok(self.build(doc)?.into_vec())
    }

    /// Read `value` as a success document and build it.
    pub fn build_value(&self, value: Value) -> BuildResult<OneOrMany<S::Record>> {
        let doc = SuccessDocument::from_value(value)?;
        self.build(&doc)
    }

    pub fn build_slice(&self, bytes: &[u8]) -> BuildResult<OneOrMany<S::Record>> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| BuildError::Malformed(format!("invalid JSON: {e}")))?;
        self.build_value(value)
    }
}

fn expected_single() -> BuildError {
    BuildError::Malformed("expected a single resource in `data`, found an array".to_string())
}

impl Default for GraphBuilder<PlainStrategy> {
    fn default() -> Self {
        Self::new(PlainStrategy)
    }
}
