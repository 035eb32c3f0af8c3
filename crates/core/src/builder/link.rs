//! Pass 2: resolve relationships and attach them, depth first.
//!
//! The walk keeps its own stack instead of recursing, so a long chain of
//! relationships cannot exhaust the thread's stack. Nodes are marked
//! `linked` when they are entered, which stops cycles and makes every node
//! attach exactly once.

use super::index::NodeIndex;
use crate::error::{BuildError, BuildResult};
use linkage_api::{RecordStrategy, Relationships};

/// A node whose relationships are resolved but not yet attached.
struct Frame<R> {
    slot: usize,
    /// Relationship targets in document order, duplicates included.
    targets: Vec<usize>,
    next: usize,
    relationships: Relationships<R>,
}

/// Link the subgraph reachable from `entry`.
pub(crate) fn link_from<S>(
    index: &mut NodeIndex<'_, S::Record>,
    strategy: &S,
    entry: usize,
) -> BuildResult<()>
where
    S: RecordStrategy,
{
    if index.node(entry).linked {
        return Ok(());
    }

    let mut stack = vec![enter(index, entry)?];

    while let Some(frame) = stack.last_mut() {
        let pending = frame.targets.get(frame.next).copied();
        if let Some(target) = pending {
            frame.next += 1;
            if !index.node(target).linked {
                let child = enter(index, target)?;
                stack.push(child);
            }
            continue;
        }

        if let Some(done) = stack.pop() {
            strategy.attach(&index.node(done.slot).record, done.relationships);
        }
    }

    Ok(())
}

/// Mark `slot` linked and resolve its relationship identifiers to records.
fn enter<R: Clone>(index: &mut NodeIndex<'_, R>, slot: usize) -> BuildResult<Frame<R>> {
    index.node_mut(slot).linked = true;

    let source = index.node(slot).source;
    let mut targets = Vec::new();
    let mut relationships = Relationships::with_capacity(source.relationships.len());

    for (name, relationship) in &source.relationships {
        // Links-only relationships and empty to-one linkage carry nothing to attach.
        let Some(linkage) = &relationship.data else {
            continue;
        };

        let records = linkage.as_ref().try_map(|target| {
            let target_slot = index.lookup(target).ok_or_else(|| BuildError::DanglingReference {
                owner: source.identifier(),
                relationship: name.clone(),
                target: target.clone(),
            })?;
            targets.push(target_slot);
            Ok::<_, BuildError>(index.node(target_slot).record.clone())
        })?;

        relationships.insert(name.clone(), records);
    }

    tracing::trace!(
        resource = %source.identifier(),
        relationships = relationships.len(),
        "resolved relationships"
    );

    Ok(Frame {
        slot,
        targets,
        next: 0,
        relationships,
    })
}
