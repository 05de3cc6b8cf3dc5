use super::graph::{Graph, NodeId};
use crate::error::DagradError;
use crate::tensor::Tensor;
use log::{debug, warn};
use std::collections::VecDeque;

/// Initial leaf values, in insertion order.
///
/// The order is part of the contract: it is the tie-break order of the
/// topological sort.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    entries: Vec<(NodeId, Tensor)>,
}

impl Feed {
    pub fn new() -> Self {
        Feed::default()
    }

    /// Adds a leaf value. Feeding the same leaf twice replaces the value but
    /// keeps the leaf's original position.
    pub fn insert(&mut self, leaf: NodeId, value: Tensor) {
        match self.entries.iter_mut().find(|(id, _)| *id == leaf) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((leaf, value)),
        }
    }

    /// Builder form of [`Feed::insert`].
    pub fn with(mut self, leaf: NodeId, value: Tensor) -> Self {
        self.insert(leaf, value);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }
}

/// Orders every node reachable from the fed leaves (Kahn's algorithm).
///
/// Each fed leaf receives its value when it enters the frontier. In-degrees
/// only count edges whose source is itself reachable. Ready nodes leave the
/// frontier first-in first-out: fed leaves in feed order, then consumers in
/// the order their last dependency was released, so the result is
/// deterministic for a given graph and feed.
///
/// # Errors
/// * `InvalidGraph` if a fed node is unknown or not a leaf.
/// * `ShapeMismatch` if a trainable is fed a value of another shape. No leaf
///   is assigned in that case.
/// * `CycleDetected` if some reachable node can never become ready.
pub fn topological_sort(graph: &mut Graph, feed: Feed) -> Result<Vec<NodeId>, DagradError> {
    // Every value is checked before any is assigned.
    for (leaf, value) in &feed.entries {
        let node = graph.node(*leaf)?;
        if !node.is_leaf() {
            return Err(DagradError::InvalidGraph(format!(
                "cannot feed {} node '{}': only leaves accept values",
                node.kind_name(),
                node.name()
            )));
        }
        graph.check_assignable(*leaf, value)?;
    }

    // Forward reachability, in discovery order.
    let mut reachable = vec![false; graph.len()];
    let mut discovered: Vec<NodeId> = Vec::new();
    let mut pending: VecDeque<NodeId> = feed.leaves().collect();
    while let Some(id) = pending.pop_front() {
        if reachable[id.index()] {
            continue;
        }
        reachable[id.index()] = true;
        discovered.push(id);
        pending.extend(graph.node(id)?.outbound().iter().copied());
    }

    let mut in_degree = vec![0usize; graph.len()];
    for &id in &discovered {
        in_degree[id.index()] = graph
            .node(id)?
            .inbound()
            .iter()
            .filter(|src| reachable[src.index()])
            .count();
    }

    let mut frontier: VecDeque<NodeId> = VecDeque::with_capacity(feed.len());
    for (leaf, value) in feed.entries {
        graph.assign(leaf, value)?;
        frontier.push_back(leaf);
    }

    let mut order = Vec::with_capacity(discovered.len());
    while let Some(id) = frontier.pop_front() {
        order.push(id);
        let node = graph.node(id)?;
        for &consumer in node.outbound() {
            let edges = graph
                .node(consumer)?
                .inbound()
                .iter()
                .filter(|src| **src == id)
                .count();
            let degree = &mut in_degree[consumer.index()];
            *degree = degree.saturating_sub(edges);
            if *degree == 0 {
                frontier.push_back(consumer);
            }
        }
    }

    if order.len() != discovered.len() {
        return Err(DagradError::CycleDetected {
            ordered: order.len(),
            reachable: discovered.len(),
        });
    }

    for node in graph.nodes() {
        if node.is_trainable() && !reachable[node.id().index()] {
            warn!(
                "topological_sort: trainable '{}' was not fed and will not be updated",
                node.name()
            );
        }
    }
    debug!(
        "topological_sort: order = [{}]",
        order
            .iter()
            .map(|id| graph.node(*id).map(|n| n.name().to_string()).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(order)
}

#[cfg(test)]
#[path = "topo_test.rs"]
mod tests;
