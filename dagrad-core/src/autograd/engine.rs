use super::graph::{Graph, NodeId};
use crate::error::DagradError;

/// Evaluates every node of `order`, first to last.
pub fn forward_pass(graph: &mut Graph, order: &[NodeId]) -> Result<(), DagradError> {
    for &id in order {
        graph.evaluate(id)?;
    }
    Ok(())
}

/// Runs one full training-step pass over a fixed topological order.
///
/// Nodes are evaluated in `order`, then their gradients are accumulated in
/// exactly the reverse order, so every consumer has produced its gradient
/// slots before any of its inputs reads them. Gradients left by an earlier
/// call are dropped first, so after an error no node in `order` holds a
/// gradient and a following optimizer step fails instead of reusing them.
pub fn forward_and_backward(graph: &mut Graph, order: &[NodeId]) -> Result<(), DagradError> {
    graph.clear_gradients(order)?;
    forward_pass(graph, order)?;
    for &id in order.iter().rev() {
        graph.accumulate_gradient(id)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
