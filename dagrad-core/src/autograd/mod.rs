//! The computation graph: node arena, ordering, and the forward/backward driver.

pub mod engine;
pub mod grad_check;
pub mod graph;
pub mod operation;
pub mod topo;

pub use engine::{forward_and_backward, forward_pass};
pub use graph::{Graph, Node, NodeId};
pub use operation::{Loss, Operation};
pub use topo::{topological_sort, Feed};
