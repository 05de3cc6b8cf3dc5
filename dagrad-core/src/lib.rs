//! A small reverse-mode automatic differentiation engine.
//!
//! Networks are explicit computation graphs: leaves hold features, targets or
//! trainable parameters, operation nodes compute values from their inbound
//! nodes, and a loss node (a sink) turns everything into one scalar. A graph
//! is sorted once, then every training step evaluates it in that order and
//! accumulates gradients in the exact reverse order.

pub mod autograd;
pub mod error;
pub mod model;
pub mod nn;
pub mod ops;
pub mod optim;
pub mod tensor;
pub mod train;

pub use autograd::{forward_and_backward, forward_pass, topological_sort, Feed, Graph, NodeId};
pub use error::DagradError;
pub use model::{two_layer_regressor, Network};
pub use optim::{sgd_update, Optimizer, Sgd};
pub use tensor::Tensor;
pub use train::{train, BatchSampler, EpochReporter, LogReporter, LossHistory, TrainConfig};

#[cfg(test)]
mod test_utils;
