//! Ready-to-train networks built on top of the graph.

pub mod network;
pub mod regressor;

pub use network::Network;
pub use regressor::two_layer_regressor;
