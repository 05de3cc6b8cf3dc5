//! Optimizers for training the graph's trainable leaves.
//!
//! This module provides the `Optimizer` trait and plain stochastic gradient
//! descent, both as the free function [`sgd_update`] and as the stateful
//! [`Sgd`] optimizer.

pub mod optimizer_trait;
pub mod sgd;

pub use optimizer_trait::Optimizer;
pub use sgd::{sgd_update, Sgd, DEFAULT_LEARNING_RATE};
