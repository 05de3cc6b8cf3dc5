//! Numeric kernels used by the graph operations.
//!
//! Kernels are plain functions over [`Tensor`](crate::tensor::Tensor); they
//! know nothing about nodes or gradients.

pub mod activation;
pub mod linalg;
pub mod reduction;
