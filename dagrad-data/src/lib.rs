//! Data plumbing for `dagrad-core` training loops.
//!
//! Provides in-memory datasets, index samplers, the adapter that turns an
//! index sampler into a minibatch source for `dagrad_core::train`, feature
//! standardization and a seeded synthetic regression source.

pub mod dataset;
pub mod samplers;
pub mod synthetic;
pub mod transforms;

pub use dataset::{Dataset, TensorDataset};
pub use samplers::{MinibatchSampler, RandomSampler, Sampler, SequentialSampler};
pub use synthetic::{DataSource, SyntheticRegression};
pub use transforms::{standardize, Standardization};
