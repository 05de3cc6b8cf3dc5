use dagrad_core::DagradError;
use std::fmt::Debug;

/// Decides which rows of a dataset form the next minibatch.
///
/// Samplers carry their own state (a seeded generator, a cursor), so drawing
/// takes `&mut self` and successive calls continue where the last one ended.
pub trait Sampler: Debug {
    /// Returns `count` row indices, each below `dataset_len`.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `count` indices cannot be drawn from `dataset_len` rows.
    fn sample_indices(
        &mut self,
        dataset_len: usize,
        count: usize,
    ) -> Result<Vec<usize>, DagradError>;
}
