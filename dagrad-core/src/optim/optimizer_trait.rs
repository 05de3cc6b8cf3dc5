use crate::autograd::Graph;
use crate::error::DagradError;

/// Trait defining the common interface for all optimizers.
///
/// Optimizers update trainable leaves from the gradients left in the graph by
/// the last successful `forward_and_backward` call.
pub trait Optimizer {
    /// Performs a single optimization step.
    ///
    /// # Returns
    ///
    /// `Ok(())` if every parameter was updated, or a `DagradError` if none was.
    /// An optimizer never leaves the graph partially updated.
    fn step(&mut self, graph: &mut Graph) -> Result<(), DagradError>;

    /// Current learning rate.
    fn learning_rate(&self) -> f64;

    /// Replaces the learning rate, rejecting values `step` could not use.
    fn set_learning_rate(&mut self, lr: f64) -> Result<(), DagradError>;
}
