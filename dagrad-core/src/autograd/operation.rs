use crate::error::DagradError;
use crate::tensor::Tensor;
use std::fmt::Debug;

/// Local rule of a differentiable operation node.
///
/// An `Operation` computes its node's value from the values of its ordered
/// inbound nodes and, during the backward pass, turns one consumer's upstream
/// gradient into one gradient per inbound slot. The engine calls `backward`
/// once per consumer edge and sums the results slot by slot.
pub trait Operation: Debug {
    /// Short operation name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Exact number of inbound nodes.
    fn arity(&self) -> usize;

    /// Output shape for the given inbound shapes, or `ShapeMismatch`.
    ///
    /// Called at graph construction when every inbound shape is already
    /// known, and before every forward evaluation.
    fn output_shape(&self, inputs: &[&[usize]]) -> Result<Vec<usize>, DagradError>;

    /// Computes the node value. `inputs` is parallel to the node's inbound list.
    fn forward(&self, inputs: &[&Tensor]) -> Result<Tensor, DagradError>;

    /// Computes dL/dInput_i for each inbound slot from dL/dOutput.
    ///
    /// # Arguments
    /// * `inputs`: inbound values from the forward pass of this step.
    /// * `output`: this node's value from the forward pass.
    /// * `upstream`: gradient one consumer attributed to this node, shaped like `output`.
    ///
    /// # Returns
    /// One gradient per inbound slot, in inbound order, each shaped like its input.
    fn backward(
        &self,
        inputs: &[&Tensor],
        output: &Tensor,
        upstream: &Tensor,
    ) -> Result<Vec<Tensor>, DagradError>;
}

/// Rule of a scalar objective node (a sink).
///
/// A loss has no consumers: it seeds the backward pass instead of receiving
/// an upstream gradient, and it exposes no gradient of its own.
pub trait Loss: Debug {
    fn name(&self) -> &'static str;

    fn arity(&self) -> usize;

    /// Checks that the inbound shapes are compatible.
    fn check_shapes(&self, inputs: &[&[usize]]) -> Result<(), DagradError>;

    /// Computes the scalar objective and keeps whatever the seed step needs.
    fn forward(&mut self, inputs: &[&Tensor]) -> Result<f64, DagradError>;

    /// Gradient of the objective with respect to each inbound slot.
    fn seed_gradients(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, DagradError>;
}
