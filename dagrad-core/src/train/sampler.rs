use crate::error::DagradError;
use crate::tensor::Tensor;

/// Draws one minibatch from the full training set.
///
/// Implementations return `(X_batch, y_batch)` with the same number of rows;
/// the rows of `X_batch` keep the feature layout of `features`.
pub trait BatchSampler {
    fn sample(
        &mut self,
        features: &Tensor,
        targets: &Tensor,
        batch_size: usize,
    ) -> Result<(Tensor, Tensor), DagradError>;
}
