use dagrad_core::{DagradError, Tensor};

/// Represents a dataset that can be accessed by index.
pub trait Dataset {
    /// The type of a single item returned by the dataset.
    type Item;

    /// Returns the item at the given index.
    ///
    /// # Errors
    ///
    /// Returns `DagradError` if the index is out of bounds.
    fn get(&self, index: usize) -> Result<Self::Item, DagradError>;

    /// Returns the total number of items in the dataset.
    fn len(&self) -> usize;

    /// Checks if the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Features and targets of a regression problem, one row per example.
///
/// `features` is `[N, F]`; `targets` is `[N]` or `[N, 1]`.
#[derive(Debug, Clone)]
pub struct TensorDataset {
    features: Tensor,
    targets: Tensor,
}

impl TensorDataset {
    /// Creates a dataset after checking that both tensors have `N` rows.
    ///
    /// # Errors
    ///
    /// Returns `DagradError::ShapeMismatch` if `features` is not a matrix,
    /// `targets` is not a column, or their row counts differ.
    pub fn new(features: Tensor, targets: Tensor) -> Result<Self, DagradError> {
        let (rows, _) = features.dims2()?;
        let target_rows = match targets.shape() {
            [n] | [n, 1] => *n,
            other => {
                return Err(DagradError::ShapeMismatch {
                    expected: "targets of shape [N] or [N, 1]".to_string(),
                    actual: format!("{:?}", other),
                    operation: "TensorDataset::new".to_string(),
                })
            }
        };
        if target_rows != rows {
            return Err(DagradError::ShapeMismatch {
                expected: format!("{} target rows", rows),
                actual: format!("{} target rows", target_rows),
                operation: "TensorDataset::new".to_string(),
            });
        }
        Ok(TensorDataset { features, targets })
    }

    pub fn features(&self) -> &Tensor {
        &self.features
    }

    pub fn targets(&self) -> &Tensor {
        &self.targets
    }

    /// Number of feature columns.
    pub fn feature_count(&self) -> usize {
        self.features.shape()[1]
    }

    /// Gathers the given rows into a minibatch `(X_batch, y_batch)`.
    pub fn batch(&self, indices: &[usize]) -> Result<(Tensor, Tensor), DagradError> {
        Ok((
            self.features.select_rows(indices)?,
            self.targets.select_rows(indices)?,
        ))
    }

    pub fn into_parts(self) -> (Tensor, Tensor) {
        (self.features, self.targets)
    }
}

impl Dataset for TensorDataset {
    /// One feature row `[1, F]` and its target.
    type Item = (Tensor, Tensor);

    fn get(&self, index: usize) -> Result<Self::Item, DagradError> {
        self.batch(&[index])
    }

    fn len(&self) -> usize {
        self.features.shape()[0]
    }
}

#[cfg(test)]
#[path = "dataset_test.rs"]
mod tests;
