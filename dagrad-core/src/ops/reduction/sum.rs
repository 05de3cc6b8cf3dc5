use crate::error::DagradError;
use crate::tensor::Tensor;

/// Sums a matrix over its first (batch) axis.
///
/// `[N, C] -> [C]`
pub fn column_sum_op(a: &Tensor) -> Result<Tensor, DagradError> {
    let (rows, cols) = a.dims2()?;
    let data = a.data();
    let mut sums = vec![0.0; cols];
    for row in 0..rows {
        for (acc, &x) in sums.iter_mut().zip(&data[row * cols..(row + 1) * cols]) {
            *acc += x;
        }
    }
    Ok(Tensor::from_vec(sums))
}

/// Mean over every element, as a rank-0 tensor.
pub fn mean_op(a: &Tensor) -> Result<Tensor, DagradError> {
    if a.numel() == 0 {
        return Err(DagradError::ShapeMismatch {
            expected: "at least one element".to_string(),
            actual: format!("{:?}", a.shape()),
            operation: "mean".to_string(),
        });
    }
    let total: f64 = a.data().iter().sum();
    Ok(Tensor::scalar(total / a.numel() as f64))
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
