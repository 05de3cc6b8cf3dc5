use crate::error::DagradError;
use crate::tensor::Tensor;

/// Performs matrix multiplication C = A @ B.
/// Only 2D tensors are supported.
/// A: [M, K], B: [K, N] -> C: [M, N]
pub fn matmul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, DagradError> {
    let (m, k) = a.dims2().map_err(|_| shape_error(a, b))?;
    let (k2, n) = b.dims2().map_err(|_| shape_error(a, b))?;
    if k != k2 {
        return Err(shape_error(a, b));
    }

    let a_data = a.data();
    let b_data = b.data();
    let mut output = vec![0.0; m * n];

    // i-l-j loop order walks both B and C row-wise.
    for i in 0..m {
        let out_row = &mut output[i * n..(i + 1) * n];
        for l in 0..k {
            let a_il = a_data[i * k + l];
            let b_row = &b_data[l * n..(l + 1) * n];
            for (c, &b_lj) in out_row.iter_mut().zip(b_row) {
                *c += a_il * b_lj;
            }
        }
    }

    Tensor::new(output, vec![m, n])
}

/// Swaps the two axes of a matrix.
pub fn transpose_op(a: &Tensor) -> Result<Tensor, DagradError> {
    let (rows, cols) = a.dims2()?;
    let data = a.data();
    let mut output = vec![0.0; rows * cols];
    for i in 0..rows {
        for j in 0..cols {
            output[j * rows + i] = data[i * cols + j];
        }
    }
    Tensor::new(output, vec![cols, rows])
}

fn shape_error(a: &Tensor, b: &Tensor) -> DagradError {
    DagradError::ShapeMismatch {
        expected: format!("[M, K] @ [K, N] with left operand {:?}", a.shape()),
        actual: format!("{:?}", b.shape()),
        operation: "matmul".to_string(),
    }
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
