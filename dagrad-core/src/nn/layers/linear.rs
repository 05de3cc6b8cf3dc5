use crate::autograd::Operation;
use crate::error::DagradError;
use crate::ops::linalg::{matmul_op, transpose_op};
use crate::ops::reduction::column_sum_op;
use crate::tensor::Tensor;

/// Affine transform node: `X @ W + b`.
///
/// Inbound nodes, in order:
/// * `X`: features, shape `[N, in]`
/// * `W`: weights, shape `[in, out]`
/// * `b`: bias, shape `[out]` (a `[1, out]` row is accepted too)
///
/// The bias is added to every row. No other broadcasting is performed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl Linear {
    fn check(x: &[usize], w: &[usize], b: &[usize]) -> Result<Vec<usize>, DagradError> {
        let mismatch = |expected: String| DagradError::ShapeMismatch {
            expected,
            actual: format!("X {:?}, W {:?}, b {:?}", x, w, b),
            operation: "Linear".to_string(),
        };
        let (n, in_x) = match x {
            [n, in_x] => (*n, *in_x),
            _ => return Err(mismatch("X of rank 2".to_string())),
        };
        let (in_w, out) = match w {
            [in_w, out] => (*in_w, *out),
            _ => return Err(mismatch("W of rank 2".to_string())),
        };
        if in_x != in_w {
            return Err(mismatch(format!("X.cols == W.rows ({} != {})", in_x, in_w)));
        }
        let bias_ok = match b {
            [len] => *len == out,
            [1, len] => *len == out,
            _ => false,
        };
        if !bias_ok {
            return Err(mismatch(format!("b of length W.cols = {}", out)));
        }
        Ok(vec![n, out])
    }
}

impl Operation for Linear {
    fn name(&self) -> &'static str {
        "Linear"
    }

    fn arity(&self) -> usize {
        3
    }

    fn output_shape(&self, inputs: &[&[usize]]) -> Result<Vec<usize>, DagradError> {
        match inputs {
            [x, w, b] => Linear::check(x, w, b),
            _ => Err(DagradError::InternalError(format!(
                "Linear expects 3 inputs, got {}",
                inputs.len()
            ))),
        }
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Tensor, DagradError> {
        let (x, w, b) = match inputs {
            [x, w, b] => (*x, *w, *b),
            _ => {
                return Err(DagradError::InternalError(format!(
                    "Linear expects 3 inputs, got {}",
                    inputs.len()
                )))
            }
        };
        let out_shape = Linear::check(x.shape(), w.shape(), b.shape())?;
        let mut out = matmul_op(x, w)?;
        let cols = out_shape[1];
        for row in out.data_mut().chunks_mut(cols.max(1)) {
            for (o, &bias) in row.iter_mut().zip(b.data()) {
                *o += bias;
            }
        }
        Ok(out)
    }

    fn backward(
        &self,
        inputs: &[&Tensor],
        output: &Tensor,
        upstream: &Tensor,
    ) -> Result<Vec<Tensor>, DagradError> {
        let (x, w, b) = match inputs {
            [x, w, b] => (*x, *w, *b),
            _ => {
                return Err(DagradError::InternalError(format!(
                    "Linear expects 3 inputs, got {}",
                    inputs.len()
                )))
            }
        };
        if upstream.shape() != output.shape() {
            return Err(DagradError::ShapeMismatch {
                expected: format!("{:?}", output.shape()),
                actual: format!("{:?}", upstream.shape()),
                operation: "Linear backward".to_string(),
            });
        }
        let grad_x = matmul_op(upstream, &transpose_op(w)?)?;
        let grad_w = matmul_op(&transpose_op(x)?, upstream)?;
        let grad_b = column_sum_op(upstream)?.reshape(b.shape().to_vec())?;
        Ok(vec![grad_x, grad_w, grad_b])
    }
}

#[cfg(test)]
#[path = "linear_test.rs"]
mod tests;
