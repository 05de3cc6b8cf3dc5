use crate::autograd::Operation;
use crate::error::DagradError;
use crate::tensor::Tensor;

/// Logits are clamped to this magnitude before exponentiation.
///
/// At |x| = 30 the logistic is within 1e-13 of its asymptote, yet still
/// strictly inside (0, 1) in `f64`, and its derivative stays non-zero.
pub const MAX_LOGIT: f64 = 30.0;

/// Numerically stable logistic function.
///
/// Only ever exponentiates a non-positive number, so it cannot overflow.
pub fn sigmoid(x: f64) -> f64 {
    let x = x.clamp(-MAX_LOGIT, MAX_LOGIT);
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Applies [`sigmoid`] element-wise.
pub fn sigmoid_op(input: &Tensor) -> Tensor {
    input.map(sigmoid)
}

/// Element-wise logistic activation node. One inbound node.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sigmoid;

impl Operation for Sigmoid {
    fn name(&self) -> &'static str {
        "Sigmoid"
    }

    fn arity(&self) -> usize {
        1
    }

    fn output_shape(&self, inputs: &[&[usize]]) -> Result<Vec<usize>, DagradError> {
        match inputs {
            [shape] => Ok(shape.to_vec()),
            _ => Err(DagradError::InternalError(format!(
                "Sigmoid expects 1 input, got {}",
                inputs.len()
            ))),
        }
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Tensor, DagradError> {
        match inputs {
            [x] => Ok(sigmoid_op(x)),
            _ => Err(DagradError::InternalError(format!(
                "Sigmoid expects 1 input, got {}",
                inputs.len()
            ))),
        }
    }

    // d/dx sigmoid(x) = s * (1 - s), written in terms of the stored output.
    fn backward(
        &self,
        _inputs: &[&Tensor],
        output: &Tensor,
        upstream: &Tensor,
    ) -> Result<Vec<Tensor>, DagradError> {
        if upstream.shape() != output.shape() {
            return Err(DagradError::ShapeMismatch {
                expected: format!("{:?}", output.shape()),
                actual: format!("{:?}", upstream.shape()),
                operation: "Sigmoid backward".to_string(),
            });
        }
        let data = output
            .data()
            .iter()
            .zip(upstream.data())
            .map(|(&s, &g)| s * (1.0 - s) * g)
            .collect();
        Ok(vec![Tensor::new(data, output.shape().to_vec())?])
    }
}

#[cfg(test)]
#[path = "sigmoid_test.rs"]
mod tests;
