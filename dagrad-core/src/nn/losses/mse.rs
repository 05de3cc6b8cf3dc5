use crate::autograd::Loss;
use crate::error::DagradError;
use crate::ops::reduction::mean_op;
use crate::tensor::Tensor;

/// Mean squared error between a target and a prediction.
///
/// Inbound nodes, in order: `y_true`, `y_pred`. Both are viewed as `[N, 1]`
/// columns before subtraction, so a `[N]` target and a `[N, 1]` prediction
/// compare element by element instead of broadcasting to `[N, N]`.
///
/// # Fields
/// * `diff`: `y_true - y_pred` as a column, kept from the last forward pass.
/// * `m`: sample count of the last forward pass.
#[derive(Debug, Clone, Default)]
pub struct MSELoss {
    diff: Option<Tensor>,
    m: usize,
}

impl MSELoss {
    pub fn new() -> Self {
        MSELoss::default()
    }

    /// Sample count seen by the last forward pass (0 before any).
    pub fn sample_count(&self) -> usize {
        self.m
    }
}

fn column_len(shape: &[usize]) -> Option<usize> {
    match shape {
        [n] => Some(*n),
        [n, 1] => Some(*n),
        _ => None,
    }
}

impl Loss for MSELoss {
    fn name(&self) -> &'static str {
        "MSE"
    }

    fn arity(&self) -> usize {
        2
    }

    fn check_shapes(&self, inputs: &[&[usize]]) -> Result<(), DagradError> {
        let (y_true, y_pred) = match inputs {
            [y_true, y_pred] => (*y_true, *y_pred),
            _ => {
                return Err(DagradError::InternalError(format!(
                    "MSE expects 2 inputs, got {}",
                    inputs.len()
                )))
            }
        };
        match (column_len(y_true), column_len(y_pred)) {
            (Some(a), Some(b)) if a == b && a > 0 => Ok(()),
            _ => Err(DagradError::ShapeMismatch {
                expected: "y_true and y_pred as equal-length non-empty columns ([N] or [N, 1])"
                    .to_string(),
                actual: format!("y_true {:?}, y_pred {:?}", y_true, y_pred),
                operation: "MSE".to_string(),
            }),
        }
    }

    fn forward(&mut self, inputs: &[&Tensor]) -> Result<f64, DagradError> {
        let shapes: Vec<&[usize]> = inputs.iter().map(|t| t.shape()).collect();
        self.check_shapes(&shapes)?;
        let m = inputs[0].numel();
        let y_true = inputs[0].reshape(vec![m, 1])?;
        let y_pred = inputs[1].reshape(vec![m, 1])?;

        let diff = y_true.sub(&y_pred)?;
        let loss = mean_op(&diff.map(|d| d * d))?.item()?;
        self.diff = Some(diff);
        self.m = m;
        Ok(loss)
    }

    fn seed_gradients(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, DagradError> {
        let diff = self.diff.as_ref().ok_or_else(|| DagradError::MissingValue {
            node: "MSE".to_string(),
            reason: "backward requested before any forward pass".to_string(),
        })?;
        if inputs.len() != 2 || inputs.iter().any(|t| t.numel() != self.m) {
            return Err(DagradError::InternalError(
                "MSE inputs changed between forward and backward".to_string(),
            ));
        }
        let scale = 2.0 / self.m as f64;
        let grad_true = diff.map(|d| scale * d).reshape(inputs[0].shape().to_vec())?;
        let grad_pred = diff.map(|d| -scale * d).reshape(inputs[1].shape().to_vec())?;
        Ok(vec![grad_true, grad_pred])
    }
}

#[cfg(test)]
#[path = "mse_test.rs"]
mod tests;
