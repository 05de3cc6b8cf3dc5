use super::engine::{forward_and_backward, forward_pass};
use super::graph::{Graph, NodeId};
use crate::error::DagradError;
use crate::tensor::Tensor;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for leaf '{leaf}', element index {element_index}: Analytical grad {analytical_grad:?} != Numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        leaf: String,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },

    #[error("Numerical gradient is NaN or infinite for leaf '{leaf}', element {element_index}. Details: Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        leaf: String,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },

    #[error("Leaf '{leaf}' has a value of shape {value_shape:?} but a gradient of shape {grad_shape:?}")]
    GradientShapeMismatch {
        leaf: String,
        value_shape: Vec<usize>,
        grad_shape: Vec<usize>,
    },

    #[error("Graph error during gradient check: {0}")]
    GraphError(DagradError),
}

impl From<DagradError> for GradCheckError {
    fn from(err: DagradError) -> Self {
        GradCheckError::GraphError(err)
    }
}

/// Checks analytical leaf gradients against central finite differences.
///
/// For every element of every leaf in `leaves`, the loss is re-evaluated at
/// `x + epsilon` and `x - epsilon` and `(L+ - L-) / (2 epsilon)` is compared
/// with the gradient produced by [`forward_and_backward`]. An element fails
/// when both its absolute and relative difference exceed `tolerance`.
///
/// Leaf values are restored before returning, successful or not, and the
/// graph is left holding the values and gradients of the unperturbed point.
pub fn check_gradients(
    graph: &mut Graph,
    order: &[NodeId],
    loss: NodeId,
    leaves: &[NodeId],
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError> {
    forward_and_backward(graph, order)?;
    let analytical: Vec<_> = leaves
        .iter()
        .map(|&leaf| graph.leaf_gradient(leaf).cloned())
        .collect::<Result<_, _>>()?;

    let result = compare_all(graph, order, loss, leaves, &analytical, epsilon, tolerance);
    forward_and_backward(graph, order)?;
    result
}

fn compare_all(
    graph: &mut Graph,
    order: &[NodeId],
    loss: NodeId,
    leaves: &[NodeId],
    analytical: &[Tensor],
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError> {
    for (&leaf, analytical_grad) in leaves.iter().zip(analytical) {
        let original = graph.value(leaf)?.clone();
        let leaf_name = graph.node(leaf)?.name().to_string();
        if original.shape() != analytical_grad.shape() {
            return Err(GradCheckError::GradientShapeMismatch {
                leaf: leaf_name,
                value_shape: original.shape().to_vec(),
                grad_shape: analytical_grad.shape().to_vec(),
            });
        }

        for elem_idx in 0..original.numel() {
            let loss_plus = perturbed_loss(graph, order, loss, leaf, &original, elem_idx, epsilon);
            let loss_minus = perturbed_loss(graph, order, loss, leaf, &original, elem_idx, -epsilon);
            graph.assign(leaf, original.clone())?;
            let (loss_plus, loss_minus) = (loss_plus?, loss_minus?);

            let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);
            if !numerical_grad.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    leaf: leaf_name,
                    element_index: elem_idx,
                    loss_plus,
                    loss_minus,
                });
            }

            let analytical_value = analytical_grad.data()[elem_idx];
            let difference = (analytical_value - numerical_grad).abs();
            let scale = analytical_value.abs().max(numerical_grad.abs());
            if difference > tolerance && difference / scale > tolerance {
                return Err(GradCheckError::GradientMismatch {
                    leaf: leaf_name,
                    element_index: elem_idx,
                    analytical_grad: analytical_value,
                    numerical_grad,
                    difference,
                });
            }
        }
    }
    Ok(())
}

fn perturbed_loss(
    graph: &mut Graph,
    order: &[NodeId],
    loss: NodeId,
    leaf: NodeId,
    original: &Tensor,
    elem_idx: usize,
    delta: f64,
) -> Result<f64, GradCheckError> {
    let mut perturbed = original.clone();
    perturbed.data_mut()[elem_idx] += delta;
    graph.assign(leaf, perturbed)?;
    forward_pass(graph, order)?;
    Ok(graph.loss_value(loss)?)
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
