use crate::autograd::{Graph, NodeId};
use crate::error::DagradError;
use crate::optim::optimizer_trait::Optimizer;
use log::debug;

/// Learning rate used when none is configured.
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;

fn check_learning_rate(lr: f64) -> Result<(), DagradError> {
    if !lr.is_finite() || lr < 0.0 {
        return Err(DagradError::InvalidConfig(format!(
            "learning rate must be finite and non-negative, got {}",
            lr
        )));
    }
    Ok(())
}

/// One gradient-descent update: `value -= lr * gradient` for each trainable.
///
/// Every gradient is read and every new value computed before anything is
/// written back, so on error no trainable has been modified.
///
/// # Errors
/// * `InvalidConfig` for a negative or non-finite `lr`.
/// * `InvalidGraph` if an id is not a trainable leaf.
/// * `MissingValue` if a trainable has no gradient from a completed backward pass.
/// * `NumericError` if a gradient or an updated value is not finite.
pub fn sgd_update(graph: &mut Graph, trainables: &[NodeId], lr: f64) -> Result<(), DagradError> {
    check_learning_rate(lr)?;

    let mut updated = Vec::with_capacity(trainables.len());
    for &id in trainables {
        let node = graph.node(id)?;
        if !node.is_trainable() {
            return Err(DagradError::InvalidGraph(format!(
                "sgd_update: node '{}' is not a trainable leaf",
                node.name()
            )));
        }
        let grad = graph.leaf_gradient(id)?;
        if !grad.is_finite() {
            return Err(DagradError::NumericError {
                node: node.name().to_string(),
                detail: "gradient contains NaN or infinite values".to_string(),
            });
        }
        let mut value = graph.value(id)?.clone();
        value
            .sub_scaled_(lr, grad)
            .map_err(|e| e.in_node(node.name()))?;
        if !value.is_finite() {
            return Err(DagradError::NumericError {
                node: node.name().to_string(),
                detail: format!("update with learning rate {} overflowed", lr),
            });
        }
        updated.push((id, value));
    }

    for (id, value) in updated {
        graph.commit_leaf_value(id, value)?;
    }
    debug!("sgd_update: updated {} trainables with lr {}", trainables.len(), lr);
    Ok(())
}

/// Implements plain stochastic gradient descent over a fixed set of trainables.
///
/// Updates parameters `p` according to the rule:
/// `p = p - lr * grad(p)`
#[derive(Debug, Clone)]
pub struct Sgd {
    params: Vec<NodeId>,
    lr: f64,
}

impl Sgd {
    /// Creates a new SGD optimizer.
    ///
    /// # Arguments
    ///
    /// * `params`: the trainable leaves to update, typically `graph.trainables()`.
    /// * `lr`: the learning rate, finite and non-negative.
    pub fn new(params: impl IntoIterator<Item = NodeId>, lr: f64) -> Result<Self, DagradError> {
        check_learning_rate(lr)?;
        Ok(Sgd {
            params: params.into_iter().collect(),
            lr,
        })
    }

    pub fn params(&self) -> &[NodeId] {
        &self.params
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, graph: &mut Graph) -> Result<(), DagradError> {
        sgd_update(graph, &self.params, self.lr)
    }

    fn learning_rate(&self) -> f64 {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: f64) -> Result<(), DagradError> {
        check_learning_rate(lr)?;
        self.lr = lr;
        Ok(())
    }
}

#[cfg(test)]
#[path = "sgd_test.rs"]
mod tests;
