use crate::autograd::{forward_and_backward, forward_pass, topological_sort, Feed, Graph, NodeId};
use crate::error::DagradError;
use crate::optim::Optimizer;
use crate::tensor::Tensor;
use log::debug;

/// A sorted graph together with the roles of its distinguished nodes.
///
/// The topological order is computed once in [`Network::new`] and reused by
/// every training step; each step only re-assigns the feature and target
/// leaves. `predict` runs the subset of the order the prediction depends on,
/// so targets are not needed at inference time.
#[derive(Debug)]
pub struct Network {
    graph: Graph,
    order: Vec<NodeId>,
    features: NodeId,
    targets: NodeId,
    prediction: NodeId,
    loss: NodeId,
    trainables: Vec<NodeId>,
    prediction_order: Vec<NodeId>,
}

impl Network {
    /// Sorts `graph` from `feed` and checks the roles of the given nodes.
    ///
    /// The trainables of the network are the trainable leaves reached by the
    /// sort, in order.
    ///
    /// # Errors
    /// * Any error of [`topological_sort`].
    /// * `InvalidGraph` if `features`/`targets` are not fed non-trainable
    ///   leaves, `loss` is not a reachable sink, or `prediction` is a sink or
    ///   unreachable.
    pub fn new(
        mut graph: Graph,
        feed: Feed,
        features: NodeId,
        targets: NodeId,
        prediction: NodeId,
        loss: NodeId,
    ) -> Result<Self, DagradError> {
        let order = topological_sort(&mut graph, feed)?;
        let in_order = |id: NodeId| order.contains(&id);

        for (role, id) in [("features", features), ("targets", targets)] {
            let node = graph.node(id)?;
            if !node.is_leaf() || node.is_trainable() || !in_order(id) {
                return Err(DagradError::InvalidGraph(format!(
                    "{} node '{}' must be a fed, non-trainable leaf",
                    role,
                    node.name()
                )));
            }
        }
        let loss_node = graph.node(loss)?;
        if !loss_node.is_sink() || !in_order(loss) {
            return Err(DagradError::InvalidGraph(format!(
                "loss node '{}' must be a reachable loss sink",
                loss_node.name()
            )));
        }
        let prediction_node = graph.node(prediction)?;
        if prediction_node.is_sink() || !in_order(prediction) {
            return Err(DagradError::InvalidGraph(format!(
                "prediction node '{}' must be a reachable non-loss node",
                prediction_node.name()
            )));
        }

        let trainables: Vec<NodeId> = order
            .iter()
            .copied()
            .filter(|id| graph.node(*id).map(|n| n.is_trainable()).unwrap_or(false))
            .collect();
        let needed = graph.ancestors(prediction)?;
        let prediction_order: Vec<NodeId> = order
            .iter()
            .copied()
            .filter(|id| needed[id.index()])
            .collect();
        debug!(
            "Network: {} nodes ordered, {} trainables, {} nodes needed for prediction",
            order.len(),
            trainables.len(),
            prediction_order.len()
        );

        Ok(Network {
            graph,
            order,
            features,
            targets,
            prediction,
            loss,
            trainables,
            prediction_order,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    pub fn features(&self) -> NodeId {
        self.features
    }

    pub fn targets(&self) -> NodeId {
        self.targets
    }

    pub fn prediction(&self) -> NodeId {
        self.prediction
    }

    pub fn loss_node(&self) -> NodeId {
        self.loss
    }

    pub fn trainables(&self) -> &[NodeId] {
        &self.trainables
    }

    /// Current value of a node, typically a trainable.
    pub fn value(&self, id: NodeId) -> Result<&Tensor, DagradError> {
        self.graph.value(id)
    }

    /// Loss of the last forward pass.
    pub fn loss(&self) -> Result<f64, DagradError> {
        self.graph.loss_value(self.loss)
    }

    fn load_batch(&mut self, x: Tensor, y: Tensor) -> Result<(), DagradError> {
        self.graph.assign(self.features, x)?;
        self.graph.assign(self.targets, y)
    }

    /// One training step on a minibatch: forward, backward, optimizer update.
    ///
    /// Returns the loss of the forward pass, i.e. before the update.
    pub fn train_step<O: Optimizer + ?Sized>(
        &mut self,
        optimizer: &mut O,
        x: Tensor,
        y: Tensor,
    ) -> Result<f64, DagradError> {
        self.load_batch(x, y)?;
        forward_and_backward(&mut self.graph, &self.order)?;
        let loss = self.loss()?;
        optimizer.step(&mut self.graph)?;
        Ok(loss)
    }

    /// Loss on `(x, y)` without touching gradients or trainables.
    pub fn evaluate(&mut self, x: Tensor, y: Tensor) -> Result<f64, DagradError> {
        self.load_batch(x, y)?;
        forward_pass(&mut self.graph, &self.order)?;
        self.loss()
    }

    /// Value of the prediction node for the given features.
    pub fn predict(&mut self, x: Tensor) -> Result<Tensor, DagradError> {
        self.graph.assign(self.features, x)?;
        forward_pass(&mut self.graph, &self.prediction_order)?;
        self.graph.value(self.prediction).cloned()
    }
}

#[cfg(test)]
#[path = "network_test.rs"]
mod tests;
