use super::operation::{Loss, Operation};
use crate::error::DagradError;
use crate::nn::layers::Linear;
use crate::nn::losses::MSELoss;
use crate::ops::activation::Sigmoid;
use crate::tensor::{zeros_like, Tensor};
use log::debug;
use std::fmt;

/// Handle of a node inside a [`Graph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State only leaves carry: trainability and the self-gradient slot.
#[derive(Debug, Default)]
pub(crate) struct Leaf {
    trainable: bool,
    grad: Option<Tensor>,
}

/// What a node does, decided once at construction.
#[derive(Debug)]
pub(crate) enum NodeKind {
    Input(Leaf),
    Operation(Box<dyn Operation>),
    Loss(Box<dyn Loss>),
}

/// A vertex of the computation graph.
///
/// Edges are [`NodeId`] handles into the owning arena. `inbound` is ordered
/// (it is the argument list of the node's rule); `outbound` lists each
/// distinct consumer once, in the order consumers were created.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    name: String,
    pub(crate) kind: NodeKind,
    inbound: Vec<NodeId>,
    outbound: Vec<NodeId>,
    value: Option<Tensor>,
    // One slot per inbound edge, parallel to `inbound`.
    inbound_grads: Vec<Option<Tensor>>,
    static_shape: Option<Vec<usize>>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Role of the node in the network, used in logs and errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inbound(&self) -> &[NodeId] {
        &self.inbound
    }

    pub fn outbound(&self) -> &[NodeId] {
        &self.outbound
    }

    pub fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    /// True for leaves, the only nodes that accept an externally assigned value.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Input(_))
    }

    pub fn is_trainable(&self) -> bool {
        matches!(self.kind, NodeKind::Input(Leaf { trainable: true, .. }))
    }

    /// True for loss nodes, which have no consumers and no gradient of their own.
    pub fn is_sink(&self) -> bool {
        matches!(self.kind, NodeKind::Loss(_))
    }

    /// Name of the node's rule ("Input", "Linear", ...).
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Input(_) => "Input",
            NodeKind::Operation(op) => op.name(),
            NodeKind::Loss(loss) => loss.name(),
        }
    }

    /// Shape known at construction time, if any.
    fn known_shape(&self) -> Option<&[usize]> {
        match &self.kind {
            NodeKind::Input(_) => self.value.as_ref().map(|v| v.shape()),
            _ => self.static_shape.as_deref(),
        }
    }
}

/// Arena owning every node of a computation graph.
///
/// Nodes can only reference nodes created before them, so the edge relation
/// of a graph built through this API is acyclic by construction and every
/// inbound handle has a smaller index than its consumer.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    pub fn new() -> Self {
        Graph { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, DagradError> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| DagradError::InvalidGraph(format!("unknown node {}", id)))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DagradError> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| DagradError::InvalidGraph(format!("unknown node {}", id)))
    }

    // --- Construction ---

    /// Adds a leaf whose value is fed by the caller (features, targets).
    pub fn add_input(&mut self, name: &str) -> NodeId {
        self.push_leaf(name, false, None)
    }

    /// Adds a leaf updated by the optimizer, with its initial value.
    pub fn add_trainable(&mut self, name: &str, initial: Tensor) -> NodeId {
        self.push_leaf(name, true, Some(initial))
    }

    fn push_leaf(&mut self, name: &str, trainable: bool, value: Option<Tensor>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            name: name.to_string(),
            kind: NodeKind::Input(Leaf {
                trainable,
                grad: None,
            }),
            inbound: Vec::new(),
            outbound: Vec::new(),
            value,
            inbound_grads: Vec::new(),
            static_shape: None,
        });
        id
    }

    /// Adds a [`Linear`] node over `(x, w, b)`.
    pub fn linear(
        &mut self,
        name: &str,
        x: NodeId,
        w: NodeId,
        b: NodeId,
    ) -> Result<NodeId, DagradError> {
        self.add_operation(name, Box::new(Linear), &[x, w, b])
    }

    /// Adds a [`Sigmoid`] node over `x`.
    pub fn sigmoid(&mut self, name: &str, x: NodeId) -> Result<NodeId, DagradError> {
        self.add_operation(name, Box::new(Sigmoid), &[x])
    }

    /// Adds an [`MSELoss`] sink over `(y_true, y_pred)`.
    pub fn mse(
        &mut self,
        name: &str,
        y_true: NodeId,
        y_pred: NodeId,
    ) -> Result<NodeId, DagradError> {
        self.add_loss(name, Box::new(MSELoss::new()), &[y_true, y_pred])
    }

    /// Adds an operation node. Arity is checked here; shapes are checked here
    /// when every inbound shape is already known, and always at evaluation.
    pub fn add_operation(
        &mut self,
        name: &str,
        op: Box<dyn Operation>,
        inbound: &[NodeId],
    ) -> Result<NodeId, DagradError> {
        self.check_inbound(name, op.name(), op.arity(), inbound)?;
        let static_shape = match self.known_shapes(inbound) {
            Some(shapes) => Some(op.output_shape(&shapes).map_err(|e| e.in_node(name))?),
            None => None,
        };
        Ok(self.push_consumer(name, NodeKind::Operation(op), inbound, static_shape))
    }

    /// Adds a loss node (a sink).
    pub fn add_loss(
        &mut self,
        name: &str,
        loss: Box<dyn Loss>,
        inbound: &[NodeId],
    ) -> Result<NodeId, DagradError> {
        self.check_inbound(name, loss.name(), loss.arity(), inbound)?;
        if let Some(shapes) = self.known_shapes(inbound) {
            loss.check_shapes(&shapes).map_err(|e| e.in_node(name))?;
        }
        Ok(self.push_consumer(name, NodeKind::Loss(loss), inbound, Some(Vec::new())))
    }

    fn check_inbound(
        &self,
        name: &str,
        rule: &str,
        arity: usize,
        inbound: &[NodeId],
    ) -> Result<(), DagradError> {
        if inbound.len() != arity {
            return Err(DagradError::InvalidGraph(format!(
                "{} node '{}' takes {} inbound nodes, got {}",
                rule,
                name,
                arity,
                inbound.len()
            )));
        }
        for &id in inbound {
            let node = self.node(id)?;
            if node.is_sink() {
                return Err(DagradError::InvalidGraph(format!(
                    "node '{}' cannot consume loss node '{}'",
                    name, node.name
                )));
            }
        }
        Ok(())
    }

    fn known_shapes(&self, inbound: &[NodeId]) -> Option<Vec<&[usize]>> {
        inbound
            .iter()
            .map(|id| self.nodes[id.0].known_shape())
            .collect()
    }

    fn push_consumer(
        &mut self,
        name: &str,
        kind: NodeKind,
        inbound: &[NodeId],
        static_shape: Option<Vec<usize>>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        for &src in inbound {
            let outbound = &mut self.nodes[src.0].outbound;
            if !outbound.contains(&id) {
                outbound.push(id);
            }
        }
        self.nodes.push(Node {
            id,
            name: name.to_string(),
            kind,
            inbound: inbound.to_vec(),
            outbound: Vec::new(),
            value: None,
            inbound_grads: vec![None; inbound.len()],
            static_shape,
        });
        debug!("Graph: added node '{}' {} with inbound {:?}", name, id, inbound);
        id
    }

    /// Adds an edge without any of the construction checks.
    #[cfg(test)]
    pub(crate) fn connect_unchecked(&mut self, src: NodeId, dst: NodeId) {
        self.nodes[dst.0].inbound.push(src);
        self.nodes[dst.0].inbound_grads.push(None);
        if !self.nodes[src.0].outbound.contains(&dst) {
            self.nodes[src.0].outbound.push(dst);
        }
    }

    // --- Values and gradients ---

    /// Assigns the value of a leaf.
    ///
    /// A trainable leaf keeps its shape for the lifetime of the graph.
    pub fn assign(&mut self, id: NodeId, value: Tensor) -> Result<(), DagradError> {
        self.check_assignable(id, &value)?;
        self.node_mut(id)?.value = Some(value);
        Ok(())
    }

    /// Checks that [`Graph::assign`] would accept `value`, without storing it.
    pub(crate) fn check_assignable(&self, id: NodeId, value: &Tensor) -> Result<(), DagradError> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Input(leaf) => {
                if let (true, Some(current)) = (leaf.trainable, &node.value) {
                    if current.shape() != value.shape() {
                        return Err(DagradError::ShapeMismatch {
                            expected: format!("{:?}", current.shape()),
                            actual: format!("{:?}", value.shape()),
                            operation: format!("assign to trainable '{}'", node.name),
                        });
                    }
                }
                Ok(())
            }
            _ => Err(DagradError::InvalidGraph(format!(
                "cannot assign a value to {} node '{}': only leaves accept values",
                node.kind_name(),
                node.name
            ))),
        }
    }

    /// Current value of any node.
    pub fn value(&self, id: NodeId) -> Result<&Tensor, DagradError> {
        let node = self.node(id)?;
        node.value.as_ref().ok_or_else(|| DagradError::MissingValue {
            node: node.name.clone(),
            reason: "no value has been assigned or computed yet".to_string(),
        })
    }

    /// Scalar value of a loss node.
    pub fn loss_value(&self, id: NodeId) -> Result<f64, DagradError> {
        let node = self.node(id)?;
        if !node.is_sink() {
            return Err(DagradError::InvalidGraph(format!(
                "node '{}' is a {} node, not a loss",
                node.name,
                node.kind_name()
            )));
        }
        self.value(id)?.item()
    }

    /// Gradient accumulated by a leaf during the last backward pass.
    pub fn leaf_gradient(&self, id: NodeId) -> Result<&Tensor, DagradError> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Input(leaf) => leaf.grad.as_ref().ok_or_else(|| DagradError::MissingValue {
                node: node.name.clone(),
                reason: "no gradient: the leaf was not part of a completed backward pass"
                    .to_string(),
            }),
            _ => Err(DagradError::InvalidGraph(format!(
                "{} node '{}' has no self-gradient; only leaves do",
                node.kind_name(),
                node.name
            ))),
        }
    }

    /// Gradient a non-leaf node attributed to its `slot`-th inbound node.
    pub fn inbound_gradient(&self, id: NodeId, slot: usize) -> Result<&Tensor, DagradError> {
        let node = self.node(id)?;
        let grad = node.inbound_grads.get(slot).ok_or_else(|| {
            DagradError::InvalidGraph(format!(
                "node '{}' has {} inbound slots, asked for slot {}",
                node.name,
                node.inbound.len(),
                slot
            ))
        })?;
        grad.as_ref().ok_or_else(|| DagradError::MissingValue {
            node: node.name.clone(),
            reason: format!("gradient for inbound slot {} not computed yet", slot),
        })
    }

    /// Trainable leaves, in creation order.
    pub fn trainables(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.is_trainable())
            .map(|n| n.id)
            .collect()
    }

    /// Marks every node `id` depends on (including itself).
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<bool>, DagradError> {
        self.node(id)?;
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if seen[current.0] {
                continue;
            }
            seen[current.0] = true;
            stack.extend(self.nodes[current.0].inbound.iter().copied());
        }
        Ok(seen)
    }

    /// Drops the leaf gradients and inbound slots of every node in `order`.
    pub(crate) fn clear_gradients(&mut self, order: &[NodeId]) -> Result<(), DagradError> {
        for &id in order {
            let node = self.node_mut(id)?;
            if let NodeKind::Input(leaf) = &mut node.kind {
                leaf.grad = None;
            }
            for slot in &mut node.inbound_grads {
                *slot = None;
            }
        }
        Ok(())
    }

    /// Replaces a trainable leaf's value after an optimizer step.
    pub(crate) fn commit_leaf_value(&mut self, id: NodeId, value: Tensor) -> Result<(), DagradError> {
        self.assign(id, value)
    }

    // --- Node rules ---

    /// Computes the value of node `id` from its inbound values.
    ///
    /// Leaves are not computed; they only have to hold a value already.
    pub(crate) fn evaluate(&mut self, id: NodeId) -> Result<(), DagradError> {
        let idx = id.0;
        if idx >= self.nodes.len() {
            return Err(DagradError::InvalidGraph(format!("unknown node {}", id)));
        }
        let (before, rest) = self.nodes.split_at_mut(idx);
        let node = &mut rest[0];

        match &mut node.kind {
            NodeKind::Input(_) => {
                if node.value.is_none() {
                    return Err(DagradError::MissingValue {
                        node: node.name.clone(),
                        reason: "leaf visited before a value was fed".to_string(),
                    });
                }
            }
            NodeKind::Operation(op) => {
                let inputs = gather_inputs(before, &node.inbound, &node.name)?;
                let shapes: Vec<&[usize]> = inputs.iter().map(|t| t.shape()).collect();
                op.output_shape(&shapes).map_err(|e| e.in_node(&node.name))?;
                let value = op.forward(&inputs).map_err(|e| e.in_node(&node.name))?;
                ensure_finite(&value, &node.name, "forward value")?;
                node.value = Some(value);
            }
            NodeKind::Loss(loss) => {
                let inputs = gather_inputs(before, &node.inbound, &node.name)?;
                let value = loss.forward(&inputs).map_err(|e| e.in_node(&node.name))?;
                if !value.is_finite() {
                    return Err(DagradError::NumericError {
                        node: node.name.clone(),
                        detail: format!("loss evaluated to {}", value),
                    });
                }
                node.value = Some(Tensor::scalar(value));
            }
        }
        Ok(())
    }

    /// Recomputes the gradient slots of node `id` from its consumers' slots.
    ///
    /// Every consumer must already have been processed in this backward pass.
    pub(crate) fn accumulate_gradient(&mut self, id: NodeId) -> Result<(), DagradError> {
        let idx = id.0;
        if idx >= self.nodes.len() {
            return Err(DagradError::InvalidGraph(format!("unknown node {}", id)));
        }
        let (before, rest) = self.nodes.split_at_mut(idx);
        let (node, after) = match rest.split_first_mut() {
            Some(parts) => parts,
            None => return Err(DagradError::InternalError(format!("node {} vanished", id))),
        };

        match &mut node.kind {
            NodeKind::Input(leaf) => {
                let value = node.value.as_ref().ok_or_else(|| DagradError::MissingValue {
                    node: node.name.clone(),
                    reason: "leaf has no value during backward".to_string(),
                })?;
                let mut grad = zeros_like(value);
                for upstream in upstream_gradients(after, idx + 1, id, &node.outbound)? {
                    grad.add_(upstream).map_err(|e| e.in_node(&node.name))?;
                }
                ensure_finite(&grad, &node.name, "gradient")?;
                leaf.grad = Some(grad);
            }
            NodeKind::Operation(op) => {
                let inputs = gather_inputs(before, &node.inbound, &node.name)?;
                let output = node.value.as_ref().ok_or_else(|| DagradError::MissingValue {
                    node: node.name.clone(),
                    reason: "backward reached a node that was never evaluated".to_string(),
                })?;
                let mut grads: Vec<Tensor> = inputs.iter().map(|t| zeros_like(t)).collect();
                for upstream in upstream_gradients(after, idx + 1, id, &node.outbound)? {
                    let contribution = op
                        .backward(&inputs, output, upstream)
                        .map_err(|e| e.in_node(&node.name))?;
                    if contribution.len() != grads.len() {
                        return Err(DagradError::InternalError(format!(
                            "{} backward returned {} gradients for {} inputs (node '{}')",
                            op.name(),
                            contribution.len(),
                            grads.len(),
                            node.name
                        )));
                    }
                    for (acc, c) in grads.iter_mut().zip(&contribution) {
                        acc.add_(c).map_err(|e| e.in_node(&node.name))?;
                    }
                }
                for grad in &grads {
                    ensure_finite(grad, &node.name, "gradient")?;
                }
                node.inbound_grads = grads.into_iter().map(Some).collect();
            }
            NodeKind::Loss(loss) => {
                let inputs = gather_inputs(before, &node.inbound, &node.name)?;
                let grads = loss
                    .seed_gradients(&inputs)
                    .map_err(|e| e.in_node(&node.name))?;
                if grads.len() != inputs.len()
                    || grads.iter().zip(&inputs).any(|(g, x)| g.shape() != x.shape())
                {
                    return Err(DagradError::InternalError(format!(
                        "{} seeded gradients that do not match its inputs (node '{}')",
                        loss.name(),
                        node.name
                    )));
                }
                for grad in &grads {
                    ensure_finite(grad, &node.name, "gradient")?;
                }
                node.inbound_grads = grads.into_iter().map(Some).collect();
            }
        }
        Ok(())
    }
}

/// Collects the values of `inbound`, all of which live in `before`.
fn gather_inputs<'a>(
    before: &'a [Node],
    inbound: &[NodeId],
    name: &str,
) -> Result<Vec<&'a Tensor>, DagradError> {
    inbound
        .iter()
        .map(|id| {
            let src = before.get(id.0).ok_or_else(|| {
                DagradError::InternalError(format!(
                    "inbound node {} of '{}' is not an earlier node",
                    id, name
                ))
            })?;
            src.value.as_ref().ok_or_else(|| DagradError::MissingValue {
                node: name.to_string(),
                reason: format!("inbound node '{}' has not been evaluated", src.name),
            })
        })
        .collect()
}

/// Gradients that each consumer attributed to node `me`, one per consumer edge.
///
/// `after` holds the nodes from index `offset` on.
fn upstream_gradients<'a>(
    after: &'a [Node],
    offset: usize,
    me: NodeId,
    outbound: &[NodeId],
) -> Result<Vec<&'a Tensor>, DagradError> {
    let mut upstream = Vec::new();
    for consumer_id in outbound {
        let consumer = consumer_id
            .0
            .checked_sub(offset)
            .and_then(|i| after.get(i))
            .ok_or_else(|| {
                DagradError::InternalError(format!(
                    "consumer {} of node {} is not a later node",
                    consumer_id, me
                ))
            })?;
        for (slot, src) in consumer.inbound.iter().enumerate() {
            if *src != me {
                continue;
            }
            let grad = consumer.inbound_grads[slot].as_ref().ok_or_else(|| {
                DagradError::MissingValue {
                    node: consumer.name.clone(),
                    reason: format!(
                        "gradient for inbound slot {} missing: consumer not processed before its input",
                        slot
                    ),
                }
            })?;
            upstream.push(grad);
        }
    }
    Ok(upstream)
}

fn ensure_finite(tensor: &Tensor, node: &str, what: &str) -> Result<(), DagradError> {
    if tensor.is_finite() {
        Ok(())
    } else {
        Err(DagradError::NumericError {
            node: node.to_string(),
            detail: format!("{} contains NaN or infinite values", what),
        })
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
