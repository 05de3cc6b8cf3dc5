use crate::autograd::{topological_sort, Feed, Graph, NodeId};
use crate::tensor::Tensor;

/// Helper to create a deterministic `[rows, cols]` matrix with values in about [-1, 1].
pub(crate) fn create_test_matrix(rows: usize, cols: usize, seed: f64) -> Tensor {
    let data = (0..rows * cols)
        .map(|i| ((i as f64 + 1.0) * 0.731 + seed).sin())
        .collect();
    Tensor::new(data, vec![rows, cols]).expect("Failed to create test matrix")
}

/// Helper to create a deterministic vector.
pub(crate) fn create_test_vector(len: usize, seed: f64) -> Tensor {
    Tensor::from_vec((0..len).map(|i| ((i as f64 + 1.0) * 1.37 + seed).cos()).collect())
}

/// Node handles of the graph built by [`build_two_layer`].
pub(crate) struct TwoLayer {
    pub graph: Graph,
    pub order: Vec<NodeId>,
    pub x: NodeId,
    pub y: NodeId,
    pub w1: NodeId,
    pub b1: NodeId,
    pub w2: NodeId,
    pub b2: NodeId,
    pub cost: NodeId,
}

/// `X -> Linear(W1, b1) -> Sigmoid -> Linear(W2, b2) -> MSE(y, .)`, already sorted.
pub(crate) fn build_two_layer(n: usize, features: usize, hidden: usize) -> TwoLayer {
    let mut graph = Graph::new();
    let x = graph.add_input("X");
    let y = graph.add_input("y");
    let w1 = graph.add_trainable("W1", create_test_matrix(features, hidden, 0.1));
    let b1 = graph.add_trainable("b1", create_test_vector(hidden, 0.2));
    let w2 = graph.add_trainable("W2", create_test_matrix(hidden, 1, 0.3));
    let b2 = graph.add_trainable("b2", create_test_vector(1, 0.4));
    let l1 = graph.linear("l1", x, w1, b1).expect("l1");
    let s1 = graph.sigmoid("s1", l1).expect("s1");
    let l2 = graph.linear("l2", s1, w2, b2).expect("l2");
    let cost = graph.mse("cost", y, l2).expect("cost");

    let feed = Feed::new()
        .with(x, create_test_matrix(n, features, 0.5))
        .with(y, create_test_vector(n, 0.6))
        .with(w1, graph.value(w1).expect("W1").clone())
        .with(b1, graph.value(b1).expect("b1").clone())
        .with(w2, graph.value(w2).expect("W2").clone())
        .with(b2, graph.value(b2).expect("b2").clone());
    let order = topological_sort(&mut graph, feed).expect("topological sort");
    TwoLayer {
        graph,
        order,
        x,
        y,
        w1,
        b1,
        w2,
        b2,
        cost,
    }
}
