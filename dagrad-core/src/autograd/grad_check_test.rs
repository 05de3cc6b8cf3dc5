use super::*;
use crate::autograd::{topological_sort, Feed, Operation};
use crate::test_utils::{build_two_layer, create_test_matrix, create_test_vector};

const EPSILON: f64 = 1e-5;
const TOLERANCE: f64 = 1e-4;

#[test]
fn test_linear_mse_gradients() -> Result<(), GradCheckError> {
    let mut graph = Graph::new();
    let x = graph.add_input("X");
    let y = graph.add_input("y");
    let w = graph.add_trainable("W", create_test_matrix(3, 1, 0.4));
    let b = graph.add_trainable("b", Tensor::from_vec(vec![0.25]));
    let l = graph.linear("l", x, w, b)?;
    let cost = graph.mse("cost", y, l)?;
    let order = topological_sort(
        &mut graph,
        Feed::new()
            .with(x, create_test_matrix(4, 3, 1.1))
            .with(y, create_test_vector(4, 0.7))
            .with(w, create_test_matrix(3, 1, 0.4))
            .with(b, Tensor::from_vec(vec![0.25])),
    )?;
    check_gradients(&mut graph, &order, cost, &[x, y, w, b], EPSILON, TOLERANCE)
}

#[test]
fn test_linear_with_row_bias_gradients() -> Result<(), GradCheckError> {
    let mut graph = Graph::new();
    let x = graph.add_input("X");
    let y = graph.add_input("y");
    let w = graph.add_trainable("W", create_test_matrix(2, 1, 0.0));
    let b = graph.add_trainable("b", Tensor::new(vec![-0.3], vec![1, 1])?);
    let l = graph.linear("l", x, w, b)?;
    let cost = graph.mse("cost", y, l)?;
    let order = topological_sort(
        &mut graph,
        Feed::new()
            .with(x, create_test_matrix(5, 2, 0.3))
            .with(y, create_test_matrix(5, 1, 2.0))
            .with(w, create_test_matrix(2, 1, 0.0))
            .with(b, Tensor::new(vec![-0.3], vec![1, 1])?),
    )?;
    check_gradients(&mut graph, &order, cost, &[w, b], EPSILON, TOLERANCE)
}

#[test]
fn test_sigmoid_mse_gradients() -> Result<(), GradCheckError> {
    let mut graph = Graph::new();
    let x = graph.add_input("X");
    let y = graph.add_input("y");
    let s = graph.sigmoid("s", x)?;
    let cost = graph.mse("cost", y, s)?;
    let order = topological_sort(
        &mut graph,
        Feed::new()
            .with(x, create_test_matrix(6, 1, 0.0).map(|v| 3.0 * v))
            .with(y, create_test_vector(6, 0.1)),
    )?;
    check_gradients(&mut graph, &order, cost, &[x, y], EPSILON, TOLERANCE)
}

#[test]
fn test_two_layer_network_gradients() -> Result<(), GradCheckError> {
    let mut net = build_two_layer(7, 3, 4);
    let leaves = [net.x, net.y, net.w1, net.b1, net.w2, net.b2];
    check_gradients(&mut net.graph, &net.order, net.cost, &leaves, EPSILON, TOLERANCE)
}

#[test]
fn test_values_are_restored_after_check() -> Result<(), GradCheckError> {
    let mut net = build_two_layer(4, 2, 3);
    let before = net.graph.value(net.w1)?.clone();
    forward_pass(&mut net.graph, &net.order)?;
    let loss_before = net.graph.loss_value(net.cost)?;

    check_gradients(&mut net.graph, &net.order, net.cost, &[net.w1], EPSILON, TOLERANCE)?;

    assert_eq!(net.graph.value(net.w1)?, &before);
    assert_eq!(net.graph.loss_value(net.cost)?, loss_before);
    Ok(())
}

/// Doubles its input but reports the gradient of the identity.
#[derive(Debug)]
struct BrokenDouble;

impl Operation for BrokenDouble {
    fn name(&self) -> &'static str {
        "BrokenDouble"
    }

    fn arity(&self) -> usize {
        1
    }

    fn output_shape(&self, inputs: &[&[usize]]) -> Result<Vec<usize>, DagradError> {
        Ok(inputs[0].to_vec())
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Tensor, DagradError> {
        Ok(inputs[0].map(|v| 2.0 * v))
    }

    fn backward(
        &self,
        _inputs: &[&Tensor],
        _output: &Tensor,
        upstream: &Tensor,
    ) -> Result<Vec<Tensor>, DagradError> {
        Ok(vec![upstream.clone()])
    }
}

#[test]
fn test_wrong_backward_is_reported() -> Result<(), DagradError> {
    let mut graph = Graph::new();
    let x = graph.add_input("X");
    let y = graph.add_input("y");
    let d = graph.add_operation("d", Box::new(BrokenDouble), &[x])?;
    let cost = graph.mse("cost", y, d)?;
    let order = topological_sort(
        &mut graph,
        Feed::new()
            .with(x, create_test_vector(3, 2.0))
            .with(y, create_test_vector(3, 0.0)),
    )?;

    match check_gradients(&mut graph, &order, cost, &[x], EPSILON, TOLERANCE) {
        Err(GradCheckError::GradientMismatch {
            leaf,
            element_index,
            analytical_grad,
            numerical_grad,
            ..
        }) => {
            assert_eq!(leaf, "X");
            assert_eq!(element_index, 0);
            assert!((numerical_grad - 2.0 * analytical_grad).abs() < 1e-6);
        }
        other => panic!("expected a gradient mismatch, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_graph_errors_are_wrapped() {
    let mut graph = Graph::new();
    let x = graph.add_input("X");
    let y = graph.add_input("y");
    let cost = graph.mse("cost", y, x).expect("mse");
    // Nothing fed: the order is empty of values and evaluation fails.
    let order = vec![x, y, cost];
    let result = check_gradients(&mut graph, &order, cost, &[x], EPSILON, TOLERANCE);
    assert!(matches!(
        result,
        Err(GradCheckError::GraphError(DagradError::MissingValue { .. }))
    ));
}
