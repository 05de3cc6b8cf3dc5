use super::*;
use crate::test_utils::{build_two_layer, create_test_matrix, create_test_vector};

/// Every node appears after all of its reachable inbound nodes.
fn assert_linear_extension(graph: &Graph, order: &[NodeId]) {
    let position = |id: NodeId| order.iter().position(|o| *o == id);
    for &id in order {
        let pos = position(id).expect("node in order");
        for &src in graph.node(id).expect("node").inbound() {
            let src_pos = position(src).expect("inbound node must be ordered");
            assert!(src_pos < pos, "{} ordered before its inbound {}", id, src);
        }
    }
}

#[test]
fn test_two_layer_order_is_valid_and_complete() {
    let net = build_two_layer(5, 3, 4);
    assert_eq!(net.order.len(), net.graph.len());
    assert_linear_extension(&net.graph, &net.order);
    assert_eq!(*net.order.last().expect("non-empty"), net.cost);
}

#[test]
fn test_order_is_deterministic() -> Result<(), DagradError> {
    let first = build_two_layer(5, 3, 4);
    let second = build_two_layer(5, 3, 4);
    assert_eq!(first.order, second.order);

    // Re-sorting the same graph yields the same order too.
    let mut net = first;
    let mut feed = Feed::new();
    for node in net.graph.nodes().filter(|n| n.is_leaf()) {
        feed.insert(node.id(), node.value().cloned().expect("leaves were fed"));
    }
    let again = topological_sort(&mut net.graph, feed)?;
    assert_eq!(again, net.order);
    Ok(())
}

#[test]
fn test_ties_follow_feed_order() -> Result<(), DagradError> {
    let mut graph = Graph::new();
    let a = graph.add_input("a");
    let b = graph.add_input("b");
    let sa = graph.sigmoid("sa", a)?;
    let sb = graph.sigmoid("sb", b)?;

    let order = topological_sort(
        &mut graph,
        Feed::new()
            .with(b, Tensor::from_vec(vec![1.0]))
            .with(a, Tensor::from_vec(vec![2.0])),
    )?;
    assert_eq!(order, vec![b, a, sb, sa]);
    Ok(())
}

#[test]
fn test_feed_assigns_leaf_values() -> Result<(), DagradError> {
    let mut graph = Graph::new();
    let x = graph.add_input("X");
    let s = graph.sigmoid("s", x)?;
    let value = create_test_matrix(2, 2, 0.0);
    let order = topological_sort(&mut graph, Feed::new().with(x, value.clone()))?;
    assert_eq!(order, vec![x, s]);
    assert_eq!(graph.value(x)?, &value);
    Ok(())
}

#[test]
fn test_bad_trainable_shape_assigns_nothing() -> Result<(), DagradError> {
    let mut graph = Graph::new();
    let x = graph.add_input("X");
    let w = graph.add_trainable("W", create_test_matrix(3, 1, 0.0));
    let b = graph.add_trainable("b", Tensor::from_vec(vec![0.0]));
    let _l = graph.linear("l", x, w, b)?;
    let result = topological_sort(
        &mut graph,
        Feed::new()
            .with(x, create_test_matrix(2, 3, 0.0))
            .with(b, Tensor::from_vec(vec![5.0]))
            .with(w, create_test_matrix(2, 1, 0.0)),
    );
    assert!(matches!(result, Err(DagradError::ShapeMismatch { .. })));
    assert!(graph.value(x).is_err());
    assert_eq!(graph.value(b)?.data(), &[0.0]);
    assert_eq!(graph.value(w)?.shape(), &[3, 1]);
    Ok(())
}

#[test]
fn test_only_reachable_nodes_are_ordered() -> Result<(), DagradError> {
    let mut graph = Graph::new();
    let a = graph.add_input("a");
    let b = graph.add_input("b");
    let sa = graph.sigmoid("sa", a)?;
    let _sb = graph.sigmoid("sb", b)?;
    let order = topological_sort(&mut graph, Feed::new().with(a, create_test_vector(3, 0.0)))?;
    assert_eq!(order, vec![a, sa]);
    Ok(())
}

#[test]
fn test_feeding_a_non_leaf_is_rejected() -> Result<(), DagradError> {
    let mut graph = Graph::new();
    let x = graph.add_input("X");
    let s = graph.sigmoid("s", x)?;
    let result = topological_sort(&mut graph, Feed::new().with(s, create_test_vector(1, 0.0)));
    assert!(matches!(result, Err(DagradError::InvalidGraph(_))));
    Ok(())
}

#[test]
fn test_cycle_is_detected() -> Result<(), DagradError> {
    let mut graph = Graph::new();
    let x = graph.add_input("X");
    let s1 = graph.sigmoid("s1", x)?;
    let s2 = graph.sigmoid("s2", s1)?;
    graph.connect_unchecked(s2, s1);

    let result = topological_sort(&mut graph, Feed::new().with(x, create_test_vector(2, 0.0)));
    assert_eq!(
        result,
        Err(DagradError::CycleDetected {
            ordered: 1,
            reachable: 3
        })
    );
    Ok(())
}

#[test]
fn test_feed_insert_replaces_in_place() {
    let mut graph = Graph::new();
    let a = graph.add_input("a");
    let b = graph.add_input("b");
    let mut feed = Feed::new();
    feed.insert(a, Tensor::scalar(1.0));
    feed.insert(b, Tensor::scalar(2.0));
    feed.insert(a, Tensor::scalar(3.0));
    assert_eq!(feed.len(), 2);
    assert_eq!(feed.leaves().collect::<Vec<_>>(), vec![a, b]);
}
