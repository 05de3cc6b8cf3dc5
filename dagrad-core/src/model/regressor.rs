use crate::autograd::{Feed, Graph};
use crate::error::DagradError;
use crate::model::Network;
use crate::tensor::{randn, zeros, Tensor};
use rand::Rng;

/// Builds `X -> Linear(W1, b1) -> Sigmoid -> Linear(W2, b2) -> MSE(y, .)`.
///
/// Weights are drawn from `N(0, 1)` with `rng`, biases start at zero. `x` and
/// `y` are the first batch (or the full dataset): they give the feature
/// count and are fed to the feature and target leaves.
///
/// # Errors
/// * `InvalidConfig` if `hidden_width` is zero.
/// * `ShapeMismatch` if `x` is not a non-empty `[N, F]` matrix or `y` does
///   not hold `N` targets as `[N]` or `[N, 1]`.
pub fn two_layer_regressor<R: Rng + ?Sized>(
    x: &Tensor,
    y: &Tensor,
    hidden_width: usize,
    rng: &mut R,
) -> Result<Network, DagradError> {
    if hidden_width == 0 {
        return Err(DagradError::InvalidConfig(
            "hidden width must be at least 1".to_string(),
        ));
    }
    let (rows, features) = x.dims2()?;
    if rows == 0 || features == 0 {
        return Err(DagradError::ShapeMismatch {
            expected: "[N, F] with N, F > 0".to_string(),
            actual: format!("{:?}", x.shape()),
            operation: "two_layer_regressor features".to_string(),
        });
    }

    let w1_init = randn(&[features, hidden_width], rng)?;
    let b1_init = zeros(&[hidden_width])?;
    let w2_init = randn(&[hidden_width, 1], rng)?;
    let b2_init = zeros(&[1])?;

    let mut graph = Graph::new();
    let x_id = graph.add_input("X");
    let y_id = graph.add_input("y");
    let w1 = graph.add_trainable("W1", w1_init.clone());
    let b1 = graph.add_trainable("b1", b1_init.clone());
    let w2 = graph.add_trainable("W2", w2_init.clone());
    let b2 = graph.add_trainable("b2", b2_init.clone());
    graph.assign(x_id, x.clone())?;
    graph.assign(y_id, y.clone())?;

    // Shapes are all known here, so mistakes surface at construction.
    let hidden = graph.linear("hidden", x_id, w1, b1)?;
    let activation = graph.sigmoid("activation", hidden)?;
    let output = graph.linear("output", activation, w2, b2)?;
    let cost = graph.mse("cost", y_id, output)?;

    let feed = Feed::new()
        .with(x_id, x.clone())
        .with(y_id, y.clone())
        .with(w1, w1_init)
        .with(b1, b1_init)
        .with(w2, w2_init)
        .with(b2, b2_init);
    Network::new(graph, feed, x_id, y_id, output, cost)
}

#[cfg(test)]
#[path = "regressor_test.rs"]
mod tests;
