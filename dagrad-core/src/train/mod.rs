//! Minibatch training loop.

pub mod config;
pub mod reporter;
pub mod sampler;

pub use config::TrainConfig;
pub use reporter::{EpochReporter, LogReporter, LossHistory};
pub use sampler::BatchSampler;

use crate::error::DagradError;
use crate::model::Network;
use crate::optim::Sgd;
use crate::tensor::Tensor;
use log::debug;

/// Trains `network` with minibatch SGD and returns the mean loss of each epoch.
///
/// Every epoch runs `rows / batch_size` steps. A step draws a minibatch from
/// `sampler`, feeds it to the feature and target leaves, runs the forward and
/// backward passes and applies one SGD update with `config.learning_rate`.
/// After each epoch `reporter` receives the 1-based epoch number and the mean
/// of that epoch's step losses.
///
/// # Errors
/// * `InvalidConfig` for an invalid `config` or a batch larger than the dataset.
/// * `ShapeMismatch` if `features` is not a matrix.
/// * The first error of any step, which aborts training.
pub fn train<S, R>(
    network: &mut Network,
    features: &Tensor,
    targets: &Tensor,
    config: &TrainConfig,
    sampler: &mut S,
    reporter: &mut R,
) -> Result<Vec<f64>, DagradError>
where
    S: BatchSampler + ?Sized,
    R: EpochReporter + ?Sized,
{
    let (rows, _) = features.dims2()?;
    let steps = config.steps_per_epoch(rows)?;
    let mut optimizer = Sgd::new(network.trainables().to_vec(), config.learning_rate)?;
    debug!(
        "train: {} epochs x {} steps, batch size {}, lr {}",
        config.epochs, steps, config.batch_size, config.learning_rate
    );

    let mut history = Vec::with_capacity(config.epochs);
    for epoch in 1..=config.epochs {
        let mut total = 0.0;
        for step in 0..steps {
            let (x_batch, y_batch) = sampler.sample(features, targets, config.batch_size)?;
            let loss = network.train_step(&mut optimizer, x_batch, y_batch)?;
            debug!("train: epoch {} step {} loss {}", epoch, step, loss);
            total += loss;
        }
        let mean = total / steps as f64;
        reporter.report(epoch, mean);
        history.push(mean);
    }
    Ok(history)
}

#[cfg(test)]
#[path = "train_test.rs"]
mod tests;
