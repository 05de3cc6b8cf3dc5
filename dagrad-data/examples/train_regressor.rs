//! Trains the two-layer regressor on a synthetic dataset with minibatch SGD.
//!
//! Run with `RUST_LOG=info` to see the per-epoch losses.

use dagrad_core::{train, two_layer_regressor, LogReporter, TrainConfig};
use dagrad_data::{
    standardize, DataSource, MinibatchSampler, RandomSampler, SyntheticRegression, TensorDataset,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = TrainConfig::default();
    config.validate()?;

    let (features, targets) = SyntheticRegression::new(506, 13)
        .with_seed(config.seed)
        .load()?;
    let dataset = TensorDataset::new(standardize(&features)?, targets)?;
    let (x, y) = dataset.into_parts();

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut network = two_layer_regressor(&x, &y, config.hidden_width, &mut rng)?;
    let mut sampler = MinibatchSampler::new(RandomSampler::with_replacement(config.seed));

    info!(
        "Training on {} examples: {} epochs, batch size {}",
        x.shape()[0],
        config.epochs,
        config.batch_size
    );
    let losses = train(
        &mut network,
        &x,
        &y,
        &config,
        &mut sampler,
        &mut LogReporter,
    )?;

    if let (Some(first), Some(last)) = (losses.first(), losses.last()) {
        println!("Mean loss went from {:.3} to {:.3}", first, last);
    }
    Ok(())
}
