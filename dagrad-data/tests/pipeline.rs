use dagrad_core::{train, two_layer_regressor, DagradError, LossHistory, TrainConfig};
use dagrad_data::{
    standardize, DataSource, MinibatchSampler, RandomSampler, SequentialSampler,
    SyntheticRegression, TensorDataset,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn load(rows: usize, features: usize, seed: u64) -> Result<TensorDataset, DagradError> {
    let (x, y) = SyntheticRegression::new(rows, features)
        .with_seed(seed)
        .load()?;
    TensorDataset::new(standardize(&x)?, y)
}

#[test]
fn test_random_minibatch_training_runs_every_epoch() -> Result<(), DagradError> {
    init_logger();
    let config = TrainConfig {
        epochs: 4,
        ..TrainConfig::default()
    };
    let dataset = load(66, 5, config.seed)?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut network = two_layer_regressor(
        dataset.features(),
        dataset.targets(),
        config.hidden_width,
        &mut rng,
    )?;
    let mut history = LossHistory::new();

    let losses = train(
        &mut network,
        dataset.features(),
        dataset.targets(),
        &config,
        &mut MinibatchSampler::new(RandomSampler::with_replacement(config.seed)),
        &mut history,
    )?;

    assert_eq!(losses.len(), 4);
    assert!(losses.iter().all(|l| l.is_finite() && *l >= 0.0));
    assert_eq!(
        history.entries().iter().map(|(e, _)| *e).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
    Ok(())
}

#[test]
fn test_full_batch_training_reduces_loss() -> Result<(), DagradError> {
    init_logger();
    let dataset = load(40, 3, 5)?;
    let config = TrainConfig {
        epochs: 50,
        batch_size: 40,
        learning_rate: 0.05,
        hidden_width: 8,
        seed: 5,
    };
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut network = two_layer_regressor(
        dataset.features(),
        dataset.targets(),
        config.hidden_width,
        &mut rng,
    )?;

    let losses = train(
        &mut network,
        dataset.features(),
        dataset.targets(),
        &config,
        &mut MinibatchSampler::new(SequentialSampler::new()),
        &mut LossHistory::new(),
    )?;

    let first = losses[0];
    let last = losses[losses.len() - 1];
    assert!(last < first, "loss went from {} to {}", first, last);
    Ok(())
}

#[test]
fn test_without_replacement_batch_too_large_for_dataset() -> Result<(), DagradError> {
    let dataset = load(10, 2, 1)?;
    let config = TrainConfig {
        batch_size: 20,
        ..TrainConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let mut network = two_layer_regressor(dataset.features(), dataset.targets(), 3, &mut rng)?;
    let result = train(
        &mut network,
        dataset.features(),
        dataset.targets(),
        &config,
        &mut MinibatchSampler::new(RandomSampler::without_replacement(1)),
        &mut LossHistory::new(),
    );
    assert!(matches!(result, Err(DagradError::InvalidConfig(_))));
    Ok(())
}
