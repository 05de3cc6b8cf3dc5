use crate::error::DagradError;
use crate::optim::DEFAULT_LEARNING_RATE;

/// Hyperparameters of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub hidden_width: usize,
    /// Seed for weight initialization and minibatch sampling.
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 10,
            batch_size: 11,
            learning_rate: DEFAULT_LEARNING_RATE,
            hidden_width: 10,
            seed: 42,
        }
    }
}

impl TrainConfig {
    /// Rejects settings no training run can use.
    pub fn validate(&self) -> Result<(), DagradError> {
        if self.epochs == 0 {
            return Err(DagradError::InvalidConfig("epochs must be at least 1".to_string()));
        }
        if self.batch_size == 0 {
            return Err(DagradError::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.hidden_width == 0 {
            return Err(DagradError::InvalidConfig(
                "hidden width must be at least 1".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate < 0.0 {
            return Err(DagradError::InvalidConfig(format!(
                "learning rate must be finite and non-negative, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Number of optimizer steps per epoch for a dataset of `total_examples` rows.
    pub fn steps_per_epoch(&self, total_examples: usize) -> Result<usize, DagradError> {
        self.validate()?;
        let steps = total_examples / self.batch_size;
        if steps == 0 {
            return Err(DagradError::InvalidConfig(format!(
                "batch size {} exceeds the {} available examples",
                self.batch_size, total_examples
            )));
        }
        Ok(steps)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
