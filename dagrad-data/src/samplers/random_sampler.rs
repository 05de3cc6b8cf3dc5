use super::traits::Sampler;
use dagrad_core::DagradError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// A sampler that randomly samples indices from a dataset.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    replacement: bool,
    rng: StdRng,
}

impl RandomSampler {
    /// Creates a new `RandomSampler`.
    ///
    /// # Arguments
    ///
    /// * `replacement`: If `true`, an index can be selected multiple times within a batch.
    /// * `seed`: Seed of the sampler's generator.
    pub fn new(replacement: bool, seed: u64) -> Self {
        RandomSampler {
            replacement,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Bootstrap-style sampler: every draw is independent.
    pub fn with_replacement(seed: u64) -> Self {
        RandomSampler::new(true, seed)
    }

    pub fn without_replacement(seed: u64) -> Self {
        RandomSampler::new(false, seed)
    }

    pub fn replacement(&self) -> bool {
        self.replacement
    }
}

impl Sampler for RandomSampler {
    fn sample_indices(
        &mut self,
        dataset_len: usize,
        count: usize,
    ) -> Result<Vec<usize>, DagradError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        if dataset_len == 0 {
            return Err(DagradError::InvalidConfig(
                "RandomSampler: cannot sample from an empty dataset".to_string(),
            ));
        }

        if self.replacement {
            Ok((0..count)
                .map(|_| self.rng.gen_range(0..dataset_len))
                .collect())
        } else {
            if count > dataset_len {
                return Err(DagradError::InvalidConfig(format!(
                    "RandomSampler: {} samples requested from {} rows without replacement",
                    count, dataset_len
                )));
            }
            let mut indices: Vec<usize> = (0..dataset_len).collect();
            indices.shuffle(&mut self.rng);
            indices.truncate(count);
            Ok(indices)
        }
    }
}

#[cfg(test)]
#[path = "random_sampler_test.rs"]
mod tests;
