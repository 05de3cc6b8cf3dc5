use super::traits::Sampler;
use dagrad_core::{BatchSampler, DagradError, Tensor};

/// Turns an index [`Sampler`] into the minibatch source `dagrad_core::train` expects.
#[derive(Debug, Clone)]
pub struct MinibatchSampler<S: Sampler> {
    sampler: S,
}

impl<S: Sampler> MinibatchSampler<S> {
    pub fn new(sampler: S) -> Self {
        MinibatchSampler { sampler }
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    pub fn into_inner(self) -> S {
        self.sampler
    }
}

impl<S: Sampler> BatchSampler for MinibatchSampler<S> {
    fn sample(
        &mut self,
        features: &Tensor,
        targets: &Tensor,
        batch_size: usize,
    ) -> Result<(Tensor, Tensor), DagradError> {
        let (rows, _) = features.dims2()?;
        if targets.shape().first() != Some(&rows) {
            return Err(DagradError::ShapeMismatch {
                expected: format!("{} target rows", rows),
                actual: format!("{:?}", targets.shape()),
                operation: "MinibatchSampler::sample".to_string(),
            });
        }
        let indices = self.sampler.sample_indices(rows, batch_size)?;
        Ok((features.select_rows(&indices)?, targets.select_rows(&indices)?))
    }
}

#[cfg(test)]
#[path = "minibatch_test.rs"]
mod tests;
