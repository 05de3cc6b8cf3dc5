use super::traits::Sampler;
use dagrad_core::DagradError;

/// Samples rows in order, wrapping around to the first row after the last.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSampler {
    cursor: usize,
}

impl SequentialSampler {
    /// Creates a new `SequentialSampler` starting at row 0.
    pub fn new() -> Self {
        SequentialSampler { cursor: 0 }
    }

    /// Index of the next row to be returned.
    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl Sampler for SequentialSampler {
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
                "SequentialSampler: cannot sample from an empty dataset".to_string(),
            ));
        }
        // The dataset may have shrunk since the last call.
        let start = self.cursor % dataset_len;
        let indices = (0..count).map(|i| (start + i) % dataset_len).collect();
        self.cursor = (start + count) % dataset_len;
        Ok(indices)
    }
}

#[cfg(test)]
#[path = "sequential_sampler_test.rs"]
mod tests;
