use dagrad_core::{BatchSampler, DagradError, Tensor};

/// Initializes `env_logger` once per test binary; `RUST_LOG` controls output.
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic `[rows, cols]` matrix with values in [-1, 1].
#[allow(dead_code)]
pub fn deterministic_matrix(rows: usize, cols: usize, seed: f64) -> Tensor {
    let data = (0..rows * cols)
        .map(|i| ((i as f64 + 1.0) * 0.577 + seed).sin())
        .collect();
    Tensor::new(data, vec![rows, cols]).expect("Test matrix creation failed")
}

/// Hands out consecutive row windows, wrapping around at the end.
#[allow(dead_code)]
pub struct CyclingBatches {
    cursor: usize,
}

#[allow(dead_code)]
impl CyclingBatches {
    pub fn new() -> Self {
        CyclingBatches { cursor: 0 }
    }
}

impl BatchSampler for CyclingBatches {
    fn sample(
        &mut self,
        features: &Tensor,
        targets: &Tensor,
        batch_size: usize,
    ) -> Result<(Tensor, Tensor), DagradError> {
        let rows = features.shape()[0];
        let indices: Vec<usize> = (0..batch_size).map(|i| (self.cursor + i) % rows).collect();
        self.cursor = (self.cursor + batch_size) % rows;
        Ok((features.select_rows(&indices)?, targets.select_rows(&indices)?))
    }
}
