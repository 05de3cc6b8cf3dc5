use dagrad_core::{DagradError, Tensor};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, StandardNormal};

/// Anything that can hand over a feature matrix and its targets.
pub trait DataSource {
    /// Returns `(features [N, F], targets [N])`.
    fn load(&mut self) -> Result<(Tensor, Tensor), DagradError>;
}

/// Seeded regression problem with a mildly non-linear target.
///
/// Features are drawn from `N(0, 1)`. With coefficients `c ~ N(0, 1)` drawn
/// once per load, each target is
/// `sum_j c_j x_j + 0.5 sin(2 x_0) + noise`, with `noise ~ N(0, noise_std)`.
/// Every `load` with the same settings returns the same data.
#[derive(Debug, Clone)]
pub struct SyntheticRegression {
    rows: usize,
    features: usize,
    noise_std: f64,
    seed: u64,
}

impl SyntheticRegression {
    pub fn new(rows: usize, features: usize) -> Self {
        SyntheticRegression {
            rows,
            features,
            noise_std: 0.1,
            seed: 0,
        }
    }

    pub fn with_noise(mut self, noise_std: f64) -> Self {
        self.noise_std = noise_std;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl DataSource for SyntheticRegression {
    fn load(&mut self) -> Result<(Tensor, Tensor), DagradError> {
        if self.rows == 0 || self.features == 0 {
            return Err(DagradError::InvalidConfig(format!(
                "SyntheticRegression needs at least one row and one feature, got {}x{}",
                self.rows, self.features
            )));
        }
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(DagradError::InvalidConfig(format!(
                "SyntheticRegression noise std must be finite and non-negative, got {}",
                self.noise_std
            )));
        }
        let noise = Normal::new(0.0, self.noise_std).map_err(|e| {
            DagradError::InvalidConfig(format!(
                "SyntheticRegression noise std {}: {}",
                self.noise_std, e
            ))
        })?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let coefficients: Vec<f64> = (0..self.features)
            .map(|_| StandardNormal.sample(&mut rng))
            .collect();
        let x: Vec<f64> = (0..self.rows * self.features)
            .map(|_| StandardNormal.sample(&mut rng))
            .collect();
        let y: Vec<f64> = x
            .chunks_exact(self.features)
            .map(|row| {
                let linear: f64 = row.iter().zip(&coefficients).map(|(v, c)| v * c).sum();
                linear + 0.5 * (2.0 * row[0]).sin() + noise.sample(&mut rng)
            })
            .collect();

        info!(
            "SyntheticRegression: generated {} examples with {} features (seed {})",
            self.rows, self.features, self.seed
        );
        Ok((
            Tensor::new(x, vec![self.rows, self.features])?,
            Tensor::from_vec(y),
        ))
    }
}

#[cfg(test)]
#[path = "synthetic_test.rs"]
mod tests;
