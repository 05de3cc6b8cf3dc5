use dagrad_core::{DagradError, Tensor};
use log::warn;

/// Per-column mean and standard deviation of a feature matrix.
///
/// The standard deviation is the population one (divided by `N`).
#[derive(Debug, Clone, PartialEq)]
pub struct Standardization {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl Standardization {
    /// Computes the column statistics of a non-empty `[N, F]` matrix.
    pub fn fit(features: &Tensor) -> Result<Self, DagradError> {
        let (rows, cols) = features.dims2()?;
        if rows == 0 || cols == 0 {
            return Err(DagradError::ShapeMismatch {
                expected: "at least one row and one column".to_string(),
                actual: format!("{:?}", features.shape()),
                operation: "Standardization::fit".to_string(),
            });
        }
        let data = features.data();
        let n = rows as f64;

        let mut mean = vec![0.0; cols];
        for row in data.chunks_exact(cols) {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut var = vec![0.0; cols];
        for row in data.chunks_exact(cols) {
            for ((s, v), m) in var.iter_mut().zip(row).zip(&mean) {
                *s += (v - m) * (v - m);
            }
        }
        let std: Vec<f64> = var.into_iter().map(|s| (s / n).sqrt()).collect();

        let constant = std.iter().filter(|&&s| s == 0.0).count();
        if constant > 0 {
            warn!(
                "Standardization: {} of {} columns are constant and will only be centered",
                constant, cols
            );
        }
        Ok(Standardization { mean, std })
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn std(&self) -> &[f64] {
        &self.std
    }

    /// Applies `(x - mean) / std` column-wise; constant columns are only centered.
    pub fn apply(&self, features: &Tensor) -> Result<Tensor, DagradError> {
        let (rows, cols) = features.dims2()?;
        if cols != self.mean.len() {
            return Err(DagradError::ShapeMismatch {
                expected: format!("{} columns", self.mean.len()),
                actual: format!("{} columns", cols),
                operation: "Standardization::apply".to_string(),
            });
        }
        let mut data = Vec::with_capacity(rows * cols);
        for row in features.data().chunks_exact(cols) {
            for ((v, m), s) in row.iter().zip(&self.mean).zip(&self.std) {
                let centered = v - m;
                data.push(if *s > 0.0 { centered / s } else { centered });
            }
        }
        Tensor::new(data, vec![rows, cols])
    }
}

/// Z-scores every column of `features` with its own statistics.
pub fn standardize(features: &Tensor) -> Result<Tensor, DagradError> {
    Standardization::fit(features)?.apply(features)
}

#[cfg(test)]
#[path = "transforms_test.rs"]
mod tests;
