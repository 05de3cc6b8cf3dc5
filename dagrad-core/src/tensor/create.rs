use super::Tensor;
use crate::error::DagradError;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Creates a tensor filled with zeros.
pub fn zeros(shape: &[usize]) -> Result<Tensor, DagradError> {
    full(shape, 0.0)
}

/// Creates a tensor of zeros with the shape of `other`.
pub fn zeros_like(other: &Tensor) -> Tensor {
    other.map(|_| 0.0)
}

/// Creates a tensor where every element is `value`.
pub fn full(shape: &[usize], value: f64) -> Result<Tensor, DagradError> {
    let numel: usize = shape.iter().product();
    Tensor::new(vec![value; numel], shape.to_vec())
}

/// Creates a tensor with elements drawn from the standard normal distribution.
///
/// The generator is explicit so weight initialization is reproducible from a seed.
pub fn randn<R: Rng + ?Sized>(shape: &[usize], rng: &mut R) -> Result<Tensor, DagradError> {
    let numel: usize = shape.iter().product();
    let data: Vec<f64> = (0..numel).map(|_| StandardNormal.sample(rng)).collect();
    Tensor::new(data, shape.to_vec())
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
