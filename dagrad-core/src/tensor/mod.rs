//! Dense row-major `f64` tensors of rank 0, 1 or 2.
//!
//! The engine only ever needs scalars (loss values), vectors (biases, targets)
//! and matrices (features, weights), so `Tensor` is a flat buffer plus a shape
//! and nothing else. There are no views, strides or devices.

pub mod create;

pub use create::{full, randn, zeros, zeros_like};

use crate::error::DagradError;
use std::fmt;

/// A dense tensor holding `f64` values in row-major order.
#[derive(Clone, PartialEq)]
pub struct Tensor {
    data: Vec<f64>,
    shape: Vec<usize>,
}

impl Tensor {
    /// Creates a tensor from a flat buffer and a shape.
    ///
    /// # Errors
    /// `TensorCreationError` if `data.len()` is not the product of `shape`,
    /// `InvalidGraph` if the rank is above 2.
    pub fn new(data: Vec<f64>, shape: Vec<usize>) -> Result<Self, DagradError> {
        if shape.len() > 2 {
            return Err(DagradError::InvalidGraph(format!(
                "tensors of rank {} are not supported (shape {:?})",
                shape.len(),
                shape
            )));
        }
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(DagradError::TensorCreationError {
                data_len: data.len(),
                shape,
            });
        }
        Ok(Tensor { data, shape })
    }

    /// Creates a rank-0 tensor.
    pub fn scalar(value: f64) -> Self {
        Tensor {
            data: vec![value],
            shape: Vec::new(),
        }
    }

    /// Creates a rank-1 tensor from a vector.
    pub fn from_vec(data: Vec<f64>) -> Self {
        let len = data.len();
        Tensor {
            data,
            shape: vec![len],
        }
    }

    /// Creates a matrix from equally sized rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, DagradError> {
        let cols = rows.first().map_or(0, |r| r.len());
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(DagradError::ShapeMismatch {
                expected: format!("rows of length {}", cols),
                actual: format!("a row of length {}", bad.len()),
                operation: "Tensor::from_rows".to_string(),
            });
        }
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Tensor::new(data, vec![rows.len(), cols])
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Returns `(rows, cols)` of a rank-2 tensor.
    pub fn dims2(&self) -> Result<(usize, usize), DagradError> {
        match self.shape.as_slice() {
            [rows, cols] => Ok((*rows, *cols)),
            other => Err(DagradError::ShapeMismatch {
                expected: "a rank-2 tensor".to_string(),
                actual: format!("{:?}", other),
                operation: "dims2".to_string(),
            }),
        }
    }

    /// Returns the single value of a one-element tensor.
    pub fn item(&self) -> Result<f64, DagradError> {
        match self.data.as_slice() {
            [value] => Ok(*value),
            _ => Err(DagradError::ShapeMismatch {
                expected: "a single element".to_string(),
                actual: format!("{:?}", self.shape),
                operation: "item".to_string(),
            }),
        }
    }

    /// Returns the element at `(row, col)` of a matrix.
    pub fn get2(&self, row: usize, col: usize) -> Result<f64, DagradError> {
        let (rows, cols) = self.dims2()?;
        if row >= rows || col >= cols {
            return Err(DagradError::ShapeMismatch {
                expected: format!("index within {:?}", self.shape),
                actual: format!("[{}, {}]", row, col),
                operation: "get2".to_string(),
            });
        }
        Ok(self.data[row * cols + col])
    }

    /// Returns a tensor with the same data and a new shape of equal size.
    pub fn reshape(&self, shape: Vec<usize>) -> Result<Tensor, DagradError> {
        let numel: usize = shape.iter().product();
        if numel != self.numel() {
            return Err(DagradError::ShapeMismatch {
                expected: format!("{} elements", self.numel()),
                actual: format!("{:?} ({} elements)", shape, numel),
                operation: "reshape".to_string(),
            });
        }
        Tensor::new(self.data.clone(), shape)
    }

    /// Gathers whole rows (first axis) in the given order.
    ///
    /// Rank-1 tensors are treated as a column: each index selects one element.
    pub fn select_rows(&self, indices: &[usize]) -> Result<Tensor, DagradError> {
        let (rows, row_len) = match self.shape.as_slice() {
            [n] => (*n, 1),
            [n, cols] => (*n, *cols),
            _ => {
                return Err(DagradError::ShapeMismatch {
                    expected: "a rank-1 or rank-2 tensor".to_string(),
                    actual: format!("{:?}", self.shape),
                    operation: "select_rows".to_string(),
                })
            }
        };
        let mut data = Vec::with_capacity(indices.len() * row_len);
        for &idx in indices {
            if idx >= rows {
                return Err(DagradError::ShapeMismatch {
                    expected: format!("row index below {}", rows),
                    actual: format!("{}", idx),
                    operation: "select_rows".to_string(),
                });
            }
            data.extend_from_slice(&self.data[idx * row_len..(idx + 1) * row_len]);
        }
        let mut shape = self.shape.clone();
        shape[0] = indices.len();
        Tensor::new(data, shape)
    }

    /// Applies `f` to every element.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Tensor {
        Tensor {
            data: self.data.iter().map(|&x| f(x)).collect(),
            shape: self.shape.clone(),
        }
    }

    /// True when no element is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// `self += other`, shapes must be identical.
    pub fn add_(&mut self, other: &Tensor) -> Result<(), DagradError> {
        self.check_same_shape(other, "add_")?;
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += *b;
        }
        Ok(())
    }

    /// `self -= alpha * other`, shapes must be identical.
    pub fn sub_scaled_(&mut self, alpha: f64, other: &Tensor) -> Result<(), DagradError> {
        self.check_same_shape(other, "sub_scaled_")?;
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a -= alpha * *b;
        }
        Ok(())
    }

    /// Elementwise `self - other`, shapes must be identical.
    pub fn sub(&self, other: &Tensor) -> Result<Tensor, DagradError> {
        self.check_same_shape(other, "sub")?;
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a - b)
            .collect();
        Tensor::new(data, self.shape.clone())
    }

    fn check_same_shape(&self, other: &Tensor, operation: &str) -> Result<(), DagradError> {
        if self.shape != other.shape {
            return Err(DagradError::ShapeMismatch {
                expected: format!("{:?}", self.shape),
                actual: format!("{:?}", other.shape),
                operation: operation.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 8;
        let mut dbg = f.debug_struct("Tensor");
        dbg.field("shape", &self.shape);
        if self.data.len() <= PREVIEW {
            dbg.field("data", &self.data);
        } else {
            dbg.field("data_head", &&self.data[..PREVIEW]);
        }
        dbg.finish()
    }
}
