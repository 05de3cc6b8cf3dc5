pub mod matmul;

pub use matmul::{matmul_op, transpose_op};
