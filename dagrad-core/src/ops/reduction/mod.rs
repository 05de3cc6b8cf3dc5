pub mod sum;

pub use sum::{column_sum_op, mean_op};
