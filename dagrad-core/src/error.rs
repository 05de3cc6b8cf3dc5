use thiserror::Error;

/// Custom error type for the dagrad engine.
///
/// Every variant aborts the current training step. Errors raised while a
/// node is evaluated or differentiated are annotated with the node's name
/// (its role in the network) before they reach the caller.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum DagradError {
    #[error("Shape mismatch: expected {expected}, got {actual} during operation {operation}")]
    ShapeMismatch {
        expected: String,
        actual: String,
        operation: String,
    },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Missing value for node '{node}': {reason}")]
    MissingValue { node: String, reason: String },

    #[error("Non-finite number produced by node '{node}': {detail}")]
    NumericError { node: String, detail: String },

    #[error("Cycle detected in the computation graph: ordered {ordered} of {reachable} reachable nodes")]
    CycleDetected { ordered: usize, reachable: usize },

    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DagradError {
    /// Attaches the role of the node that raised the error.
    ///
    /// Only variants produced by shape-checked kernels carry no node yet;
    /// the others already name their node and are returned unchanged.
    pub(crate) fn in_node(self, node: &str) -> Self {
        match self {
            DagradError::ShapeMismatch {
                expected,
                actual,
                operation,
            } => DagradError::ShapeMismatch {
                expected,
                actual,
                operation: format!("{} (node '{}')", operation, node),
            },
            DagradError::TensorCreationError { data_len, shape } => DagradError::ShapeMismatch {
                expected: format!("{} elements", shape.iter().product::<usize>()),
                actual: format!("{} elements", data_len),
                operation: format!("tensor creation (node '{}')", node),
            },
            other => other,
        }
    }
}
