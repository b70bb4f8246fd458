use thiserror::Error;

/// Errors raised by the learner
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("invalid trainer configuration: {0}")]
    InvalidConfig(String),

    #[error("{field} has dimension {actual}, network expects {expected}")]
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("cannot train on an empty batch")]
    EmptyBatch,

    #[error("tensor data conversion failed: {0}")]
    TensorData(String),
}
