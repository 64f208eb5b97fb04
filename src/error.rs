use thiserror::Error;

/// Structural failures. Out-of-range tuning values are never reported here,
/// they only distort the numeric result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// A filter was configured with a structurally impossible value.
    #[error("invalid configuration: {context}")]
    Configuration { context: String },

    /// Model matrices handed to a Kalman filter are not mutually conformable.
    #[error("{context}: expected dimension {expected}, got {actual}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Operands of a matrix operation are not conformable.
    #[error("shape error in {operation}: {left:?} vs {right:?}")]
    Shape {
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// The innovation covariance could not be inverted.
    #[error("singular matrix: {context}")]
    SingularMatrix { context: String },
}

pub type Result<T> = std::result::Result<T, FilterError>;
