use thiserror::Error;

/// Errors returned by clustering assignment operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignError {
    #[error("metric must be one of \"euclidean\" or \"minRMSD\", got {0:?}")]
    InvalidMetric(String),

    #[error("out of memory: could not allocate {bytes} bytes of scratch space")]
    OutOfMemory { bytes: usize },

    #[error("frame dimension must be larger than zero")]
    EmptyDimension,

    #[error("centers must contain at least one element")]
    NoCenters,

    #[error("too many centers for 32-bit labels: {got}")]
    TooManyCenters { got: usize },

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("buffer length mismatch: expected {expected} elements, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("row {row} has {got} elements, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("label buffer length differs from number of frames: expected {expected}, got {got}")]
    LabelLength { expected: usize, got: usize },

    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AssignError>;
