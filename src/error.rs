use thiserror::Error;

use crate::parameters::ParameterError;

/// Error types for the holofit library.
#[derive(Error, Debug)]
pub enum HoloFitError {
    /// A name required to build a scatterer was absent from both the
    /// supplied values and the fixed values.
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    /// Error raised while registering or tying parameters.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// A factory received an argument of the wrong kind.
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    /// Error indicating a mismatch in array dimensions.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Error during theory or factory evaluation.
    #[error("Function evaluation error: {0}")]
    FunctionEvaluation(String),

    /// Error reported by a minimizer.
    #[error("Optimization failed: {0}")]
    OptimizationFailure(String),

    /// Invalid input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error for cases that don't fit the other categories.
    #[error("Error: {0}")]
    Other(String),
}

impl From<crate::parameters::BoundsError> for HoloFitError {
    fn from(err: crate::parameters::BoundsError) -> Self {
        HoloFitError::Parameter(ParameterError::from(err))
    }
}

/// Result type alias for holofit operations.
pub type Result<T> = std::result::Result<T, HoloFitError>;

impl From<String> for HoloFitError {
    fn from(s: String) -> Self {
        HoloFitError::Other(s)
    }
}

impl From<&str> for HoloFitError {
    fn from(s: &str) -> Self {
        HoloFitError::Other(s.to_string())
    }
}
