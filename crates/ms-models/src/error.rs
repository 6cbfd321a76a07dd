//! Model-related error types

use thiserror::Error;

use ms_core::data::DataError;
use ms_core::formula::FormulaError;

/// Model-related errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// Formula parsing or evaluation error
    #[error("Formula error: {0}")]
    Formula(#[from] FormulaError),

    /// Data-related error
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Numerical computation error
    #[error("Numerical error: {message} (operation: {operation})")]
    NumericalError {
        /// Error message
        message: String,
        /// Operation that failed
        operation: String,
    },

    /// Insufficient data for model fitting
    #[error("Not enough data: {n_samples} samples for {n_predictors} predictors")]
    InsufficientData {
        /// Number of samples
        n_samples: usize,
        /// Number of predictors
        n_predictors: usize,
    },

    /// Singular matrix encountered
    #[error("Singular matrix encountered in {operation}; the design may be rank deficient")]
    SingularMatrix { operation: String },

    /// Response values outside the support of the family
    #[error("Invalid response for {family} family: {message}")]
    InvalidResponse { family: String, message: String },

    /// Invalid model configuration
    #[error("Invalid model configuration: {message}")]
    InvalidConfig {
        /// Configuration error message
        message: String,
    },

    /// A quantity that cannot be computed for this model
    #[error("{quantity} is not computable for this {model} model: {reason}")]
    NotComputable {
        quantity: &'static str,
        model: String,
        reason: String,
    },

    /// An operation the model type does not support, or whose cargo
    /// feature is disabled
    #[error("{operation} is not supported by {model}")]
    Unsupported { operation: String, model: String },
}

impl ModelError {
    pub(crate) fn numerical(operation: &str, message: impl Into<String>) -> Self {
        ModelError::NumericalError {
            message: message.into(),
            operation: operation.to_string(),
        }
    }
}
