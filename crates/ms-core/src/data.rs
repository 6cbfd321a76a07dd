//! Tabular data for model fitting
//!
//! A [`DataFrame`] is an ordered collection of equally long, named
//! [`Series`]. Models borrow it read-only; nothing in this workspace mutates a
//! caller's data frame.

mod builder;
mod dataframe;
mod series;

#[cfg(test)]
mod tests;

pub use builder::DataFrameBuilder;
pub use dataframe::DataFrame;
pub use series::{Series, SeriesValue};

// Type aliases for common use cases
pub type FloatArray = ndarray::Array1<f64>;
pub type IntArray = ndarray::Array1<i64>;
pub type BoolArray = ndarray::Array1<bool>;
pub type StringArray = Vec<String>;
pub type Matrix = ndarray::Array2<f64>;

/// Error types specific to data operations
#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Index out of bounds: index {index}, length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Operation requires numeric data, got {0}")]
    NonNumericData(&'static str),

    #[error("Unknown level '{level}' for categorical data with levels {levels:?}")]
    UnknownLevel { level: String, levels: Vec<String> },
}

/// Result type for data operations
pub type Result<T> = std::result::Result<T, DataError>;
