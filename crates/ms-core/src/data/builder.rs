//! Column-by-column construction of a [`DataFrame`]

use super::{DataFrame, Result, Series};

/// Adds named columns one at a time; every column must have the length of
/// the first and names must be unique.
///
/// ```ignore
/// let df = DataFrameBuilder::new()
///     .with_column("x", Series::float(vec![1.0, 2.0]))?
///     .with_column("g", Series::categorical(&["a", "b"]))?
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct DataFrameBuilder {
    frame: DataFrame,
}

impl DataFrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column<S: Into<String>>(mut self, name: S, series: Series) -> Result<Self> {
        self.frame.push_column(name.into(), series)?;
        Ok(self)
    }

    pub fn build(self) -> Result<DataFrame> {
        Ok(self.frame)
    }
}
