//! Named columns of equal length, in insertion order

use indexmap::IndexMap;
use indexmap::map::Entry;

use super::{DataError, DataFrameBuilder, Result, Series, SeriesValue};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataFrame {
    columns: IndexMap<String, Series>,
    nrows: usize,
}

impl DataFrame {
    /// Build a frame from `(name, series)` pairs
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Series)>,
        S: Into<String>,
    {
        columns
            .into_iter()
            .try_fold(DataFrameBuilder::new(), |builder, (name, series)| {
                builder.with_column(name, series)
            })?
            .build()
    }

    pub(crate) fn push_column(&mut self, name: String, series: Series) -> Result<()> {
        if !self.columns.is_empty() && series.len() != self.nrows {
            return Err(DataError::DimensionMismatch {
                expected: format!("{} rows", self.nrows),
                actual: format!("{} rows", series.len()),
            });
        }
        match self.columns.entry(name) {
            Entry::Occupied(entry) => Err(DataError::DuplicateColumn(entry.key().clone())),
            Entry::Vacant(entry) => {
                self.nrows = series.len();
                entry.insert(series);
                Ok(())
            }
        }
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.columns.len())
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    pub fn get_column(&self, name: &str) -> Option<&Series> {
        self.columns.get(name)
    }

    /// Like [`get_column`](Self::get_column), failing with
    /// [`DataError::ColumnNotFound`]
    pub fn column(&self, name: &str) -> Result<&Series> {
        self.get_column(name)
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// New frame with copies of `names`, in the order given
    pub fn select<I, S>(&self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected = Self::default();
        for name in names {
            let name = name.as_ref();
            selected.push_column(name.to_string(), self.column(name)?.clone())?;
        }
        Ok(selected)
    }

    /// Values of row `idx`, paired with their column names
    pub fn get_row(&self, idx: usize) -> Result<Vec<(&str, SeriesValue)>> {
        if idx >= self.nrows {
            return Err(DataError::IndexOutOfBounds {
                index: idx,
                len: self.nrows,
            });
        }
        Ok(self
            .columns
            .iter()
            .filter_map(|(name, series)| series.get(idx).map(|value| (name.as_str(), value)))
            .collect())
    }
}
