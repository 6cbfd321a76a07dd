//! Heterogeneous result tables
//!
//! Model outputs (ANOVA decompositions, intervals, augmented observations)
//! are returned as a [`Table`]: named columns over rows of [`Cell`]s. Tables
//! render as Markdown through [`fmt::Display`].

use std::fmt;

use serde::Serialize;

use crate::data::{DataError, Result, SeriesValue};

/// A single table value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Float(f64),
    Int(i64),
    Bool(bool),
    Text(String),
    /// Absent value, rendered as `NA`
    Missing,
}

impl Cell {
    /// Numeric view of the cell; `None` for text and missing cells
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => Some(*v),
            Cell::Int(v) => Some(*v as f64),
            Cell::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Cell::Text(_) | Cell::Missing => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Missing, Cell::Float)
    }
}

impl From<SeriesValue> for Cell {
    fn from(value: SeriesValue) -> Self {
        match value {
            SeriesValue::Float(v) => Cell::Float(v),
            SeriesValue::Int(v) => Cell::Int(v),
            SeriesValue::Bool(v) => Cell::Bool(v),
            SeriesValue::String(v) => Cell::Text(v),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Float(v) => write!(f, "{}", format_float(*v)),
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Bool(v) => write!(f, "{}", if *v { "TRUE" } else { "FALSE" }),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Missing => write!(f, "NA"),
        }
    }
}

/// Format a float the way R's console does for typical model output:
/// scientific notation for very large or very small magnitudes.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e6).contains(&magnitude) {
        format!("{value:.3e}")
    } else {
        let fixed = format!("{value:.4}");
        // 4 decimals, trailing zeros dropped
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        if trimmed == "-0" { "0" } else { trimmed }.to_string()
    }
}

/// Column-named rows of cells
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given column names
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row; its length must match the number of columns
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(DataError::DimensionMismatch {
                expected: format!("{} cells", self.columns.len()),
                actual: format!("{} cells", row.len()),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of a column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    /// Numeric values of a column; non-numeric cells become NaN
    pub fn float_column(&self, name: &str) -> Option<Vec<f64>> {
        self.column(name)
            .map(|cells| cells.iter().map(|c| c.as_f64().unwrap_or(f64::NAN)).collect())
    }

    /// Copy of this table with a constant column inserted at position 0
    pub fn with_leading_column(&self, name: &str, value: &Cell) -> Self {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(name.to_string());
        columns.extend(self.columns.iter().cloned());

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut extended = Vec::with_capacity(row.len() + 1);
                extended.push(value.clone());
                extended.extend(row.iter().cloned());
                extended
            })
            .collect();

        Self { columns, rows }
    }

    /// Stack tables vertically.
    ///
    /// The result has the union of all columns in first-seen order; cells a
    /// table does not provide are [`Cell::Missing`]. Row order is kept.
    pub fn row_bind<'a, I>(tables: I) -> Self
    where
        I: IntoIterator<Item = &'a Table>,
    {
        let tables: Vec<&Table> = tables.into_iter().collect();

        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for name in &table.columns {
                if !columns.contains(name) {
                    columns.push(name.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(tables.iter().map(|t| t.nrows()).sum());
        for table in &tables {
            let positions: Vec<Option<usize>> =
                columns.iter().map(|name| table.column_index(name)).collect();
            for row in &table.rows {
                rows.push(
                    positions
                        .iter()
                        .map(|p| p.map_or(Cell::Missing, |i| row[i].clone()))
                        .collect(),
                );
            }
        }

        Self { columns, rows }
    }
}

#[cfg(feature = "tables")]
impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use comfy_table::presets::ASCII_MARKDOWN;

        let mut table = comfy_table::Table::new();
        table.load_preset(ASCII_MARKDOWN).set_header(&self.columns);
        for row in &self.rows {
            table.add_row(row.iter().map(ToString::to_string));
        }
        write!(f, "{table}")
    }
}

#[cfg(not(feature = "tables"))]
impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "| {} |", self.columns.join(" | "))?;
        writeln!(f, "|{}|", vec!["---"; self.columns.len()].join("|"))?;
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
            writeln!(f, "| {} |", cells.join(" | "))?;
        }
        Ok(())
    }
}
