//! Series data structure for holding homogeneous data
//!
//! A Series is a one-dimensional array that can hold data of a specific type.
//! It's the building block of DataFrames.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use ndarray::Array1;

use super::{BoolArray, DataError, FloatArray, IntArray, Result, StringArray};

/// A Series is a typed, one-dimensional array of data
#[derive(Clone, Debug, PartialEq)]
pub enum Series {
    /// Floating point numbers (f64)
    Float(FloatArray),
    /// Integer numbers (i64)
    Int(IntArray),
    /// Boolean values
    Bool(BoolArray),
    /// String values
    String(StringArray),
    /// Categorical data: level codes and the ordered level labels
    Categorical(Array1<u32>, Vec<String>),
}

impl Series {
    /// Create a new Float series
    pub fn float(data: impl Into<FloatArray>) -> Self {
        Series::Float(data.into())
    }

    /// Create a new Int series
    pub fn int(data: impl Into<IntArray>) -> Self {
        Series::Int(data.into())
    }

    /// Create a new Bool series
    pub fn bool(data: impl Into<BoolArray>) -> Self {
        Series::Bool(data.into())
    }

    /// Create a new String series
    pub fn string<S: AsRef<str>>(data: &[S]) -> Self {
        Series::String(data.iter().map(|s| s.as_ref().to_string()).collect())
    }

    /// Create a categorical series with levels sorted alphabetically.
    ///
    /// The first level is the reference level under treatment contrasts.
    pub fn categorical<T: AsRef<str>>(data: &[T]) -> Self {
        let levels: Vec<String> = data
            .iter()
            .map(|s| s.as_ref().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let codes = encode(data, &levels);
        Series::Categorical(codes, levels)
    }

    /// Create a categorical series with an explicit level order.
    pub fn categorical_with_levels<T, L>(data: &[T], levels: &[L]) -> Result<Self>
    where
        T: AsRef<str>,
        L: AsRef<str>,
    {
        let levels: Vec<String> = levels.iter().map(|l| l.as_ref().to_string()).collect();
        if let Some(unknown) = data
            .iter()
            .find(|v| !levels.iter().any(|l| l == v.as_ref()))
        {
            return Err(DataError::UnknownLevel {
                level: unknown.as_ref().to_string(),
                levels,
            });
        }

        let codes = encode(data, &levels);
        Ok(Series::Categorical(codes, levels))
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        match self {
            Series::Float(arr) => arr.len(),
            Series::Int(arr) => arr.len(),
            Series::Bool(arr) => arr.len(),
            Series::String(arr) => arr.len(),
            Series::Categorical(arr, _) => arr.len(),
        }
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the type name of the series
    pub fn dtype(&self) -> &'static str {
        match self {
            Series::Float(_) => "float64",
            Series::Int(_) => "int64",
            Series::Bool(_) => "bool",
            Series::String(_) => "string",
            Series::Categorical(_, _) => "categorical",
        }
    }

    /// Whether the series can be used directly as a numeric regressor
    pub fn is_numeric(&self) -> bool {
        matches!(self, Series::Float(_) | Series::Int(_) | Series::Bool(_))
    }

    /// Levels of a categorical series
    pub fn levels(&self) -> Option<&[String]> {
        match self {
            Series::Categorical(_, levels) => Some(levels),
            _ => None,
        }
    }

    /// Get a value at index
    pub fn get(&self, idx: usize) -> Option<SeriesValue> {
        match self {
            Series::Float(arr) => arr.get(idx).map(|&v| SeriesValue::Float(v)),
            Series::Int(arr) => arr.get(idx).map(|&v| SeriesValue::Int(v)),
            Series::Bool(arr) => arr.get(idx).map(|&v| SeriesValue::Bool(v)),
            Series::String(arr) => arr.get(idx).map(|v| SeriesValue::String(v.clone())),
            Series::Categorical(arr, levels) => arr
                .get(idx)
                .and_then(|&code| levels.get(code as usize))
                .map(|level| SeriesValue::String(level.clone())),
        }
    }

    /// Convert a numeric series to floats; bools become 0/1
    pub fn to_float(&self) -> Result<FloatArray> {
        match self {
            Series::Float(arr) => Ok(arr.clone()),
            Series::Int(arr) => Ok(arr.mapv(|v| v as f64)),
            Series::Bool(arr) => Ok(arr.mapv(|v| if v { 1.0 } else { 0.0 })),
            Series::String(_) => Err(DataError::NonNumericData("string")),
            Series::Categorical(_, _) => Err(DataError::NonNumericData("categorical")),
        }
    }
}

fn encode<T: AsRef<str>>(data: &[T], levels: &[String]) -> Array1<u32> {
    let lookup: HashMap<&str, u32> = levels
        .iter()
        .enumerate()
        .map(|(code, level)| (level.as_str(), code as u32))
        .collect();

    data.iter()
        .map(|v| lookup.get(v.as_ref()).copied().unwrap_or(0))
        .collect()
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Series::Float(values.into())
    }
}

impl From<Vec<i64>> for Series {
    fn from(values: Vec<i64>) -> Self {
        Series::Int(values.into())
    }
}

/// Enum for type-safe value access
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    String(String),
}

impl fmt::Display for SeriesValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesValue::Float(v) => write!(f, "{v}"),
            SeriesValue::Int(v) => write!(f, "{v}"),
            SeriesValue::Bool(v) => write!(f, "{v}"),
            SeriesValue::String(v) => write!(f, "{v}"),
        }
    }
}
