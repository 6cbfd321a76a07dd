//! Core data structures for multi-model analysis
//!
//! - [`data`]: column-typed [`DataFrame`]s
//! - [`formula`]: R-style [`Formula`] parsing and design matrices
//! - [`table`]: heterogeneous result [`Table`]s with Markdown rendering

pub mod data;
pub mod formula;
pub mod table;

pub use data::{DataError, DataFrame, Series};
pub use formula::{Design, Formula, FormulaError};
pub use table::{Cell, Table};
