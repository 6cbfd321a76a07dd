//! Design matrix produced by evaluating a formula against data

use ndarray::Axis;

use crate::data::{DataFrame, FloatArray, Matrix, Series};
use crate::formula::error::{FormulaError, FormulaResult};
use crate::formula::{Column, Formula, Term};

/// Name of the intercept column, as R prints it
pub const INTERCEPT: &str = "(Intercept)";

/// Model matrix, response and column bookkeeping for one formula
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    /// `n x p` model matrix
    pub x: Matrix,
    /// Response vector, if the formula has one
    pub y: Option<FloatArray>,
    /// One name per column of `x`
    pub column_names: Vec<String>,
    /// Term index of each column; `None` marks the intercept
    pub assign: Vec<Option<usize>>,
    /// Labels of the formula terms that `assign` points into
    pub term_labels: Vec<String>,
    pub has_intercept: bool,
}

impl Design {
    pub(crate) fn build(formula: &Formula, df: &DataFrame) -> FormulaResult<Self> {
        let y = match &formula.response {
            Some(name) => Some(response_column(name, df)?),
            None => None,
        };

        let nrows = df.nrows();
        let mut columns: Vec<Column> = Vec::new();
        let mut assign = Vec::new();

        if formula.has_intercept {
            columns.push((INTERCEPT.to_string(), FloatArray::ones(nrows)));
            assign.push(None);
        }

        let keys: Vec<Vec<String>> = formula.terms.iter().map(Term::key).collect();

        // Without an intercept the first categorical main effect keeps every level
        let mut full_coding_used = formula.has_intercept;
        for (index, term) in formula.terms.iter().enumerate() {
            let categorical_main = term
                .as_variable()
                .and_then(|name| df.get_column(name))
                .is_some_and(|s| matches!(s, Series::Categorical(..)));
            let contrasts = !(categorical_main && !full_coding_used);
            if categorical_main {
                full_coding_used = true;
            }

            // An interaction factor keeps every level unless the term without
            // it is also in the model
            let term_columns = term.coded_columns(df, |factor| {
                if term.is_interaction() {
                    keys.contains(&term.key_without(factor))
                } else {
                    contrasts
                }
            })?;
            if term_columns.is_empty() {
                return Err(FormulaError::InvalidStructure {
                    message: format!("term '{term}' produces no design columns"),
                    suggestion: None,
                });
            }
            for column in term_columns {
                columns.push(column);
                assign.push(Some(index));
            }
        }

        for (name, values) in &columns {
            if values.iter().any(|v| !v.is_finite()) {
                return Err(FormulaError::NumericalError {
                    column: name.clone(),
                    message: "design column contains NaN or infinite values".to_string(),
                });
            }
        }

        let mut x = Matrix::zeros((nrows, columns.len()));
        for (j, (_, values)) in columns.iter().enumerate() {
            x.column_mut(j).assign(values);
        }

        Ok(Self {
            x,
            y,
            column_names: columns.into_iter().map(|(name, _)| name).collect(),
            assign,
            term_labels: formula.term_labels(),
            has_intercept: formula.has_intercept,
        })
    }

    /// Number of observations
    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    /// Number of model matrix columns
    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    /// Column indices belonging to term `term`
    pub fn term_columns(&self, term: usize) -> Vec<usize> {
        self.assign
            .iter()
            .enumerate()
            .filter(|(_, a)| **a == Some(term))
            .map(|(j, _)| j)
            .collect()
    }

    /// Model matrix restricted to the given columns
    pub fn select_columns(&self, columns: &[usize]) -> Matrix {
        self.x.select(Axis(1), columns)
    }
}

fn response_column(name: &str, df: &DataFrame) -> FormulaResult<FloatArray> {
    let series = df
        .get_column(name)
        .ok_or_else(|| FormulaError::variable_not_found(name, &df.column_names()))?;

    let values = match series {
        Series::String(_) | Series::Categorical(..) => {
            return Err(FormulaError::TypeMismatch {
                variable: name.to_string(),
                expected_type: "numeric",
                actual_type: series.dtype().to_string(),
            });
        }
        numeric => numeric.to_float()?,
    };

    if values.iter().any(|v| !v.is_finite()) {
        return Err(FormulaError::NumericalError {
            column: name.to_string(),
            message: "response contains NaN or infinite values".to_string(),
        });
    }
    Ok(values)
}
