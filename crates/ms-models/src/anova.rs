//! Analysis of variance and analysis of deviance
//!
//! Every term's contribution is the drop in residual deviance (the residual
//! sum of squares for linear models) between two nested fits of the same
//! design. The sum-of-squares type decides which fits are compared:
//!
//! - Type I: each term added in formula order
//! - Type II: each term added last among the terms it is not contained in
//! - Type III: each term dropped from the full model
//!
//! The decomposition itself is behind the `anova` cargo feature.

use std::fmt;

use ms_core::formula::{Design, Formula};
use ms_core::table::{Cell, Table};
use serde::{Deserialize, Serialize};

use crate::base::Result;

/// Which sums of squares to compute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SumOfSquares {
    /// Sequential
    TypeI,
    /// Hierarchical, respecting marginality
    #[default]
    TypeII,
    /// Marginal, each term last
    TypeIII,
}

impl fmt::Display for SumOfSquares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SumOfSquares::TypeI => write!(f, "I"),
            SumOfSquares::TypeII => write!(f, "II"),
            SumOfSquares::TypeIII => write!(f, "III"),
        }
    }
}

/// Options passed through to [`crate::FittedModel::anova`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnovaOptions {
    pub ss_type: SumOfSquares,
}

impl AnovaOptions {
    pub fn with_type(ss_type: SumOfSquares) -> Self {
        Self { ss_type }
    }
}

/// Test statistic reported in an ANOVA table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnovaTest {
    /// F test against the residual mean square
    F,
    /// Likelihood-ratio chi-squared test
    Chisq,
}

/// One row of an ANOVA table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaRow {
    pub term: String,
    pub df: usize,
    /// Sum of squares, or deviance for GLMs
    pub sum_sq: f64,
    pub mean_sq: Option<f64>,
    pub statistic: Option<f64>,
    pub p_value: Option<f64>,
}

/// ANOVA decomposition of one fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaTable {
    pub ss_type: SumOfSquares,
    pub test: AnovaTest,
    /// `true` for analysis of deviance tables
    pub deviance: bool,
    pub rows: Vec<AnovaRow>,
}

impl AnovaTable {
    pub fn get(&self, term: &str) -> Option<&AnovaRow> {
        self.rows.iter().find(|row| row.term == term)
    }

    /// Tidy rendering: one row per term, `NA` where a statistic does not apply
    pub fn to_table(&self) -> Result<Table> {
        let measure = if self.deviance { "deviance" } else { "sumsq" };
        let with_mean_sq = self.test == AnovaTest::F;

        let mut columns = vec!["term", "df", measure];
        if with_mean_sq {
            columns.push("meansq");
        }
        columns.extend(["statistic", "p.value"]);

        let mut table = Table::new(columns);
        for row in &self.rows {
            let mut cells = vec![
                Cell::from(row.term.as_str()),
                Cell::from(row.df),
                Cell::Float(row.sum_sq),
            ];
            if with_mean_sq {
                cells.push(row.mean_sq.into());
            }
            cells.push(row.statistic.into());
            cells.push(row.p_value.into());
            table.push_row(cells)?;
        }
        Ok(table)
    }
}

/// A term's reduction in deviance
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TermContribution {
    pub term: String,
    pub df: usize,
    pub reduction: f64,
}

/// Decompose the residual deviance of `design` by term.
///
/// `deviance_of` returns the residual deviance of a fit on the given design
/// columns (sorted, possibly empty).
#[cfg(feature = "anova")]
pub(crate) fn decompose<F>(
    formula: &Formula,
    design: &Design,
    ss_type: SumOfSquares,
    deviance_of: F,
) -> Result<Vec<TermContribution>>
where
    F: Fn(&[usize]) -> Result<f64>,
{
    let intercept: Vec<usize> = design
        .assign
        .iter()
        .enumerate()
        .filter(|(_, a)| a.is_none())
        .map(|(j, _)| j)
        .collect();
    let n_terms = formula.terms.len();

    let columns_of = |terms: &[usize], with_intercept: bool| -> Vec<usize> {
        let mut columns = if with_intercept { intercept.clone() } else { Vec::new() };
        for &t in terms {
            columns.extend(design.term_columns(t));
        }
        columns.sort_unstable();
        columns
    };

    let mut contributions = Vec::with_capacity(n_terms + 1);
    match ss_type {
        SumOfSquares::TypeI => {
            let mut previous = deviance_of(&columns_of(&[], true))?;
            for k in 0..n_terms {
                let included: Vec<usize> = (0..=k).collect();
                let current = deviance_of(&columns_of(&included, true))?;
                contributions.push(contribution(design, k, previous - current));
                previous = current;
            }
        }
        SumOfSquares::TypeII => {
            for k in 0..n_terms {
                let term = &formula.terms[k];
                let base: Vec<usize> = (0..n_terms)
                    .filter(|&j| j != k && !term.is_marginal_to(&formula.terms[j]))
                    .collect();
                let mut with_term = base.clone();
                with_term.push(k);
                let reduced = deviance_of(&columns_of(&base, true))?;
                let full = deviance_of(&columns_of(&with_term, true))?;
                contributions.push(contribution(design, k, reduced - full));
            }
        }
        SumOfSquares::TypeIII => {
            let all: Vec<usize> = (0..n_terms).collect();
            let full = deviance_of(&columns_of(&all, true))?;
            if !intercept.is_empty() {
                let reduced = deviance_of(&columns_of(&all, false))?;
                contributions.push(TermContribution {
                    term: ms_core::formula::INTERCEPT.to_string(),
                    df: intercept.len(),
                    reduction: reduced - full,
                });
            }
            for k in 0..n_terms {
                let others: Vec<usize> = all.iter().copied().filter(|&j| j != k).collect();
                let reduced = deviance_of(&columns_of(&others, true))?;
                contributions.push(contribution(design, k, reduced - full));
            }
        }
    }

    Ok(contributions)
}

#[cfg(feature = "anova")]
fn contribution(design: &Design, term: usize, reduction: f64) -> TermContribution {
    TermContribution {
        term: design.term_labels[term].clone(),
        df: design.term_columns(term).len(),
        // Nested least-squares fits can differ by rounding only
        reduction: reduction.max(0.0),
    }
}

#[cfg(not(feature = "anova"))]
pub(crate) fn decompose<F>(
    _formula: &Formula,
    _design: &Design,
    _ss_type: SumOfSquares,
    _deviance_of: F,
) -> Result<Vec<TermContribution>>
where
    F: Fn(&[usize]) -> Result<f64>,
{
    Err(crate::base::ModelError::Unsupported {
        operation: "ANOVA".to_string(),
        model: "this build (enable the `anova` feature of ms-models)".to_string(),
    })
}
