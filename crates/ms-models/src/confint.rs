//! Coefficient inference: reference distributions, p-values and intervals

use ms_core::table::{Cell, Table, format_float};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

use crate::base::{Coefficient, ModelError, Result};

/// Reference distribution of a coefficient's test statistic
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reference {
    /// Student t with the residual degrees of freedom
    StudentT(f64),
    /// Standard normal (Wald z)
    Normal,
}

impl Reference {
    fn df(self) -> Option<f64> {
        match self {
            Reference::StudentT(df) => Some(df),
            Reference::Normal => None,
        }
    }

    /// Upper `1 - (1 - level) / 2` quantile
    pub fn critical_value(self, level: f64) -> Result<f64> {
        check_level(level)?;
        let upper = 1.0 - (1.0 - level) / 2.0;
        match self {
            Reference::StudentT(df) => Ok(student_t(df)?.inverse_cdf(upper)),
            Reference::Normal => Ok(standard_normal()?.inverse_cdf(upper)),
        }
    }

    /// Two-sided p-value of `statistic`
    pub fn p_value(self, statistic: f64) -> Result<f64> {
        let tail = match self {
            Reference::StudentT(df) => student_t(df)?.sf(statistic.abs()),
            Reference::Normal => standard_normal()?.sf(statistic.abs()),
        };
        Ok((2.0 * tail).clamp(0.0, 1.0))
    }
}

fn student_t(df: f64) -> Result<StudentsT> {
    StudentsT::new(0.0, 1.0, df)
        .map_err(|e| ModelError::numerical("t distribution", format!("df = {df}: {e}")))
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| ModelError::numerical("normal distribution", e.to_string()))
}

pub(crate) fn check_level(level: f64) -> Result<()> {
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidConfig {
            message: format!("confidence level must lie strictly between 0 and 1, got {level}"),
        })
    }
}

/// Build the coefficient table with tests and intervals at `level`
pub(crate) fn coefficient_table(
    names: &[String],
    estimates: &Array1<f64>,
    std_errors: &Array1<f64>,
    reference: Reference,
    level: f64,
) -> Result<Vec<Coefficient>> {
    let critical = reference.critical_value(level)?;

    names
        .iter()
        .zip(estimates.iter().zip(std_errors.iter()))
        .map(|(name, (&estimate, &se))| {
            let statistic = estimate / se;
            Ok(Coefficient::new(name.clone(), estimate)
                .with_test(se, statistic, reference.p_value(statistic)?, reference.df())
                .with_ci(estimate - critical * se, estimate + critical * se))
        })
        .collect()
}

/// One interval per coefficient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfintRow {
    pub term: String,
    pub lower: f64,
    pub upper: f64,
}

/// Confidence intervals for the coefficients of one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfintTable {
    pub level: f64,
    pub rows: Vec<ConfintRow>,
}

impl ConfintTable {
    pub(crate) fn from_estimates(
        names: &[String],
        estimates: &Array1<f64>,
        std_errors: &Array1<f64>,
        reference: Reference,
        level: f64,
    ) -> Result<Self> {
        let critical = reference.critical_value(level)?;
        let rows = names
            .iter()
            .zip(estimates.iter().zip(std_errors.iter()))
            .map(|(term, (&estimate, &se))| ConfintRow {
                term: term.clone(),
                lower: estimate - critical * se,
                upper: estimate + critical * se,
            })
            .collect();
        Ok(Self { level, rows })
    }

    /// Column labels for the two bounds, e.g. `2.5 %` and `97.5 %`
    pub fn bound_labels(&self) -> (String, String) {
        let alpha = (1.0 - self.level) / 2.0;
        (percent_label(alpha), percent_label(1.0 - alpha))
    }

    pub fn get(&self, term: &str) -> Option<&ConfintRow> {
        self.rows.iter().find(|row| row.term == term)
    }

    /// Render as a `term | lower | upper` table
    pub fn to_table(&self) -> Result<Table> {
        let (lower, upper) = self.bound_labels();
        let mut table = Table::new(["term".to_string(), lower, upper]);
        for row in &self.rows {
            table.push_row(vec![
                Cell::from(row.term.as_str()),
                Cell::Float(row.lower),
                Cell::Float(row.upper),
            ])?;
        }
        Ok(table)
    }
}

fn percent_label(probability: f64) -> String {
    format!("{} %", format_float(probability * 100.0))
}
