//! Printable model summaries

use std::fmt;

use ms_core::table::{Cell, Table, format_float};
use serde::{Deserialize, Serialize};

use super::coefficient::Coefficient;
use super::statistics::{ModelStatistics, ResidualStatistics};

/// Everything reported by `summary()` for one model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model_type: ModelType,
    pub formula: String,
    pub n_obs: usize,
    /// Number of design columns (including intercept)
    pub n_predictors: usize,
    pub coefficients: Vec<Coefficient>,
    pub model_statistics: ModelStatistics,
    pub residual_statistics: ResidualStatistics,
}

impl ModelSummary {
    /// `term | estimate | std.error | statistic | p.value`
    pub fn coefficient_table(&self) -> Table {
        let mut table = Table::new(["term", "estimate", "std.error", "statistic", "p.value"]);
        for c in &self.coefficients {
            // Five cells for five columns
            let _ = table.push_row(vec![
                Cell::from(c.name.as_str()),
                Cell::Float(c.estimate),
                c.std_error.into(),
                c.statistic.into(),
                c.p_value.into(),
            ]);
        }
        table
    }
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {} ({} observations)", self.model_type, self.formula, self.n_obs)?;
        writeln!(f)?;

        let r = &self.residual_statistics;
        writeln!(
            f,
            "Residuals: min {}, 1Q {}, median {}, 3Q {}, max {}",
            format_float(r.min),
            format_float(r.q1),
            format_float(r.median),
            format_float(r.q3),
            format_float(r.max)
        )?;
        writeln!(f)?;
        writeln!(f, "{}", self.coefficient_table())?;

        let stats = &self.model_statistics;
        let df = stats.df_residual.unwrap_or(0);
        if let Some(sigma) = stats.sigma {
            writeln!(f, "Residual standard error: {} on {df} df", format_float(sigma))?;
        }
        if let (Some(r2), Some(adj)) = (stats.r_squared, stats.adj_r_squared) {
            writeln!(
                f,
                "R-squared: {}, adjusted: {}",
                format_float(r2),
                format_float(adj)
            )?;
        }
        if let (Some(statistic), Some(p)) = (stats.f_statistic, stats.f_p_value) {
            let df_model = stats.df_model.unwrap_or(0);
            writeln!(
                f,
                "F-statistic: {} on {df_model} and {df} df, p-value: {}",
                format_float(statistic),
                format_float(p)
            )?;
        }
        if let (Some(null), Some(df_null)) = (stats.null_deviance, stats.df_null) {
            writeln!(f, "Null deviance: {} on {df_null} df", format_float(null))?;
            if let Some(deviance) = stats.deviance {
                writeln!(f, "Residual deviance: {} on {df} df", format_float(deviance))?;
            }
        }
        if let Some(aic) = stats.aic {
            writeln!(f, "AIC: {}", format_float(aic))?;
        }
        if let (Some(iterations), Some(false)) = (stats.iterations, stats.converged) {
            writeln!(f, "Did not converge after {iterations} IRLS iterations")?;
        }
        Ok(())
    }
}

/// Kind of fitted model, shown in summaries and error messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    /// Ordinary least squares
    LinearRegression,
    /// Gaussian GLM with identity link
    GaussianRegression,
    /// Binomial GLM with logit link
    LogisticRegression,
    /// Poisson GLM with log link
    PoissonRegression,
    Other(String),
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::LinearRegression => write!(f, "Linear Regression"),
            ModelType::GaussianRegression => write!(f, "Gaussian Regression"),
            ModelType::LogisticRegression => write!(f, "Logistic Regression"),
            ModelType::PoissonRegression => write!(f, "Poisson Regression"),
            ModelType::Other(s) => write!(f, "{s}"),
        }
    }
}
