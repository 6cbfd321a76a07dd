//! Linear regression models
//!
//! Ordinary least squares with R-style formulas, t-based inference and the
//! Gaussian log-likelihood used by the information criteria.

pub mod ols;

#[cfg(test)]
mod tests;

pub use ols::LinearRegression;

use ms_core::data::DataFrame;
use ms_core::formula::Formula;
use serde::{Deserialize, Serialize};

use crate::base::{FittedModel, ModelFitter, Result};

/// Linear model configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearConfig {
    /// Confidence level for the intervals reported with the coefficients
    pub confidence_level: f64,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
        }
    }
}

/// Fits [`LinearRegression`] models; the default fitter of the model builder
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearFitter {
    pub config: LinearConfig,
}

impl LinearFitter {
    pub fn new(config: LinearConfig) -> Self {
        Self { config }
    }
}

impl ModelFitter for LinearFitter {
    fn fit(&self, formula: &Formula, data: &DataFrame) -> Result<Box<dyn FittedModel>> {
        Ok(Box::new(LinearRegression::fit(formula, data, self.config)?))
    }
}

/// Convenience function for OLS regression
pub fn lm(formula: &str, data: &DataFrame) -> Result<LinearRegression> {
    let formula = Formula::parse(formula)?;
    LinearRegression::fit(&formula, data, LinearConfig::default())
}
