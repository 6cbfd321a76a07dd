//! Generalized linear models
//!
//! Gaussian, Poisson and binomial families with canonical links, fitted by
//! iteratively reweighted least squares. Inference is Wald z for families
//! with a fixed dispersion and t for the Gaussian family.

pub mod family;
mod irls;
pub mod model;


pub use family::Family;
pub use model::GeneralizedLinearModel;

use ms_core::data::DataFrame;
use ms_core::formula::Formula;
use serde::{Deserialize, Serialize};

use crate::base::{FittedModel, ModelError, ModelFitter, Result};

/// GLM configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlmConfig {
    pub family: Family,
    /// IRLS iteration limit
    pub max_iterations: usize,
    /// Relative deviance change at which IRLS stops
    pub tolerance: f64,
    pub confidence_level: f64,
}

impl Default for GlmConfig {
    fn default() -> Self {
        Self {
            family: Family::default(),
            max_iterations: 25,
            tolerance: 1e-8,
            confidence_level: 0.95,
        }
    }
}

impl GlmConfig {
    /// Default settings for `family`
    pub fn for_family(family: Family) -> Self {
        Self {
            family,
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(ModelError::InvalidConfig {
                message: "max_iterations must be at least 1".to_string(),
            });
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(ModelError::InvalidConfig {
                message: format!("tolerance must be positive, got {}", self.tolerance),
            });
        }
        crate::confint::check_level(self.confidence_level)
    }
}

/// Fits [`GeneralizedLinearModel`]s of one family
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GlmFitter {
    pub config: GlmConfig,
}

impl GlmFitter {
    pub fn new(config: GlmConfig) -> Self {
        Self { config }
    }

    pub fn family(family: Family) -> Self {
        Self::new(GlmConfig::for_family(family))
    }
}

impl ModelFitter for GlmFitter {
    fn fit(&self, formula: &Formula, data: &DataFrame) -> Result<Box<dyn FittedModel>> {
        Ok(Box::new(GeneralizedLinearModel::fit(formula, data, self.config)?))
    }
}

/// Convenience function for a GLM with default settings
pub fn glm(formula: &str, data: &DataFrame, family: Family) -> Result<GeneralizedLinearModel> {
    let formula = Formula::parse(formula)?;
    GeneralizedLinearModel::fit(&formula, data, GlmConfig::for_family(family))
}
