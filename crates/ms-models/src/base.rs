//! Core traits and types for statistical models
//!
//! Every fitted model is consumed through [`FittedModel`]; every fitting
//! routine through [`ModelFitter`]. Callers that work on collections of
//! heterogeneous models hold them as `Box<dyn FittedModel>`.

use std::fmt::Debug;

use ms_core::data::DataFrame;
use ms_core::formula::Formula;
use ms_core::table::Table;

pub use coefficient::Coefficient;
pub use statistics::{ModelStatistics, ResidualStatistics};
pub use summary::{ModelSummary, ModelType};

use crate::anova::{AnovaOptions, AnovaTable};
use crate::confint::ConfintTable;
pub use crate::error::ModelError;

pub mod coefficient;
pub mod statistics;
pub mod summary;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// A model fitted to one formula and one data frame
pub trait FittedModel: Debug + Send + Sync {
    /// The formula the model was fitted with
    fn formula(&self) -> &Formula;

    /// Number of observations used in the fit
    fn nobs(&self) -> usize;

    fn model_type(&self) -> ModelType;

    fn coefficients(&self) -> Vec<Coefficient>;

    fn summary(&self) -> Result<ModelSummary>;

    /// Analysis of variance (or deviance) table
    fn anova(&self, options: &AnovaOptions) -> Result<AnovaTable>;

    /// Confidence intervals for the coefficients at `level`
    fn confint(&self, level: f64) -> Result<ConfintTable>;

    /// Per-observation table: model frame columns, then fitted values,
    /// residuals and influence diagnostics
    fn augment(&self) -> Result<Table>;

    /// Maximized log-likelihood
    fn log_likelihood(&self) -> f64;

    /// Number of estimated parameters counted by the information criteria
    fn n_params(&self) -> usize;

    /// Akaike information criterion, `-2 logLik + 2k`
    fn aic(&self) -> Result<f64> {
        let k = self.n_params() as f64;
        finite_criterion(self, "AIC", -2.0 * self.log_likelihood() + 2.0 * k)
    }

    /// Small-sample corrected AIC
    fn aicc(&self) -> Result<f64> {
        let k = self.n_params() as f64;
        let n = self.nobs() as f64;
        if n - k - 1.0 <= 0.0 {
            return Err(ModelError::NotComputable {
                quantity: "AICc",
                model: self.model_type().to_string(),
                reason: format!("needs more than {} observations", k + 1.0),
            });
        }
        let aic = self.aic()?;
        finite_criterion(self, "AICc", aic + 2.0 * k * (k + 1.0) / (n - k - 1.0))
    }

    /// Bayesian information criterion, `-2 logLik + k ln(n)`
    fn bic(&self) -> Result<f64> {
        let k = self.n_params() as f64;
        let n = self.nobs() as f64;
        finite_criterion(self, "BIC", -2.0 * self.log_likelihood() + k * n.ln())
    }
}

fn finite_criterion<M: FittedModel + ?Sized>(
    model: &M,
    quantity: &'static str,
    value: f64,
) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::NotComputable {
            quantity,
            model: model.model_type().to_string(),
            reason: format!("log-likelihood is {}", model.log_likelihood()),
        })
    }
}

/// Something that fits a model from a formula and a data frame.
///
/// Fitting options belong to the fitter value. Closures returning any
/// concrete [`FittedModel`] are fitters too.
pub trait ModelFitter {
    fn fit(&self, formula: &Formula, data: &DataFrame) -> Result<Box<dyn FittedModel>>;
}

impl<F, M> ModelFitter for F
where
    F: Fn(&Formula, &DataFrame) -> Result<M>,
    M: FittedModel + 'static,
{
    fn fit(&self, formula: &Formula, data: &DataFrame) -> Result<Box<dyn FittedModel>> {
        Ok(Box::new(self(formula, data)?))
    }
}

/// The columns of `data` a formula reads, response first
pub(crate) fn model_frame(formula: &Formula, data: &DataFrame) -> Result<DataFrame> {
    Ok(data.select(formula.variables())?)
}
