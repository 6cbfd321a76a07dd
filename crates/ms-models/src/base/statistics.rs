//! Statistical structures for model results

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Model statistics; fields a model type does not define stay `None`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelStatistics {
    pub r_squared: Option<f64>,
    pub adj_r_squared: Option<f64>,
    /// Residual standard error (square root of the dispersion)
    pub sigma: Option<f64>,
    pub f_statistic: Option<f64>,
    pub f_p_value: Option<f64>,
    pub log_likelihood: Option<f64>,
    pub aic: Option<f64>,
    pub bic: Option<f64>,
    pub null_deviance: Option<f64>,
    /// Residual deviance; the residual sum of squares for linear models
    pub deviance: Option<f64>,
    pub dispersion: Option<f64>,
    pub df_residual: Option<usize>,
    pub df_model: Option<usize>,
    pub df_null: Option<usize>,
    /// IRLS iterations
    pub iterations: Option<usize>,
    pub converged: Option<bool>,
}

/// Five-number summary of the residuals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResidualStatistics {
    pub min: f64,
    /// First quartile
    pub q1: f64,
    pub median: f64,
    /// Third quartile
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl ResidualStatistics {
    pub fn from_residuals(residuals: &Array1<f64>) -> Self {
        if residuals.is_empty() {
            return Self::default();
        }

        let mut sorted = residuals.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
            mean: residuals.mean().unwrap_or(0.0),
            std_dev: if residuals.len() > 1 {
                residuals.std(1.0)
            } else {
                0.0
            },
        }
    }
}

/// Linear interpolation between order statistics (R's type 7)
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let idx = (sorted.len() as f64 - 1.0) * q;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = idx - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}
