//! Per-term estimates with their tests and intervals

use ms_core::formula::INTERCEPT;
use serde::{Deserialize, Serialize};

/// One design column's estimate.
///
/// Inference fields are `None` until [`with_test`](Self::with_test) and
/// [`with_ci`](Self::with_ci) fill them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    /// Design column name
    pub name: String,
    pub estimate: f64,
    pub std_error: Option<f64>,
    /// t or z statistic, depending on the model
    pub statistic: Option<f64>,
    pub p_value: Option<f64>,
    pub ci_lower: Option<f64>,
    pub ci_upper: Option<f64>,
    /// Degrees of freedom of the reference t distribution; `None` for z
    pub df: Option<f64>,
    pub is_intercept: bool,
}

impl Coefficient {
    pub fn new(name: impl Into<String>, estimate: f64) -> Self {
        let name = name.into();
        Self {
            is_intercept: name == INTERCEPT,
            name,
            estimate,
            std_error: None,
            statistic: None,
            p_value: None,
            ci_lower: None,
            ci_upper: None,
            df: None,
        }
    }

    /// Attach a Wald test: standard error, statistic, two-sided p-value and
    /// the reference distribution's degrees of freedom
    pub fn with_test(mut self, std_error: f64, statistic: f64, p_value: f64, df: Option<f64>) -> Self {
        self.std_error = Some(std_error);
        self.statistic = Some(statistic);
        self.p_value = Some(p_value);
        self.df = df;
        self
    }

    pub fn with_ci(mut self, lower: f64, upper: f64) -> Self {
        self.ci_lower = Some(lower);
        self.ci_upper = Some(upper);
        self
    }
}
