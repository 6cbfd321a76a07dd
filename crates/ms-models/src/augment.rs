//! Observation-level fitted values and influence diagnostics
//!
//! The per-observation table lists the model frame, then `.fitted`,
//! `.se.fit`, `.resid`, `.hat`, `.sigma`, `.cooksd` and `.std.resid`.
//! Influence measures follow the usual leave-one-out approximations for
//! (weighted) least squares:
//!
//! - `.hat`: `w_i x_i' (X'WX)^-1 x_i`
//! - `.sigma`: residual scale with observation `i` dropped
//! - `.cooksd`: `(r_i / (1 - h_i))^2 h_i / (phi p)` on Pearson residuals
//! - `.std.resid`: `d_i / sqrt(phi (1 - h_i))` on deviance residuals

use ms_core::data::{DataFrame, Matrix};
use ms_core::table::{Cell, Table};
use ndarray::Array1;

use crate::base::Result;

/// Column names appended after the model frame
pub const AUGMENT_COLUMNS: [&str; 7] = [
    ".fitted",
    ".se.fit",
    ".resid",
    ".hat",
    ".sigma",
    ".cooksd",
    ".std.resid",
];

/// Influence measures of every observation
#[derive(Debug, Clone, PartialEq)]
pub struct Influence {
    pub hat: Array1<f64>,
    pub sigma: Array1<f64>,
    pub cooksd: Array1<f64>,
    pub std_resid: Array1<f64>,
}

/// Inputs shared by linear and generalized linear fits
#[derive(Debug)]
pub(crate) struct FitQuantities<'a> {
    pub x: &'a Matrix,
    /// `(X'WX)^-1`
    pub cov_unscaled: &'a Matrix,
    /// Working weights; `None` means unit weights
    pub weights: Option<&'a Array1<f64>>,
    pub deviance_resid: &'a Array1<f64>,
    pub pearson_resid: &'a Array1<f64>,
    pub dispersion: f64,
}

impl Influence {
    pub(crate) fn compute(fit: &FitQuantities<'_>) -> Self {
        let n = fit.x.nrows();
        let p = fit.x.ncols() as f64;
        let phi = fit.dispersion;

        let mut hat = crate::convert::quadratic_form_diagonal(fit.x, fit.cov_unscaled);
        if let Some(w) = fit.weights {
            hat *= w;
        }

        let sum_d2: f64 = fit.deviance_resid.iter().map(|d| d * d).sum();
        let loo_df = n as f64 - p - 1.0;

        let mut sigma = Array1::zeros(n);
        let mut cooksd = Array1::zeros(n);
        let mut std_resid = Array1::zeros(n);
        for i in 0..n {
            let h = hat[i];
            let d = fit.deviance_resid[i];
            let r = fit.pearson_resid[i];

            std_resid[i] = d / (phi * (1.0 - h)).sqrt();
            cooksd[i] = (r / (1.0 - h)).powi(2) * h / (phi * p);
            sigma[i] = if loo_df > 0.0 {
                ((sum_d2 - d * d / (1.0 - h)) / loo_df).max(0.0).sqrt()
            } else {
                f64::NAN
            };
        }

        Self {
            hat,
            sigma,
            cooksd,
            std_resid,
        }
    }
}

/// Assemble the augmented table from the model frame and fit columns
#[cfg(feature = "augment")]
pub(crate) fn augment_table(
    frame: &DataFrame,
    fitted: &Array1<f64>,
    se_fit: &Array1<f64>,
    resid: &Array1<f64>,
    influence: &Influence,
) -> Result<Table> {
    let mut columns: Vec<String> = frame.column_names().iter().map(|c| c.to_string()).collect();
    columns.extend(AUGMENT_COLUMNS.iter().map(|c| c.to_string()));

    let mut table = Table::new(columns);
    for i in 0..frame.nrows() {
        let mut row: Vec<Cell> = frame
            .get_row(i)?
            .into_iter()
            .map(|(_, value)| Cell::from(value))
            .collect();
        row.extend(
            [
                fitted[i],
                se_fit[i],
                resid[i],
                influence.hat[i],
                influence.sigma[i],
                influence.cooksd[i],
                influence.std_resid[i],
            ]
            .map(Cell::Float),
        );
        table.push_row(row)?;
    }
    Ok(table)
}

#[cfg(not(feature = "augment"))]
pub(crate) fn augment_table(
    _frame: &DataFrame,
    _fitted: &Array1<f64>,
    _se_fit: &Array1<f64>,
    _resid: &Array1<f64>,
    _influence: &Influence,
) -> Result<Table> {
    Err(crate::base::ModelError::Unsupported {
        operation: "augment".to_string(),
        model: "this build (enable the `augment` feature of ms-models)".to_string(),
    })
}

#[cfg(all(test, feature = "augment"))]
mod tests;
