//! Iteratively reweighted least squares
//!
//! Each iteration linearizes the model around the current fit with the
//! working response `z = eta + (y - mu) g'(mu)` and working weights
//! `w = 1 / (V(mu) g'(mu)^2)`, then solves `X'WX beta = X'Wz`. Iteration
//! stops when the relative change in deviance falls below the tolerance.

use ms_core::data::{FloatArray, Matrix};
use ndarray::Array1;

use super::family::Family;
use super::GlmConfig;
use crate::base::{ModelError, Result};
use crate::convert;

const MAX_WEIGHT: f64 = 1e10;
const MIN_WEIGHT: f64 = 1e-10;

/// Result of an IRLS fit
#[derive(Debug, Clone)]
pub(crate) struct IrlsFit {
    pub coefficients: FloatArray,
    /// Linear predictor `X beta`
    pub eta: FloatArray,
    /// Fitted means `g^-1(eta)`
    pub mu: FloatArray,
    /// Working weights of the final weighted least-squares step
    pub weights: FloatArray,
    /// `(X'WX)^-1` at the final weights
    pub cov_unscaled: Matrix,
    pub deviance: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Fit `y` on the columns of `x`
pub(crate) fn fit(x: &Matrix, y: &FloatArray, family: Family, config: &GlmConfig) -> Result<IrlsFit> {
    let n = y.len();
    let p = x.ncols();

    let mut mu: FloatArray = y.mapv(|v| family.clamp_mu(family.initial_mu(v)));
    let mut eta: FloatArray = mu.mapv(|m| family.link(m));
    let mut deviance = family.deviance(y, &mu);

    let mut coefficients = Array1::zeros(p);
    let mut weights = Array1::zeros(n);
    let mut cov_unscaled = Matrix::zeros((p, p));
    let mut converged = false;
    let mut iterations = 0;

    while iterations < config.max_iterations {
        iterations += 1;

        let derivative = mu.mapv(|m| family.link_derivative(m));
        let w: FloatArray = mu
            .iter()
            .zip(derivative.iter())
            .map(|(&m, &d)| (1.0 / (family.variance(m) * d * d)).clamp(MIN_WEIGHT, MAX_WEIGHT))
            .collect();
        let z: FloatArray = eta
            .iter()
            .zip(y.iter().zip(mu.iter()))
            .zip(derivative.iter())
            .map(|((&e, (&yi, &mi)), &d)| e + (yi - mi) * d)
            .collect();

        let (beta, cov) = convert::weighted_least_squares(x, &z, &w).ok_or_else(|| {
            ModelError::SingularMatrix {
                operation: "iteratively reweighted least squares".to_string(),
            }
        })?;

        eta = x.dot(&beta);
        mu = eta.mapv(|e| family.inverse_link(e));
        let previous = deviance;
        deviance = family.deviance(y, &mu);
        if !deviance.is_finite() {
            return Err(ModelError::numerical(
                "iteratively reweighted least squares",
                format!("deviance became {deviance} at iteration {iterations}"),
            ));
        }

        coefficients = beta;
        weights = w;
        cov_unscaled = cov;

        if (deviance - previous).abs() / (deviance.abs() + 0.1) < config.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        tracing::warn!(
            family = family.name(),
            iterations,
            deviance,
            "IRLS did not converge; estimates may be unreliable"
        );
    }

    Ok(IrlsFit {
        coefficients,
        eta,
        mu,
        weights,
        cov_unscaled,
        deviance,
        iterations,
        converged,
    })
}
