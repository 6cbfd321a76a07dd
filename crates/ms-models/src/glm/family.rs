//! Exponential families with their canonical links

use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use statrs::function::gamma::ln_gamma;

use crate::base::{ModelError, ModelType, Result};

const MU_EPSILON: f64 = 1e-10;

/// Distribution family of a GLM; each uses its canonical link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Normal errors, identity link
    #[default]
    Gaussian,
    /// Counts, log link
    Poisson,
    /// Proportions in `[0, 1]`, logit link
    Binomial,
}

impl Family {
    pub fn name(self) -> &'static str {
        match self {
            Family::Gaussian => "gaussian",
            Family::Poisson => "poisson",
            Family::Binomial => "binomial",
        }
    }

    pub fn link_name(self) -> &'static str {
        match self {
            Family::Gaussian => "identity",
            Family::Poisson => "log",
            Family::Binomial => "logit",
        }
    }

    pub fn model_type(self) -> ModelType {
        match self {
            Family::Gaussian => ModelType::GaussianRegression,
            Family::Poisson => ModelType::PoissonRegression,
            Family::Binomial => ModelType::LogisticRegression,
        }
    }

    /// Whether the dispersion is estimated rather than fixed at 1
    pub fn estimates_dispersion(self) -> bool {
        matches!(self, Family::Gaussian)
    }

    /// `eta = g(mu)`
    pub fn link(self, mu: f64) -> f64 {
        match self {
            Family::Gaussian => mu,
            Family::Poisson => mu.ln(),
            Family::Binomial => (mu / (1.0 - mu)).ln(),
        }
    }

    /// `mu = g^-1(eta)`, kept inside the family's support
    pub fn inverse_link(self, eta: f64) -> f64 {
        let mu = match self {
            Family::Gaussian => eta,
            Family::Poisson => eta.exp(),
            Family::Binomial => 1.0 / (1.0 + (-eta).exp()),
        };
        self.clamp_mu(mu)
    }

    /// `g'(mu)`
    pub fn link_derivative(self, mu: f64) -> f64 {
        match self {
            Family::Gaussian => 1.0,
            Family::Poisson => 1.0 / mu,
            Family::Binomial => 1.0 / (mu * (1.0 - mu)),
        }
    }

    /// `V(mu)`
    pub fn variance(self, mu: f64) -> f64 {
        match self {
            Family::Gaussian => 1.0,
            Family::Poisson => mu,
            Family::Binomial => mu * (1.0 - mu),
        }
    }

    /// Contribution of one observation to the deviance
    pub fn unit_deviance(self, y: f64, mu: f64) -> f64 {
        match self {
            Family::Gaussian => (y - mu).powi(2),
            Family::Poisson => 2.0 * (xlogy(y, y / mu) - (y - mu)),
            Family::Binomial => {
                2.0 * (xlogy(y, y / mu) + xlogy(1.0 - y, (1.0 - y) / (1.0 - mu)))
            }
        }
    }

    pub fn deviance(self, y: &Array1<f64>, mu: &Array1<f64>) -> f64 {
        y.iter()
            .zip(mu.iter())
            .map(|(&yi, &mi)| self.unit_deviance(yi, mi))
            .sum()
    }

    /// Starting values for IRLS
    pub fn initial_mu(self, y: f64) -> f64 {
        match self {
            Family::Gaussian => y,
            Family::Poisson => y + 0.1,
            Family::Binomial => (y + 0.5) / 2.0,
        }
    }

    pub fn clamp_mu(self, mu: f64) -> f64 {
        match self {
            Family::Gaussian => mu,
            Family::Poisson => mu.max(MU_EPSILON),
            Family::Binomial => mu.clamp(MU_EPSILON, 1.0 - MU_EPSILON),
        }
    }

    /// Reject responses outside the family's support
    pub fn validate_response(self, y: &Array1<f64>) -> Result<()> {
        let invalid = |message: &str| ModelError::InvalidResponse {
            family: self.name().to_string(),
            message: message.to_string(),
        };
        match self {
            Family::Gaussian => Ok(()),
            Family::Poisson if y.iter().any(|&v| v < 0.0) => {
                Err(invalid("counts must be non-negative"))
            }
            Family::Binomial if y.iter().any(|&v| !(0.0..=1.0).contains(&v)) => {
                Err(invalid("responses must lie in [0, 1]"))
            }
            _ => Ok(()),
        }
    }

    /// Maximized log-likelihood.
    ///
    /// The Gaussian case uses the maximum-likelihood variance `deviance / n`.
    pub fn log_likelihood(self, y: &Array1<f64>, mu: &Array1<f64>) -> f64 {
        let n = y.len() as f64;
        match self {
            Family::Gaussian => {
                let deviance = self.deviance(y, mu);
                -0.5 * n * ((2.0 * std::f64::consts::PI * deviance / n).ln() + 1.0)
            }
            Family::Poisson => y
                .iter()
                .zip(mu.iter())
                .map(|(&yi, &mi)| yi * mi.ln() - mi - ln_gamma(yi + 1.0))
                .sum(),
            Family::Binomial => y
                .iter()
                .zip(mu.iter())
                .map(|(&yi, &mi)| yi * mi.ln() + (1.0 - yi) * (1.0 - mi).ln())
                .sum(),
        }
    }

    /// Parameters counted by the information criteria for `p` coefficients
    pub fn n_params(self, p: usize) -> usize {
        if self.estimates_dispersion() {
            p + 1
        } else {
            p
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.link_name())
    }
}

/// `x ln(y)` with `0 ln(0) = 0`
fn xlogy(x: f64, y: f64) -> f64 {
    if x == 0.0 { 0.0 } else { x * y.ln() }
}
