//! Ordinary Least Squares (OLS) linear regression
//!
//! The normal equations `X'X beta = X'y` are solved by Cholesky
//! factorization, falling back to LU.

use ms_core::data::{DataFrame, FloatArray, Matrix};
use ms_core::formula::{Design, Formula, FormulaError};
use ms_core::table::Table;
use ndarray::Array1;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use crate::anova::{self, AnovaOptions, AnovaRow, AnovaTable, AnovaTest};
use crate::augment::{self, FitQuantities, Influence};
use crate::base::{
    model_frame, Coefficient, FittedModel, ModelError, ModelStatistics, ModelSummary, ModelType,
    ResidualStatistics, Result,
};
use crate::confint::{self, ConfintTable, Reference};
use crate::convert;
use crate::lm::LinearConfig;

/// Fitted OLS linear regression
#[derive(Debug, Clone)]
pub struct LinearRegression {
    formula: Formula,
    design: Design,
    /// Columns of the data the formula reads
    frame: DataFrame,
    y: FloatArray,
    config: LinearConfig,
    coefficients: FloatArray,
    /// `(X'X)^-1`
    cov_unscaled: Matrix,
    fitted_values: FloatArray,
    residuals: FloatArray,
    statistics: ModelStatistics,
}

impl LinearRegression {
    /// Fit `formula` to `data` by least squares
    pub fn fit(formula: &Formula, data: &DataFrame, config: LinearConfig) -> Result<Self> {
        confint::check_level(config.confidence_level)?;

        let design = formula.design(data)?;
        let y = design.y.clone().ok_or(FormulaError::MissingResponse)?;

        let n = design.nrows();
        let p = design.ncols();
        if n <= p {
            return Err(ModelError::InsufficientData {
                n_samples: n,
                n_predictors: p,
            });
        }

        let (coefficients, cov_unscaled) = least_squares(&design.x, &y)?;
        let fitted_values = design.x.dot(&coefficients);
        let residuals = &y - &fitted_values;

        let statistics = fit_statistics(&design, &y, &residuals);
        tracing::debug!(
            formula = %formula,
            n,
            p,
            rss = statistics.deviance,
            "fitted linear model"
        );

        Ok(Self {
            formula: formula.clone(),
            frame: model_frame(formula, data)?,
            design,
            y,
            config,
            coefficients,
            cov_unscaled,
            fitted_values,
            residuals,
            statistics,
        })
    }

    /// Coefficient estimates in design column order
    pub fn estimates(&self) -> &FloatArray {
        &self.coefficients
    }

    /// Standard errors of the coefficients
    pub fn standard_errors(&self) -> FloatArray {
        let sigma2 = self.sigma().powi(2);
        self.cov_unscaled.diag().mapv(|v| (v * sigma2).sqrt())
    }

    pub fn fitted_values(&self) -> &FloatArray {
        &self.fitted_values
    }

    pub fn residuals(&self) -> &FloatArray {
        &self.residuals
    }

    /// Design column names
    pub fn column_names(&self) -> &[String] {
        &self.design.column_names
    }

    /// Residual sum of squares
    pub fn rss(&self) -> f64 {
        self.statistics.deviance.unwrap_or(f64::NAN)
    }

    /// Residual standard error
    pub fn sigma(&self) -> f64 {
        self.statistics.sigma.unwrap_or(f64::NAN)
    }

    pub fn df_residual(&self) -> usize {
        self.design.nrows() - self.design.ncols()
    }

    pub fn statistics(&self) -> &ModelStatistics {
        &self.statistics
    }

    /// Predict the response for new data
    pub fn predict(&self, data: &DataFrame) -> Result<FloatArray> {
        let mut formula = self.formula.clone();
        formula.response = None;
        let design = formula.design(data)?;
        if design.column_names != self.design.column_names {
            return Err(ModelError::InvalidConfig {
                message: format!(
                    "new data produces design columns {:?}, the model was fitted on {:?}",
                    design.column_names, self.design.column_names
                ),
            });
        }
        Ok(design.x.dot(&self.coefficients))
    }

    fn reference(&self) -> Reference {
        Reference::StudentT(self.df_residual() as f64)
    }

    /// RSS of a least-squares fit on a subset of the design columns
    fn rss_of(&self, columns: &[usize]) -> Result<f64> {
        if columns.is_empty() {
            return Ok(self.y.mapv(|v| v * v).sum());
        }
        let x = self.design.select_columns(columns);
        let (beta, _) = least_squares(&x, &self.y)?;
        let residuals = &self.y - &x.dot(&beta);
        Ok(residuals.mapv(|r| r * r).sum())
    }
}

/// Solve the normal equations; returns the coefficients and `(X'X)^-1`
pub(crate) fn least_squares(x: &Matrix, y: &FloatArray) -> Result<(FloatArray, Matrix)> {
    let xtx = x.t().dot(x);
    let xty = x.t().dot(y);
    convert::solve_and_invert(&xtx, &xty).ok_or_else(|| ModelError::SingularMatrix {
        operation: "least squares".to_string(),
    })
}

fn fit_statistics(design: &Design, y: &FloatArray, residuals: &FloatArray) -> ModelStatistics {
    let n = design.nrows();
    let p = design.ncols();
    let df_residual = n - p;
    let intercept = usize::from(design.has_intercept);
    let df_model = p - intercept;

    let rss = residuals.mapv(|r| r * r).sum();
    // Without an intercept R-squared is measured against zero
    let tss = if design.has_intercept {
        let mean = y.mean().unwrap_or(0.0);
        y.mapv(|v| (v - mean).powi(2)).sum()
    } else {
        y.mapv(|v| v * v).sum()
    };

    let r_squared = 1.0 - rss / tss;
    let adj_r_squared =
        1.0 - (1.0 - r_squared) * ((n - intercept) as f64 / df_residual as f64);
    let sigma2 = rss / df_residual as f64;

    let (f_statistic, f_p_value) = if df_model > 0 {
        let f = ((tss - rss) / df_model as f64) / sigma2;
        let p_value = FisherSnedecor::new(df_model as f64, df_residual as f64)
            .map(|dist| dist.sf(f))
            .ok();
        (Some(f), p_value)
    } else {
        (None, None)
    };

    let nf = n as f64;
    let log_likelihood =
        -0.5 * nf * ((2.0 * std::f64::consts::PI * rss / nf).ln() + 1.0);
    // sigma is estimated too
    let k = (p + 1) as f64;

    ModelStatistics {
        r_squared: Some(r_squared),
        adj_r_squared: Some(adj_r_squared),
        sigma: Some(sigma2.sqrt()),
        f_statistic,
        f_p_value,
        log_likelihood: Some(log_likelihood),
        aic: Some(-2.0 * log_likelihood + 2.0 * k),
        bic: Some(-2.0 * log_likelihood + k * nf.ln()),
        deviance: Some(rss),
        dispersion: Some(sigma2),
        df_residual: Some(df_residual),
        df_model: Some(df_model),
        ..ModelStatistics::default()
    }
}

impl FittedModel for LinearRegression {
    fn formula(&self) -> &Formula {
        &self.formula
    }

    fn nobs(&self) -> usize {
        self.design.nrows()
    }

    fn model_type(&self) -> ModelType {
        ModelType::LinearRegression
    }

    fn coefficients(&self) -> Vec<Coefficient> {
        confint::coefficient_table(
            &self.design.column_names,
            &self.coefficients,
            &self.standard_errors(),
            self.reference(),
            self.config.confidence_level,
        )
        .unwrap_or_else(|_| {
            // Level was validated at fit time; this only guards df = 0
            self.design
                .column_names
                .iter()
                .zip(self.coefficients.iter())
                .map(|(name, &b)| Coefficient::new(name.clone(), b))
                .collect()
        })
    }

    fn summary(&self) -> Result<ModelSummary> {
        Ok(ModelSummary {
            model_type: self.model_type(),
            formula: self.formula.to_string(),
            n_obs: self.nobs(),
            n_predictors: self.design.ncols(),
            coefficients: self.coefficients(),
            model_statistics: self.statistics,
            residual_statistics: ResidualStatistics::from_residuals(&self.residuals),
        })
    }

    fn anova(&self, options: &AnovaOptions) -> Result<AnovaTable> {
        let contributions = anova::decompose(&self.formula, &self.design, options.ss_type, |cols| {
            self.rss_of(cols)
        })?;

        let df_residual = self.df_residual();
        let rss = self.rss();
        let residual_mean_sq = rss / df_residual as f64;
        let f_dist = FisherSnedecor::new(1.0, df_residual as f64)
            .map_err(|e| ModelError::numerical("anova", e.to_string()))?;

        let mut rows = Vec::with_capacity(contributions.len() + 1);
        for c in contributions {
            let mean_sq = c.reduction / c.df as f64;
            let statistic = mean_sq / residual_mean_sq;
            let p_value = if c.df == 1 {
                f_dist.sf(statistic)
            } else {
                FisherSnedecor::new(c.df as f64, df_residual as f64)
                    .map_err(|e| ModelError::numerical("anova", e.to_string()))?
                    .sf(statistic)
            };
            rows.push(AnovaRow {
                term: c.term,
                df: c.df,
                sum_sq: c.reduction,
                mean_sq: Some(mean_sq),
                statistic: Some(statistic),
                p_value: Some(p_value),
            });
        }
        rows.push(AnovaRow {
            term: "Residuals".to_string(),
            df: df_residual,
            sum_sq: rss,
            mean_sq: Some(residual_mean_sq),
            statistic: None,
            p_value: None,
        });

        Ok(AnovaTable {
            ss_type: options.ss_type,
            test: AnovaTest::F,
            deviance: false,
            rows,
        })
    }

    fn confint(&self, level: f64) -> Result<ConfintTable> {
        ConfintTable::from_estimates(
            &self.design.column_names,
            &self.coefficients,
            &self.standard_errors(),
            self.reference(),
            level,
        )
    }

    fn augment(&self) -> Result<Table> {
        let sigma = self.sigma();
        let influence = Influence::compute(&FitQuantities {
            x: &self.design.x,
            cov_unscaled: &self.cov_unscaled,
            weights: None,
            deviance_resid: &self.residuals,
            pearson_resid: &self.residuals,
            dispersion: sigma * sigma,
        });
        let se_fit: Array1<f64> = influence.hat.mapv(|h| h.sqrt() * sigma);

        augment::augment_table(
            &self.frame,
            &self.fitted_values,
            &se_fit,
            &self.residuals,
            &influence,
        )
    }

    fn log_likelihood(&self) -> f64 {
        self.statistics.log_likelihood.unwrap_or(f64::NAN)
    }

    fn n_params(&self) -> usize {
        self.design.ncols() + 1
    }
}
