//! Fitted generalized linear model

use ms_core::data::{DataFrame, FloatArray};
use ms_core::formula::{Design, Formula, FormulaError};
use ms_core::table::Table;
use ndarray::Array1;
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor};

use super::irls::{self, IrlsFit};
use super::{Family, GlmConfig};
use crate::anova::{self, AnovaOptions, AnovaRow, AnovaTable, AnovaTest, TermContribution};
use crate::augment::{self, FitQuantities, Influence};
use crate::base::{
    model_frame, Coefficient, FittedModel, ModelError, ModelStatistics, ModelSummary, ModelType,
    ResidualStatistics, Result,
};
use crate::confint::{self, ConfintTable, Reference};
use crate::convert;

#[derive(Debug, Clone)]
pub struct GeneralizedLinearModel {
    formula: Formula,
    design: Design,
    frame: DataFrame,
    y: FloatArray,
    config: GlmConfig,
    fit: IrlsFit,
    dispersion: f64,
    statistics: ModelStatistics,
}

impl GeneralizedLinearModel {
    pub fn fit(formula: &Formula, data: &DataFrame, config: GlmConfig) -> Result<Self> {
        config.validate()?;
        let family = config.family;

        let design = formula.design(data)?;
        let y = design.y.clone().ok_or(FormulaError::MissingResponse)?;
        family.validate_response(&y)?;

        let n = design.nrows();
        let p = design.ncols();
        if n <= p {
            return Err(ModelError::InsufficientData {
                n_samples: n,
                n_predictors: p,
            });
        }

        let fit = irls::fit(&design.x, &y, family, &config)?;
        let df_residual = n - p;
        let dispersion = if family.estimates_dispersion() {
            pearson_residuals(family, &y, &fit.mu).mapv(|r| r * r).sum() / df_residual as f64
        } else {
            1.0
        };

        let null_deviance = null_deviance(family, &y, design.has_intercept);
        let log_likelihood = family.log_likelihood(&y, &fit.mu);
        let k = family.n_params(p) as f64;

        let statistics = ModelStatistics {
            sigma: family.estimates_dispersion().then(|| dispersion.sqrt()),
            log_likelihood: Some(log_likelihood),
            aic: Some(-2.0 * log_likelihood + 2.0 * k),
            bic: Some(-2.0 * log_likelihood + k * (n as f64).ln()),
            null_deviance: Some(null_deviance),
            deviance: Some(fit.deviance),
            dispersion: Some(dispersion),
            df_residual: Some(df_residual),
            df_model: Some(p - usize::from(design.has_intercept)),
            df_null: Some(n - usize::from(design.has_intercept)),
            iterations: Some(fit.iterations),
            converged: Some(fit.converged),
            ..ModelStatistics::default()
        };

        tracing::debug!(
            formula = %formula,
            family = family.name(),
            n,
            p,
            deviance = fit.deviance,
            iterations = fit.iterations,
            "fitted generalized linear model"
        );

        Ok(Self {
            formula: formula.clone(),
            frame: model_frame(formula, data)?,
            design,
            y,
            config,
            fit,
            dispersion,
            statistics,
        })
    }

    pub fn family(&self) -> Family {
        self.config.family
    }

    pub fn estimates(&self) -> &FloatArray {
        &self.fit.coefficients
    }

    pub fn standard_errors(&self) -> FloatArray {
        self.fit
            .cov_unscaled
            .diag()
            .mapv(|v| (v * self.dispersion).sqrt())
    }

    /// Fitted means on the response scale
    pub fn fitted_values(&self) -> &FloatArray {
        &self.fit.mu
    }

    /// Linear predictor
    pub fn linear_predictor(&self) -> &FloatArray {
        &self.fit.eta
    }

    pub fn deviance(&self) -> f64 {
        self.fit.deviance
    }

    pub fn dispersion(&self) -> f64 {
        self.dispersion
    }

    pub fn converged(&self) -> bool {
        self.fit.converged
    }

    pub fn column_names(&self) -> &[String] {
        &self.design.column_names
    }

    pub fn df_residual(&self) -> usize {
        self.design.nrows() - self.design.ncols()
    }

    pub fn statistics(&self) -> &ModelStatistics {
        &self.statistics
    }

    pub fn deviance_residuals(&self) -> FloatArray {
        let family = self.family();
        self.y
            .iter()
            .zip(self.fit.mu.iter())
            .map(|(&y, &mu)| (y - mu).signum() * family.unit_deviance(y, mu).max(0.0).sqrt())
            .collect()
    }

    pub fn pearson_residuals(&self) -> FloatArray {
        pearson_residuals(self.family(), &self.y, &self.fit.mu)
    }

    fn reference(&self) -> Reference {
        if self.family().estimates_dispersion() {
            Reference::StudentT(self.df_residual() as f64)
        } else {
            Reference::Normal
        }
    }

    /// Residual deviance of a refit on a subset of the design columns
    fn deviance_of(&self, columns: &[usize]) -> Result<f64> {
        let family = self.family();
        if columns.is_empty() {
            let mu = Array1::from_elem(self.y.len(), family.inverse_link(0.0));
            return Ok(family.deviance(&self.y, &mu));
        }
        let x = self.design.select_columns(columns);
        Ok(irls::fit(&x, &self.y, family, &self.config)?.deviance)
    }

    fn deviance_rows(&self, contributions: Vec<TermContribution>) -> Result<Vec<AnovaRow>> {
        contributions
            .into_iter()
            .map(|c| {
                let statistic = c.reduction / self.dispersion;
                let p_value = ChiSquared::new(c.df as f64)
                    .map_err(|e| ModelError::numerical("anova", e.to_string()))?
                    .sf(statistic);
                Ok(AnovaRow {
                    term: c.term,
                    df: c.df,
                    sum_sq: c.reduction,
                    mean_sq: None,
                    statistic: Some(statistic),
                    p_value: Some(p_value),
                })
            })
            .collect()
    }

    fn f_rows(&self, contributions: Vec<TermContribution>) -> Result<Vec<AnovaRow>> {
        let df_residual = self.df_residual();
        let mut rows = contributions
            .into_iter()
            .map(|c| {
                let mean_sq = c.reduction / c.df as f64;
                let statistic = mean_sq / self.dispersion;
                let p_value = FisherSnedecor::new(c.df as f64, df_residual as f64)
                    .map_err(|e| ModelError::numerical("anova", e.to_string()))?
                    .sf(statistic);
                Ok(AnovaRow {
                    term: c.term,
                    df: c.df,
                    sum_sq: c.reduction,
                    mean_sq: Some(mean_sq),
                    statistic: Some(statistic),
                    p_value: Some(p_value),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(AnovaRow {
            term: "Residuals".to_string(),
            df: df_residual,
            sum_sq: self.fit.deviance,
            mean_sq: Some(self.dispersion),
            statistic: None,
            p_value: None,
        });
        Ok(rows)
    }
}

fn pearson_residuals(family: Family, y: &FloatArray, mu: &FloatArray) -> FloatArray {
    y.iter()
        .zip(mu.iter())
        .map(|(&yi, &mi)| (yi - mi) / family.variance(mi).sqrt())
        .collect()
}

/// Deviance of the intercept-only model, or of `eta = 0` without an intercept
fn null_deviance(family: Family, y: &FloatArray, has_intercept: bool) -> f64 {
    let mu = if has_intercept {
        family.clamp_mu(y.mean().unwrap_or(0.0))
    } else {
        family.inverse_link(0.0)
    };
    family.deviance(y, &Array1::from_elem(y.len(), mu))
}

impl FittedModel for GeneralizedLinearModel {
    fn formula(&self) -> &Formula {
        &self.formula
    }

    fn nobs(&self) -> usize {
        self.design.nrows()
    }

    fn model_type(&self) -> ModelType {
        self.family().model_type()
    }

    fn coefficients(&self) -> Vec<Coefficient> {
        confint::coefficient_table(
            &self.design.column_names,
            &self.fit.coefficients,
            &self.standard_errors(),
            self.reference(),
            self.config.confidence_level,
        )
        .unwrap_or_else(|_| {
            self.design
                .column_names
                .iter()
                .zip(self.fit.coefficients.iter())
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
            residual_statistics: ResidualStatistics::from_residuals(&self.deviance_residuals()),
        })
    }

    fn anova(&self, options: &AnovaOptions) -> Result<AnovaTable> {
        let contributions = anova::decompose(&self.formula, &self.design, options.ss_type, |cols| {
            self.deviance_of(cols)
        })?;

        let (test, rows) = if self.family().estimates_dispersion() {
            (AnovaTest::F, self.f_rows(contributions)?)
        } else {
            (AnovaTest::Chisq, self.deviance_rows(contributions)?)
        };

        Ok(AnovaTable {
            ss_type: options.ss_type,
            test,
            deviance: true,
            rows,
        })
    }

    fn confint(&self, level: f64) -> Result<ConfintTable> {
        ConfintTable::from_estimates(
            &self.design.column_names,
            &self.fit.coefficients,
            &self.standard_errors(),
            self.reference(),
            level,
        )
    }

    fn augment(&self) -> Result<Table> {
        let deviance_resid = self.deviance_residuals();
        let pearson_resid = self.pearson_residuals();
        let influence = Influence::compute(&FitQuantities {
            x: &self.design.x,
            cov_unscaled: &self.fit.cov_unscaled,
            weights: Some(&self.fit.weights),
            deviance_resid: &deviance_resid,
            pearson_resid: &pearson_resid,
            dispersion: self.dispersion,
        });
        let se_fit = convert::quadratic_form_diagonal(&self.design.x, &self.fit.cov_unscaled)
            .mapv(|v| (v * self.dispersion).sqrt());

        augment::augment_table(
            &self.frame,
            &self.fit.eta,
            &se_fit,
            &deviance_resid,
            &influence,
        )
    }

    fn log_likelihood(&self) -> f64 {
        self.statistics.log_likelihood.unwrap_or(f64::NAN)
    }

    fn n_params(&self) -> usize {
        self.family().n_params(self.design.ncols())
    }
}
