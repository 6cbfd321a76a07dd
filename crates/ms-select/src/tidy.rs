//! Combined tables across a model collection
//!
//! Every table has a leading `model` column holding the name each row came
//! from, so the rows of all models can be filtered and grouped together.

use ms_core::table::{Cell, Table};

use crate::error::Result;
use crate::guard::{Capability, ensure_available};
use crate::set::ModelSet;
use crate::validate::run_guarded;

/// Name of the leading column
pub const MODEL_COLUMN: &str = "model";

const COEFFICIENT_COLUMNS: [&str; 8] = [
    MODEL_COLUMN,
    "term",
    "estimate",
    "std.error",
    "statistic",
    "p.value",
    "conf.low",
    "conf.high",
];

const GLANCE_COLUMNS: [&str; 11] = [
    MODEL_COLUMN,
    "nobs",
    "r.squared",
    "adj.r.squared",
    "sigma",
    "logLik",
    "AIC",
    "BIC",
    "deviance",
    "df.residual",
    "converged",
];

/// Stack the per-observation table of every model.
///
/// Each model contributes `augment()` rows prefixed with its name, in
/// collection order. Columns are the union of all models' columns in
/// first-seen order; a model that lacks a column gets `NA` there.
pub fn tidy_predictions(models: &ModelSet) -> Result<Table> {
    ensure_available(Capability::Augment)?;

    let tables = run_guarded(|| {
        models
            .iter()
            .map(|(name, model)| -> ms_models::Result<Table> {
                let augmented = model.augment()?;
                tracing::debug!(model = name, rows = augmented.nrows(), "augmented model");
                Ok(augmented.with_leading_column(MODEL_COLUMN, &Cell::from(name)))
            })
            .collect::<ms_models::Result<Vec<_>>>()
    })?;

    let combined = Table::row_bind(&tables);
    tracing::info!(
        models = models.len(),
        rows = combined.nrows(),
        "combined model predictions"
    );
    Ok(combined)
}

/// One row per coefficient of every model
pub fn tidy_coefficients(models: &ModelSet) -> Result<Table> {
    run_guarded(|| {
        let mut table = Table::new(COEFFICIENT_COLUMNS);
        for (name, model) in models.iter() {
            for coefficient in model.coefficients() {
                table.push_row(vec![
                    Cell::from(name),
                    Cell::from(coefficient.name),
                    Cell::Float(coefficient.estimate),
                    coefficient.std_error.into(),
                    coefficient.statistic.into(),
                    coefficient.p_value.into(),
                    coefficient.ci_lower.into(),
                    coefficient.ci_upper.into(),
                ])?;
            }
        }
        Ok(table)
    })
}

/// One row of fit statistics per model; statistics a model type does not
/// define are `NA`
pub fn glance_models(models: &ModelSet) -> Result<Table> {
    run_guarded(|| {
        let mut table = Table::new(GLANCE_COLUMNS);
        for (name, model) in models.iter() {
            let stats = model.summary()?.model_statistics;
            table.push_row(vec![
                Cell::from(name),
                Cell::from(model.nobs()),
                stats.r_squared.into(),
                stats.adj_r_squared.into(),
                stats.sigma.into(),
                Some(model.log_likelihood()).filter(|v| v.is_finite()).into(),
                model.aic().ok().into(),
                model.bic().ok().into(),
                stats.deviance.into(),
                stats.df_residual.map_or(Cell::Missing, Cell::from),
                stats.converged.map_or(Cell::Missing, Cell::from),
            ])?;
        }
        Ok(table)
    })
}
