//! Information-criterion comparison and Akaike weights
//!
//! For scores `s_i` the comparison reports `delta_i = s_i - min(s)`,
//! relative likelihoods `exp(-delta_i / 2)` and weights normalized to sum
//! to one. Weights are the probability that each model is the best of the
//! collection under the chosen criterion.

use std::fmt;

use ms_core::table::{Cell, Table};
use ms_models::FittedModel;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SelectError};
use crate::set::ModelSet;
use crate::validate::run_guarded;

/// Information criterion used to rank models
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    #[default]
    Aic,
    /// Small-sample corrected AIC
    Aicc,
    Bic,
}

impl Criterion {
    /// Lowercase name used in column labels
    pub fn name(self) -> &'static str {
        match self {
            Criterion::Aic => "aic",
            Criterion::Aicc => "aicc",
            Criterion::Bic => "bic",
        }
    }

    pub fn score(self, model: &dyn FittedModel) -> ms_models::Result<f64> {
        match self {
            Criterion::Aic => model.aic(),
            Criterion::Aicc => model.aicc(),
            Criterion::Bic => model.bic(),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One model's standing in a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub name: String,
    pub score: f64,
    /// Distance from the best score; zero for the best model
    pub delta: f64,
    /// `exp(-delta / 2)`
    pub likelihood: f64,
    pub weight: f64,
}

/// Ranking of a model collection, rows in collection order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub criterion: Criterion,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn get(&self, name: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|row| row.name == name)
    }

    /// The row with the smallest score; the first one on ties
    pub fn best(&self) -> Option<&ComparisonRow> {
        self.rows
            .iter()
            .reduce(|best, row| if row.delta < best.delta { row } else { best })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as `model | aic | delta_aic | likelihood | aic_weight`, with
    /// the criterion's name in place of `aic`
    pub fn to_table(&self) -> Table {
        let name = self.criterion.name();
        let mut table = Table::new([
            "model".to_string(),
            name.to_string(),
            format!("delta_{name}"),
            "likelihood".to_string(),
            format!("{name}_weight"),
        ]);
        for row in &self.rows {
            // Rows always have five cells
            let _ = table.push_row(vec![
                Cell::from(row.name.as_str()),
                Cell::Float(row.score),
                Cell::Float(row.delta),
                Cell::Float(row.likelihood),
                Cell::Float(row.weight),
            ]);
        }
        table
    }
}

impl fmt::Display for ComparisonTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_table())
    }
}

/// Deltas, relative likelihoods and weights for finite `scores`
pub fn akaike_weights(scores: &[f64]) -> Vec<(f64, f64, f64)> {
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let likelihoods: Vec<(f64, f64)> = scores
        .iter()
        .map(|&score| {
            let delta = score - min;
            (delta, (-0.5 * delta).exp())
        })
        .collect();
    let total: f64 = likelihoods.iter().map(|&(_, l)| l).sum();
    likelihoods
        .into_iter()
        .map(|(delta, likelihood)| (delta, likelihood, likelihood / total))
        .collect()
}

/// Rank `models` by `criterion`.
///
/// Fails with [`SelectError::InvalidModelCollection`] for an empty
/// collection or when any model's score cannot be computed.
pub fn compare_models(models: &ModelSet, criterion: Criterion) -> Result<ComparisonTable> {
    if models.is_empty() {
        tracing::warn!("cannot compare an empty model collection");
        return Err(SelectError::InvalidModelCollection { source: None });
    }

    let scores = run_guarded(|| {
        models
            .iter()
            .map(|(name, model)| -> ms_models::Result<f64> {
                let score = criterion.score(model)?;
                tracing::debug!(model = name, criterion = %criterion, score, "scored model");
                Ok(score)
            })
            .collect::<ms_models::Result<Vec<_>>>()
    })?;

    let rows = models
        .names()
        .zip(&scores)
        .zip(akaike_weights(&scores))
        .map(|((name, &score), (delta, likelihood, weight))| ComparisonRow {
            name: name.to_string(),
            score,
            delta,
            likelihood,
            weight,
        })
        .collect();

    let table = ComparisonTable { criterion, rows };
    if let Some(best) = table.best() {
        tracing::info!(criterion = %criterion, best = %best.name, "compared models");
    }
    Ok(table)
}

/// AIC table of a model collection: `compare_models(models, Criterion::Aic)`
pub fn summarize_aic(models: &ModelSet) -> Result<ComparisonTable> {
    compare_models(models, Criterion::Aic)
}

#[cfg(test)]
mod tests;
