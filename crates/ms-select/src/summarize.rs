//! ANOVA tables and confidence intervals for every model

use std::io::{self, Write};

use ms_core::table::Table;
use ms_models::AnovaOptions;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::guard::{Capability, ensure_available};
use crate::printer::{print_heading, print_sections};
use crate::set::ModelSet;
use crate::validate::run_guarded;

pub const ANOVA_HEADING: &str = "Anova tables";
pub const CONFINT_HEADING: &str = "Confidence Intervals for Coefficients";

/// Options forwarded to each model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryOptions {
    pub anova: AnovaOptions,
    pub confidence_level: f64,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            anova: AnovaOptions::default(),
            confidence_level: 0.95,
        }
    }
}

/// Print the summary of every model to standard output.
///
/// See [`summarize_models_to`].
pub fn summarize_models(models: &ModelSet, options: &SummaryOptions) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    summarize_models_to(&mut out, models, options)
}

/// Write a `# Anova tables` block with one section per model, then a
/// `# Confidence Intervals for Coefficients` block in the same order.
///
/// Every table is computed before anything is written, so a model that
/// cannot be summarized leaves `out` untouched and fails the whole call
/// with [`SelectError::InvalidModelCollection`](crate::SelectError).
pub fn summarize_models_to<W: Write + ?Sized>(
    out: &mut W,
    models: &ModelSet,
    options: &SummaryOptions,
) -> Result<()> {
    ensure_available(Capability::Tables)?;
    ensure_available(Capability::Anova)?;

    let (anova, confint) = run_guarded(|| {
        let mut anova: Vec<(&str, Table)> = Vec::with_capacity(models.len());
        let mut confint: Vec<(&str, Table)> = Vec::with_capacity(models.len());
        for (name, model) in models.iter() {
            anova.push((name, model.anova(&options.anova)?.to_table()?));
            confint.push((name, model.confint(options.confidence_level)?.to_table()?));
            tracing::debug!(model = name, "summarized model");
        }
        Ok((anova, confint))
    })?;

    print_heading(out, ANOVA_HEADING)?;
    print_sections(out, anova)?;
    print_heading(out, CONFINT_HEADING)?;
    print_sections(out, confint)?;

    tracing::info!(models = models.len(), "printed model summaries");
    Ok(())
}
