//! Multi-model helpers
//!
//! Fit a named collection of candidate formulas against one data frame,
//! then summarize, tidy and rank the resulting models:
//!
//! - [`ModelBuilder`] fits one model per named formula into a [`ModelSet`]
//! - [`summarize_models`] prints every model's ANOVA table and coefficient
//!   confidence intervals as Markdown sections
//! - [`tidy_predictions`] stacks every model's per-observation table
//! - [`summarize_aic`] ranks the models by AIC and computes Akaike weights
//!
//! Capabilities that depend on optional cargo features (`anova`, `augment`,
//! `tables`) are checked up front by [`ensure_available`].

pub mod builder;
pub mod compare;
pub mod error;
pub mod guard;
pub mod printer;
pub mod set;
pub mod summarize;
pub mod tidy;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::ModelBuilder;
pub use compare::{ComparisonRow, ComparisonTable, Criterion, compare_models, summarize_aic};
pub use error::{Result, SelectError};
pub use guard::{Capability, ensure_available};
pub use printer::{print_sections, render_sections};
pub use set::ModelSet;
pub use summarize::{SummaryOptions, summarize_models, summarize_models_to};
pub use tidy::{glance_models, tidy_coefficients, tidy_predictions};
pub use validate::run_guarded;
