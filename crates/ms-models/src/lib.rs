//! Statistical models for multi-model analysis
//!
//! Linear ([`lm`]) and generalized linear ([`glm`]) models fitted from
//! R-style formulas, all exposed through the object-safe [`FittedModel`]
//! trait. Each model provides ANOVA tables, coefficient confidence
//! intervals, per-observation diagnostics and information criteria.
//!
//! The `anova` and `augment` cargo features (on by default) enable the
//! ANOVA decomposition and the per-observation table.

pub mod anova;
pub mod augment;
pub mod base;
pub mod confint;
pub mod convert;
pub mod error;
pub mod glm;
pub mod lm;

pub use anova::{AnovaOptions, AnovaRow, AnovaTable, AnovaTest, SumOfSquares};
pub use augment::AUGMENT_COLUMNS;
pub use base::{
    Coefficient, FittedModel, ModelFitter, ModelStatistics, ModelSummary, ModelType,
    ResidualStatistics, Result,
};
pub use confint::{ConfintRow, ConfintTable, Reference};
pub use error::ModelError;
pub use glm::{Family, GeneralizedLinearModel, GlmConfig, GlmFitter, glm};
pub use lm::{LinearConfig, LinearFitter, LinearRegression, lm};
