//! Error types for the model-selection layer

use std::io;

use ms_core::formula::FormulaError;
use ms_models::ModelError;
use thiserror::Error;

/// Errors raised by the model-selection helpers
#[derive(Debug, Error)]
pub enum SelectError {
    /// A capability was compiled out of this build
    #[error("Capability `{capability}` is not available: {remediation}")]
    MissingDependency {
        capability: &'static str,
        remediation: String,
    },

    /// A required builder input was never supplied
    #[error("Argument `{argument}` is missing with no default; supply both formulas and data")]
    MissingArgument { argument: &'static str },

    /// At least one entry of the formula collection is not a usable formula
    #[error(
        "Not all entries are well-formed formulas with a response (offending: {}); \
         check the formula syntax, e.g. \"y ~ x1 + x2\"",
        .names.join(", ")
    )]
    InvalidFormula {
        names: Vec<String>,
        #[source]
        source: FormulaError,
    },

    /// Fitting one of the models failed; the whole build is abandoned
    #[error(
        "Failed to build model `{name}`. Likely causes: a typo in the formula, the wrong \
         dataset, a model function incompatible with the formula, a capability that is not \
         enabled, or a missing required fitting option"
    )]
    ModelConstructionFailed {
        name: String,
        #[source]
        source: ModelError,
    },

    /// The model collection could not be summarized, tidied or compared
    #[error(
        "Invalid model collection: please verify that you supplied a non-empty collection \
         of valid fitted model objects"
    )]
    InvalidModelCollection {
        #[source]
        source: Option<ModelError>,
    },

    /// Writing rendered output failed
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Result type for model-selection operations
pub type Result<T> = std::result::Result<T, SelectError>;
