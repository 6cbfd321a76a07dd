//! Errors raised while parsing a formula or building its design matrix

use thiserror::Error;

use crate::data::DataError;

#[derive(Debug, Error)]
pub enum FormulaError {
    /// The formula text could not be parsed; `position` is a byte offset
    #[error("Syntax error at position {position}: {message}{}", render_context(.context))]
    Syntax {
        position: usize,
        message: String,
        context: Option<String>,
    },

    #[error("Variable '{variable}' is not a column of the data (columns: {})", .available_vars.join(", "))]
    VariableNotFound {
        variable: String,
        available_vars: Vec<String>,
    },

    #[error("Variable '{variable}' is {actual_type}; expected {expected_type}")]
    TypeMismatch {
        variable: String,
        expected_type: &'static str,
        actual_type: String,
    },

    /// A transformation such as `log()` or `poly()` was misused
    #[error("Invalid call to {function}(): {message}")]
    FunctionError { function: String, message: String },

    #[error("Invalid formula: {message}")]
    InvalidStructure {
        message: String,
        suggestion: Option<String>,
    },

    #[error("The formula has no response; write it as `response ~ terms`")]
    MissingResponse,

    #[error(transparent)]
    Data(#[from] DataError),

    /// A design column contains NaN or infinite values
    #[error("Column '{column}' of the design is not finite: {message}")]
    NumericalError { column: String, message: String },
}

pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

fn render_context(context: &Option<String>) -> String {
    context
        .as_deref()
        .map(|c| format!(" (near `{c}`)"))
        .unwrap_or_default()
}

impl FormulaError {
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        FormulaError::Syntax {
            position,
            message: message.into(),
            context: None,
        }
    }

    pub fn syntax_with_context(
        position: usize,
        message: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        FormulaError::Syntax {
            position,
            message: message.into(),
            context: Some(context.into()),
        }
    }

    pub fn variable_not_found(variable: &str, available_vars: &[&str]) -> Self {
        FormulaError::VariableNotFound {
            variable: variable.to_string(),
            available_vars: available_vars.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn function(function: &str, message: impl Into<String>) -> Self {
        FormulaError::FunctionError {
            function: function.to_string(),
            message: message.into(),
        }
    }
}
