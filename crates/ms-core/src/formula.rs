//! R-style formula parsing and design matrix construction
//!
//! This module provides formula parsing similar to R's formula syntax,
//! used for specifying statistical models.

use std::fmt;
use std::str::FromStr;

use crate::data::DataFrame;

mod design;
pub mod error;
mod parser;
mod term;


pub use design::{Design, INTERCEPT};
pub use error::{FormulaError, FormulaResult};
pub use parser::FormulaParser;
pub use term::{Column, Term, TermKind};

/// A parsed formula specifying a statistical model
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    /// Response variable (left-hand side)
    pub response: Option<String>,

    /// Terms on the right-hand side, main effects before interactions
    pub terms: Vec<Term>,

    /// Whether to include an intercept
    pub has_intercept: bool,

    /// Original formula string
    pub original: String,
}

impl Formula {
    /// Parse a formula from a string
    pub fn parse(formula: &str) -> FormulaResult<Self> {
        FormulaParser::parse(formula)
    }

    /// Check if formula has a response variable
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }

    /// Data variables the formula reads, response first, without duplicates
    pub fn variables(&self) -> Vec<&str> {
        let mut vars = Vec::new();
        if let Some(response) = &self.response {
            vars.push(response.as_str());
        }
        for term in &self.terms {
            term.collect_variables(&mut vars);
        }
        vars
    }

    /// Labels of the right-hand side terms, in model order
    pub fn term_labels(&self) -> Vec<String> {
        self.terms.iter().map(Term::to_string).collect()
    }

    /// Evaluate the formula against a data frame.
    ///
    /// A formula without a response yields `Design::y == None`.
    pub fn design(&self, df: &DataFrame) -> FormulaResult<Design> {
        Design::build(self, df)
    }
}

impl FromStr for Formula {
    type Err = FormulaError;

    fn from_str(s: &str) -> FormulaResult<Self> {
        Formula::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.response {
            Some(response) => write!(f, "{response} ~ ")?,
            None => write!(f, "~ ")?,
        }

        if self.terms.is_empty() {
            return write!(f, "{}", if self.has_intercept { "1" } else { "0" });
        }

        if !self.has_intercept {
            write!(f, "0 + ")?;
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}
