//! Term types for formula specification
//!
//! This module defines the types representing terms in a formula,
//! such as variables, interactions, and function applications, and how
//! each term turns into design matrix columns.

use std::fmt;

use ndarray::Array1;

use crate::data::{DataFrame, FloatArray, Series};
use crate::formula::error::{FormulaError, FormulaResult};

/// Kind of term
#[derive(Debug, Clone, PartialEq)]
pub enum TermKind {
    /// Simple variable
    Variable(String),
    /// Numeric literal, only meaningful as a function argument
    Number(f64),
    /// Function application such as `log(x)` or `poly(x, 2)`
    Function { name: String, args: Vec<Term> },
    /// Interaction between two or more factors
    Interaction(Vec<Term>),
}

/// A term in a formula
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub kind: TermKind,
}

/// A named design matrix column produced by a term
pub type Column = (String, FloatArray);

impl Term {
    /// Create a new variable term
    pub fn variable(name: &str) -> Self {
        Self {
            kind: TermKind::Variable(name.to_string()),
        }
    }

    /// Create a numeric literal
    pub fn number(value: f64) -> Self {
        Self {
            kind: TermKind::Number(value),
        }
    }

    /// Create a new function term
    pub fn function(name: &str, args: Vec<Term>) -> Self {
        Self {
            kind: TermKind::Function {
                name: name.to_string(),
                args,
            },
        }
    }

    /// Create an interaction, flattening nested interactions.
    ///
    /// A single factor collapses to that factor.
    pub fn interaction(factors: Vec<Term>) -> Self {
        let mut flat: Vec<Term> = Vec::new();
        for factor in factors {
            match factor.kind {
                TermKind::Interaction(inner) => flat.extend(inner),
                _ => flat.push(factor),
            }
        }
        flat.dedup_by(|a, b| a.to_string() == b.to_string());

        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Self {
                kind: TermKind::Interaction(flat),
            }
        }
    }

    /// Check if the term is an interaction
    pub fn is_interaction(&self) -> bool {
        matches!(self.kind, TermKind::Interaction(_))
    }

    /// Get variable name if this is a variable term
    pub fn as_variable(&self) -> Option<&str> {
        match &self.kind {
            TermKind::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// The factors making up this term; a main effect is its own single factor
    pub fn factors(&self) -> Vec<&Term> {
        match &self.kind {
            TermKind::Interaction(factors) => factors.iter().collect(),
            _ => vec![self],
        }
    }

    /// Interaction order: 1 for main effects
    pub fn degree(&self) -> usize {
        self.factors().len()
    }

    /// Order-independent identity: `a:b` and `b:a` share a key
    pub fn key(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.factors().iter().map(|f| f.to_string()).collect();
        labels.sort();
        labels
    }

    /// Whether every factor of `self` also appears in the strictly larger `other`
    pub fn is_marginal_to(&self, other: &Term) -> bool {
        let mine = self.key();
        let theirs = other.key();
        mine.len() < theirs.len() && mine.iter().all(|label| theirs.contains(label))
    }

    /// Collect the data variables this term reads, in order of appearance
    pub fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.kind {
            TermKind::Variable(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            TermKind::Number(_) => {}
            TermKind::Function { args, .. } => args.iter().for_each(|a| a.collect_variables(out)),
            TermKind::Interaction(factors) => {
                factors.iter().for_each(|f| f.collect_variables(out))
            }
        }
    }

    /// Evaluate the term into design matrix columns.
    ///
    /// `contrasts` selects treatment coding (reference level dropped) for
    /// categorical variables; otherwise every level gets an indicator column.
    pub fn columns(&self, df: &DataFrame, contrasts: bool) -> FormulaResult<Vec<Column>> {
        self.coded_columns(df, |_| contrasts)
    }

    /// Evaluate the term, choosing the coding of each factor separately.
    ///
    /// `contrasts` is asked once per factor of an interaction, or once for
    /// the term itself otherwise.
    pub fn coded_columns<F>(&self, df: &DataFrame, contrasts: F) -> FormulaResult<Vec<Column>>
    where
        F: Fn(&Term) -> bool,
    {
        match &self.kind {
            TermKind::Variable(name) => variable_columns(name, df, contrasts(self)),
            TermKind::Number(value) => Err(FormulaError::InvalidStructure {
                message: format!("numeric literal {value} is not a model term"),
                suggestion: Some("use 0 or 1 to control the intercept".to_string()),
            }),
            TermKind::Function { name, args } => function_columns(self, name, args, df),
            TermKind::Interaction(factors) => {
                let mut product: Vec<Column> = Vec::new();
                for factor in factors {
                    let next = factor.columns(df, contrasts(factor))?;
                    if product.is_empty() {
                        product = next;
                        continue;
                    }
                    // First factor varies fastest
                    let mut combined = Vec::with_capacity(product.len() * next.len());
                    for (right_name, right) in &next {
                        for (left_name, left) in &product {
                            combined.push((format!("{left_name}:{right_name}"), left * right));
                        }
                    }
                    product = combined;
                }
                Ok(product)
            }
        }
    }

    /// Key of this term with `factor` taken out
    pub fn key_without(&self, factor: &Term) -> Vec<String> {
        let label = factor.to_string();
        self.key().into_iter().filter(|l| *l != label).collect()
    }
}

fn variable_columns(name: &str, df: &DataFrame, contrasts: bool) -> FormulaResult<Vec<Column>> {
    let series = df
        .get_column(name)
        .ok_or_else(|| FormulaError::variable_not_found(name, &df.column_names()))?;

    match series {
        Series::Categorical(codes, levels) => {
            if contrasts && levels.len() < 2 {
                return Err(FormulaError::InvalidStructure {
                    message: format!(
                        "contrasts need a factor with 2 or more levels; '{name}' has {}",
                        levels.len()
                    ),
                    suggestion: Some(format!("drop '{name}' from the formula")),
                });
            }
            let skip = usize::from(contrasts);
            Ok(levels
                .iter()
                .enumerate()
                .skip(skip)
                .map(|(code, level)| {
                    let indicator: FloatArray = codes
                        .iter()
                        .map(|&c| if c as usize == code { 1.0 } else { 0.0 })
                        .collect();
                    (format!("{name}{level}"), indicator)
                })
                .collect())
        }
        Series::String(_) => Err(FormulaError::TypeMismatch {
            variable: name.to_string(),
            expected_type: "numeric or categorical",
            actual_type: "string".to_string(),
        }),
        numeric => Ok(vec![(name.to_string(), numeric.to_float()?)]),
    }
}

/// Evaluate the single numeric column a unary function is applied to
fn single_column(function: &str, arg: &Term, df: &DataFrame) -> FormulaResult<FloatArray> {
    let mut columns = arg.columns(df, true)?;
    if columns.len() != 1 {
        return Err(FormulaError::function(
            function,
            format!("{function}() expects a single numeric column, got {}", columns.len()),
        ));
    }
    Ok(columns.remove(0).1)
}

fn function_columns(
    term: &Term,
    name: &str,
    args: &[Term],
    df: &DataFrame,
) -> FormulaResult<Vec<Column>> {
    let label = term.to_string();

    if name == "poly" {
        return poly_columns(&label, args, df);
    }

    let [arg] = args else {
        return Err(FormulaError::function(
            name,
            format!("Expected 1 argument, got {}", args.len()),
        ));
    };
    let values = single_column(name, arg, df)?;

    let transformed: Array1<f64> = match name {
        "log" | "log10" | "log2" => {
            if values.iter().any(|&v| v <= 0.0) {
                return Err(FormulaError::function(
                    name,
                    format!("{name}() requires positive values"),
                ));
            }
            match name {
                "log" => values.mapv(f64::ln),
                "log10" => values.mapv(f64::log10),
                _ => values.mapv(f64::log2),
            }
        }
        "sqrt" => {
            if values.iter().any(|&v| v < 0.0) {
                return Err(FormulaError::function(
                    name,
                    "sqrt() requires non-negative values",
                ));
            }
            values.mapv(f64::sqrt)
        }
        "exp" => values.mapv(f64::exp),
        "abs" => values.mapv(f64::abs),
        "I" => values,
        "center" => {
            let mean = values.mean().unwrap_or(0.0);
            values.mapv(|v| v - mean)
        }
        "scale" => {
            let mean = values.mean().unwrap_or(0.0);
            let std = values.std(1.0);
            if std == 0.0 {
                return Err(FormulaError::function(
                    name,
                    "Cannot scale constant variable (std = 0)",
                ));
            }
            values.mapv(|v| (v - mean) / std)
        }
        _ => {
            return Err(FormulaError::function(
                name,
                format!("Function '{name}' not supported"),
            ));
        }
    };

    Ok(vec![(label, transformed)])
}

/// Raw polynomial columns `x, x^2, ..., x^k`, named `poly(x, k)1..k`
fn poly_columns(label: &str, args: &[Term], df: &DataFrame) -> FormulaResult<Vec<Column>> {
    let [arg, degree] = args else {
        return Err(FormulaError::function(
            "poly",
            format!("Expected 2 arguments, got {}", args.len()),
        ));
    };

    let degree = match &degree.kind {
        TermKind::Number(d) if *d >= 1.0 && d.fract() == 0.0 => *d,
        _ => {
            return Err(FormulaError::function(
                "poly",
                format!("poly() degree must be a positive integer, got {degree}"),
            ));
        }
    };
    let nrows = df.nrows();
    if degree >= nrows as f64 {
        return Err(FormulaError::function(
            "poly",
            format!("poly() degree must be less than the number of rows ({nrows}), got {degree}"),
        ));
    }
    // Below nrows, so it fits
    let degree = degree as i32;

    let values = single_column("poly", arg, df)?;
    Ok((1..=degree)
        .map(|d| (format!("{label}{d}"), values.mapv(|v| v.powi(d))))
        .collect())
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TermKind::Variable(name) => write!(f, "{name}"),
            TermKind::Number(value) => write!(f, "{value}"),
            TermKind::Function { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            TermKind::Interaction(factors) => {
                for (i, factor) in factors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ":")?;
                    }
                    write!(f, "{factor}")?;
                }
                Ok(())
            }
        }
    }
}
