//! Fit one model per named formula

use std::fmt;

use indexmap::IndexMap;
use ms_core::data::DataFrame;
use ms_core::formula::{Formula, FormulaError};
use ms_models::{LinearFitter, ModelFitter};

use crate::error::{Result, SelectError};
use crate::guard::{Capability, ensure_available};
use crate::set::ModelSet;

/// Builds a [`ModelSet`] from named formulas, a data frame and a fitter.
///
/// ```ignore
/// let models = ModelBuilder::new()
///     .formula("pop", "life ~ pop")
///     .formula("gdp", "life ~ gdp")
///     .data(&countries)
///     .build()?;
/// ```
///
/// The fitter defaults to ordinary least squares ([`LinearFitter`]); any
/// [`ModelFitter`] can be supplied, including closures. Fitting options
/// belong to the fitter value.
pub struct ModelBuilder<'a> {
    formulas: IndexMap<String, String>,
    data: Option<&'a DataFrame>,
    fitter: Box<dyn ModelFitter + 'a>,
}

impl<'a> ModelBuilder<'a> {
    pub fn new() -> Self {
        Self {
            formulas: IndexMap::new(),
            data: None,
            fitter: Box::new(LinearFitter::default()),
        }
    }

    /// Add a named formula; a repeated name replaces the earlier formula
    /// but keeps its position
    pub fn formula(mut self, name: impl Into<String>, formula: impl Into<String>) -> Self {
        self.formulas.insert(name.into(), formula.into());
        self
    }

    /// Add several named formulas in iteration order
    pub fn formulas<I, K, V>(mut self, formulas: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.formulas
            .extend(formulas.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn data(mut self, data: &'a DataFrame) -> Self {
        self.data = Some(data);
        self
    }

    pub fn fitter<F: ModelFitter + 'a>(mut self, fitter: F) -> Self {
        self.fitter = Box::new(fitter);
        self
    }

    /// Fit every formula.
    ///
    /// Checks, in order: formulas and data were supplied
    /// ([`SelectError::MissingArgument`]); every formula parses and has a
    /// response ([`SelectError::InvalidFormula`]); every fit succeeds
    /// ([`SelectError::ModelConstructionFailed`] for the first failure).
    /// Nothing is returned unless all models were fitted.
    pub fn build(&self) -> Result<ModelSet> {
        ensure_available(Capability::ModelFitting)?;

        if self.formulas.is_empty() {
            return Err(SelectError::MissingArgument {
                argument: "formulas",
            });
        }
        let data = self.data.ok_or(SelectError::MissingArgument { argument: "data" })?;

        let formulas = self.parse_formulas()?;

        let mut models = ModelSet::new();
        for (name, formula) in formulas {
            let model = self.fitter.fit(&formula, data).map_err(|err| {
                tracing::error!(model = %name, formula = %formula, error = %err, "model fitting failed");
                SelectError::ModelConstructionFailed {
                    name: name.to_string(),
                    source: err,
                }
            })?;
            tracing::debug!(model = %name, nobs = model.nobs(), "fitted model");
            models.insert(name, model);
        }

        tracing::info!(models = models.len(), "built model collection");
        Ok(models)
    }

    fn parse_formulas(&self) -> Result<Vec<(&str, Formula)>> {
        let mut parsed = Vec::with_capacity(self.formulas.len());
        let mut offending = Vec::new();
        let mut first_error = None;

        for (name, source) in &self.formulas {
            let result = Formula::parse(source).and_then(|formula| {
                if formula.has_response() {
                    Ok(formula)
                } else {
                    Err(FormulaError::MissingResponse)
                }
            });
            match result {
                Ok(formula) => parsed.push((name.as_str(), formula)),
                Err(err) => {
                    offending.push(name.clone());
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            None => Ok(parsed),
            Some(source) => Err(SelectError::InvalidFormula {
                names: offending,
                source,
            }),
        }
    }
}

impl Default for ModelBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ModelBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBuilder")
            .field("formulas", &self.formulas)
            .field("data", &self.data.map(DataFrame::shape))
            .finish_non_exhaustive()
    }
}
