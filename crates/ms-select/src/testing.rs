//! Shared fixtures for the unit tests

use ms_core::data::{DataFrame, DataFrameBuilder, Series};
use ms_core::formula::Formula;
use ms_core::table::Table;
use ms_models::{
    AnovaOptions, AnovaTable, Coefficient, ConfintTable, FittedModel, ModelError, ModelSummary,
    ModelType,
};

use crate::builder::ModelBuilder;
use crate::set::ModelSet;

/// Life expectancy rises with GDP and is unrelated to population
pub(crate) fn countries() -> DataFrame {
    DataFrameBuilder::new()
        .with_column(
            "life",
            Series::float(vec![
                53.3, 55.35, 57.85, 62.5, 63.55, 64.95, 68.9, 70.4, 74.95, 75.75,
            ]),
        )
        .unwrap()
        .with_column(
            "pop",
            Series::float(vec![30.0, 12.0, 45.0, 8.0, 27.0, 50.0, 15.0, 33.0, 21.0, 40.0]),
        )
        .unwrap()
        .with_column(
            "gdp",
            Series::float(vec![1.2, 2.3, 3.1, 4.8, 5.5, 6.1, 7.4, 8.2, 9.9, 10.5]),
        )
        .unwrap()
        .with_column(
            "region",
            Series::categorical(&[
                "north", "south", "north", "south", "north", "south", "north", "south", "north",
                "south",
            ]),
        )
        .unwrap()
        .build()
        .unwrap()
}

/// `{pop: life ~ pop, gdp: life ~ gdp}` fitted by OLS
pub(crate) fn pop_gdp_models() -> ModelSet {
    ModelBuilder::new()
        .formula("pop", "life ~ pop")
        .formula("gdp", "life ~ gdp")
        .data(&countries())
        .build()
        .unwrap()
}

/// A model whose every extraction fails
#[derive(Debug)]
pub(crate) struct BrokenModel {
    formula: Formula,
}

impl BrokenModel {
    pub(crate) fn new() -> Self {
        Self {
            formula: Formula::parse("life ~ broken").unwrap(),
        }
    }

    fn unsupported(operation: &str) -> ModelError {
        ModelError::Unsupported {
            operation: operation.to_string(),
            model: "BrokenModel".to_string(),
        }
    }
}

impl FittedModel for BrokenModel {
    fn formula(&self) -> &Formula {
        &self.formula
    }

    fn nobs(&self) -> usize {
        0
    }

    fn model_type(&self) -> ModelType {
        ModelType::Other("broken".to_string())
    }

    fn coefficients(&self) -> Vec<Coefficient> {
        Vec::new()
    }

    fn summary(&self) -> ms_models::Result<ModelSummary> {
        Err(Self::unsupported("summary"))
    }

    fn anova(&self, _options: &AnovaOptions) -> ms_models::Result<AnovaTable> {
        Err(Self::unsupported("anova"))
    }

    fn confint(&self, _level: f64) -> ms_models::Result<ConfintTable> {
        Err(Self::unsupported("confint"))
    }

    fn augment(&self) -> ms_models::Result<Table> {
        Err(Self::unsupported("augment"))
    }

    fn log_likelihood(&self) -> f64 {
        f64::NAN
    }

    fn n_params(&self) -> usize {
        1
    }
}

/// A model that only reports a fixed AIC
#[derive(Debug)]
pub(crate) struct FixedAic {
    formula: Formula,
    aic: f64,
}

impl FixedAic {
    pub(crate) fn new(aic: f64) -> Self {
        Self {
            formula: Formula::parse("y ~ x").unwrap(),
            aic,
        }
    }
}

impl FittedModel for FixedAic {
    fn formula(&self) -> &Formula {
        &self.formula
    }

    fn nobs(&self) -> usize {
        100
    }

    fn model_type(&self) -> ModelType {
        ModelType::Other("fixed".to_string())
    }

    fn coefficients(&self) -> Vec<Coefficient> {
        Vec::new()
    }

    fn summary(&self) -> ms_models::Result<ModelSummary> {
        Err(BrokenModel::unsupported("summary"))
    }

    fn anova(&self, _options: &AnovaOptions) -> ms_models::Result<AnovaTable> {
        Err(BrokenModel::unsupported("anova"))
    }

    fn confint(&self, _level: f64) -> ms_models::Result<ConfintTable> {
        Err(BrokenModel::unsupported("confint"))
    }

    fn augment(&self) -> ms_models::Result<Table> {
        Err(BrokenModel::unsupported("augment"))
    }

    fn log_likelihood(&self) -> f64 {
        (2.0 - self.aic) / 2.0
    }

    fn n_params(&self) -> usize {
        1
    }

    fn aic(&self) -> ms_models::Result<f64> {
        if self.aic.is_finite() {
            Ok(self.aic)
        } else {
            Err(ModelError::NotComputable {
                quantity: "AIC",
                model: "fixed".to_string(),
                reason: format!("AIC is {}", self.aic),
            })
        }
    }
}
