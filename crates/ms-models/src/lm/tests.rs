//! Tests for linear regression models

use approx::assert_abs_diff_eq;
use ms_core::data::{DataFrame, DataFrameBuilder, Series};
use ms_core::formula::{Formula, FormulaError, INTERCEPT};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::Distribution;

use super::{LinearConfig, LinearFitter, LinearRegression, lm};
use crate::anova::{AnovaOptions, SumOfSquares};
use crate::augment::AUGMENT_COLUMNS;
use crate::base::{FittedModel, ModelError, ModelFitter, ModelType};

// ==================== Test Fixtures ====================

/// y = 0.09 + 1.97x with residuals -0.06, 0.07, -0.1, 0.23, -0.14
fn small_data() -> DataFrame {
    DataFrameBuilder::new()
        .with_column("x", Series::float(vec![1.0, 2.0, 3.0, 4.0, 5.0]))
        .unwrap()
        .with_column("y", Series::float(vec![2.0, 4.1, 5.9, 8.2, 9.8]))
        .unwrap()
        .build()
        .unwrap()
}

/// y = 1 + 2a - b + group effect + noise
fn noisy_data() -> DataFrame {
    let n = 60;
    let mut rng = StdRng::seed_from_u64(7);
    let noise = rand_distr::Normal::new(0.0, 0.5).unwrap();

    let mut a = Vec::with_capacity(n);
    let mut b = Vec::with_capacity(n);
    let mut g = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        let a_val = i as f64 * 0.1;
        let b_val = (i as f64).sin() + 0.3 * a_val;
        let group = ["lo", "mid", "hi"][i % 3];
        let shift = match group {
            "lo" => 0.0,
            "mid" => 1.5,
            _ => -1.0,
        };
        a.push(a_val);
        b.push(b_val);
        g.push(group);
        y.push(1.0 + 2.0 * a_val - b_val + shift + noise.sample(&mut rng));
    }

    DataFrameBuilder::new()
        .with_column("a", Series::float(a))
        .unwrap()
        .with_column("b", Series::float(b))
        .unwrap()
        .with_column("g", Series::categorical(&g))
        .unwrap()
        .with_column("y", Series::float(y))
        .unwrap()
        .build()
        .unwrap()
}

// ==================== Fitting ====================

#[test]
fn test_simple_regression_estimates() {
    let model = lm("y ~ x", &small_data()).unwrap();

    assert_eq!(model.column_names(), &[INTERCEPT.to_string(), "x".to_string()]);
    assert_abs_diff_eq!(model.estimates()[0], 0.09, epsilon = 1e-10);
    assert_abs_diff_eq!(model.estimates()[1], 1.97, epsilon = 1e-10);
    assert_abs_diff_eq!(model.rss(), 0.091, epsilon = 1e-10);
    assert_eq!(model.df_residual(), 3);
    assert_eq!(model.nobs(), 5);

    let stats = model.statistics();
    assert_abs_diff_eq!(stats.r_squared.unwrap(), 1.0 - 0.091 / 38.9, epsilon = 1e-10);
    assert_abs_diff_eq!(stats.sigma.unwrap(), (0.091_f64 / 3.0).sqrt(), epsilon = 1e-10);
    assert_eq!(stats.df_model, Some(1));
}

#[test]
fn test_standard_errors_and_tests() {
    let model = lm("y ~ x", &small_data()).unwrap();
    let sigma2 = 0.091 / 3.0;

    let se = model.standard_errors();
    assert_abs_diff_eq!(se[1], (sigma2 / 10.0_f64).sqrt(), epsilon = 1e-10);

    let coefficients = model.coefficients();
    assert!(coefficients[0].is_intercept);
    assert!(!coefficients[1].is_intercept);
    let slope = &coefficients[1];
    assert_abs_diff_eq!(slope.statistic.unwrap(), 1.97 / se[1], epsilon = 1e-8);
    assert_eq!(slope.df, Some(3.0));
    assert!(slope.p_value.unwrap() < 1e-4);
    assert!(slope.ci_lower.unwrap() < 1.97 && 1.97 < slope.ci_upper.unwrap());

    // The F test of a single slope is the squared t test
    let f = model.statistics().f_statistic.unwrap();
    assert_abs_diff_eq!(f, slope.statistic.unwrap().powi(2), epsilon = 1e-6);
}

#[test]
fn test_residuals_sum_to_zero_with_intercept() {
    let model = lm("y ~ a + b + g", &noisy_data()).unwrap();
    assert_abs_diff_eq!(model.residuals().sum(), 0.0, epsilon = 1e-8);
    assert_eq!(model.column_names().len(), 5);
}

#[test]
fn test_no_intercept_model() {
    let data = DataFrameBuilder::new()
        .with_column("x", Series::float(vec![1.0, 2.0, 3.0, 4.0]))
        .unwrap()
        .with_column("y", Series::float(vec![2.1, 3.9, 6.2, 7.8]))
        .unwrap()
        .build()
        .unwrap();
    let model = lm("y ~ 0 + x", &data).unwrap();

    // sum(xy) / sum(x^2)
    assert_abs_diff_eq!(model.estimates()[0], 59.7 / 30.0, epsilon = 1e-10);
    assert_eq!(model.df_residual(), 3);
    assert_eq!(model.statistics().df_model, Some(1));
    assert!(model.coefficients().iter().all(|c| !c.is_intercept));
}

#[test]
fn test_predict_on_training_data() {
    let data = noisy_data();
    let model = lm("y ~ a + g", &data).unwrap();
    let predicted = model.predict(&data).unwrap();
    for (p, f) in predicted.iter().zip(model.fitted_values().iter()) {
        assert_abs_diff_eq!(p, f, epsilon = 1e-10);
    }
}

// ==================== Errors ====================

#[test]
fn test_insufficient_data() {
    let data = DataFrameBuilder::new()
        .with_column("x", Series::float(vec![1.0, 2.0]))
        .unwrap()
        .with_column("y", Series::float(vec![1.0, 3.0]))
        .unwrap()
        .build()
        .unwrap();
    assert!(matches!(
        lm("y ~ x", &data),
        Err(ModelError::InsufficientData {
            n_samples: 2,
            n_predictors: 2
        })
    ));
}

#[test]
fn test_singular_design() {
    let data = DataFrameBuilder::new()
        .with_column("x", Series::float(vec![0.0; 5]))
        .unwrap()
        .with_column("y", Series::float(vec![1.0, 2.0, 3.0, 4.0, 5.0]))
        .unwrap()
        .build()
        .unwrap();
    assert!(matches!(
        lm("y ~ x", &data),
        Err(ModelError::SingularMatrix { .. })
    ));
}

#[test]
fn test_missing_response_and_variable() {
    let data = small_data();
    assert!(matches!(
        lm("~ x", &data),
        Err(ModelError::Formula(FormulaError::MissingResponse))
    ));
    assert!(matches!(
        lm("y ~ z", &data),
        Err(ModelError::Formula(FormulaError::VariableNotFound { .. }))
    ));
}

#[test]
fn test_invalid_confidence_level() {
    let formula = Formula::parse("y ~ x").unwrap();
    let config = LinearConfig {
        confidence_level: 1.5,
    };
    assert!(matches!(
        LinearRegression::fit(&formula, &small_data(), config),
        Err(ModelError::InvalidConfig { .. })
    ));
}

/// Two groups with slopes 2 and -1
fn two_slopes() -> DataFrame {
    let mut x = Vec::new();
    let mut g = Vec::new();
    let mut y = Vec::new();
    for i in 0..20 {
        let x_val = f64::from(i % 10) + 1.0;
        let wobble = 0.2 * f64::from(i).sin();
        let (group, y_val) = if i < 10 {
            ("a", 1.0 + 2.0 * x_val)
        } else {
            ("b", 3.0 - x_val)
        };
        x.push(x_val);
        g.push(group);
        y.push(y_val + wobble);
    }

    DataFrameBuilder::new()
        .with_column("x", Series::float(x))
        .unwrap()
        .with_column("g", Series::categorical(&g))
        .unwrap()
        .with_column("y", Series::float(y))
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn test_interaction_without_marginal_spans_same_space() {
    let data = two_slopes();
    let crossed = lm("y ~ g * x", &data).unwrap();
    let nested = lm("y ~ g + x:g", &data).unwrap();

    assert_eq!(
        nested.column_names(),
        &[INTERCEPT.to_string(), "gb".to_string(), "x:ga".to_string(), "x:gb".to_string()]
    );
    assert_abs_diff_eq!(nested.rss(), crossed.rss(), epsilon = 1e-8);
    assert_abs_diff_eq!(nested.aic().unwrap(), crossed.aic().unwrap(), epsilon = 1e-6);

    // Per-group slopes come out directly
    assert_abs_diff_eq!(nested.estimates()[2], 2.0, epsilon = 0.1);
    assert_abs_diff_eq!(nested.estimates()[3], -1.0, epsilon = 0.1);
}

// ==================== Information criteria ====================

#[test]
fn test_information_criteria() {
    let model = lm("y ~ x", &small_data()).unwrap();
    let n = 5.0_f64;
    let ll = -0.5 * n * ((2.0 * std::f64::consts::PI * 0.091 / n).ln() + 1.0);

    assert_eq!(model.n_params(), 3);
    assert_abs_diff_eq!(model.log_likelihood(), ll, epsilon = 1e-10);
    assert_abs_diff_eq!(model.aic().unwrap(), -2.0 * ll + 6.0, epsilon = 1e-10);
    assert_abs_diff_eq!(model.bic().unwrap(), -2.0 * ll + 3.0 * n.ln(), epsilon = 1e-10);
    assert_abs_diff_eq!(
        model.aicc().unwrap(),
        -2.0 * ll + 6.0 + 2.0 * 3.0 * 4.0 / 1.0,
        epsilon = 1e-10
    );
    assert_abs_diff_eq!(
        model.statistics().aic.unwrap(),
        model.aic().unwrap(),
        epsilon = 1e-12
    );
}

#[test]
fn test_aicc_needs_enough_observations() {
    let data = DataFrameBuilder::new()
        .with_column("x", Series::float(vec![1.0, 2.0, 3.0]))
        .unwrap()
        .with_column("y", Series::float(vec![1.0, 3.5, 2.5]))
        .unwrap()
        .build()
        .unwrap();
    let model = lm("y ~ x", &data).unwrap();
    assert!(model.aic().is_ok());
    assert!(matches!(
        model.aicc(),
        Err(ModelError::NotComputable {
            quantity: "AICc",
            ..
        })
    ));
}

// ==================== ANOVA ====================

#[test]
fn test_anova_single_term() {
    let model = lm("y ~ x", &small_data()).unwrap();
    let table = model.anova(&AnovaOptions::default()).unwrap();

    assert_eq!(table.ss_type, SumOfSquares::TypeII);
    assert_eq!(table.rows.len(), 2);

    let x = table.get("x").unwrap();
    assert_eq!(x.df, 1);
    assert_abs_diff_eq!(x.sum_sq, 38.809, epsilon = 1e-8);
    assert_abs_diff_eq!(x.statistic.unwrap(), 38.809 / (0.091 / 3.0), epsilon = 1e-6);

    let residuals = table.get("Residuals").unwrap();
    assert_eq!(residuals.df, 3);
    assert_abs_diff_eq!(residuals.sum_sq, 0.091, epsilon = 1e-10);
    assert!(residuals.statistic.is_none());
    assert!(residuals.p_value.is_none());
}

#[test]
fn test_type_one_partitions_total_sum_of_squares() {
    let data = noisy_data();
    let model = lm("y ~ a + b + g", &data).unwrap();
    let table = model
        .anova(&AnovaOptions::with_type(SumOfSquares::TypeI))
        .unwrap();

    let y = data.column("y").unwrap().to_float().unwrap();
    let mean = y.mean().unwrap();
    let tss: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
    let total: f64 = table.rows.iter().map(|row| row.sum_sq).sum();
    assert_abs_diff_eq!(total, tss, epsilon = 1e-8);

    assert_eq!(table.get("g").unwrap().df, 2);
}

#[test]
fn test_type_two_is_type_one_with_term_last() {
    let data = noisy_data();
    let ab = lm("y ~ a + b", &data).unwrap();
    let ba = lm("y ~ b + a", &data).unwrap();

    let type1_ab = ab.anova(&AnovaOptions::with_type(SumOfSquares::TypeI)).unwrap();
    let type1_ba = ba.anova(&AnovaOptions::with_type(SumOfSquares::TypeI)).unwrap();
    let type2 = ab.anova(&AnovaOptions::with_type(SumOfSquares::TypeII)).unwrap();

    assert_abs_diff_eq!(
        type2.get("b").unwrap().sum_sq,
        type1_ab.get("b").unwrap().sum_sq,
        epsilon = 1e-8
    );
    assert_abs_diff_eq!(
        type2.get("a").unwrap().sum_sq,
        type1_ba.get("a").unwrap().sum_sq,
        epsilon = 1e-8
    );
}

#[test]
fn test_type_three_has_intercept_row() {
    let model = lm("y ~ a * g", &noisy_data()).unwrap();
    let table = model
        .anova(&AnovaOptions::with_type(SumOfSquares::TypeIII))
        .unwrap();

    let labels: Vec<&str> = table.rows.iter().map(|row| row.term.as_str()).collect();
    assert_eq!(labels, vec![INTERCEPT, "a", "g", "a:g", "Residuals"]);
    assert_eq!(table.get("a:g").unwrap().df, 2);
    assert!(table.rows.iter().all(|row| row.sum_sq >= 0.0));
}

#[test]
fn test_anova_to_table() {
    let model = lm("y ~ x", &small_data()).unwrap();
    let table = model.anova(&AnovaOptions::default()).unwrap().to_table().unwrap();
    assert_eq!(
        table.columns(),
        &["term", "df", "sumsq", "meansq", "statistic", "p.value"]
    );
    assert_eq!(table.nrows(), 2);
}

// ==================== Intervals and augment ====================

#[test]
fn test_confint_levels() {
    let model = lm("y ~ x", &small_data()).unwrap();
    let ci95 = model.confint(0.95).unwrap();
    let ci90 = model.confint(0.90).unwrap();

    let wide = ci95.get("x").unwrap();
    let narrow = ci90.get("x").unwrap();
    assert!(wide.lower < narrow.lower && narrow.upper < wide.upper);
    assert_abs_diff_eq!((wide.lower + wide.upper) / 2.0, 1.97, epsilon = 1e-10);

    // Matches the interval reported alongside the coefficients
    let slope = &model.coefficients()[1];
    assert_abs_diff_eq!(slope.ci_lower.unwrap(), wide.lower, epsilon = 1e-12);

    assert!(matches!(
        model.confint(0.0),
        Err(ModelError::InvalidConfig { .. })
    ));
}

#[test]
fn test_augment_columns_and_leverage() {
    let model = lm("y ~ x", &small_data()).unwrap();
    let table = model.augment().unwrap();

    let mut expected = vec!["y", "x"];
    expected.extend(AUGMENT_COLUMNS);
    assert_eq!(table.columns(), expected.as_slice());
    assert_eq!(table.nrows(), 5);

    let hat = table.float_column(".hat").unwrap();
    assert_abs_diff_eq!(hat.iter().sum::<f64>(), 2.0, epsilon = 1e-10);
    // Leverage of x = 1 is 1/5 + 4/10
    assert_abs_diff_eq!(hat[0], 0.6, epsilon = 1e-10);

    let resid = table.float_column(".resid").unwrap();
    assert_abs_diff_eq!(resid[3], 0.23, epsilon = 1e-10);
    let fitted = table.float_column(".fitted").unwrap();
    assert_abs_diff_eq!(fitted[2], 6.0, epsilon = 1e-10);
}

// ==================== Fitters ====================

#[test]
fn test_fitter_returns_trait_object() {
    let formula = Formula::parse("y ~ x").unwrap();
    let model = LinearFitter::default().fit(&formula, &small_data()).unwrap();
    assert_eq!(model.model_type(), ModelType::LinearRegression);
    assert_eq!(model.formula().to_string(), "y ~ x");

    let summary = model.summary().unwrap();
    assert_eq!(summary.n_obs, 5);
    assert!(summary.to_string().contains("Linear Regression"));
}

#[test]
fn test_closure_fitter() {
    let fitter = |formula: &Formula, data: &DataFrame| {
        LinearRegression::fit(formula, data, LinearConfig::default())
    };
    let formula = Formula::parse("y ~ x").unwrap();
    let model = ModelFitter::fit(&fitter, &formula, &small_data()).unwrap();
    assert_eq!(model.nobs(), 5);
}
