use std::error::Error;

use approx::assert_abs_diff_eq;
use ms_models::{FittedModel, ModelError};
use proptest::prelude::*;

use super::{Criterion, akaike_weights, compare_models, summarize_aic};
use crate::builder::ModelBuilder;
use crate::error::SelectError;
use crate::set::ModelSet;
use crate::testing::{BrokenModel, FixedAic, countries, pop_gdp_models};

fn fixed(scores: &[(&str, f64)]) -> ModelSet {
    scores
        .iter()
        .fold(ModelSet::new(), |set, &(name, aic)| set.with(name, FixedAic::new(aic)))
}

#[test]
fn test_pop_versus_gdp() {
    let models = pop_gdp_models();
    let table = summarize_aic(&models).unwrap();

    assert_eq!(table.criterion, Criterion::Aic);
    let names: Vec<&str> = table.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["pop", "gdp"]);

    let pop = table.get("pop").unwrap();
    let gdp = table.get("gdp").unwrap();
    assert_eq!(gdp.delta, 0.0);
    assert!(pop.delta > 0.0);
    assert!(gdp.weight > pop.weight);
    assert_abs_diff_eq!(pop.weight + gdp.weight, 1.0, epsilon = 1e-9);
    assert_eq!(table.best().unwrap().name, "gdp");

    assert_abs_diff_eq!(
        pop.score,
        models.get("pop").unwrap().aic().unwrap(),
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(pop.likelihood, (-0.5 * pop.delta).exp(), epsilon = 1e-12);
}

#[test]
fn test_single_model() {
    let data = countries();
    let models = ModelBuilder::new()
        .formula("only", "life ~ gdp")
        .data(&data)
        .build()
        .unwrap();
    let table = summarize_aic(&models).unwrap();

    assert_eq!(table.len(), 1);
    let only = &table.rows[0];
    assert_eq!(only.name, "only");
    assert_eq!(only.delta, 0.0);
    assert_eq!(only.likelihood, 1.0);
    assert_eq!(only.weight, 1.0);
}

#[test]
fn test_known_weights() {
    let table = summarize_aic(&fixed(&[("a", 100.0), ("b", 102.0), ("c", 110.0)])).unwrap();

    let deltas: Vec<f64> = table.rows.iter().map(|r| r.delta).collect();
    assert_eq!(deltas, vec![0.0, 2.0, 10.0]);

    let total = 1.0 + (-1.0_f64).exp() + (-5.0_f64).exp();
    assert_abs_diff_eq!(table.rows[0].weight, 1.0 / total, epsilon = 1e-12);
    assert_abs_diff_eq!(table.rows[1].weight, (-1.0_f64).exp() / total, epsilon = 1e-12);
    assert_abs_diff_eq!(table.rows[2].weight, (-5.0_f64).exp() / total, epsilon = 1e-12);
}

#[test]
fn test_ties_share_weight() {
    let table = summarize_aic(&fixed(&[("a", 50.0), ("b", 50.0)])).unwrap();
    assert_eq!(table.rows[0].weight, 0.5);
    assert_eq!(table.rows[1].weight, 0.5);
    assert_eq!(table.best().unwrap().name, "a");
}

#[test]
fn test_idempotent() {
    let models = pop_gdp_models();
    assert_eq!(summarize_aic(&models).unwrap(), summarize_aic(&models).unwrap());
}

#[test]
fn test_other_criteria() {
    let models = pop_gdp_models();
    for criterion in [Criterion::Aicc, Criterion::Bic] {
        let table = compare_models(&models, criterion).unwrap();
        assert_eq!(table.best().unwrap().name, "gdp");
        let gdp = models.get("gdp").unwrap();
        let expected = criterion.score(gdp).unwrap();
        assert_abs_diff_eq!(table.get("gdp").unwrap().score, expected, epsilon = 1e-12);
    }

    let rendered = compare_models(&models, Criterion::Bic).unwrap().to_table();
    assert_eq!(
        rendered.columns(),
        &["model", "bic", "delta_bic", "likelihood", "bic_weight"]
    );
}

#[test]
fn test_to_table() {
    let table = summarize_aic(&fixed(&[("a", 10.0), ("b", 12.0)])).unwrap();
    let rendered = table.to_table();
    assert_eq!(
        rendered.columns(),
        &["model", "aic", "delta_aic", "likelihood", "aic_weight"]
    );
    assert_eq!(rendered.nrows(), 2);
    assert_eq!(rendered.float_column("delta_aic").unwrap(), vec![0.0, 2.0]);
}

#[test]
fn test_invalid_model() {
    let models = pop_gdp_models().with("broken", BrokenModel::new());
    let err = summarize_aic(&models).unwrap_err();
    assert!(matches!(
        err,
        SelectError::InvalidModelCollection { source: Some(_) }
    ));
}

#[test]
fn test_non_finite_aic() {
    let models = fixed(&[("a", 10.0), ("b", f64::INFINITY)]);
    let err = summarize_aic(&models).unwrap_err();
    let source = err.source().unwrap();
    assert!(
        source
            .downcast_ref::<ModelError>()
            .is_some_and(|e| matches!(e, ModelError::NotComputable { quantity: "AIC", .. }))
    );
}

#[test]
fn test_empty_collection() {
    let err = summarize_aic(&ModelSet::new()).unwrap_err();
    assert!(matches!(
        err,
        SelectError::InvalidModelCollection { source: None }
    ));
    assert!(err.to_string().contains("non-empty collection"));
}

#[test]
fn test_criterion_names() {
    assert_eq!(Criterion::default(), Criterion::Aic);
    assert_eq!(Criterion::Aicc.to_string(), "aicc");
}

proptest! {
    #[test]
    fn prop_weights_form_a_distribution(
        scores in prop::collection::vec(-100.0..100.0f64, 1..12),
    ) {
        let weights = akaike_weights(&scores);
        prop_assert_eq!(weights.len(), scores.len());

        let total: f64 = weights.iter().map(|&(_, _, w)| w).sum();
        prop_assert!((total - 1.0).abs() < 1e-9);

        let min_delta = weights.iter().map(|&(d, _, _)| d).fold(f64::INFINITY, f64::min);
        prop_assert_eq!(min_delta, 0.0);

        let argmin = scores
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        let max_weight = weights.iter().map(|&(_, _, w)| w).fold(0.0, f64::max);
        prop_assert_eq!(weights[argmin].2, max_weight);
        prop_assert!(weights.iter().all(|&(d, l, w)| d >= 0.0 && l <= 1.0 && w > 0.0));
    }
}
