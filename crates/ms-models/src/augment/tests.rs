use approx::assert_abs_diff_eq;
use ms_core::data::{DataFrameBuilder, Series};
use ms_core::table::Cell;
use ndarray::{Array1, Array2, array};

use super::{AUGMENT_COLUMNS, FitQuantities, Influence, augment_table};
use crate::convert;

fn simple_design() -> (Array2<f64>, Array2<f64>) {
    let x = array![[1.0, 1.0], [1.0, 2.0], [1.0, 3.0], [1.0, 4.0]];
    let xtx = x.t().dot(&x);
    let (_, cov) = convert::solve_and_invert(&xtx, &Array1::zeros(2)).unwrap();
    (x, cov)
}

#[test]
fn test_leverage_of_simple_regression() {
    let (x, cov) = simple_design();
    let resid = array![0.1, -0.2, 0.2, -0.1];
    let influence = Influence::compute(&FitQuantities {
        x: &x,
        cov_unscaled: &cov,
        weights: None,
        deviance_resid: &resid,
        pearson_resid: &resid,
        dispersion: 0.05,
    });

    // 1/n + (x - mean)^2 / Sxx
    let expected = [0.7, 0.3, 0.3, 0.7];
    for (h, e) in influence.hat.iter().zip(expected) {
        assert_abs_diff_eq!(*h, e, epsilon = 1e-12);
    }

    // sum(d^2) = 0.1 with n - p - 1 = 1
    assert_abs_diff_eq!(
        influence.sigma[0],
        (0.1_f64 - 0.01 / 0.3).sqrt(),
        epsilon = 1e-12
    );

    assert_abs_diff_eq!(
        influence.std_resid[0],
        0.1 / (0.05_f64 * 0.3).sqrt(),
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(
        influence.cooksd[1],
        (-0.2_f64 / 0.7).powi(2) * 0.3 / (0.05 * 2.0),
        epsilon = 1e-12
    );
}

#[test]
fn test_leave_one_out_sigma() {
    let x = array![[1.0], [1.0], [1.0], [1.0], [1.0]];
    let cov = array![[0.2]];
    let resid = array![-2.0, -1.0, 0.0, 1.0, 2.0];
    let influence = Influence::compute(&FitQuantities {
        x: &x,
        cov_unscaled: &cov,
        weights: None,
        deviance_resid: &resid,
        pearson_resid: &resid,
        dispersion: 2.5,
    });

    // sum(d^2) = 10, h = 0.2, n - p - 1 = 3
    assert_abs_diff_eq!(
        influence.sigma[0],
        ((10.0 - 4.0 / 0.8) / 3.0_f64).sqrt(),
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(influence.sigma[2], (10.0 / 3.0_f64).sqrt(), epsilon = 1e-12);
}

#[test]
fn test_weights_scale_leverage() {
    let (x, cov) = simple_design();
    let resid = Array1::zeros(4);
    let weights = array![2.0, 1.0, 1.0, 0.5];
    let influence = Influence::compute(&FitQuantities {
        x: &x,
        cov_unscaled: &cov,
        weights: Some(&weights),
        deviance_resid: &resid,
        pearson_resid: &resid,
        dispersion: 1.0,
    });
    assert_abs_diff_eq!(influence.hat[0], 1.4, epsilon = 1e-12);
    assert_abs_diff_eq!(influence.hat[3], 0.35, epsilon = 1e-12);
}

#[test]
fn test_augment_table_layout() {
    let frame = DataFrameBuilder::new()
        .with_column("y", Series::float(vec![1.0, 2.0]))
        .unwrap()
        .with_column("g", Series::categorical(&["a", "b"]))
        .unwrap()
        .build()
        .unwrap();
    let zeros = Array1::zeros(2);
    let influence = Influence {
        hat: array![0.5, 0.5],
        sigma: zeros.clone(),
        cooksd: zeros.clone(),
        std_resid: zeros.clone(),
    };

    let table = augment_table(
        &frame,
        &array![1.5, 1.5],
        &zeros,
        &array![-0.5, 0.5],
        &influence,
    )
    .unwrap();

    assert_eq!(table.nrows(), 2);
    assert_eq!(&table.columns()[..2], &["y", "g"]);
    assert_eq!(&table.columns()[2..], &AUGMENT_COLUMNS);
    assert_eq!(table.rows()[1][1], Cell::Text("b".to_string()));
    assert_eq!(table.float_column(".resid").unwrap(), vec![-0.5, 0.5]);
}
