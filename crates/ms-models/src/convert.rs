//! ndarray <-> nalgebra conversions and the decompositions built on them
//!
//! Model state is stored as ndarray arrays; factorizations go through
//! nalgebra.

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

pub fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

pub fn to_dvector(v: &Array1<f64>) -> DVector<f64> {
    DVector::from_iterator(v.len(), v.iter().copied())
}

pub fn to_array2(m: &DMatrix<f64>) -> Array2<f64> {
    let (nrows, ncols) = m.shape();
    Array2::from_shape_fn((nrows, ncols), |(i, j)| m[(i, j)])
}

pub fn to_array1(v: &DVector<f64>) -> Array1<f64> {
    Array1::from_vec(v.as_slice().to_vec())
}

/// Solve the symmetric system `A x = b` and also return `A^-1`.
///
/// Tries Cholesky, then LU. `None` if `A` is singular.
pub fn solve_and_invert(a: &Array2<f64>, b: &Array1<f64>) -> Option<(Array1<f64>, Array2<f64>)> {
    let a = to_dmatrix(a);
    let b = to_dvector(b);
    let p = a.nrows();

    if let Some(chol) = a.clone().cholesky() {
        let solution = chol.solve(&b);
        let inverse = chol.solve(&DMatrix::identity(p, p));
        return Some((to_array1(&solution), to_array2(&inverse)));
    }

    let lu = a.lu();
    let solution = lu.solve(&b)?;
    let inverse = lu.try_inverse()?;
    Some((to_array1(&solution), to_array2(&inverse)))
}

/// Weighted least squares: solve `X'WX beta = X'Wz`.
///
/// Returns the coefficients and `(X'WX)^-1`, or `None` when `X'WX` is
/// singular.
pub fn weighted_least_squares(
    x: &Array2<f64>,
    z: &Array1<f64>,
    w: &Array1<f64>,
) -> Option<(Array1<f64>, Array2<f64>)> {
    let xw = x * &w.view().insert_axis(ndarray::Axis(1));
    let xtwx = xw.t().dot(x);
    let xtwz = xw.t().dot(z);
    solve_and_invert(&xtwx, &xtwz)
}

/// Diagonal of `X M X'` without forming the `n x n` product
pub fn quadratic_form_diagonal(x: &Array2<f64>, m: &Array2<f64>) -> Array1<f64> {
    let xm = x.dot(m);
    (&xm * x).sum_axis(ndarray::Axis(1))
}
