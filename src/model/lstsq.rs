//! Dense least-squares solver based on Householder QR.
//!
//! Columns are processed left to right. A column whose remaining norm falls
//! below the rank tolerance is linearly dependent on the columns before it;
//! it is skipped and receives a zero coefficient.

use crate::error::{PipelineError, Result};
use ndarray::{s, Array1, Array2};

/// Solution of `min ||x · beta - y||²`.
#[derive(Debug, Clone)]
pub struct LstsqSolution {
    pub coefficients: Array1<f64>,
    /// Number of independent columns actually used.
    pub rank: usize,
    /// Indices of columns that were dropped as dependent.
    pub dropped: Vec<usize>,
}

/// Least-squares fit of `y` on the columns of `x`.
///
/// Dependent columns are dropped rather than sharing weight, so for a rank
/// deficient `x` this is a basic solution, not the minimum-norm one: with
/// `b = 2a` the fit puts all weight on `a`. Predictions inside the column
/// span agree with the minimum-norm solution; outside it they differ.
pub fn lstsq(x: &Array2<f64>, y: &Array1<f64>) -> Result<LstsqSolution> {
    let (m, n) = x.dim();
    if m != y.len() {
        return Err(PipelineError::transform(
            "least squares",
            format!("{m} rows in design matrix but {} targets", y.len()),
        ));
    }
    if m == 0 {
        return Err(PipelineError::transform("least squares", "no samples"));
    }

    let max_norm = (0..n)
        .map(|j| x.column(j).dot(&x.column(j)).sqrt())
        .fold(0.0_f64, f64::max);
    let tol = 100.0 * f64::EPSILON * m.max(n) as f64 * max_norm;

    let mut a = x.to_owned();
    let mut b = y.to_owned();
    // (row of R, column of x) for every accepted column
    let mut pivots: Vec<(usize, usize)> = Vec::with_capacity(n.min(m));
    let mut dropped = Vec::new();
    let mut r = 0;

    for j in 0..n {
        if r == m {
            dropped.push(j);
            continue;
        }
        let norm = {
            let col = a.slice(s![r.., j]);
            col.dot(&col).sqrt()
        };
        if norm <= tol {
            dropped.push(j);
            continue;
        }

        let alpha = if a[[r, j]] > 0.0 { -norm } else { norm };
        let mut v = a.slice(s![r.., j]).to_owned();
        v[0] -= alpha;
        let v_norm2 = v.dot(&v);
        if v_norm2 > 0.0 {
            for k in j..n {
                let f = 2.0 * v.dot(&a.slice(s![r.., k])) / v_norm2;
                a.slice_mut(s![r.., k]).scaled_add(-f, &v);
            }
            let f = 2.0 * v.dot(&b.slice(s![r..])) / v_norm2;
            b.slice_mut(s![r..]).scaled_add(-f, &v);
        }

        pivots.push((r, j));
        r += 1;
    }

    let mut coefficients = Array1::<f64>::zeros(n);
    for p in (0..pivots.len()).rev() {
        let (row, col) = pivots[p];
        let mut acc = b[row];
        for &(_, later) in &pivots[p + 1..] {
            acc -= a[[row, later]] * coefficients[later];
        }
        coefficients[col] = acc / a[[row, col]];
    }

    Ok(LstsqSolution {
        coefficients,
        rank: pivots.len(),
        dropped,
    })
}
