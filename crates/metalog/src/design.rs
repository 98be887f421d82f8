//! Metalog basis functions and design matrices
//!
//! The quantile function of an unbounded metalog with `k` terms is
//! `M(p) = sum_i a_i * b_i(p)` with
//!
//! | term | basis `b_i(p)` |
//! |------|----------------|
//! | 1 | `1` |
//! | 2 | `logit(p)` |
//! | 3 | `(p - 1/2) logit(p)` |
//! | 4 | `p - 1/2` |
//! | odd `n >= 5` | `(p - 1/2)^((n-1)/2)` |
//! | even `n >= 6` | `(p - 1/2)^(n/2 - 1) logit(p)` |
//!
//! Probabilities outside (0, 1) produce rows of NaN rather than being
//! dropped, so row `i` of a design matrix always belongs to probability `i`.

use metalog_core::math::{logit, powers};
use nalgebra::DMatrix;

/// N x k matrix of basis evaluations, one row per probability
pub type DesignMatrix = DMatrix<f64>;

/// Evaluate every basis function at `p` into `out` (`out.len()` is the order).
pub fn fill_basis(p: f64, out: &mut [f64]) {
    if !(p > 0.0 && p < 1.0) {
        out.fill(f64::NAN);
        return;
    }
    let l = logit(p);
    let u = p - 0.5;
    let pw = powers(u, out.len() / 2 + 1);

    for (idx, slot) in out.iter_mut().enumerate() {
        let n = idx + 1;
        *slot = match n {
            1 => 1.0,
            2 => l,
            3 => u * l,
            4 => u,
            n if n % 2 == 1 => pw[(n - 1) / 2],
            n => pw[n / 2 - 1] * l,
        };
    }
}

/// Evaluate the derivative `d b_i / dp` of every basis function at `p`.
pub fn fill_basis_derivative(p: f64, out: &mut [f64]) {
    if !(p > 0.0 && p < 1.0) {
        out.fill(f64::NAN);
        return;
    }
    let l = logit(p);
    let u = p - 0.5;
    let t = p * (1.0 - p);
    let pw = powers(u, out.len() / 2 + 1);

    for (idx, slot) in out.iter_mut().enumerate() {
        let n = idx + 1;
        *slot = match n {
            1 => 0.0,
            2 => 1.0 / t,
            3 => l + u / t,
            4 => 1.0,
            n if n % 2 == 1 => {
                let j = (n - 1) / 2;
                j as f64 * pw[j - 1]
            }
            n => {
                let j = n / 2 - 1;
                j as f64 * pw[j - 1] * l + pw[j] / t
            }
        };
    }
}

/// Basis row for a single probability
pub fn basis_row(p: f64, order: usize) -> Vec<f64> {
    let mut row = vec![0.0; order];
    fill_basis(p, &mut row);
    row
}

/// Build the design matrix for `probabilities` with `order` columns
pub fn design_matrix(probabilities: &[f64], order: usize) -> DesignMatrix {
    let mut matrix = DMatrix::zeros(probabilities.len(), order);
    let mut row = vec![0.0; order];
    for (i, &p) in probabilities.iter().enumerate() {
        fill_basis(p, &mut row);
        for (j, &value) in row.iter().enumerate() {
            matrix[(i, j)] = value;
        }
    }
    matrix
}
