//! Feasibility of coefficient vectors
//!
//! A coefficient vector is feasible when the unbounded quantile `M(p)` is
//! non-decreasing on (0, 1), i.e. the density is non-negative everywhere.
//! Support transforms are strictly increasing, so the check never depends on
//! the bounds.
//!
//! Orders 2-4 are decided in closed form. Above that no closed form exists
//! and the slope is sampled on a fixed grid. The sampled test is necessary
//! but not sufficient: a vector that dips below zero between grid points
//! still passes.

use metalog_core::math::logit;

use crate::evaluate::quantile_derivative;
use crate::types::MAX_ORDER;

/// Largest admissible `|a3| / a2` for three terms
pub const THREE_TERM_SKEW_LIMIT: f64 = 1.66711;
/// Number of probabilities sampled for orders above four
pub const FEASIBILITY_GRID_SIZE: usize = 1000;
/// Half-width of the sampled probability range around 1/2
pub const FEASIBILITY_GRID_HALF_WIDTH: f64 = 0.4999;

/// How feasibility is decided for a given order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeasibilityMethod {
    /// Exact algebraic condition on the coefficients
    ClosedForm,
    /// Slope sampled on [`feasibility_grid`]
    Sampled,
}

impl FeasibilityMethod {
    /// Short name used in summaries and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClosedForm => "closed-form",
            Self::Sampled => "sampled",
        }
    }
}

/// Method used for `order` terms
pub fn method_for_order(order: usize) -> FeasibilityMethod {
    if order <= 4 {
        FeasibilityMethod::ClosedForm
    } else {
        FeasibilityMethod::Sampled
    }
}

/// Whether `coefficients` describe a valid distribution
pub fn is_feasible(coefficients: &[f64]) -> bool {
    if coefficients.len() > MAX_ORDER || coefficients.iter().any(|c| !c.is_finite()) {
        return false;
    }
    match coefficients {
        [] | [_] => false,
        [_, a2] => *a2 > 0.0,
        [_, a2, a3] => *a2 > 0.0 && a3.abs() / a2 <= THREE_TERM_SKEW_LIMIT,
        [_, a2, a3, a4] => four_term_feasible(*a2, *a3, *a4),
        _ => sampled_feasible(coefficients),
    }
}

/// Closed-form region for four terms.
///
/// With `r3 = a3/a2` and `r4 = a4/a2` the scaled slope is
/// `1/t + r3 (logit p + (p - 1/2)/t) + r4`, `t = p(1-p)`. Its derivative is
/// `(2(p - 1/2) + r3/2) / t^2`, so the only stationary point is
/// `p* = 1/2 - r3/4`, inside (0, 1) exactly when `|r3| < 2`. For `|r3| >= 2`
/// the slope diverges to minus infinity at one tail.
fn four_term_feasible(a2: f64, a3: f64, a4: f64) -> bool {
    if a2 < 0.0 {
        return false;
    }
    if a2 == 0.0 {
        // Only the uniform quantile a1 + a4 (p - 1/2) survives
        return a3 == 0.0 && a4 > 0.0;
    }

    let r3 = a3 / a2;
    let r4 = a4 / a2;
    if r3.abs() >= 2.0 {
        return false;
    }

    let u = -0.25 * r3;
    let p = 0.5 + u;
    let t = 0.25 - u * u;
    let min_slope = 1.0 / t + r3 * (logit(p) + u / t);
    r4 + min_slope >= 0.0
}

/// Probabilities sampled by the high-order check.
///
/// `p = 1/2 + 0.4999 x|x|` over an even grid `x` in [-1, 1], so the points
/// span [0.0001, 0.9999] and are densest around the median.
pub fn feasibility_grid() -> Vec<f64> {
    let n = FEASIBILITY_GRID_SIZE;
    (0..n)
        .map(|i| {
            let x = -1.0 + 2.0 * i as f64 / (n - 1) as f64;
            0.5 + FEASIBILITY_GRID_HALF_WIDTH * x * x.abs()
        })
        .collect()
}

fn sampled_feasible(coefficients: &[f64]) -> bool {
    feasibility_grid()
        .into_iter()
        .all(|p| quantile_derivative(coefficients, p) >= 0.0)
}
