//! Least-squares coefficient estimation
//!
//! Coefficients solve the normal equations `(M^T M) a = M^T z`, where `M` is
//! the design matrix of the fit probabilities and `z` the (transformed)
//! fit values. The system is solved through an SVD so that rank-deficient
//! problems degrade to the minimum-norm solution instead of failing.

use std::collections::BTreeSet;

use metalog_core::{Error, Result};
use nalgebra::DVector;
use ordered_float::OrderedFloat;
use tracing::{debug, instrument, warn};

use crate::design::design_matrix;
use crate::types::{check_order, FitPoint, MIN_FIT_POINTS};

/// Singular values below this fraction of the largest are treated as zero
pub const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Outcome of a least-squares fit
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// Fitted coefficients, one per term
    pub coefficients: Vec<f64>,
    /// Points that entered the system
    pub points_used: usize,
    /// Numerical rank of `M^T M`
    pub rank: usize,
    /// Whether the system was rank deficient
    pub singular: bool,
}

/// Fit `order` coefficients to `points`.
///
/// Points with a missing value or a probability outside (0, 1) are skipped.
/// At least [`MIN_FIT_POINTS`] distinct points must remain.
#[instrument(skip(points), fields(n_points = points.len()))]
pub fn least_squares(points: &[FitPoint], order: usize) -> Result<Estimate> {
    check_order(order)?;

    let usable: Vec<FitPoint> = points.iter().copied().filter(FitPoint::is_usable).collect();
    let distinct = usable
        .iter()
        .map(|pt| (OrderedFloat(pt.probability), OrderedFloat(pt.value)))
        .collect::<BTreeSet<_>>()
        .len();
    if distinct < MIN_FIT_POINTS {
        return Err(Error::InsufficientData {
            expected: MIN_FIT_POINTS,
            actual: distinct,
        });
    }

    let probabilities: Vec<f64> = usable.iter().map(|pt| pt.probability).collect();
    let design = design_matrix(&probabilities, order);
    let z = DVector::from_iterator(usable.len(), usable.iter().map(|pt| pt.value));

    let design_t = design.transpose();
    let normal = &design_t * &design;
    let rhs = &design_t * &z;

    let svd = normal.svd(true, true);
    let largest = svd.singular_values.iter().copied().fold(0.0, f64::max);
    let eps = largest * SINGULAR_TOLERANCE;
    let rank = svd.rank(eps);
    let solution = svd
        .solve(&rhs, eps)
        .map_err(|msg| Error::Computation(format!("least-squares solve failed: {msg}")))?;

    if solution.iter().any(|c| !c.is_finite()) {
        return Err(Error::non_finite("estimated coefficients"));
    }

    let singular = rank < order;
    if singular {
        warn!(
            rank,
            order,
            points = usable.len(),
            "singular system: normal equations are rank deficient, using the minimum-norm solution"
        );
    }
    debug!("Estimated {} coefficients from {} points (rank {})", order, usable.len(), rank);

    Ok(Estimate {
        coefficients: solution.iter().copied().collect(),
        points_used: usable.len(),
        rank,
        singular,
    })
}
