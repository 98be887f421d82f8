//! CDF by numeric inversion of the quantile function
//!
//! The metalog quantile has no closed-form inverse. Each value is located
//! in a table of quantiles on a fixed probability grid, then refined with
//! Brent's method inside the bracketing cell.

use metalog_core::{
    root::{brent, RootOptions},
    Error, Result,
};
use tracing::{debug, trace};

use crate::model::Metalog;

/// Number of probabilities in the bracketing table
pub const INVERSION_GRID_SIZE: usize = 100;
/// Relative widening applied to bracket ends so roots stay interior
pub const BRACKET_PERTURBATION: f64 = 1e-9;
/// Relative precision of the root in cells near zero
pub const TAIL_RELATIVE_TOLERANCE: f64 = 1e-10;
/// Evenly spaced interior probabilities of the table
const INTERIOR_POINTS: usize = 72;

/// Quantiles tabulated on [`inversion_grid`]
struct BracketTable {
    /// (probability, quantile) pairs
    cells: Vec<(f64, f64)>,
    monotone: bool,
}

/// Probability grid of the bracketing table.
///
/// Decades `1e-15 ..= 1e-2` mirrored at both ends, plus evenly spaced
/// points on [0.02, 0.98].
pub fn inversion_grid() -> Vec<f64> {
    let lower_tail: Vec<f64> = (2..=15).rev().map(|e| 10f64.powi(-e)).collect();
    let interior = (0..INTERIOR_POINTS).map(|i| 0.02 + 0.96 * i as f64 / (INTERIOR_POINTS - 1) as f64);
    let upper_tail = lower_tail.iter().rev().map(|&p| 1.0 - p);

    lower_tail.iter().copied().chain(interior).chain(upper_tail).collect()
}

impl Metalog {
    /// Cumulative probabilities of `values`.
    ///
    /// NaN values map to NaN. Fails on the first value outside the support
    /// or without a sign change in its bracket.
    pub fn cdf(&self, values: &[f64]) -> Result<Vec<f64>> {
        let table = self.bracketing_table();
        values.iter().map(|&x| self.invert(&table, x)).collect()
    }

    /// Cumulative probability of a single value
    pub fn cdf_at(&self, value: f64) -> Result<f64> {
        self.invert(&self.bracketing_table(), value)
    }

    fn bracketing_table(&self) -> BracketTable {
        let cells: Vec<(f64, f64)> = inversion_grid()
            .into_iter()
            .map(|p| (p, self.quantile_value(p)))
            .collect();
        let monotone = cells.windows(2).all(|w| w[0].1 <= w[1].1);
        if !monotone {
            debug!("quantile table is not monotone; brackets are searched linearly");
        }
        BracketTable { cells, monotone }
    }

    fn invert(&self, table: &BracketTable, x: f64) -> Result<f64> {
        if x.is_nan() {
            return Ok(f64::NAN);
        }
        if !self.boundary().contains(x) {
            let (lower, upper) = self.support();
            return Err(Error::OutOfSupport { value: x, lower, upper });
        }

        let cells = &table.cells;
        let idx = if table.monotone {
            let idx = cells.partition_point(|&(_, q)| q < x);
            if idx == 0 {
                trace!("value {} below the tabulated quantiles", x);
                return Ok(0.0);
            }
            if idx == cells.len() {
                trace!("value {} above the tabulated quantiles", x);
                return Ok(1.0);
            }
            idx
        } else {
            cells
                .windows(2)
                .position(|w| w[0].1 < x && x <= w[1].1)
                .map(|i| i + 1)
                .ok_or(Error::NoBracket { value: x })?
        };

        let (p_lo, _) = cells[idx - 1];
        let (p_hi, q_hi) = cells[idx];
        if q_hi == x {
            return Ok(p_hi);
        }

        let lo = p_lo * (1.0 - BRACKET_PERTURBATION);
        let hi = p_hi + (1.0 - p_hi) * BRACKET_PERTURBATION;
        let f = |p: f64| {
            let diff = self.quantile_value(p) - x;
            if diff.is_infinite() {
                diff.signum() * f64::MAX
            } else {
                diff
            }
        };

        let (f_lo, f_hi) = (f(lo), f(hi));
        if !(f_lo <= 0.0 && f_hi >= 0.0) {
            return Err(Error::NoBracket { value: x });
        }

        // Absolute tolerance shrinks with the cell so lower-tail probabilities
        // keep their relative precision
        let defaults = RootOptions::default();
        let options = RootOptions {
            x_tolerance: defaults.x_tolerance.min(TAIL_RELATIVE_TOLERANCE * lo),
            ..defaults
        };
        brent(f, lo, hi, options).map_err(|err| match err {
            Error::Convergence { .. } => err,
            _ => Error::NoBracket { value: x },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bounds;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_grid_layout() {
        let grid = inversion_grid();
        assert_eq!(grid.len(), INVERSION_GRID_SIZE);
        assert!(grid.windows(2).all(|w| w[0] < w[1]));
        assert!(grid[0] > 0.0 && grid[0] < 1e-14);
        assert!(grid[INVERSION_GRID_SIZE - 1] < 1.0);
        // Concentrated in the tails: 14 points below 0.02
        assert_eq!(grid.iter().filter(|&&p| p < 0.02).count(), 14);
    }

    #[test]
    fn test_logistic_cdf() {
        let model = Metalog::from_coefficients(&[2.0, 0.5], Bounds::unbounded()).unwrap();
        for &x in &[-3.0, 0.0, 2.0, 2.7, 6.0] {
            let expected = 1.0 / (1.0 + (-(x - 2.0) / 0.5_f64).exp());
            assert_abs_diff_eq!(model.cdf_at(x).unwrap(), expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_round_trip() {
        let model = Metalog::from_coefficients(&[30.0, 10.5, 9.6, -20.5, -21.7], Bounds::unbounded()).unwrap();
        let ps = [1e-4, 0.01, 0.1, 0.37, 0.5, 0.64, 0.9, 0.99, 1.0 - 1e-4];
        let xs = model.quantile(&ps);
        let back = model.cdf(&xs).unwrap();
        for (p, q) in ps.iter().zip(back.iter()) {
            assert_abs_diff_eq!(*p, *q, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_out_of_support() {
        let model = Metalog::from_coefficients(&[0.0, 1.0], Bounds::bounded(0.0, 10.0)).unwrap();
        assert!(matches!(model.cdf_at(-1.0), Err(Error::OutOfSupport { value, .. }) if value == -1.0));
        assert!(matches!(model.cdf_at(10.0), Err(Error::OutOfSupport { .. })));
        assert!(model.cdf(&[5.0, 11.0]).is_err());
        assert!(model.cdf_at(5.0).unwrap() > 0.0);
    }

    #[test]
    fn test_nan_passthrough() {
        let model = Metalog::from_coefficients(&[0.0, 1.0], Bounds::unbounded()).unwrap();
        let out = model.cdf(&[f64::NAN, 0.0]).unwrap();
        assert!(out[0].is_nan());
        assert_abs_diff_eq!(out[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_lower_tail_relative_precision() {
        let model = Metalog::from_coefficients(&[0.0, 1.0], Bounds::unbounded()).unwrap();
        for &x in &[-20.0_f64, -28.0, -31.0, -33.5] {
            let expected = 1.0 / (1.0 + (-x).exp());
            let p = model.cdf_at(x).unwrap();
            assert!(
                ((p - expected) / expected).abs() < 1e-8,
                "x = {x}: got {p}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_far_tail_saturates() {
        let model = Metalog::from_coefficients(&[0.0, 1.0], Bounds::unbounded()).unwrap();
        assert_eq!(model.cdf_at(-1e6).unwrap(), 0.0);
        assert_eq!(model.cdf_at(1e6).unwrap(), 1.0);
    }

    #[test]
    fn test_non_monotone_model_fails() {
        // Decreasing quantile function
        let model = Metalog::from_coefficients(&[0.0, -1.0], Bounds::unbounded()).unwrap();
        assert!(matches!(model.cdf_at(0.5), Err(Error::NoBracket { .. })));
    }
}
