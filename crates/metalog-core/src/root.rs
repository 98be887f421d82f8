//! Bracketed scalar root finding
//!
//! Brent's method: inverse quadratic interpolation and secant steps guarded
//! by bisection, so every iterate stays inside the current bracket.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Tolerance and iteration cap for [`brent`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootOptions {
    /// Absolute tolerance on the abscissa
    pub x_tolerance: f64,
    /// Hard iteration cap; exceeding it is an error
    pub max_iterations: usize,
}

impl Default for RootOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 1e-13,
            max_iterations: 200,
        }
    }
}

/// Find a root of `f` in `[lo, hi]`.
///
/// `f(lo)` and `f(hi)` must have opposite signs (or one of them be zero).
/// Non-finite function values are treated as a failed bracket.
pub fn brent<F>(f: F, lo: f64, hi: f64, options: RootOptions) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = (lo, hi);
    let (mut fa, mut fb) = (f(a), f(b));

    if !fa.is_finite() || !fb.is_finite() {
        return Err(Error::Computation(format!(
            "non-finite function value at bracket [{lo}, {hi}]"
        )));
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if fa.signum() == fb.signum() {
        return Err(Error::Computation(format!(
            "root is not bracketed by [{lo}, {hi}]"
        )));
    }

    let (mut c, mut fc) = (b, fb);
    let mut d = b - a;
    let mut e = d;

    for _ in 0..options.max_iterations {
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * options.x_tolerance;
        let m = 0.5 * (c - b);
        if m.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * m * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();

            let min1 = 3.0 * m * q - (tol * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = d;
            }
        } else {
            d = m;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };
        fb = f(b);
        if !fb.is_finite() {
            return Err(Error::Computation(format!(
                "non-finite function value at {b}"
            )));
        }
    }

    Err(Error::Convergence {
        iterations: options.max_iterations,
    })
}
