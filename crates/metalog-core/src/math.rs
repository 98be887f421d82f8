//! Numeric helpers shared by the metalog crates
//!
//! Logit/logistic transforms written to stay accurate in the tails, and the
//! plotting-position family used to assign empirical probabilities to ranked
//! data.

use num_traits::Float;

/// Log-odds `ln(p / (1 - p))`.
///
/// The complement is taken through `ln_1p(-p)` so probabilities close to one
/// keep their precision. Returns NaN outside (0, 1).
#[inline]
pub fn logit<F: Float>(p: F) -> F {
    if !(p > F::zero() && p < F::one()) {
        return F::nan();
    }
    p.ln() - (-p).ln_1p()
}

/// Logistic function `1 / (1 + e^-x)`, evaluated without overflow for
/// large |x|.
#[inline]
pub fn logistic<F: Float>(x: F) -> F {
    if x >= F::zero() {
        F::one() / (F::one() + (-x).exp())
    } else {
        let e = x.exp();
        e / (F::one() + e)
    }
}

/// Plotting position `(rank - alpha) / (n + 1 - 2 alpha)` for a 1-based rank.
///
/// `alpha = 0` gives the Van der Waerden/Weibull score `i / (n + 1)`,
/// `3/8` Blom, `1/3` Tukey and `1/2` Hazen.
#[inline]
pub fn plotting_position<F: Float>(rank: usize, n: usize, alpha: F) -> F {
    let i = F::from(rank).unwrap_or_else(F::nan);
    let n = F::from(n).unwrap_or_else(F::nan);
    let two = F::one() + F::one();
    (i - alpha) / (n + F::one() - two * alpha)
}

/// Powers of a base, `[1, x, x^2, ..., x^(n-1)]`.
pub fn powers<F: Float>(x: F, n: usize) -> Vec<F> {
    let mut out = Vec::with_capacity(n);
    let mut acc = F::one();
    for _ in 0..n {
        out.push(acc);
        acc = acc * x;
    }
    out
}
