//! Support transforms
//!
//! A single unbounded metalog core serves all four support shapes. Fit
//! values are mapped into the unbounded space before estimation and the
//! unbounded quantile `M(p)` is mapped back when evaluating:
//!
//! | support | fit transform `z(x)` | quantile `x(M)` | density factor |
//! |---------|----------------------|-----------------|----------------|
//! | unbounded | `x` | `M` | `1` |
//! | `(bl, inf)` | `ln(x - bl)` | `bl + e^M` | `e^-M` |
//! | `(-inf, bu)` | `-ln(bu - x)` | `bu - e^-M` | `e^M` |
//! | `(bl, bu)` | `ln((x - bl) / (bu - x))` | `(bl + bu e^M) / (1 + e^M)` | `(1 + e^M)^2 / ((bu - bl) e^M)` |

use metalog_core::{math::logistic, Result};
use serde::{Deserialize, Serialize};

use crate::types::{BoundaryType, Bounds};

/// Distance from 0 or 1 within which a bounded side returns its bound
pub const EDGE_EPSILON: f64 = 1e-14;

/// Mapping between the support of a distribution and the unbounded space
pub trait SupportTransform {
    /// Map a value into unbounded space; `None` outside the open support
    fn transform(&self, x: f64) -> Option<f64>;

    /// Map an unbounded quantile back into the support
    fn inverse(&self, m: f64) -> f64;

    /// Factor converting the unbounded density at `M(p)` into the
    /// density of the transformed variable
    fn density_jacobian(&self, m: f64) -> f64;

    /// Open support `(lower, upper)`
    fn support(&self) -> (f64, f64);
}

/// Identity transform for support on the whole real line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Identity;

impl SupportTransform for Identity {
    fn transform(&self, x: f64) -> Option<f64> {
        x.is_finite().then_some(x)
    }

    fn inverse(&self, m: f64) -> f64 {
        m
    }

    fn density_jacobian(&self, _m: f64) -> f64 {
        1.0
    }

    fn support(&self) -> (f64, f64) {
        (f64::NEG_INFINITY, f64::INFINITY)
    }
}

/// Shifted log transform for support `(lower, inf)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LowerLog {
    pub lower: f64,
}

impl SupportTransform for LowerLog {
    fn transform(&self, x: f64) -> Option<f64> {
        (x > self.lower && x.is_finite()).then(|| (x - self.lower).ln())
    }

    fn inverse(&self, m: f64) -> f64 {
        self.lower + m.exp()
    }

    fn density_jacobian(&self, m: f64) -> f64 {
        (-m).exp()
    }

    fn support(&self) -> (f64, f64) {
        (self.lower, f64::INFINITY)
    }
}

/// Negated shifted log transform for support `(-inf, upper)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpperLog {
    pub upper: f64,
}

impl SupportTransform for UpperLog {
    fn transform(&self, x: f64) -> Option<f64> {
        (x < self.upper && x.is_finite()).then(|| -(self.upper - x).ln())
    }

    fn inverse(&self, m: f64) -> f64 {
        self.upper - (-m).exp()
    }

    fn density_jacobian(&self, m: f64) -> f64 {
        m.exp()
    }

    fn support(&self) -> (f64, f64) {
        (f64::NEG_INFINITY, self.upper)
    }
}

/// Scaled logit transform for support `(lower, upper)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogitScaled {
    pub lower: f64,
    pub upper: f64,
}

impl SupportTransform for LogitScaled {
    fn transform(&self, x: f64) -> Option<f64> {
        (x > self.lower && x < self.upper).then(|| ((x - self.lower) / (self.upper - x)).ln())
    }

    fn inverse(&self, m: f64) -> f64 {
        // Same as (bl + bu e^M) / (1 + e^M) without overflowing e^M
        self.lower + (self.upper - self.lower) * logistic(m)
    }

    fn density_jacobian(&self, m: f64) -> f64 {
        // (1 + e^M)^2 / e^M == (2 cosh(M/2))^2
        let c = 2.0 * (0.5 * m).cosh();
        c * c / (self.upper - self.lower)
    }

    fn support(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

/// Support transform selected once from the bounds of a model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Boundary {
    Unbounded(Identity),
    SemiLower(LowerLog),
    SemiUpper(UpperLog),
    Bounded(LogitScaled),
}

impl Boundary {
    /// Resolve the transform for validated bounds
    pub fn from_bounds(bounds: &Bounds) -> Result<Self> {
        bounds.validate()?;
        Ok(match (bounds.lower, bounds.upper) {
            (None, None) => Self::Unbounded(Identity),
            (Some(lower), None) => Self::SemiLower(LowerLog { lower }),
            (None, Some(upper)) => Self::SemiUpper(UpperLog { upper }),
            (Some(lower), Some(upper)) => Self::Bounded(LogitScaled { lower, upper }),
        })
    }

    /// Tag of this transform
    pub fn boundary_type(&self) -> BoundaryType {
        match self {
            Self::Unbounded(_) => BoundaryType::Unbounded,
            Self::SemiLower(_) => BoundaryType::SemiLower,
            Self::SemiUpper(_) => BoundaryType::SemiUpper,
            Self::Bounded(_) => BoundaryType::Bounded,
        }
    }

    /// Whether `x` lies in the open support
    pub fn contains(&self, x: f64) -> bool {
        let (lower, upper) = self.support();
        x > lower && x < upper
    }

    /// Bound returned at probabilities within [`EDGE_EPSILON`] of a bounded side
    pub fn edge_value(&self, p: f64) -> Option<f64> {
        let (lower, upper) = self.support();
        let bounded_below = matches!(self, Self::SemiLower(_) | Self::Bounded(_));
        let bounded_above = matches!(self, Self::SemiUpper(_) | Self::Bounded(_));
        if bounded_below && p <= EDGE_EPSILON {
            Some(lower)
        } else if bounded_above && p >= 1.0 - EDGE_EPSILON {
            Some(upper)
        } else {
            None
        }
    }

    fn strategy(&self) -> &dyn SupportTransform {
        match self {
            Self::Unbounded(t) => t,
            Self::SemiLower(t) => t,
            Self::SemiUpper(t) => t,
            Self::Bounded(t) => t,
        }
    }
}

impl SupportTransform for Boundary {
    fn transform(&self, x: f64) -> Option<f64> {
        self.strategy().transform(x)
    }

    fn inverse(&self, m: f64) -> f64 {
        self.strategy().inverse(m)
    }

    fn density_jacobian(&self, m: f64) -> f64 {
        self.strategy().density_jacobian(m)
    }

    fn support(&self) -> (f64, f64) {
        self.strategy().support()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn all() -> Vec<Boundary> {
        [
            Bounds::unbounded(),
            Bounds::lower(2.0),
            Bounds::upper(10.0),
            Bounds::bounded(2.0, 10.0),
        ]
        .iter()
        .map(|b| Boundary::from_bounds(b).unwrap())
        .collect()
    }

    #[test]
    fn test_resolution_from_bounds() {
        let types: Vec<BoundaryType> = all().iter().map(Boundary::boundary_type).collect();
        assert_eq!(
            types,
            vec![
                BoundaryType::Unbounded,
                BoundaryType::SemiLower,
                BoundaryType::SemiUpper,
                BoundaryType::Bounded
            ]
        );
        assert!(Boundary::from_bounds(&Bounds::bounded(3.0, 3.0)).is_err());
    }

    #[test]
    fn test_transform_inverts() {
        for boundary in all() {
            for &x in &[2.5, 4.0, 7.3, 9.9] {
                let z = boundary.transform(x).unwrap();
                assert_relative_eq!(boundary.inverse(z), x, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_out_of_support_is_excluded() {
        let lower = Boundary::from_bounds(&Bounds::lower(2.0)).unwrap();
        assert!(lower.transform(2.0).is_none());
        assert!(lower.transform(1.0).is_none());

        let upper = Boundary::from_bounds(&Bounds::upper(10.0)).unwrap();
        assert!(upper.transform(10.0).is_none());

        let bounded = Boundary::from_bounds(&Bounds::bounded(2.0, 10.0)).unwrap();
        assert!(bounded.transform(1.0).is_none());
        assert!(bounded.transform(11.0).is_none());
        assert!(bounded.transform(f64::NAN).is_none());
    }

    #[test]
    fn test_jacobian_matches_derivative() {
        // density factor is dM/dx evaluated at x(M)
        let h = 1e-6;
        for boundary in all() {
            for &m in &[-2.0, 0.0, 0.7, 1.5] {
                let x = boundary.inverse(m);
                let dx_dm = (boundary.inverse(m + h) - boundary.inverse(m - h)) / (2.0 * h);
                assert_relative_eq!(boundary.density_jacobian(m), 1.0 / dx_dm, max_relative = 1e-6);
                assert!(boundary.contains(x));
            }
        }
    }

    #[test]
    fn test_bounded_inverse_is_stable() {
        let bounded = Boundary::from_bounds(&Bounds::bounded(2.0, 10.0)).unwrap();
        assert_eq!(bounded.inverse(1e4), 10.0);
        assert_eq!(bounded.inverse(-1e4), 2.0);
    }

    #[test]
    fn test_edge_values() {
        let boundaries = all();
        assert_eq!(boundaries[0].edge_value(1e-16), None);
        assert_eq!(boundaries[1].edge_value(1e-16), Some(2.0));
        assert_eq!(boundaries[1].edge_value(1.0 - 1e-16), None);
        assert_eq!(boundaries[2].edge_value(1.0 - 1e-15), Some(10.0));
        assert_eq!(boundaries[3].edge_value(0.5), None);
        assert_eq!(boundaries[3].edge_value(1e-15), Some(2.0));
    }
}
