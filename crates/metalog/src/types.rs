//! Parameter and record types for metalog fitting

use std::fmt;
use std::str::FromStr;

use metalog_core::{math::plotting_position, Error, Result};
use serde::{Deserialize, Serialize};

/// Smallest supported number of terms
pub const MIN_ORDER: usize = 2;
/// Largest supported number of terms
pub const MAX_ORDER: usize = 32;
/// Number of terms used when none is requested
pub const DEFAULT_ORDER: usize = 5;
/// Minimum number of distinct usable points for a fit
pub const MIN_FIT_POINTS: usize = 3;

/// Check that an order lies in `[MIN_ORDER, MAX_ORDER]`
pub fn check_order(order: usize) -> Result<()> {
    if (MIN_ORDER..=MAX_ORDER).contains(&order) {
        Ok(())
    } else {
        Err(Error::InvalidOrder {
            order,
            min: MIN_ORDER,
            max: MAX_ORDER,
        })
    }
}

/// Optional lower and upper bounds of the support
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound, if the support is bounded below
    pub lower: Option<f64>,
    /// Upper bound, if the support is bounded above
    pub upper: Option<f64>,
}

impl Bounds {
    /// Support on the whole real line
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Support `(lower, +inf)`
    pub fn lower(lower: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: None,
        }
    }

    /// Support `(-inf, upper)`
    pub fn upper(upper: f64) -> Self {
        Self {
            lower: None,
            upper: Some(upper),
        }
    }

    /// Support `(lower, upper)`
    pub fn bounded(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Validate that present bounds are finite and ordered
    pub fn validate(&self) -> Result<()> {
        let lower = self.lower.unwrap_or(f64::NEG_INFINITY);
        let upper = self.upper.unwrap_or(f64::INFINITY);
        let finite = self.lower.map_or(true, f64::is_finite) && self.upper.map_or(true, f64::is_finite);
        if !finite || lower >= upper {
            return Err(Error::InvalidBounds { lower, upper });
        }
        Ok(())
    }

    /// Boundary type implied by which bounds are present
    pub fn boundary_type(&self) -> BoundaryType {
        match (self.lower, self.upper) {
            (None, None) => BoundaryType::Unbounded,
            (Some(_), None) => BoundaryType::SemiLower,
            (None, Some(_)) => BoundaryType::SemiUpper,
            (Some(_), Some(_)) => BoundaryType::Bounded,
        }
    }
}

/// Shape of the support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryType {
    /// Whole real line
    Unbounded,
    /// Bounded below only
    SemiLower,
    /// Bounded above only
    SemiUpper,
    /// Bounded on both sides
    Bounded,
}

impl BoundaryType {
    /// Get the name of this boundary type
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unbounded => "unbounded",
            Self::SemiLower => "semi-bounded (lower)",
            Self::SemiUpper => "semi-bounded (upper)",
            Self::Bounded => "bounded",
        }
    }
}

impl fmt::Display for BoundaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A (value, cumulative probability) pair used for fitting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitPoint {
    /// Observed or elicited value
    pub value: f64,
    /// Cumulative probability of `value`, in (0, 1)
    pub probability: f64,
}

impl FitPoint {
    /// Create a new fit point
    pub fn new(value: f64, probability: f64) -> Self {
        Self { value, probability }
    }

    /// Whether the point can take part in a fit
    pub fn is_usable(&self) -> bool {
        self.value.is_finite() && self.probability > 0.0 && self.probability < 1.0
    }
}

/// Rule for assigning empirical probabilities to ranked raw data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RankMethod {
    /// `i / (n + 1)`
    #[default]
    VanDerWaerden,
    /// `(i - 3/8) / (n + 1/4)`
    Blom,
    /// `(i - 1/3) / (n + 1/3)`
    Tukey,
    /// `(i - 1/2) / n`
    Hazen,
}

impl RankMethod {
    /// Plotting-position offset of this method
    pub fn alpha(&self) -> f64 {
        match self {
            Self::VanDerWaerden => 0.0,
            Self::Blom => 0.375,
            Self::Tukey => 1.0 / 3.0,
            Self::Hazen => 0.5,
        }
    }

    /// Short name, as accepted by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            Self::VanDerWaerden => "VW",
            Self::Blom => "Blom",
            Self::Tukey => "Tukey",
            Self::Hazen => "Hazen",
        }
    }

    /// Probabilities for ranks `1..=n` of a sorted sample
    pub fn probabilities(&self, n: usize) -> Vec<f64> {
        let alpha = self.alpha();
        (1..=n).map(|rank| plotting_position(rank, n, alpha)).collect()
    }
}

impl FromStr for RankMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "vw" | "vanderwaerden" | "van der waerden" => Ok(Self::VanDerWaerden),
            "blom" => Ok(Self::Blom),
            "tukey" => Ok(Self::Tukey),
            "hazen" => Ok(Self::Hazen),
            _ => Err(Error::InvalidInput(format!(
                "unknown rank method '{s}' (expected VW, Blom, Tukey or Hazen)"
            ))),
        }
    }
}

/// Parameters controlling a fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetalogParameters {
    /// Number of terms in the quantile expansion
    pub order: usize,
    /// Support bounds
    pub bounds: Bounds,
    /// Empirical probability rule for raw data
    pub rank_method: RankMethod,
}

impl Default for MetalogParameters {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            bounds: Bounds::unbounded(),
            rank_method: RankMethod::default(),
        }
    }
}

impl MetalogParameters {
    /// Validate order and bounds
    pub fn validate(&self) -> Result<()> {
        check_order(self.order)?;
        self.bounds.validate()
    }
}

/// Diagnostics recorded while estimating coefficients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimationReport {
    /// Points that entered the least-squares system
    pub points_used: usize,
    /// Points dropped because they lie outside the bounds
    pub points_excluded: usize,
    /// Points dropped for a missing value or probability
    pub points_missing: usize,
    /// Numerical rank of the normal equations
    pub rank: usize,
    /// Whether the normal equations were rank deficient
    pub singular: bool,
}
