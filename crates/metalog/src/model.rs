//! The metalog model handle

use std::fmt;

use metalog_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::boundary::{Boundary, SupportTransform};
use crate::estimate::least_squares;
use crate::feasibility::{self, FeasibilityMethod, FEASIBILITY_GRID_SIZE};
use crate::types::{
    check_order, BoundaryType, Bounds, EstimationReport, FitPoint, MetalogParameters,
};

/// A fitted or explicitly specified metalog distribution.
///
/// Created once through [`Metalog::from_data`], [`Metalog::from_quantile_pairs`]
/// or [`Metalog::from_coefficients`] and immutable afterwards. The support
/// transform is resolved at construction. Deserialization re-validates the
/// stored fields and recomputes feasibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MetalogRepr")]
pub struct Metalog {
    order: usize,
    bounds: Bounds,
    boundary: Boundary,
    coefficients: Vec<f64>,
    feasible: bool,
    source: Option<Vec<FitPoint>>,
    report: Option<EstimationReport>,
}

/// Serialized form of [`Metalog`], checked before it becomes a model
#[derive(Deserialize)]
struct MetalogRepr {
    order: usize,
    bounds: Bounds,
    #[serde(default)]
    boundary: Option<Boundary>,
    coefficients: Vec<f64>,
    #[serde(default)]
    source: Option<Vec<FitPoint>>,
    #[serde(default)]
    report: Option<EstimationReport>,
}

impl TryFrom<MetalogRepr> for Metalog {
    type Error = Error;

    fn try_from(repr: MetalogRepr) -> Result<Self> {
        check_order(repr.order)?;
        if repr.coefficients.len() != repr.order {
            return Err(Error::size_mismatch(repr.order, repr.coefficients.len(), "coefficients"));
        }
        let mut model = Self::from_coefficients(&repr.coefficients, repr.bounds)?;

        if repr.boundary.is_some_and(|b| b != model.boundary) {
            return Err(Error::InvalidInput(format!(
                "boundary does not match bounds ({})",
                model.boundary_type()
            )));
        }
        if let Some(source) = &repr.source {
            if source
                .iter()
                .any(|pt| !pt.is_usable() || !model.boundary.contains(pt.value))
            {
                return Err(Error::InvalidInput(
                    "source data contains points outside the support".to_string(),
                ));
            }
        }

        model.source = repr.source;
        model.report = repr.report;
        Ok(model)
    }
}

impl Metalog {
    /// Fit raw observations.
    ///
    /// Non-finite values are dropped, values outside the bounds are excluded
    /// and the rest are ranked with `params.rank_method` to obtain their
    /// empirical probabilities.
    #[instrument(skip(values), fields(n = values.len(), order = params.order))]
    pub fn from_data(values: &[f64], params: &MetalogParameters) -> Result<Self> {
        params.validate()?;
        let boundary = Boundary::from_bounds(&params.bounds)?;

        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let missing = values.len() - finite.len();

        let mut kept: Vec<f64> = finite.iter().copied().filter(|&v| boundary.contains(v)).collect();
        let excluded = finite.len() - kept.len();
        log_excluded(excluded, finite.len());

        kept.sort_by(f64::total_cmp);
        let probabilities = params.rank_method.probabilities(kept.len());
        let points = kept
            .into_iter()
            .zip(probabilities)
            .map(|(value, probability)| FitPoint::new(value, probability))
            .collect();

        Self::fit(points, params, boundary, excluded, missing)
    }

    /// Fit elicited (value, cumulative probability) pairs.
    ///
    /// Pairs with a missing entry or a probability outside (0, 1) are
    /// dropped; values outside the bounds are excluded.
    #[instrument(skip(values, probabilities), fields(n = values.len(), order = params.order))]
    pub fn from_quantile_pairs(
        values: &[f64],
        probabilities: &[f64],
        params: &MetalogParameters,
    ) -> Result<Self> {
        if values.len() != probabilities.len() {
            return Err(Error::size_mismatch(values.len(), probabilities.len(), "probabilities"));
        }
        params.validate()?;
        let boundary = Boundary::from_bounds(&params.bounds)?;

        let usable: Vec<FitPoint> = values
            .iter()
            .zip(probabilities)
            .map(|(&value, &probability)| FitPoint::new(value, probability))
            .filter(FitPoint::is_usable)
            .collect();
        let missing = values.len() - usable.len();

        let points: Vec<FitPoint> = usable
            .iter()
            .copied()
            .filter(|pt| boundary.contains(pt.value))
            .collect();
        let excluded = usable.len() - points.len();
        log_excluded(excluded, usable.len());

        Self::fit(points, params, boundary, excluded, missing)
    }

    /// Build a model from explicit coefficients; the order is their count.
    pub fn from_coefficients(coefficients: &[f64], bounds: Bounds) -> Result<Self> {
        check_order(coefficients.len())?;
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(Error::non_finite("coefficients"));
        }
        let boundary = Boundary::from_bounds(&bounds)?;
        let feasible = feasibility::is_feasible(coefficients);
        if !feasible {
            warn!(order = coefficients.len(), "coefficients fail the feasibility check");
        }

        Ok(Self {
            order: coefficients.len(),
            bounds,
            boundary,
            coefficients: coefficients.to_vec(),
            feasible,
            source: None,
            report: None,
        })
    }

    /// Refit the retained source points with a different number of terms.
    pub fn refit(&self, order: usize) -> Result<Self> {
        let source = self.source.as_ref().ok_or_else(|| {
            Error::InvalidInput("model was built from coefficients and has no source data".to_string())
        })?;
        let params = MetalogParameters {
            order,
            bounds: self.bounds,
            ..MetalogParameters::default()
        };
        params.validate()?;
        let (excluded, missing) = self
            .report
            .map_or((0, 0), |r| (r.points_excluded, r.points_missing));
        Self::fit(source.clone(), &params, self.boundary, excluded, missing)
    }

    fn fit(
        points: Vec<FitPoint>,
        params: &MetalogParameters,
        boundary: Boundary,
        excluded: usize,
        missing: usize,
    ) -> Result<Self> {
        let transformed: Vec<FitPoint> = points
            .iter()
            .filter_map(|pt| {
                boundary
                    .transform(pt.value)
                    .map(|z| FitPoint::new(z, pt.probability))
            })
            .collect();

        let estimate = least_squares(&transformed, params.order)?;
        let feasible = feasibility::is_feasible(&estimate.coefficients);
        if !feasible {
            warn!(order = params.order, "fitted coefficients fail the feasibility check");
        }

        Ok(Self {
            order: params.order,
            bounds: params.bounds,
            boundary,
            coefficients: estimate.coefficients,
            feasible,
            source: Some(points),
            report: Some(EstimationReport {
                points_used: estimate.points_used,
                points_excluded: excluded,
                points_missing: missing,
                rank: estimate.rank,
                singular: estimate.singular,
            }),
        })
    }

    /// Number of terms
    pub fn order(&self) -> usize {
        self.order
    }

    /// Support bounds as given at construction
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Support transform in use
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Shape of the support
    pub fn boundary_type(&self) -> BoundaryType {
        self.boundary.boundary_type()
    }

    /// Open support `(lower, upper)`, infinite where unbounded
    pub fn support(&self) -> (f64, f64) {
        self.boundary.support()
    }

    /// Coefficients `a_1..a_k` of the unbounded expansion
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Whether the coefficients passed the feasibility check.
    ///
    /// Above four terms this is the sampled check, which can miss narrow
    /// negative-density regions.
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Points the model was fitted to, in the original value space
    pub fn source_data(&self) -> Option<&[FitPoint]> {
        self.source.as_deref()
    }

    /// Estimation diagnostics, absent for coefficient-built models
    pub fn report(&self) -> Option<&EstimationReport> {
        self.report.as_ref()
    }

    /// Human-readable diagnostic summary
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

fn log_excluded(excluded: usize, total: usize) {
    if excluded > 0 {
        info!("excluded {} of {} points outside bounds", excluded, total);
    }
}

impl fmt::Display for Metalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Metalog distribution")?;
        writeln!(f, "  order:        {}", self.order)?;

        let (lower, upper) = self.support();
        writeln!(f, "  boundary:     {} ({}, {})", self.boundary_type(), lower, upper)?;

        let method = match feasibility::method_for_order(self.order) {
            FeasibilityMethod::ClosedForm => "closed-form check".to_string(),
            FeasibilityMethod::Sampled => format!(
                "sampled at {FEASIBILITY_GRID_SIZE} points; necessary, not sufficient"
            ),
        };
        let verdict = if self.feasible { "yes" } else { "no" };
        writeln!(f, "  feasible:     {verdict} ({method})")?;

        writeln!(f, "  coefficients:")?;
        for (i, a) in self.coefficients.iter().enumerate() {
            writeln!(f, "    a{:<2} = {:>14.6e}", i + 1, a)?;
        }

        match &self.report {
            Some(report) => {
                writeln!(
                    f,
                    "  fit:          {} points used, {} excluded by bounds, {} missing",
                    report.points_used, report.points_excluded, report.points_missing
                )?;
                write!(f, "  rank:         {}/{}", report.rank, self.order)?;
                if report.singular {
                    write!(f, " (singular system, minimum-norm solution)")?;
                }
                writeln!(f)?;
            }
            None => writeln!(f, "  fit:          built from coefficients")?,
        }

        write!(f, "  median:       {:.6}", self.median())
    }
}
