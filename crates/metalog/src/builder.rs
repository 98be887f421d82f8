//! Fluent configuration of metalog fits

use metalog_core::Result;

use crate::model::Metalog;
use crate::types::{Bounds, MetalogParameters, RankMethod};

/// Builder for configuring and creating metalog models.
///
/// Setters store values as given; everything is validated when a model is
/// built.
///
/// ```
/// use metalog::MetalogBuilder;
///
/// let model = MetalogBuilder::new()
///     .order(3)
///     .lower_bound(0.0)
///     .fit_quantile_pairs(&[2.0, 5.0, 9.0, 20.0], &[0.1, 0.5, 0.75, 0.95])
///     .unwrap();
/// assert_eq!(model.order(), 3);
/// assert!(model.quantile_at(0.5).unwrap() > 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetalogBuilder {
    params: MetalogParameters,
}

impl MetalogBuilder {
    /// Creates a builder with the default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from existing parameters
    pub fn from_parameters(params: MetalogParameters) -> Self {
        Self { params }
    }

    /// Sets the number of terms
    pub fn order(mut self, order: usize) -> Self {
        self.params.order = order;
        self
    }

    /// Bounds the support below
    pub fn lower_bound(mut self, lower: f64) -> Self {
        self.params.bounds.lower = Some(lower);
        self
    }

    /// Bounds the support above
    pub fn upper_bound(mut self, upper: f64) -> Self {
        self.params.bounds.upper = Some(upper);
        self
    }

    /// Replaces both bounds
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.params.bounds = bounds;
        self
    }

    /// Sets the rule assigning probabilities to ranked data
    pub fn rank_method(mut self, method: RankMethod) -> Self {
        self.params.rank_method = method;
        self
    }

    /// Parameters collected so far
    pub fn parameters(&self) -> &MetalogParameters {
        &self.params
    }

    /// Fits raw observations
    pub fn fit_data(&self, values: &[f64]) -> Result<Metalog> {
        Metalog::from_data(values, &self.params)
    }

    /// Fits (value, cumulative probability) pairs
    pub fn fit_quantile_pairs(&self, values: &[f64], probabilities: &[f64]) -> Result<Metalog> {
        Metalog::from_quantile_pairs(values, probabilities, &self.params)
    }

    /// Builds a model from explicit coefficients with the configured bounds.
    ///
    /// The order is the number of coefficients; a configured order is ignored.
    pub fn from_coefficients(&self, coefficients: &[f64]) -> Result<Metalog> {
        Metalog::from_coefficients(coefficients, self.params.bounds)
    }
}

/// Fits raw data with default parameters
pub fn fit(values: &[f64]) -> Result<Metalog> {
    MetalogBuilder::new().fit_data(values)
}
