//! Quantile and density evaluation
//!
//! The quantile of a model is the unbounded expansion `M(p)` pushed through
//! the support transform. The density is the reciprocal of `dM/dp` scaled by
//! the transform's jacobian. Both are closed form.

use metalog_core::{Error, Result};
use tracing::debug;

use crate::boundary::SupportTransform;
use crate::design::{fill_basis, fill_basis_derivative};
use crate::feasibility;
use crate::model::Metalog;
use crate::types::MAX_ORDER;

/// Unbounded quantile `M(p) = sum a_i b_i(p)`.
///
/// NaN for more than [`MAX_ORDER`] coefficients.
pub fn unbounded_quantile(coefficients: &[f64], p: f64) -> f64 {
    if coefficients.len() > MAX_ORDER {
        return f64::NAN;
    }
    let mut basis = [0.0; MAX_ORDER];
    let basis = &mut basis[..coefficients.len()];
    fill_basis(p, basis);
    dot(basis, coefficients)
}

/// Slope `dM/dp` of the unbounded quantile; NaN past [`MAX_ORDER`] terms
pub fn quantile_derivative(coefficients: &[f64], p: f64) -> f64 {
    if coefficients.len() > MAX_ORDER {
        return f64::NAN;
    }
    let mut basis = [0.0; MAX_ORDER];
    let basis = &mut basis[..coefficients.len()];
    fill_basis_derivative(p, basis);
    dot(basis, coefficients)
}

/// Unbounded density `1 / (dM/dp)`
pub fn unbounded_density(coefficients: &[f64], p: f64) -> f64 {
    1.0 / quantile_derivative(coefficients, p)
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn in_domain(p: f64) -> bool {
    p > 0.0 && p < 1.0
}

impl Metalog {
    /// Quantiles at each probability; out-of-domain or missing entries map to NaN
    pub fn quantile(&self, probabilities: &[f64]) -> Vec<f64> {
        self.log_out_of_domain(probabilities, "quantile");
        probabilities.iter().map(|&p| self.quantile_value(p)).collect()
    }

    /// Densities at each probability; out-of-domain or missing entries map to NaN
    pub fn density(&self, probabilities: &[f64]) -> Vec<f64> {
        self.log_out_of_domain(probabilities, "density");
        probabilities.iter().map(|&p| self.density_value(p)).collect()
    }

    /// Like [`Metalog::quantile`], but fails unless the coefficients pass
    /// the feasibility check
    pub fn quantile_strict(&self, probabilities: &[f64]) -> Result<Vec<f64>> {
        self.ensure_feasible()?;
        Ok(self.quantile(probabilities))
    }

    /// Like [`Metalog::density`], but fails unless the coefficients pass
    /// the feasibility check
    pub fn density_strict(&self, probabilities: &[f64]) -> Result<Vec<f64>> {
        self.ensure_feasible()?;
        Ok(self.density(probabilities))
    }

    /// Quantile at a single probability
    pub fn quantile_at(&self, p: f64) -> Result<f64> {
        Error::check_probability(p)?;
        Ok(self.quantile_value(p))
    }

    /// Density at a single probability
    pub fn density_at(&self, p: f64) -> Result<f64> {
        Error::check_probability(p)?;
        Ok(self.density_value(p))
    }

    /// Median, `Q(1/2)`
    pub fn median(&self) -> f64 {
        self.quantile_value(0.5)
    }

    pub(crate) fn quantile_value(&self, p: f64) -> f64 {
        if !in_domain(p) {
            return f64::NAN;
        }
        if let Some(edge) = self.boundary().edge_value(p) {
            return edge;
        }
        self.boundary()
            .inverse(unbounded_quantile(self.coefficients(), p))
    }

    pub(crate) fn density_value(&self, p: f64) -> f64 {
        if !in_domain(p) {
            return f64::NAN;
        }
        if self.boundary().edge_value(p).is_some() {
            return 0.0;
        }
        let coefficients = self.coefficients();
        let m = unbounded_quantile(coefficients, p);
        unbounded_density(coefficients, p) * self.boundary().density_jacobian(m)
    }

    fn ensure_feasible(&self) -> Result<()> {
        if feasibility::is_feasible(self.coefficients()) {
            Ok(())
        } else {
            Err(Error::Infeasible(format!(
                "order {} coefficients fail the {} feasibility check",
                self.order(),
                feasibility::method_for_order(self.order()).name()
            )))
        }
    }

    fn log_out_of_domain(&self, probabilities: &[f64], operation: &str) {
        let invalid = probabilities.iter().filter(|&&p| !in_domain(p)).count();
        if invalid > 0 {
            debug!(
                "{}: {} of {} probabilities outside (0, 1) returned as NaN",
                operation,
                invalid,
                probabilities.len()
            );
        }
    }
}
