//! Metalog distributions
//!
//! The metalog is a quantile-parameterized family: its quantile function is a
//! linear expansion in `logit(p)` and powers of `p - 1/2`, so coefficients are
//! estimated by ordinary least squares and the shape follows the data rather
//! than a fixed parametric form.
//!
//! This crate provides:
//!
//! - **Fitting** from raw observations or elicited (value, probability) pairs
//! - **Support transforms** for semi-bounded and bounded variables
//! - **Feasibility checks** that the fitted density is non-negative
//! - **Evaluation** of quantiles and densities by probability
//! - **CDF** by numeric inversion and **sampling** by inverse transform
//!
//! # Examples
//!
//! ```rust
//! use metalog::{Metalog, MetalogParameters};
//!
//! let values = [14.0, 18.0, 22.8, 24.6, 26.1, 31.0, 38.0, 41.0];
//! let probabilities = [0.1, 0.25, 0.4, 0.5, 0.6, 0.75, 0.9, 0.95];
//!
//! let model = Metalog::from_quantile_pairs(&values, &probabilities, &MetalogParameters::default())?;
//! let median = model.quantile_at(0.5)?;
//! assert!((median - 24.3).abs() < 0.1);
//!
//! let p = model.cdf_at(median)?;
//! assert!((p - 0.5).abs() < 1e-9);
//! # Ok::<(), metalog::Error>(())
//! ```
//!
//! ## Bounded support
//!
//! ```rust
//! use metalog::MetalogBuilder;
//!
//! let model = MetalogBuilder::new()
//!     .order(3)
//!     .lower_bound(0.0)
//!     .upper_bound(100.0)
//!     .fit_quantile_pairs(&[10.0, 40.0, 85.0], &[0.1, 0.5, 0.9])?;
//!
//! let q = model.quantile(&[1e-9, 0.5, 1.0 - 1e-9]);
//! assert!(q.iter().all(|&x| x > 0.0 && x < 100.0));
//! # Ok::<(), metalog::Error>(())
//! ```

pub mod boundary;
pub mod builder;
pub mod design;
pub mod estimate;
mod evaluate;
pub mod feasibility;
mod inverse;
mod model;
mod sampling;
pub mod types;

// Re-exports
pub use boundary::{Boundary, SupportTransform, EDGE_EPSILON};
pub use builder::{fit, MetalogBuilder};
pub use evaluate::{quantile_derivative, unbounded_density, unbounded_quantile};
pub use feasibility::{is_feasible, FeasibilityMethod};
pub use inverse::{inversion_grid, BRACKET_PERTURBATION, INVERSION_GRID_SIZE};
pub use metalog_core::{Error, Result};
pub use model::Metalog;
pub use types::{
    BoundaryType, Bounds, EstimationReport, FitPoint, MetalogParameters, RankMethod,
    DEFAULT_ORDER, MAX_ORDER, MIN_ORDER,
};

/// Commonly used items
pub mod prelude {
    pub use crate::builder::MetalogBuilder;
    pub use crate::model::Metalog;
    pub use crate::types::{BoundaryType, Bounds, MetalogParameters, RankMethod};
    pub use metalog_core::{Error, Result};
}
