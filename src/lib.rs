//! Metalog distribution toolkit
//!
//! Re-exports the workspace crates:
//!
//! - [`metalog_core`]: error type, tail-stable logit helpers and the Brent root finder
//! - [`metalog`]: fitting, support transforms, feasibility, evaluation,
//!   CDF inversion and sampling
//!
//! ```rust
//! use metalog_stats::prelude::*;
//!
//! let model = MetalogBuilder::new()
//!     .order(4)
//!     .fit_data(&[3.1, 4.7, 5.0, 5.2, 6.8, 7.4, 9.9, 12.5])?;
//! let x = model.quantile_at(0.9)?;
//! assert!(x > model.median());
//! # Ok::<(), metalog_stats::Error>(())
//! ```

pub use metalog::*;
pub use metalog_core;

/// Commonly used items
pub mod prelude {
    pub use metalog::prelude::*;
}
