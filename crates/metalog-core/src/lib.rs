//! Core error type and numeric helpers for metalog distributions
//!
//! This crate holds the pieces shared by every metalog crate:
//!
//! - [`Error`] / [`Result`]: the unified error type
//! - [`math`]: tail-stable logit/logistic and plotting positions
//! - [`root`]: Brent's bracketed root finder with an iteration guard
//!
//! # Example
//!
//! ```rust
//! use metalog_core::{math::logit, root::{brent, RootOptions}};
//!
//! // Recover p from a log-odds value
//! let p = brent(|p| logit(p) - 2.0, 1e-12, 1.0 - 1e-12, RootOptions::default()).unwrap();
//! assert!((p - 1.0 / (1.0 + (-2.0_f64).exp())).abs() < 1e-10);
//! ```

pub mod error;
pub mod math;
pub mod root;

pub use error::{Error, Result};
pub use math::{logistic, logit, plotting_position};
pub use root::{brent, RootOptions};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
