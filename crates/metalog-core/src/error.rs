//! Error types for metalog distributions
//!
//! Provides a unified error type for all metalog crates.

use thiserror::Error;

/// Core error type for metalog construction and evaluation
#[derive(Error, Debug)]
pub enum Error {
    /// Order outside the supported range
    #[error("Invalid order: {order} (must be between {min} and {max})")]
    InvalidOrder { order: usize, min: usize, max: usize },

    /// Bounds that do not describe a valid support
    #[error("Invalid bounds: lower {lower} must be finite and strictly below upper {upper}")]
    InvalidBounds { lower: f64, upper: f64 },

    /// Too few usable points to fit
    #[error("Insufficient data: expected at least {expected} usable points, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Probability outside the open unit interval
    #[error("Probability {p} must be in (0, 1)")]
    InvalidProbability { p: f64 },

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Value outside the support of the distribution
    #[error("Value {value} lies outside the support ({lower}, {upper})")]
    OutOfSupport { value: f64, lower: f64, upper: f64 },

    /// Model failed the feasibility check
    #[error("Infeasible model: {0}")]
    Infeasible(String),

    /// Root search found no sign change
    #[error("No sign change bracketing value {value}; quantile function is not monotone")]
    NoBracket { value: f64 },

    /// Iterative solver hit its iteration cap
    #[error("Root finder did not converge within {iterations} iterations")]
    Convergence { iterations: usize },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for mismatched input lengths
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::InvalidInput(format!("{context} contains NaN or infinite values"))
    }

    /// Check that a probability lies strictly inside (0, 1)
    pub fn check_probability(p: f64) -> Result<()> {
        if p > 0.0 && p < 1.0 {
            Ok(())
        } else {
            Err(Self::InvalidProbability { p })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidOrder { order: 40, min: 2, max: 32 };
        assert_eq!(err.to_string(), "Invalid order: 40 (must be between 2 and 32)");

        let err = Error::InvalidBounds { lower: 5.0, upper: 1.0 };
        assert_eq!(
            err.to_string(),
            "Invalid bounds: lower 5 must be finite and strictly below upper 1"
        );

        let err = Error::InsufficientData { expected: 3, actual: 2 };
        assert_eq!(
            err.to_string(),
            "Insufficient data: expected at least 3 usable points, got 2"
        );

        let err = Error::OutOfSupport { value: -1.0, lower: 0.0, upper: f64::INFINITY };
        assert_eq!(err.to_string(), "Value -1 lies outside the support (0, inf)");

        let err = Error::Convergence { iterations: 200 };
        assert_eq!(err.to_string(), "Root finder did not converge within 200 iterations");
    }

    #[test]
    fn test_check_probability() {
        assert!(Error::check_probability(0.5).is_ok());
        assert!(Error::check_probability(1e-300).is_ok());
        assert!(matches!(
            Error::check_probability(0.0),
            Err(Error::InvalidProbability { p }) if p == 0.0
        ));
        assert!(Error::check_probability(1.0).is_err());
        assert!(Error::check_probability(f64::NAN).is_err());
    }

    #[test]
    fn test_helpers() {
        let err = Error::size_mismatch(8, 7, "probabilities");
        assert_eq!(
            err.to_string(),
            "Invalid input: Size mismatch in probabilities: expected 8, got 7"
        );

        let err = Error::non_finite("coefficients");
        assert_eq!(
            err.to_string(),
            "Invalid input: coefficients contains NaN or infinite values"
        );
    }

    #[test]
    fn test_error_from_anyhow() {
        let err: Error = anyhow::anyhow!("custom error message").into();
        match err {
            Error::Other(_) => assert!(err.to_string().contains("custom error message")),
            _ => panic!("Wrong error type"),
        }
    }
}
