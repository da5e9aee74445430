// src/error.rs
use thiserror::Error;

/// Error type for every fallible operation in fast-lsmc
///
/// Configuration problems (`InvalidParameters`, `InvalidConfiguration`) are
/// raised before any simulation runs. `RegressionFailure` is raised during
/// backward induction and carries the time index of the failing fit.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Continuation-value regression could not be fitted
    #[error("Regression failed at time step {step}: {source}")]
    RegressionFailure {
        step: usize,
        #[source]
        source: RegressionError,
    },

    /// Numerical instability in the final estimate
    #[error("Numerical instability in {method}: {reason}")]
    NumericalInstability { method: String, reason: String },

    /// Diagnostics export failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PricingError {
    /// True for errors the caller fixes by changing the configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PricingError::InvalidParameters { .. } | PricingError::InvalidConfiguration { .. }
        )
    }
}

/// Failure modes of a single least-squares polynomial fit
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    #[error("{points} observations cannot identify a degree-{degree} polynomial")]
    InsufficientData { points: usize, degree: usize },

    #[error("only {distinct} distinct price level(s) for a degree-{degree} polynomial")]
    Singular { distinct: usize, degree: usize },

    #[error("fitted coefficients are not finite")]
    NonFinite,

    #[error("least-squares solve failed: {0}")]
    Solver(String),
}

/// Result type alias for fast-lsmc operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Validation utilities
pub mod validation {
    use super::{PricingError, PricingResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> PricingResult<()> {
        if value.is_nan() || value <= 0.0 {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> PricingResult<()> {
        if value.is_nan() || value < 0.0 {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PricingResult<()> {
        if !value.is_finite() {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate paths count
    pub fn validate_paths(paths: usize) -> PricingResult<()> {
        if paths == 0 {
            Err(PricingError::InvalidConfiguration {
                field: "n_paths".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if paths > 100_000_000 {
            Err(PricingError::InvalidConfiguration {
                field: "n_paths".to_string(),
                reason: "exceeds maximum allowed (100 million)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate steps count
    pub fn validate_steps(steps: usize) -> PricingResult<()> {
        if steps == 0 {
            Err(PricingError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if steps > 100_000 {
            Err(PricingError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "exceeds maximum allowed (100,000)".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("volatility", 0.2).is_ok());
        assert!(validate_positive("volatility", 0.0).is_err());
        assert!(validate_positive("volatility", -0.1).is_err());
        assert!(validate_positive("volatility", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("volatility", 0.0).is_ok());
        assert!(validate_non_negative("volatility", -1e-12).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("value", 1.0).is_ok());
        assert!(validate_finite("value", f64::NAN).is_err());
        assert!(validate_finite("value", f64::INFINITY).is_err());
        assert!(validate_finite("value", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_validate_counts() {
        assert!(validate_paths(1).is_ok());
        assert!(validate_paths(0).is_err());
        assert!(validate_steps(50).is_ok());
        assert!(validate_steps(0).is_err());
        assert!(validate_steps(100_001).is_err());
    }

    #[test]
    fn test_error_display() {
        let error = PricingError::InvalidParameters {
            parameter: "volatility".to_string(),
            value: -0.1,
            constraint: "must be non-negative".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("volatility"));
        assert!(display.contains("-0.1"));
        assert!(display.contains("non-negative"));
        assert!(error.is_configuration());
    }

    #[test]
    fn test_regression_failure_reports_step() {
        let error = PricingError::RegressionFailure {
            step: 17,
            source: RegressionError::Singular {
                distinct: 1,
                degree: 3,
            },
        };

        let display = format!("{}", error);
        assert!(display.contains("17"));
        assert!(!error.is_configuration());
        assert!(std::error::Error::source(&error).is_some());
    }
}
