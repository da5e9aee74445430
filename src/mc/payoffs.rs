//! Option Payoff Functions
//!
//! # Mathematical Definitions
//!
//! - **Call**: max(S - K, 0), the right to buy at strike K
//! - **Put**: max(K - S, 0), the right to sell at strike K
//!
//! The payoff matrix applies the intrinsic value to every cell of a
//! simulated path matrix, so entry `[i, t]` is the value of exercising on
//! path `i` at time step `t`.

use crate::error::PricingError;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Option style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Intrinsic (immediate exercise) value, never negative
    #[inline]
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            other => Err(PricingError::InvalidConfiguration {
                field: "option_type".to_string(),
                reason: format!("unknown option type '{}', expected 'call' or 'put'", other),
            }),
        }
    }
}

impl TryFrom<String> for OptionType {
    type Error = PricingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// When the holder may exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseStyle {
    /// Any time step 1..=N (Bermudan approximation of American exercise)
    #[default]
    American,
    /// Only at maturity
    European,
}

/// Which paths enter the continuation-value regression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegressionPaths {
    /// Every path; the exercise rule is applied to every path as well
    All,
    /// Only paths with positive intrinsic value; the rest hold
    #[default]
    InTheMoney,
}

/// Intrinsic value of every cell of `paths`
pub fn payoff_matrix(paths: &Array2<f64>, option_type: OptionType, strike: f64) -> Array2<f64> {
    let mut payoffs = paths.to_owned();
    payoffs.par_mapv_inplace(|s| option_type.intrinsic(s, strike));
    payoffs
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_intrinsic_values() {
        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
    }

    #[test]
    fn test_payoff_matrix_shape_and_values() {
        let paths = array![[40.0, 38.0, 43.0], [40.0, 41.0, 35.0]];
        let payoffs = payoff_matrix(&paths, OptionType::Put, 40.0);

        assert_eq!(payoffs.dim(), paths.dim());
        assert_eq!(payoffs, array![[0.0, 2.0, 0.0], [0.0, 0.0, 5.0]]);
    }

    #[test]
    fn test_option_type_parsing() {
        assert_eq!("call".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!(" PUT ".parse::<OptionType>().unwrap(), OptionType::Put);

        let err = "straddle".parse::<OptionType>().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("straddle"));
    }

    #[test]
    fn test_regression_paths_serde() {
        let parsed: RegressionPaths = serde_json::from_str("\"in_the_money\"").unwrap();
        assert_eq!(parsed, RegressionPaths::InTheMoney);
        assert_eq!(RegressionPaths::default(), RegressionPaths::InTheMoney);
    }

    #[test]
    fn test_option_type_serde() {
        let parsed: OptionType = serde_json::from_str("\"Call\"").unwrap();
        assert_eq!(parsed, OptionType::Call);
        assert_eq!(serde_json::to_string(&OptionType::Put).unwrap(), "\"put\"");
        assert!(serde_json::from_str::<OptionType>("\"binary\"").is_err());
    }
}
