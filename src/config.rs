// src/config.rs
//! Pricing configuration
//!
//! All recognized options live in [`LsmcConfig`]. The struct deserializes
//! from JSON with every field optional; missing fields fall back to
//! [`LsmcConfig::default`], which is the Longstaff–Schwartz (2001) reference
//! American put.

use crate::error::{validation::*, PricingError, PricingResult};
use crate::mc::paths::PathConfig;
use crate::mc::payoffs::{ExerciseStyle, OptionType, RegressionPaths};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LsmcConfig {
    pub initial_price: f64,
    pub strike: f64,
    pub rate: f64,
    pub volatility: f64,
    pub maturity: f64,
    pub steps: usize,
    pub n_paths: usize,
    pub poly_degree: usize,
    pub seed: u64,
    pub antithetic: bool,
    pub option_type: OptionType,
    pub exercise: ExerciseStyle,
    pub regression_paths: RegressionPaths,
}

impl Default for LsmcConfig {
    fn default() -> Self {
        LsmcConfig {
            initial_price: 36.0,
            strike: 40.0,
            rate: 0.06,
            volatility: 0.2,
            maturity: 1.0,
            steps: 50,
            n_paths: 100_000,
            poly_degree: 5,
            seed: 42,
            antithetic: false,
            option_type: OptionType::Put,
            exercise: ExerciseStyle::American,
            regression_paths: RegressionPaths::InTheMoney,
        }
    }
}

impl LsmcConfig {
    /// Parse a JSON document; unknown keys and bad option types are
    /// configuration errors.
    pub fn from_json_str(json: &str) -> PricingResult<Self> {
        serde_json::from_str(json).map_err(|e| PricingError::InvalidConfiguration {
            field: "json".to_string(),
            reason: e.to_string(),
        })
    }

    /// Validate the configuration before any simulation runs
    pub fn validate(&self) -> PricingResult<()> {
        validate_positive("initial_price", self.initial_price)?;
        validate_finite("initial_price", self.initial_price)?;
        validate_positive("strike", self.strike)?;
        validate_finite("strike", self.strike)?;
        validate_finite("rate", self.rate)?;
        validate_non_negative("volatility", self.volatility)?;
        validate_finite("volatility", self.volatility)?;
        validate_positive("maturity", self.maturity)?;
        validate_finite("maturity", self.maturity)?;
        validate_steps(self.steps)?;
        validate_paths(self.n_paths)?;

        if self.antithetic && self.n_paths % 2 != 0 {
            return Err(PricingError::InvalidConfiguration {
                field: "n_paths".to_string(),
                reason: format!(
                    "antithetic sampling needs an even path count, got {}",
                    self.n_paths
                ),
            });
        }

        if self.poly_degree >= self.n_paths {
            return Err(PricingError::InvalidConfiguration {
                field: "poly_degree".to_string(),
                reason: format!(
                    "degree {} needs more than {} paths to fit",
                    self.poly_degree, self.n_paths
                ),
            });
        }

        Ok(())
    }

    pub fn dt(&self) -> f64 {
        self.maturity / self.steps as f64
    }

    /// One-step discount factor exp(-r·Δt)
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.dt()).exp()
    }

    /// Risk-neutral path simulation settings (drift = rate)
    pub fn path_config(&self) -> PathConfig {
        PathConfig {
            s0: self.initial_price,
            mu: self.rate,
            sigma: self.volatility,
            t: self.maturity,
            steps: self.steps,
            n_paths: self.n_paths,
            seed: self.seed,
            antithetic: self.antithetic,
        }
    }
}
