//! # fast-lsmc: Least-Squares Monte Carlo for American Options
//!
//! A Rust library for pricing American-style (Bermudan-approximated) options
//! by Longstaff–Schwartz backward induction over simulated geometric
//! Brownian motion paths, with a closed-form Black-Scholes reference pricer.
//!
//! ## Key Features
//!
//! - **Reproducible**: every call seeds its own random streams; same seed, same paths
//! - **Parallel**: path generation and per-step work run on Rayon, with identical output
//! - **Variance Reduction**: antithetic variates
//! - **Diagnostics**: optional access to the path, payoff and value matrices
//! - **Fail Fast**: configuration is validated before any simulation runs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fast_lsmc::analytics::bs_analytic;
//! use fast_lsmc::config::LsmcConfig;
//! use fast_lsmc::mc::lsmc::LsmcEngine;
//!
//! // American put from Longstaff & Schwartz (2001): S₀=36, K=40, σ=0.2, T=1
//! let config = LsmcConfig::default();
//!
//! let result = LsmcEngine::new(config.clone())
//!     .and_then(|engine| engine.run())
//!     .expect("Valid configuration");
//! let european = bs_analytic::reference_price(&config);
//!
//! println!("American put: {:.4} ± {:.4}", result.premium, result.std_error);
//! println!("European put: {:.4}", european);
//! ```

pub mod analytics;
pub mod config;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod output;
pub mod rng;

// Re-export commonly used types for convenience
pub use config::LsmcConfig;
pub use error::{PricingError, PricingResult};
pub use mc::lsmc::{lsmc_price_option, Diagnostics, LsmcEngine, LsmcResult};
pub use mc::payoffs::{ExerciseStyle, OptionType, RegressionPaths};
