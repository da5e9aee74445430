// src/mc/lsmc.rs
//! Least-Squares Monte Carlo (Longstaff–Schwartz) engine
//!
//! # Algorithm
//!
//! With one-step discount `D = exp(-r·Δt)`, payoff `h` and value `V`:
//! ```text
//! V[:,N] = h[:,N]
//! for t = N-1 down to 1:
//!     C      = polyfit(S[:,t], D·V[:,t+1], degree) evaluated at S[:,t]
//!     V[:,t] = h[:,t]     where h[:,t] > C      (exercise)
//!              D·V[:,t+1] otherwise              (hold, ties included)
//! premium = D · mean(V[:,1])
//! ```
//!
//! Discounting is applied step by step so cash flows from any exercise date
//! compound back correctly. Column 0 is the fixed starting point and never
//! a decision date.
//!
//! # Regression Paths
//!
//! By default the fit uses only in-the-money paths, and out-of-the-money
//! paths always hold. When fewer paths are in the money than the polynomial
//! has coefficients, every path holds at that step. `RegressionPaths::All`
//! fits and applies the rule across every path.
//!
//! # Exercise Styles
//!
//! `European` skips the regression and always holds, giving the plain
//! terminal-payoff Monte Carlo estimator on the same paths.
//!
//! # Memory
//!
//! Only the current value column is kept. The payoff and value matrices are
//! materialized when requested through [`Diagnostics`].

use crate::config::LsmcConfig;
use crate::error::{PricingError, PricingResult, RegressionError};
use crate::mc::paths::simulate_paths;
use crate::mc::payoffs::{payoff_matrix, ExerciseStyle, RegressionPaths};
use crate::mc::regression;
use bitflags::bitflags;
use ndarray::{Array1, Array2, Zip};

bitflags! {
    /// Intermediate matrices to keep in [`LsmcResult::diagnostics`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Diagnostics: u32 {
        const NONE    = 0;
        const PATHS   = 1 << 0;
        const PAYOFFS = 1 << 1;
        const VALUES  = 1 << 2;
        const ALL     = Self::PATHS.bits() | Self::PAYOFFS.bits() | Self::VALUES.bits();
    }
}

#[derive(Debug, Clone, Default)]
pub struct LsmcDiagnostics {
    pub paths: Option<Array2<f64>>,
    pub payoffs: Option<Array2<f64>>,
    /// Value matrix; column 0 is left at zero
    pub values: Option<Array2<f64>>,
}

#[derive(Debug, Clone)]
pub struct LsmcResult {
    pub premium: f64,
    /// Standard error of the premium across paths
    pub std_error: f64,
    /// `early_exercise_counts[t]`: paths where the exercise rule fired at step t
    pub early_exercise_counts: Vec<usize>,
    pub diagnostics: LsmcDiagnostics,
}

impl LsmcResult {
    pub fn total_early_exercises(&self) -> usize {
        self.early_exercise_counts.iter().sum()
    }
}

#[derive(Debug, Clone)]
pub struct LsmcEngine {
    cfg: LsmcConfig,
    diagnostics: Diagnostics,
}

impl LsmcEngine {
    /// Validates `cfg` up front; no simulation runs on a bad configuration.
    pub fn new(cfg: LsmcConfig) -> PricingResult<Self> {
        cfg.validate()?;
        Ok(LsmcEngine {
            cfg,
            diagnostics: Diagnostics::NONE,
        })
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn config(&self) -> &LsmcConfig {
        &self.cfg
    }

    /// Simulate paths from the configured seed and price them
    pub fn run(&self) -> PricingResult<LsmcResult> {
        let paths = simulate_paths(&self.cfg.path_config())?;
        let mut result = self.backward_induction(&paths)?;
        if self.diagnostics.contains(Diagnostics::PATHS) {
            result.diagnostics.paths = Some(paths);
        }
        Ok(result)
    }

    /// Price a caller-supplied path matrix of shape `(n_paths, steps + 1)`.
    /// The matrix is not modified.
    pub fn price_paths(&self, paths: &Array2<f64>) -> PricingResult<LsmcResult> {
        let mut result = self.backward_induction(paths)?;
        if self.diagnostics.contains(Diagnostics::PATHS) {
            result.diagnostics.paths = Some(paths.clone());
        }
        Ok(result)
    }

    fn backward_induction(&self, paths: &Array2<f64>) -> PricingResult<LsmcResult> {
        let cfg = &self.cfg;
        let steps = cfg.steps;
        let (n, columns) = paths.dim();

        if n != cfg.n_paths || columns != steps + 1 {
            return Err(PricingError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: format!(
                    "expected a {}x{} path matrix, got {}x{}",
                    cfg.n_paths,
                    steps + 1,
                    n,
                    columns
                ),
            });
        }

        let option_type = cfg.option_type;
        let strike = cfg.strike;
        let discount = cfg.discount_factor();

        tracing::debug!(
            option_type = %option_type,
            exercise = ?cfg.exercise,
            n_paths = n,
            steps,
            poly_degree = cfg.poly_degree,
            "starting backward induction"
        );

        let mut value_matrix = self
            .diagnostics
            .contains(Diagnostics::VALUES)
            .then(|| Array2::<f64>::zeros((n, steps + 1)));

        let mut values: Array1<f64> = paths.column(steps).mapv(|s| option_type.intrinsic(s, strike));
        if let Some(matrix) = value_matrix.as_mut() {
            matrix.column_mut(steps).assign(&values);
        }

        let mut early_exercise_counts = vec![0usize; steps + 1];

        for t in (1..steps).rev() {
            let discounted = values.mapv(|v| v * discount);

            values = match cfg.exercise {
                ExerciseStyle::European => discounted,
                ExerciseStyle::American => {
                    let (next, exercised) = self.exercise_step(paths, t, discounted)?;
                    early_exercise_counts[t] = exercised;
                    tracing::trace!(step = t, exercised, "backward induction step");
                    next
                }
            };

            if let Some(matrix) = value_matrix.as_mut() {
                matrix.column_mut(t).assign(&values);
            }
        }

        let present_values = values.mapv(|v| v * discount);
        let (premium, std_error) = mean_and_stderr(&present_values);

        if !premium.is_finite() {
            return Err(PricingError::NumericalInstability {
                method: "LSMC".to_string(),
                reason: format!("premium estimate is not finite: {}", premium),
            });
        }

        tracing::debug!(premium, std_error, "backward induction complete");

        let payoffs = self
            .diagnostics
            .contains(Diagnostics::PAYOFFS)
            .then(|| payoff_matrix(paths, option_type, strike));

        Ok(LsmcResult {
            premium,
            std_error,
            early_exercise_counts,
            diagnostics: LsmcDiagnostics {
                paths: None,
                payoffs,
                values: value_matrix,
            },
        })
    }

    /// One decision date: returns the value column at `t` and the number of
    /// paths where the exercise rule fired. `discounted` is `D·V[:,t+1]`.
    fn exercise_step(
        &self,
        paths: &Array2<f64>,
        t: usize,
        discounted: Array1<f64>,
    ) -> PricingResult<(Array1<f64>, usize)> {
        let cfg = &self.cfg;
        let option_type = cfg.option_type;
        let strike = cfg.strike;
        let prices = paths.column(t);
        let exercise = prices.mapv(|s| option_type.intrinsic(s, strike));

        match cfg.regression_paths {
            RegressionPaths::All => {
                let continuation =
                    regression::continuation_values(prices, discounted.view(), cfg.poly_degree)
                        .map_err(|source| PricingError::RegressionFailure { step: t, source })?;

                let mut next = discounted;
                let mut exercised = 0;
                Zip::from(&mut next)
                    .and(&exercise)
                    .and(&continuation)
                    .for_each(|v, &h, &c| {
                        if h > c {
                            *v = h;
                            exercised += 1;
                        }
                    });

                Ok((next, exercised))
            }
            RegressionPaths::InTheMoney => {
                let itm: Vec<usize> = (0..exercise.len()).filter(|&i| exercise[i] > 0.0).collect();
                let itm_prices = Array1::from_iter(itm.iter().map(|&i| prices[i]));
                let itm_targets = Array1::from_iter(itm.iter().map(|&i| discounted[i]));

                let continuation = match regression::continuation_values(
                    itm_prices.view(),
                    itm_targets.view(),
                    cfg.poly_degree,
                ) {
                    Ok(continuation) => continuation,
                    // Fewer in-the-money paths than coefficients: everyone holds.
                    Err(RegressionError::InsufficientData { .. }) => {
                        tracing::trace!(
                            step = t,
                            itm = itm.len(),
                            "too few in-the-money paths, holding"
                        );
                        return Ok((discounted, 0));
                    }
                    Err(source) => return Err(PricingError::RegressionFailure { step: t, source }),
                };

                let mut next = discounted;
                let mut exercised = 0;
                for (&i, &c) in itm.iter().zip(continuation.iter()) {
                    if exercise[i] > c {
                        next[i] = exercise[i];
                        exercised += 1;
                    }
                }

                Ok((next, exercised))
            }
        }
    }
}

fn mean_and_stderr(values: &Array1<f64>) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.sum() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let variance = values.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
    (mean, (variance / n).sqrt())
}

/// Price the option described by `cfg` and return the premium
pub fn lsmc_price_option(cfg: &LsmcConfig) -> PricingResult<f64> {
    Ok(LsmcEngine::new(cfg.clone())?.run()?.premium)
}
