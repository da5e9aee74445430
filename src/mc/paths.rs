// src/mc/paths.rs
//! GBM Path Simulator
//!
//! Produces the simulated path matrix of shape `(n_paths, steps + 1)`.
//! Row `i` is one trajectory, column `t` is time `t·Δt`.
//!
//! # Algorithm
//!
//! ```text
//! X[i,t]  = (μ - σ²/2)Δt + σ√Δt·Z[i,t]        Z ~ N(0,1) i.i.d.
//! S[i,0]  = S₀
//! S[i,t]  = S₀ · exp(X[i,0] + ... + X[i,t-1])
//! ```
//!
//! # Antithetic Variates
//!
//! Only the first `n_paths / 2` rows of noise are drawn. Row `i + n_paths/2`
//! is the exact negation of row `i`. An odd path count is rejected.
//!
//! # Reproducibility
//!
//! Row `i` is always drawn from `RngFactory::new(seed).create_std_rng(i)`,
//! so the matrix is bit-identical whether rows are filled serially or by the
//! rayon pool.

use crate::error::{validation::*, PricingError, PricingResult};
use crate::models::gbm::Gbm;
use crate::rng::{self, RngFactory};
use ndarray::parallel::prelude::*;
use ndarray::{s, Array2, ArrayViewMut2, Axis, Zip};

#[derive(Debug, Clone, PartialEq)]
pub struct PathConfig {
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
    pub t: f64,
    pub steps: usize,
    pub n_paths: usize,
    pub seed: u64,
    pub antithetic: bool,
}

impl PathConfig {
    pub fn validate(&self) -> PricingResult<()> {
        validate_paths(self.n_paths)?;
        validate_steps(self.steps)?;
        validate_positive("s0", self.s0)?;
        validate_finite("s0", self.s0)?;
        validate_finite("mu", self.mu)?;
        validate_non_negative("sigma", self.sigma)?;
        validate_finite("sigma", self.sigma)?;
        validate_positive("t", self.t)?;
        validate_finite("t", self.t)?;

        if self.antithetic && self.n_paths % 2 != 0 {
            return Err(PricingError::InvalidConfiguration {
                field: "n_paths".to_string(),
                reason: format!(
                    "antithetic sampling needs an even path count, got {}",
                    self.n_paths
                ),
            });
        }

        Ok(())
    }

    pub fn dt(&self) -> f64 {
        self.t / self.steps as f64
    }

    fn independent_rows(&self) -> usize {
        if self.antithetic {
            self.n_paths / 2
        } else {
            self.n_paths
        }
    }
}

/// Fill `noise` with standard normal draws, mirroring the first half into
/// the second when antithetic sampling is on.
fn fill_noise(noise: ArrayViewMut2<'_, f64>, cfg: &PathConfig) {
    let factory = RngFactory::new(cfg.seed);
    let (mut head, mut tail) = noise.split_at(Axis(0), cfg.independent_rows());

    head.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let mut rng = factory.create_std_rng(i as u64);
            for z in row.iter_mut() {
                *z = rng::get_normal_draw(&mut rng);
            }
        });

    if cfg.antithetic {
        Zip::from(&mut tail).and(&head).par_for_each(|mirror, &z| *mirror = -z);
    }
}

/// Standard normal noise matrix of shape `(n_paths, steps)`
pub fn simulate_noise(cfg: &PathConfig) -> PricingResult<Array2<f64>> {
    cfg.validate()?;
    let mut noise = Array2::<f64>::zeros((cfg.n_paths, cfg.steps));
    fill_noise(noise.view_mut(), cfg);
    Ok(noise)
}

/// Log-price increments of shape `(n_paths, steps)`
pub fn simulate_increments(cfg: &PathConfig) -> PricingResult<Array2<f64>> {
    let gbm = Gbm::new(cfg.s0, cfg.mu, cfg.sigma);
    let dt = cfg.dt();
    let mut increments = simulate_noise(cfg)?;
    increments.par_mapv_inplace(|z| gbm.log_increment(dt, z));
    Ok(increments)
}

/// Simulated price matrix of shape `(n_paths, steps + 1)` with column 0
/// equal to `s0` on every row
pub fn simulate_paths(cfg: &PathConfig) -> PricingResult<Array2<f64>> {
    cfg.validate()?;
    let gbm = Gbm::new(cfg.s0, cfg.mu, cfg.sigma);
    let dt = cfg.dt();

    tracing::debug!(
        n_paths = cfg.n_paths,
        steps = cfg.steps,
        seed = cfg.seed,
        antithetic = cfg.antithetic,
        "simulating GBM paths"
    );

    // Draw noise straight into columns 1..=steps, then transform in place.
    let mut paths = Array2::<f64>::zeros((cfg.n_paths, cfg.steps + 1));
    fill_noise(paths.slice_mut(s![.., 1..]), cfg);

    paths
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .for_each(|mut row| {
            let mut log_return = 0.0;
            for price in row.iter_mut().skip(1) {
                log_return += gbm.log_increment(dt, *price);
                *price = gbm.s0 * log_return.exp();
            }
            row[0] = gbm.s0;
        });

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> PathConfig {
        PathConfig {
            s0: 100.0,
            mu: 0.05,
            sigma: 0.3,
            t: 1.0,
            steps: 12,
            n_paths: 64,
            seed: 7,
            antithetic: false,
        }
    }

    #[test]
    fn test_shape_and_initial_column() {
        let paths = simulate_paths(&small_config()).unwrap();
        assert_eq!(paths.dim(), (64, 13));
        assert!(paths.column(0).iter().all(|&s| s == 100.0));
        assert!(paths.iter().all(|&s| s > 0.0 && s.is_finite()));
    }

    #[test]
    fn test_paths_match_cumulated_increments() {
        let cfg = small_config();
        let paths = simulate_paths(&cfg).unwrap();
        let increments = simulate_increments(&cfg).unwrap();

        for (path, inc) in paths.outer_iter().zip(increments.outer_iter()) {
            let mut log_return = 0.0;
            for (t, dx) in inc.iter().enumerate() {
                log_return += *dx;
                let expected = cfg.s0 * f64::exp(log_return);
                assert!((path[t + 1] - expected).abs() <= 1e-12 * expected);
            }
        }
    }

    #[test]
    fn test_antithetic_noise_negates() {
        let cfg = PathConfig {
            antithetic: true,
            ..small_config()
        };
        let noise = simulate_noise(&cfg).unwrap();
        let half = cfg.n_paths / 2;

        for i in 0..half {
            for t in 0..cfg.steps {
                assert_eq!(noise[[i, t]], -noise[[i + half, t]]);
            }
        }
    }

    #[test]
    fn test_odd_antithetic_rejected() {
        let cfg = PathConfig {
            antithetic: true,
            n_paths: 63,
            ..small_config()
        };
        assert!(simulate_paths(&cfg).is_err());
    }

    #[test]
    fn test_zero_volatility_is_deterministic_growth() {
        let cfg = PathConfig {
            sigma: 0.0,
            ..small_config()
        };
        let paths = simulate_paths(&cfg).unwrap();
        let expected = cfg.s0 * (cfg.mu * cfg.t).exp();
        for &terminal in paths.column(cfg.steps).iter() {
            assert!((terminal - expected).abs() < 1e-9);
        }
    }
}
