// src/models/gbm.rs
//! Geometric Brownian Motion
//!
//! ```text
//! dS_t = μ S_t dt + σ S_t dW_t
//! ```
//!
//! Sampled exactly in log space: over a step of length Δt the log-price
//! increment is `(μ - σ²/2)Δt + σ√Δt·Z` with `Z ~ N(0,1)`.
use std::f64;

#[derive(Debug, Clone, Copy)]
pub struct Gbm {
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn new(s0: f64, mu: f64, sigma: f64) -> Self {
        Gbm { s0, mu, sigma }
    }

    /// Mean of the log-price increment over `dt`
    pub fn log_drift(&self, dt: f64) -> f64 {
        (self.mu - 0.5 * self.sigma * self.sigma) * dt
    }

    /// Standard deviation of the log-price increment over `dt`
    pub fn log_vol(&self, dt: f64) -> f64 {
        self.sigma * dt.sqrt()
    }

    pub fn log_increment(&self, dt: f64, normal_draw: f64) -> f64 {
        self.log_drift(dt) + self.log_vol(dt) * normal_draw
    }
}
