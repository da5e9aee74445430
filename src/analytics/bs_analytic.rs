// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes formulas for European options
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model, the underlying asset follows:
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! The closed-form European price is the reference the Monte Carlo
//! estimators are checked against: as paths and steps grow, the
//! terminal-only LSMC premium converges to it, and the American put premium
//! never falls below it.

use crate::config::LsmcConfig;
use crate::math_utils::{norm_cdf, norm_pdf};
use crate::mc::payoffs::OptionType;

/// Black-Scholes d₁ and d₂
///
/// ```text
/// d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
/// d₂ = d₁ - σ√T
/// ```
fn d1_d2(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> (f64, f64) {
    let vol_sqrt_t = sigma * t.sqrt();
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / vol_sqrt_t;
    (d1, d1 - vol_sqrt_t)
}

/// Black-Scholes European call option price
///
/// ```text
/// C(S,K,r,σ,T) = S*Φ(d₁) - K*e^(-rT)*Φ(d₂)
/// ```
///
/// With σ = 0 the price is the discounted forward intrinsic value
/// `max(S - K*e^(-rT), 0)`.
pub fn bs_call_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let discounted_strike = k * (-r * t).exp();
    if sigma == 0.0 {
        return (s - discounted_strike).max(0.0);
    }
    let (d1, d2) = d1_d2(s, k, r, sigma, t);
    s * norm_cdf(d1) - discounted_strike * norm_cdf(d2)
}

/// Black-Scholes European put option price
///
/// ```text
/// P(S,K,r,σ,T) = K*e^(-rT)*Φ(-d₂) - S*Φ(-d₁)
/// ```
pub fn bs_put_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let discounted_strike = k * (-r * t).exp();
    if sigma == 0.0 {
        return (discounted_strike - s).max(0.0);
    }
    let (d1, d2) = d1_d2(s, k, r, sigma, t);
    discounted_strike * norm_cdf(-d2) - s * norm_cdf(-d1)
}

pub fn bs_price(option_type: OptionType, s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    match option_type {
        OptionType::Call => bs_call_price(s, k, r, sigma, t),
        OptionType::Put => bs_put_price(s, k, r, sigma, t),
    }
}

/// Black-Scholes Vega (∂V/∂σ), identical for calls and puts
///
/// ```text
/// ν = S * φ(d₁) * √T
/// ```
///
/// Strictly positive whenever σ > 0, so both premiums increase with
/// volatility.
pub fn bs_vega(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    if sigma == 0.0 {
        return 0.0;
    }
    let (d1, _) = d1_d2(s, k, r, sigma, t);
    s * norm_pdf(d1) * t.sqrt()
}

/// European closed-form price for the market described by `cfg`,
/// regardless of its exercise style
pub fn reference_price(cfg: &LsmcConfig) -> f64 {
    bs_price(
        cfg.option_type,
        cfg.initial_price,
        cfg.strike,
        cfg.rate,
        cfg.volatility,
        cfg.maturity,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atm_high_vol_call() {
        let price = bs_call_price(100.0, 100.0, 0.05, 0.50, 1.0);
        assert!((price - 21.7926).abs() < 1e-3, "got {}", price);
    }

    #[test]
    fn test_longstaff_schwartz_european_put() {
        let price = bs_put_price(36.0, 40.0, 0.06, 0.20, 1.0);
        assert!((price - 3.8443).abs() < 1e-3, "got {}", price);
    }

    #[test]
    fn test_put_call_parity() {
        let (s, k, r, sigma, t) = (42.0, 40.0, 0.03, 0.35, 0.75);
        let lhs = bs_call_price(s, k, r, sigma, t) - bs_put_price(s, k, r, sigma, t);
        let rhs = s - k * (-r * t).exp();
        assert!((lhs - rhs).abs() < 1e-10);
    }

    #[test]
    fn test_vega_matches_finite_difference() {
        let (s, k, r, sigma, t) = (100.0, 100.0, 0.05, 0.20, 1.0);
        let h = 1e-5;
        let fd = (bs_call_price(s, k, r, sigma + h, t) - bs_call_price(s, k, r, sigma - h, t))
            / (2.0 * h);
        let vega = bs_vega(s, k, r, sigma, t);

        assert!((vega - 37.524034691693792).abs() < 1e-6);
        assert!((vega - fd).abs() < 1e-4);
    }

    #[test]
    fn test_premiums_increase_with_volatility() {
        for &option_type in &[OptionType::Call, OptionType::Put] {
            let mut previous = bs_price(option_type, 36.0, 40.0, 0.06, 0.0, 1.0);
            for i in 1..=10 {
                let sigma = 0.05 * i as f64;
                let price = bs_price(option_type, 36.0, 40.0, 0.06, sigma, 1.0);
                assert!(price > previous, "{} premium not increasing at σ={}", option_type, sigma);
                previous = price;
            }
        }
    }

    #[test]
    fn test_zero_volatility_limit() {
        let call = bs_call_price(100.0, 90.0, 0.05, 0.0, 1.0);
        assert!((call - (100.0 - 90.0 * (-0.05f64).exp())).abs() < 1e-12);
        assert_eq!(bs_put_price(100.0, 90.0, 0.05, 0.0, 1.0), 0.0);
        assert!((bs_call_price(100.0, 90.0, 0.05, 1e-8, 1.0) - call).abs() < 1e-6);
        assert_eq!(bs_vega(100.0, 90.0, 0.05, 0.0, 1.0), 0.0);
    }
}
