// src/mc/regression.rs
//! Least-squares continuation-value regression
//!
//! One backward-induction step regresses the discounted next-step value on
//! the current price with a polynomial of fixed degree, then evaluates the
//! fit at every path's price. The helper is a pure function: nothing about
//! the fit outlives the call.
//!
//! # Conditioning
//!
//! Raw Vandermonde columns `1, S, S², ..., S^d` are badly scaled for prices
//! far from 1. Prices are standardized first:
//! ```text
//! u = (S - mean(S)) / std(S)
//! ```
//! Polynomials in `u` span the same space as polynomials in `S`, so the
//! fitted values are unchanged while the normal equations `(XᵀX)β = Xᵀy`
//! stay well conditioned. They are solved by Cholesky, with an SVD solve
//! when the Gram matrix is not numerically positive definite.

use crate::error::RegressionError;
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView1, Zip};

/// Fitted continuation values for every observation.
///
/// `prices` and `targets` must have the same length. Fails when the data
/// cannot identify a polynomial of `degree`: too few observations, fewer
/// than `degree + 1` distinct price levels, or a non-finite solution.
pub fn continuation_values(
    prices: ArrayView1<'_, f64>,
    targets: ArrayView1<'_, f64>,
    degree: usize,
) -> Result<Array1<f64>, RegressionError> {
    debug_assert_eq!(prices.len(), targets.len());
    let n = prices.len();

    if n <= degree {
        return Err(RegressionError::InsufficientData { points: n, degree });
    }

    if degree == 0 {
        let mean = targets.sum() / n as f64;
        return Ok(Array1::from_elem(n, mean));
    }

    let distinct = count_distinct(prices, degree + 1);
    if distinct <= degree {
        return Err(RegressionError::Singular { distinct, degree });
    }

    let (center, scale) = location_scale(prices);
    let coeffs = fit_standardized(prices, targets, degree, center, scale)?;

    let mut fitted = Array1::<f64>::zeros(n);
    Zip::from(&mut fitted)
        .and(&prices)
        .par_for_each(|value, &s| *value = horner(&coeffs, (s - center) / scale));

    Ok(fitted)
}

/// Number of distinct values in `xs`, counting stops at `limit`
fn count_distinct(xs: ArrayView1<'_, f64>, limit: usize) -> usize {
    let mut seen: Vec<f64> = Vec::with_capacity(limit);
    for &x in xs.iter() {
        if !seen.contains(&x) {
            seen.push(x);
            if seen.len() >= limit {
                break;
            }
        }
    }
    seen.len()
}

fn location_scale(xs: ArrayView1<'_, f64>) -> (f64, f64) {
    let n = xs.len() as f64;
    let mean = xs.sum() / n;
    let variance = xs.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

fn fit_standardized(
    prices: ArrayView1<'_, f64>,
    targets: ArrayView1<'_, f64>,
    degree: usize,
    center: f64,
    scale: f64,
) -> Result<Vec<f64>, RegressionError> {
    let dim = degree + 1;
    let n = prices.len() as f64;

    // moments[k] = Σ u^k for k in 0..=2d, rhs[k] = Σ u^k·y for k in 0..=d
    let mut moments = vec![0.0_f64; 2 * degree + 1];
    let mut rhs = vec![0.0_f64; dim];
    for (&s, &y) in prices.iter().zip(targets.iter()) {
        let u = (s - center) / scale;
        let mut power = 1.0;
        for (k, moment) in moments.iter_mut().enumerate() {
            *moment += power;
            if k < dim {
                rhs[k] += power * y;
            }
            power *= u;
        }
    }

    let gram = DMatrix::from_fn(dim, dim, |i, j| moments[i + j] / n);
    let rhs = DVector::from_iterator(dim, rhs.into_iter().map(|b| b / n));

    let beta = match gram.clone().cholesky() {
        Some(chol) => chol.solve(&rhs),
        None => {
            tracing::warn!(degree, "normal equations not positive definite, solving by SVD");
            gram.svd(true, true)
                .solve(&rhs, 1e-12)
                .map_err(|e| RegressionError::Solver(e.to_string()))?
        }
    };

    if beta.iter().any(|b| !b.is_finite()) {
        return Err(RegressionError::NonFinite);
    }

    Ok(beta.iter().copied().collect())
}

#[inline]
fn horner(coeffs: &[f64], u: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * u + c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_recovers_exact_cubic() {
        let prices = Array1::from_iter((1..=20).map(|i| 30.0 + i as f64));
        let targets = prices.mapv(|s| 2.0 - s + 0.5 * s.powi(3));

        let fitted = continuation_values(prices.view(), targets.view(), 3).unwrap();

        for (f, t) in fitted.iter().zip(targets.iter()) {
            assert!((f - t).abs() <= 1e-6 * t.abs(), "fit {} vs target {}", f, t);
        }
    }

    #[test]
    fn test_linear_least_squares() {
        let prices = array![0.0, 1.0, 2.0, 3.0];
        let targets = array![0.0, 1.0, 1.0, 2.0];

        let fitted = continuation_values(prices.view(), targets.view(), 1).unwrap();
        let expected = [0.1, 0.7, 1.3, 1.9];

        for (f, e) in fitted.iter().zip(expected.iter()) {
            assert!((f - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_degree_zero_is_mean() {
        let prices = array![5.0, 5.0, 5.0];
        let targets = array![1.0, 2.0, 6.0];

        let fitted = continuation_values(prices.view(), targets.view(), 0).unwrap();
        assert!(fitted.iter().all(|&v| (v - 3.0).abs() < 1e-15));
    }

    #[test]
    fn test_single_price_level_is_singular() {
        let prices = Array1::from_elem(100, 42.0);
        let targets = Array1::from_iter((0..100).map(|i| i as f64));

        let err = continuation_values(prices.view(), targets.view(), 2).unwrap_err();
        assert_eq!(err, RegressionError::Singular { distinct: 1, degree: 2 });
    }

    #[test]
    fn test_too_few_observations() {
        let prices = array![1.0, 2.0, 3.0];
        let targets = array![1.0, 2.0, 3.0];

        let err = continuation_values(prices.view(), targets.view(), 3).unwrap_err();
        assert_eq!(err, RegressionError::InsufficientData { points: 3, degree: 3 });
    }

    #[test]
    fn test_inputs_are_untouched() {
        let prices = array![36.0, 38.0, 40.0, 42.0, 44.0];
        let targets = array![4.0, 2.5, 1.0, 0.4, 0.1];
        let (p, t) = (prices.clone(), targets.clone());

        let _ = continuation_values(prices.view(), targets.view(), 2).unwrap();
        assert_eq!(prices, p);
        assert_eq!(targets, t);
    }
}
