// tests/integration_test.rs
use fast_lsmc::analytics::bs_analytic;
use fast_lsmc::config::LsmcConfig;
use fast_lsmc::mc::lsmc::LsmcEngine;
use fast_lsmc::mc::payoffs::{ExerciseStyle, OptionType};

#[test]
fn test_terminal_only_mc_vs_analytic_high_vol_call() {
    let cfg = LsmcConfig {
        initial_price: 100.0,
        strike: 100.0,
        rate: 0.05,
        volatility: 0.50,
        maturity: 1.0,
        steps: 1,
        n_paths: 1_000_000,
        seed: 42,
        option_type: OptionType::Call,
        exercise: ExerciseStyle::European,
        ..Default::default()
    };

    let analytic_price = bs_analytic::reference_price(&cfg);
    let result = LsmcEngine::new(cfg)
        .and_then(|engine| engine.run())
        .expect("Valid configuration");

    let abs_error = (result.premium - analytic_price).abs();

    println!("\nMC Price (terminal only): {}", result.premium);
    println!("Standard Error: {}", result.std_error);
    println!("Analytic Price: {}", analytic_price);
    println!("Absolute Error: {}", abs_error);

    assert!((analytic_price - 21.793).abs() < 1e-3);
    assert!(abs_error < 0.2, "Absolute error exceeds 0.2: {}", abs_error);
}

#[test]
fn test_terminal_only_mc_converges_with_daily_steps() {
    let cfg = LsmcConfig {
        initial_price: 100.0,
        strike: 100.0,
        rate: 0.05,
        volatility: 0.20,
        maturity: 1.0,
        steps: 252,
        n_paths: 100_000,
        seed: 43,
        antithetic: true,
        option_type: OptionType::Call,
        exercise: ExerciseStyle::European,
        ..Default::default()
    };

    let analytic_price = bs_analytic::reference_price(&cfg);
    let result = LsmcEngine::new(cfg)
        .and_then(|engine| engine.run())
        .expect("Valid configuration");

    let rel_error = (result.premium - analytic_price).abs() / analytic_price;

    println!("\nMC Price (252 steps, antithetic): {}", result.premium);
    println!("Analytic Price: {}", analytic_price);
    println!("Relative Error: {}", rel_error);

    assert!(rel_error < 0.01, "Relative error exceeds 1%: {}", rel_error);
    assert_eq!(result.total_early_exercises(), 0);
}

#[test]
fn test_terminal_only_put_vs_analytic() {
    let cfg = LsmcConfig {
        n_paths: 200_000,
        antithetic: true,
        exercise: ExerciseStyle::European,
        ..Default::default()
    };

    let analytic_price = bs_analytic::reference_price(&cfg);
    let result = LsmcEngine::new(cfg)
        .and_then(|engine| engine.run())
        .expect("Valid configuration");

    let rel_error = (result.premium - analytic_price).abs() / analytic_price;

    println!("\nMC European Put: {} ± {}", result.premium, result.std_error);
    println!("Analytic Put: {}", analytic_price);

    assert!(rel_error < 0.01, "Relative error exceeds 1%: {}", rel_error);
}
