// demos/demo.rs
use fast_lsmc::analytics::bs_analytic;
use fast_lsmc::config::LsmcConfig;
use fast_lsmc::math_utils::Timer;
use fast_lsmc::mc::lsmc::{Diagnostics, LsmcEngine, LsmcResult};
use fast_lsmc::mc::payoffs::{ExerciseStyle, OptionType, RegressionPaths};
use fast_lsmc::output;
use fast_lsmc::PricingResult;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let outcome = match args.get(1).map(String::as_str) {
        Some("--config") => match args.get(2) {
            Some(path) => run_from_config(path),
            None => {
                eprintln!("usage: demo --config <file.json>");
                std::process::exit(2);
            }
        },
        Some("--export") => run_export(args.get(2).map_or("results", String::as_str)),
        _ => run_demo_mode(),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn price_and_report(label: &str, engine: &LsmcEngine) -> PricingResult<LsmcResult> {
    let cfg = engine.config();

    let mut timer = Timer::new();
    timer.start();
    let result = engine.run()?;
    let elapsed = timer.elapsed_ms();

    let european = bs_analytic::reference_price(cfg);
    println!("--- {} ---", label);
    println!(
        "S0={} K={} r={} sigma={} T={} steps={} paths={} degree={}",
        cfg.initial_price,
        cfg.strike,
        cfg.rate,
        cfg.volatility,
        cfg.maturity,
        cfg.steps,
        cfg.n_paths,
        cfg.poly_degree
    );
    println!("LSMC premium: {:.6} ± {:.6} ({:.2} ms)", result.premium, result.std_error, elapsed);
    println!("Black-Scholes European: {:.6}", european);
    println!(
        "Black-Scholes vega: {:.6}",
        bs_analytic::bs_vega(cfg.initial_price, cfg.strike, cfg.rate, cfg.volatility, cfg.maturity)
    );
    println!("Early exercise premium: {:.6}", result.premium - european);
    println!("Early exercises: {}\n", result.total_early_exercises());

    Ok(result)
}

fn run_demo_mode() -> PricingResult<()> {
    println!("Running fast-lsmc American Option Demo\n");

    // Longstaff & Schwartz (2001), table 1 first row
    let put = LsmcConfig::default();
    let scenarios = vec![
        ("American Put", put.clone()),
        (
            "American Put, all-path regression",
            LsmcConfig {
                regression_paths: RegressionPaths::All,
                ..put.clone()
            },
        ),
        (
            "Terminal-only Put",
            LsmcConfig {
                exercise: ExerciseStyle::European,
                ..put
            },
        ),
        // Without dividends early exercise of a call never pays
        (
            "American Call",
            LsmcConfig {
                initial_price: 100.0,
                strike: 100.0,
                rate: 0.05,
                poly_degree: 3,
                antithetic: true,
                option_type: OptionType::Call,
                ..Default::default()
            },
        ),
    ];

    for (label, cfg) in scenarios {
        price_and_report(label, &LsmcEngine::new(cfg)?)?;
    }

    Ok(())
}

fn run_from_config(path: &str) -> PricingResult<()> {
    let json = std::fs::read_to_string(path)?;
    let cfg = LsmcConfig::from_json_str(&json)?;
    price_and_report(path, &LsmcEngine::new(cfg)?)?;
    Ok(())
}

fn run_export(dir: &str) -> PricingResult<()> {
    let cfg = LsmcConfig {
        n_paths: 1_000,
        ..Default::default()
    };
    let engine = LsmcEngine::new(cfg)?.with_diagnostics(Diagnostics::ALL);
    let detailed = price_and_report("American Put (export)", &engine)?;

    std::fs::create_dir_all(dir)?;
    let dir = std::path::Path::new(dir);

    let matrices = [
        ("paths.csv", detailed.diagnostics.paths.as_ref()),
        ("payoffs.csv", detailed.diagnostics.payoffs.as_ref()),
        ("values.csv", detailed.diagnostics.values.as_ref()),
    ];
    for (name, matrix) in matrices {
        if let Some(matrix) = matrix {
            let file = dir.join(name);
            output::write_matrix_to_csv(&file, matrix)?;
            println!("Matrix written to {}", file.display());
        }
    }

    let summary_file = dir.join("summary.csv");
    output::write_summary_to_csv(&summary_file, &output::summarize(&detailed))?;
    println!("Summary written to {}", summary_file.display());

    Ok(())
}
