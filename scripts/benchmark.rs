// scripts/benchmark.rs
use fast_lsmc::analytics::bs_analytic;
use fast_lsmc::config::LsmcConfig;
use fast_lsmc::math_utils::Timer;
use fast_lsmc::mc::lsmc::LsmcEngine;
use fast_lsmc::mc::paths::simulate_paths;
use fast_lsmc::mc::payoffs::{ExerciseStyle, OptionType, RegressionPaths};
use fast_lsmc::PricingResult;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process::Command;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_model: String,
    cpu_cores: usize,
    rust_version: String,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_model: Self::cpu_model(),
            cpu_cores: num_cpus::get(),
            rust_version: Command::new("rustc")
                .arg("--version")
                .output()
                .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
                .unwrap_or_else(|_| "Unknown Rust version".to_string()),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }

    fn cpu_model() -> String {
        #[cfg(target_os = "linux")]
        {
            std::fs::read_to_string("/proc/cpuinfo")
                .ok()
                .and_then(|content| {
                    content
                        .lines()
                        .find(|line| line.starts_with("model name"))
                        .and_then(|line| line.split(':').nth(1))
                        .map(|s| s.trim().to_string())
                })
                .unwrap_or_else(|| "Unknown CPU".to_string())
        }

        #[cfg(target_os = "macos")]
        {
            Command::new("sysctl")
                .args(["-n", "machdep.cpu.brand_string"])
                .output()
                .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
                .unwrap_or_else(|_| "Unknown CPU".to_string())
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            "Unknown CPU".to_string()
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    paths: usize,
    steps: usize,
    time_ms: f64,
    throughput_paths_per_sec: f64,
    premium: f64,
    std_error: f64,
    european_value: f64,
}

fn time_pricing(name: String, cfg: LsmcConfig) -> PricingResult<BenchmarkResult> {
    let engine = LsmcEngine::new(cfg.clone())?;

    let mut timer = Timer::new();
    timer.start();
    let result = engine.run()?;
    let time_ms = timer.elapsed_ms();

    Ok(BenchmarkResult {
        name,
        paths: cfg.n_paths,
        steps: cfg.steps,
        time_ms,
        throughput_paths_per_sec: cfg.n_paths as f64 / (time_ms / 1000.0),
        premium: result.premium,
        std_error: result.std_error,
        european_value: bs_analytic::reference_price(&cfg),
    })
}

fn run_lsmc_benchmarks() -> PricingResult<Vec<BenchmarkResult>> {
    let mut results = Vec::new();

    for &paths in &[10_000, 100_000, 500_000] {
        println!("Running benchmarks with {} paths...", paths);

        let put = LsmcConfig {
            n_paths: paths,
            ..Default::default()
        };
        results.push(time_pricing(
            format!("American Put ({}k paths)", paths / 1000),
            put.clone(),
        )?);

        results.push(time_pricing(
            format!("American Put all-path fit ({}k paths)", paths / 1000),
            LsmcConfig {
                regression_paths: RegressionPaths::All,
                ..put.clone()
            },
        )?);

        results.push(time_pricing(
            format!("Terminal-only Put ({}k paths)", paths / 1000),
            LsmcConfig {
                exercise: ExerciseStyle::European,
                ..put
            },
        )?);
    }

    results.push(time_pricing(
        "American Call, daily steps".to_string(),
        LsmcConfig {
            initial_price: 100.0,
            strike: 100.0,
            rate: 0.05,
            steps: 252,
            n_paths: 100_000,
            poly_degree: 3,
            antithetic: true,
            option_type: OptionType::Call,
            ..Default::default()
        },
    )?);

    Ok(results)
}

fn run_path_benchmarks() -> PricingResult<Vec<(usize, usize, f64)>> {
    let mut timings = Vec::new();

    for &(paths, steps) in &[(100_000, 50), (100_000, 252), (1_000_000, 50)] {
        let cfg = LsmcConfig {
            n_paths: paths,
            steps,
            ..Default::default()
        }
        .path_config();

        let mut timer = Timer::new();
        timer.start();
        let matrix = simulate_paths(&cfg)?;
        let time_ms = timer.elapsed_ms();
        tracing::debug!(rows = matrix.nrows(), cols = matrix.ncols(), time_ms, "path matrix ready");

        timings.push((paths, steps, time_ms));
    }

    Ok(timings)
}

fn write_results_to_csv(
    results: &[BenchmarkResult],
    system_info: &SystemInfo,
    filename: &str,
) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);

    writeln!(file, "# System Information")?;
    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# CPU: {}", system_info.cpu_model)?;
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores)?;
    writeln!(file, "# Rust Version: {}", system_info.rust_version)?;
    writeln!(file, "# RUSTFLAGS: {}", system_info.rustc_flags)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(file, "#")?;

    writeln!(
        file,
        "Benchmark,Paths,Steps,Time_ms,Throughput_paths_per_sec,Premium,Std_Error,European_Value,Early_Exercise_Premium"
    )?;

    for result in results {
        writeln!(
            file,
            "{},{},{},{:.2},{:.0},{:.6},{:.6},{:.6},{:.6}",
            result.name,
            result.paths,
            result.steps,
            result.time_ms,
            result.throughput_paths_per_sec,
            result.premium,
            result.std_error,
            result.european_value,
            result.premium - result.european_value
        )?;
    }

    file.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("fast-lsmc Benchmark Suite");
    println!("=========================\n");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU: {}", system_info.cpu_model);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  Rust Version: {}", system_info.rust_version);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!();

    println!("Timing path simulation...");
    for (paths, steps, time_ms) in run_path_benchmarks()? {
        println!(
            "  {:>9} paths x {:>3} steps: {:>10.2} ms ({:.0} paths/s)",
            paths,
            steps,
            time_ms,
            paths as f64 / (time_ms / 1000.0)
        );
    }

    println!("\nRunning LSMC benchmarks...");
    let results = run_lsmc_benchmarks()?;

    println!("\n{:=<100}", "");
    println!("BENCHMARK RESULTS");
    println!("{:=<100}", "");
    println!(
        "{:<36} {:>8} {:>6} {:>12} {:>14} {:>10} {:>10} {:>10}",
        "Benchmark", "Paths", "Steps", "Time (ms)", "Throughput", "Premium", "Std Err", "European"
    );
    println!("{:-<100}", "");

    for result in &results {
        println!(
            "{:<36} {:>8} {:>6} {:>12.2} {:>14.0} {:>10.4} {:>10.4} {:>10.4}",
            result.name,
            result.paths,
            result.steps,
            result.time_ms,
            result.throughput_paths_per_sec,
            result.premium,
            result.std_error,
            result.european_value
        );
    }
    println!("{:=<100}", "");

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("benchmark_results_{}.csv", timestamp);
    write_results_to_csv(&results, &system_info, &filename)?;
    tracing::info!(file = %filename, "benchmark results written");

    println!("\nTo reproduce these results:");
    println!("1. Use Rust version: {}", system_info.rust_version);
    println!("2. Set RUSTFLAGS: {}", system_info.rustc_flags);
    println!("3. Run: cargo run --bin benchmark --release");
    println!("4. Ensure {} CPU threads available", system_info.rayon_threads);

    Ok(())
}
