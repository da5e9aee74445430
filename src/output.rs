// src/output.rs
use crate::error::PricingResult;
use crate::mc::lsmc::LsmcResult;
use ndarray::Array2;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a path/payoff/value matrix as CSV: one row per path, one column per
/// time step (`t0, t1, ...`).
pub fn write_matrix_to_csv<P: AsRef<Path>>(filename: P, matrix: &Array2<f64>) -> PricingResult<()> {
    let mut file = BufWriter::new(File::create(filename)?);

    let header: Vec<String> = (0..matrix.ncols()).map(|t| format!("t{}", t)).collect();
    writeln!(file, "path_id,{}", header.join(","))?;

    for (i, row) in matrix.outer_iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(file, "{},{}", i, cells.join(","))?;
    }

    file.flush()?;
    Ok(())
}

pub fn write_summary_to_csv<P: AsRef<Path>>(
    filename: P,
    summary_data: &[(&str, String)],
) -> PricingResult<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    for (key, value) in summary_data {
        writeln!(file, "{},{}", key, value)?;
    }
    file.flush()?;
    Ok(())
}

/// Key/value summary of a pricing run, suitable for [`write_summary_to_csv`]
pub fn summarize(result: &LsmcResult) -> Vec<(&'static str, String)> {
    let exercise_steps = result
        .early_exercise_counts
        .iter()
        .filter(|&&count| count > 0)
        .count();

    vec![
        ("premium", format!("{:.8}", result.premium)),
        ("std_error", format!("{:.8}", result.std_error)),
        ("early_exercises", result.total_early_exercises().to_string()),
        ("exercise_steps", exercise_steps.to_string()),
    ]
}
