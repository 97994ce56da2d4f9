//! Tab-separated embedding matrix

use crate::Result;
use ndarray::Array2;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// File name of the embedding matrix written next to the projector config
pub const EMBEDDINGS_TSV_FILE: &str = "embeddings_projector.tsv";

/// Digits after the decimal point in the scientific notation
const PRECISION: usize = 18;

/// Write one row per entity, values separated by tabs
///
/// Values use `%.18e` notation (`-1.250000000000000000e-01`), which the
/// projector and numeric tooling parse without loss.
pub fn write_embeddings_tsv(path: impl AsRef<Path>, matrix: &Array2<f32>) -> Result<()> {
    let mut out = BufWriter::new(File::create(path.as_ref())?);

    for row in matrix.rows() {
        let line: Vec<String> = row.iter().map(|&v| format_scientific(v as f64)).collect();
        out.write_all(line.join("\t").as_bytes())?;
        out.write_all(b"\n")?;
    }

    out.flush()?;
    Ok(())
}

/// Format a value as `d.dddddddddddddddddde±XX`
pub fn format_scientific(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Rust renders `1.5e-3`; C renders `1.5e-03` with an explicit sign
    let formatted = format!("{:.*e}", PRECISION, value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exp: i32 = exponent.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        None => formatted,
    }
}
