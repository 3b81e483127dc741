//! Write sweep curves as CSV for external plotting.
//!
//! Columns: `price`, `best_tier`, then `tier_<n>_profit_usd` and
//! `tier_<n>_relative_usd` for each tier (1-based, as shown in tables).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::sweep::SweepResult;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write sweep CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to create sweep CSV file: {0}")]
    Io(#[from] std::io::Error),
}

fn header(tier_count: usize) -> Vec<String> {
    let mut columns = vec!["price".to_string(), "best_tier".to_string()];
    for tier in 1..=tier_count {
        columns.push(format!("tier_{tier}_profit_usd"));
    }
    for tier in 1..=tier_count {
        columns.push(format!("tier_{tier}_relative_usd"));
    }
    columns
}

pub fn write_sweep_csv<W: Write>(result: &SweepResult, writer: W) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(header(result.profit_curves.len()))?;
    for (j, price) in result.prices.iter().enumerate() {
        let mut row = Vec::with_capacity(2 + result.profit_curves.len() * 2);
        row.push(format!("{price:.6}"));
        row.push((result.best_tier.get(j).copied().unwrap_or(0) + 1).to_string());
        row.extend(result.profit_curves.iter().map(|curve| format!("{:.6}", curve[j])));
        row.extend(result.relative_curves.iter().map(|curve| format!("{:.6}", curve[j])));
        out.write_record(&row)?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_sweep_csv_file(result: &SweepResult, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_sweep_csv(result, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tier::{TierState, DEFAULT_TIERS};
    use crate::sweep::{sweep_range, PriceRange};

    #[test]
    fn csv_has_header_and_one_row_per_price() {
        let states = [TierState::new(0); 5];
        let result = sweep_range(&DEFAULT_TIERS, &states, 10.0, 150.0, PriceRange::new(0.5, 1.0, 3));
        let mut buf = Vec::new();
        write_sweep_csv(&result, &mut buf).expect("csv should write");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("price,best_tier,tier_1_profit_usd"));
        assert!(lines[0].ends_with("tier_5_relative_usd"));
        assert!(lines[1].starts_with("0.500000,1,"));
        assert_eq!(lines[1].split(',').count(), 12);
    }
}
