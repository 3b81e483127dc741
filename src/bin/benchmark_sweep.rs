//! Time the full-resolution price sweep and optionally append one line to a log file.
//!
//! Usage:
//!   cargo run --release --bin benchmark_sweep
//!   cargo run --release --bin benchmark_sweep -- --log
//!
//! --log  Append one row to benchmark_log.csv (date, sweeps_per_sec, evaluations_per_sec, points).

use std::fs::OpenOptions;
use std::io::Write;
use std::process;
use std::time::Instant;

use fragsim::data::{Scenario, TierState};
use fragsim::sweep::{sweep, PriceRange};

fn main() {
    let log = std::env::args().any(|a| a == "--log");

    let scenario = Scenario::default();
    let states: Vec<TierState> = [2_000, 1_500, 800, 300, 0].map(TierState::new).to_vec();
    let range = PriceRange::default();
    let prices = range.prices();

    const MIN_DURATION_MS: u128 = 2000;
    const MIN_SWEEPS: u32 = 200;

    let start = Instant::now();
    let mut sweeps: u32 = 0;
    while start.elapsed().as_millis() < MIN_DURATION_MS || sweeps < MIN_SWEEPS {
        let _ = sweep(&scenario.tiers, &states, scenario.deposit, 150.0, &prices);
        sweeps += 1;
    }
    let elapsed_secs = start.elapsed().as_secs_f64();

    let sweeps_per_sec = sweeps as f64 / elapsed_secs;
    let evaluations_per_sec = sweeps_per_sec * (prices.len() * scenario.tiers.len()) as f64;

    println!("Sweep benchmark ({} points x {} tiers):", prices.len(), scenario.tiers.len());
    println!("  Sweeps:        {}", sweeps);
    println!("  Duration:      {:.2} s", elapsed_secs);
    println!("  Sweeps/s:      {:.2}", sweeps_per_sec);
    println!("  Evaluations/s: {:.2}", evaluations_per_sec);

    if log {
        let date = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let line = format!(
            "{},{:.4},{:.4},{}\n",
            date, sweeps_per_sec, evaluations_per_sec, range.points
        );
        let path = "benchmark_log.csv";
        let mut file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => file,
            Err(err) => {
                eprintln!("failed to open {path}: {err}");
                process::exit(1);
            }
        };
        if file.metadata().map(|m| m.len() == 0).unwrap_or(true) {
            let _ = file.write_all(b"date,sweeps_per_sec,evaluations_per_sec,points\n");
        }
        if let Err(err) = file.write_all(line.as_bytes()) {
            eprintln!("failed to append to {path}: {err}");
            process::exit(1);
        }
        println!("Appended to {path}");
    }
}
