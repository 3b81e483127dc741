//! Resale-price sweep: which tier earns the most at each candidate price, and
//! where that changes.
//!
//! Raised amounts and the deposit stay fixed for the whole sweep; only the
//! resale price moves.

pub mod export_csv;
pub mod thresholds;

use serde::{Deserialize, Serialize};

use crate::data::tier::{Tier, TierState};
use crate::sale::evaluate::{evaluate, Pricing};

pub use thresholds::{best_tier_bands, best_tier_indices, detect_thresholds, BestTierBand, ThresholdEvent};

pub const DEFAULT_SWEEP_START: f64 = 0.15;
pub const DEFAULT_SWEEP_END: f64 = 2.3;
pub const DEFAULT_SWEEP_POINTS: usize = 1000;

/// Evenly spaced resale prices, both endpoints included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceRange {
    pub start: f64,
    pub end: f64,
    pub points: usize,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            start: DEFAULT_SWEEP_START,
            end: DEFAULT_SWEEP_END,
            points: DEFAULT_SWEEP_POINTS,
        }
    }
}

impl PriceRange {
    pub fn new(start: f64, end: f64, points: usize) -> Self {
        Self { start, end, points }
    }

    pub fn prices(&self) -> Vec<f64> {
        match self.points {
            0 => Vec::new(),
            1 => vec![self.start],
            n => {
                let step = (self.end - self.start) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            self.end
                        } else {
                            self.start + step * i as f64
                        }
                    })
                    .collect()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepResult {
    pub prices: Vec<f64>,
    /// `profit_curves[tier][point]`: USD profit of the deposit at each price.
    pub profit_curves: Vec<Vec<f64>>,
    /// Profit above the worst tier at the same price. Presentation only.
    pub relative_curves: Vec<Vec<f64>>,
    /// Most profitable tier at each price point.
    pub best_tier: Vec<usize>,
    pub thresholds: Vec<ThresholdEvent>,
}

impl SweepResult {
    pub fn bands(&self) -> Vec<BestTierBand> {
        best_tier_bands(&self.prices, &self.best_tier, &self.thresholds)
    }
}

/// Sweep `prices` (ascending) for a fixed `deposit`.
pub fn sweep(
    tiers: &[Tier],
    states: &[TierState],
    deposit: f64,
    exchange_rate: f64,
    prices: &[f64],
) -> SweepResult {
    let profit_curves: Vec<Vec<f64>> = tiers
        .iter()
        .zip(states)
        .map(|(tier, state)| {
            prices
                .iter()
                .map(|&price| evaluate(tier, state, deposit, Pricing::new(price, exchange_rate)).profit_usd)
                .collect()
        })
        .collect();

    let relative_curves = relative_profit(&profit_curves, prices.len());
    let best_tier = best_tier_indices(&profit_curves, prices.len());
    let thresholds = detect_thresholds(prices, &best_tier);
    log::debug!(
        "swept {} prices across {} tiers, {} threshold(s)",
        prices.len(),
        profit_curves.len(),
        thresholds.len()
    );

    SweepResult {
        prices: prices.to_vec(),
        profit_curves,
        relative_curves,
        best_tier,
        thresholds,
    }
}

pub fn sweep_range(
    tiers: &[Tier],
    states: &[TierState],
    deposit: f64,
    exchange_rate: f64,
    range: PriceRange,
) -> SweepResult {
    sweep(tiers, states, deposit, exchange_rate, &range.prices())
}

fn relative_profit(curves: &[Vec<f64>], points: usize) -> Vec<Vec<f64>> {
    let floor: Vec<f64> = (0..points)
        .map(|j| {
            curves
                .iter()
                .map(|curve| curve[j])
                .fold(f64::INFINITY, f64::min)
        })
        .collect();
    curves
        .iter()
        .map(|curve| curve.iter().zip(&floor).map(|(p, min)| p - min).collect())
        .collect()
}
