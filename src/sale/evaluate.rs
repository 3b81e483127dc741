//! Tier evaluator: one deposit scenario against one tier, priced in USD.

use serde::Serialize;

use crate::data::tier::{Tier, TierState};
use crate::sale::fill::fill;

/// Derived per-tier figures for a single deposit. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub price: f64,
    pub capacity: f64,
    pub raised: f64,
    pub overfund_pct: f64,
    /// Fraction filled, in [0, 1].
    pub pct_allocated: f64,
    pub amount_used: f64,
    pub tokens: f64,
    pub usd_spent: f64,
    pub usd_received: f64,
    pub profit_usd: f64,
    pub profit_pct: f64,
}

/// Market inputs shared by every tier in an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pricing {
    /// Token resale price in USD.
    pub resale_price: f64,
    /// Deposit asset price in USD.
    pub exchange_rate: f64,
}

impl Pricing {
    pub const fn new(resale_price: f64, exchange_rate: f64) -> Self {
        Self {
            resale_price,
            exchange_rate,
        }
    }
}

/// USD profit for `increment` deposited into a tier already holding `raised`.
/// Shared by the evaluator, the allocator's marginal step and the allocation totals.
pub(crate) fn priced_fill(tier: &Tier, raised: f64, increment: f64, pricing: Pricing) -> PricedFill {
    let outcome = fill(tier.capacity(), raised, increment);
    let tokens = if tier.price > 0.0 {
        outcome.amount_used / tier.price
    } else {
        0.0
    };
    let usd_spent = outcome.amount_used * pricing.exchange_rate;
    let usd_received = tokens * pricing.resale_price;
    PricedFill {
        pct_allocated: outcome.pct_allocated,
        amount_used: outcome.amount_used,
        tokens,
        usd_spent,
        usd_received,
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PricedFill {
    pub pct_allocated: f64,
    pub amount_used: f64,
    pub tokens: f64,
    pub usd_spent: f64,
    pub usd_received: f64,
}

impl PricedFill {
    pub fn profit_usd(&self) -> f64 {
        self.usd_received - self.usd_spent
    }
}

pub fn evaluate(tier: &Tier, state: &TierState, deposit: f64, pricing: Pricing) -> EvaluationResult {
    let raised = state.raised_f64();
    let priced = priced_fill(tier, raised, deposit, pricing);
    let profit_pct = if priced.usd_spent > 0.0 {
        (priced.usd_received / priced.usd_spent - 1.0) * 100.0
    } else {
        0.0
    };
    EvaluationResult {
        price: tier.price,
        capacity: tier.capacity(),
        raised,
        overfund_pct: tier.overfund_pct(raised),
        pct_allocated: priced.pct_allocated,
        amount_used: priced.amount_used,
        tokens: priced.tokens,
        usd_spent: priced.usd_spent,
        usd_received: priced.usd_received,
        profit_usd: priced.profit_usd(),
        profit_pct,
    }
}

/// Evaluate the same deposit against every tier. `tiers` and `states` pair up by index.
pub fn evaluate_all(
    tiers: &[Tier],
    states: &[TierState],
    deposit: f64,
    pricing: Pricing,
) -> Vec<EvaluationResult> {
    tiers
        .iter()
        .zip(states)
        .map(|(tier, state)| evaluate(tier, state, deposit, pricing))
        .collect()
}

/// Row classification used by the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowHighlight {
    /// Highest profit percentage among all tiers.
    Best,
    Profitable,
    Loss,
}

pub fn highlight_rows(results: &[EvaluationResult]) -> Vec<RowHighlight> {
    let max_pct = results
        .iter()
        .map(|r| r.profit_pct)
        .fold(f64::NEG_INFINITY, f64::max);
    results
        .iter()
        .map(|r| {
            if r.profit_pct == max_pct {
                RowHighlight::Best
            } else if r.profit_pct > 0.0 {
                RowHighlight::Profitable
            } else {
                RowHighlight::Loss
            }
        })
        .collect()
}
