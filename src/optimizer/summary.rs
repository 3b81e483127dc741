use serde::Serialize;

use crate::data::tier::{Tier, TierState};
use crate::optimizer::greedy::AllocationOutcome;
use crate::sale::evaluate::{priced_fill, Pricing};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierAllocation {
    pub price: f64,
    pub deposited: f64,
    pub amount_used: f64,
    pub tokens: f64,
    pub usd_spent: f64,
    pub usd_received: f64,
}

/// Totals for an allocation vector, each tier rationed against its raised amount plus
/// everything allocated to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSummary {
    pub tiers: Vec<TierAllocation>,
    pub budget: f64,
    pub total_return_usd: f64,
    pub total_used: f64,
    pub total_cost_usd: f64,
    pub total_profit_usd: f64,
    /// Absent when nothing was filled.
    pub avg_return_per_used: Option<f64>,
    /// Absent for a zero budget.
    pub avg_return_per_deposited: Option<f64>,
}

pub fn summarize(
    tiers: &[Tier],
    states: &[TierState],
    outcome: &AllocationOutcome,
    budget: f64,
    pricing: Pricing,
) -> AllocationSummary {
    let per_tier: Vec<TierAllocation> = tiers
        .iter()
        .zip(states)
        .zip(&outcome.allocation)
        .map(|((tier, state), &deposited)| {
            let priced = priced_fill(tier, state.raised_f64(), deposited, pricing);
            TierAllocation {
                price: tier.price,
                deposited,
                amount_used: priced.amount_used,
                tokens: priced.tokens,
                usd_spent: priced.usd_spent,
                usd_received: priced.usd_received,
            }
        })
        .collect();

    let total_return_usd: f64 = per_tier.iter().map(|t| t.usd_received).sum();
    let total_used: f64 = per_tier.iter().map(|t| t.amount_used).sum();
    let total_cost_usd: f64 = per_tier.iter().map(|t| t.usd_spent).sum();

    AllocationSummary {
        tiers: per_tier,
        budget,
        total_return_usd,
        total_used,
        total_cost_usd,
        total_profit_usd: total_return_usd - total_cost_usd,
        avg_return_per_used: (total_used > 0.0).then(|| total_return_usd / total_used),
        avg_return_per_deposited: (budget > 0.0).then(|| total_return_usd / budget),
    }
}
