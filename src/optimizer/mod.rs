pub mod greedy;
pub mod summary;

pub use greedy::{
    allocate, allocate_with, AllocationConfig, AllocationOutcome, MAX_ALLOCATION_STEPS, WHOLE_UNIT_STEP,
};
pub use summary::{summarize, AllocationSummary, TierAllocation};

use crate::data::tier::{Tier, TierState};
use crate::sale::evaluate::Pricing;

/// Allocation plus its totals, as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AllocationPlan {
    pub outcome: AllocationOutcome,
    pub summary: AllocationSummary,
}

/// Greedy allocation of `budget` followed by [summarize].
pub fn plan_allocation(
    tiers: &[Tier],
    states: &[TierState],
    budget: f64,
    pricing: Pricing,
    config: AllocationConfig,
) -> AllocationPlan {
    let outcome = allocate_with(tiers, states, budget, pricing, config);
    let summary = summarize(tiers, states, &outcome, budget, pricing);
    AllocationPlan { outcome, summary }
}
