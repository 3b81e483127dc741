//! Greedy deposit allocator.
//!
//! The budget is cut into equal steps. Each step goes to the tier whose next
//! step earns the most absolute USD profit given what earlier steps already
//! put there. Pro-rata rationing makes returns diminish per tier, so this is a
//! heuristic: good in practice, not a proven optimum.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::tier::{Tier, TierState};
use crate::sale::evaluate::{priced_fill, Pricing};

/// Whole deposit-asset units; any fractional remainder of the budget stays unallocated.
pub const WHOLE_UNIT_STEP: f64 = 1.0;

/// Upper bound on greedy iterations for one allocation.
pub const MAX_ALLOCATION_STEPS: u64 = 10_000_000;

/// Relative slack when deciding whether a step divides the budget exactly.
const STEP_COUNT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Size of each greedy increment. `1.0` allocates whole units and drops any remainder;
    /// smaller steps allocate closer to the full budget at the cost of more iterations.
    pub step: f64,
    /// Iteration cap. A step too small for the budget is coarsened to `budget / max_steps`.
    pub max_steps: u64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            step: WHOLE_UNIT_STEP,
            max_steps: MAX_ALLOCATION_STEPS,
        }
    }
}

impl AllocationConfig {
    pub fn with_step(step: f64) -> Self {
        Self {
            step,
            ..Self::default()
        }
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Steps of `step` that fit in `budget`. A quotient within rounding error of a whole
    /// number counts as that whole number.
    pub fn step_count(budget: f64, step: f64) -> f64 {
        let raw = budget / step;
        let nearest = raw.round();
        if (raw - nearest).abs() <= STEP_COUNT_EPSILON * raw.max(1.0) {
            nearest
        } else {
            raw.floor()
        }
    }

    fn effective_step(&self) -> f64 {
        if self.step.is_finite() && self.step > 0.0 {
            self.step
        } else {
            WHOLE_UNIT_STEP
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationOutcome {
    /// Deposit assigned to each tier. Sums to `steps * step`.
    pub allocation: Vec<f64>,
    /// Raised amount per tier after this allocation is added.
    pub raised_after: Vec<f64>,
    pub steps: u64,
    pub step: f64,
    /// Budget left over because it did not fill a whole step.
    pub unallocated: f64,
}

impl AllocationOutcome {
    pub fn allocated_total(&self) -> f64 {
        self.allocation.iter().sum()
    }
}

/// Allocate `total_budget` in whole units.
pub fn allocate(
    tiers: &[Tier],
    states: &[TierState],
    total_budget: f64,
    pricing: Pricing,
) -> AllocationOutcome {
    allocate_with(tiers, states, total_budget, pricing, AllocationConfig::default())
}

pub fn allocate_with(
    tiers: &[Tier],
    states: &[TierState],
    total_budget: f64,
    pricing: Pricing,
    config: AllocationConfig,
) -> AllocationOutcome {
    let mut step = config.effective_step();
    let budget = if total_budget.is_finite() {
        total_budget.max(0.0)
    } else {
        0.0
    };
    let tier_count = tiers.len().min(states.len());
    let base_raised: Vec<f64> = states[..tier_count]
        .iter()
        .map(TierState::raised_f64)
        .collect();

    if tier_count == 0 {
        return AllocationOutcome {
            allocation: Vec::new(),
            raised_after: Vec::new(),
            steps: 0,
            step,
            unallocated: budget,
        };
    }

    let max_steps = config.max_steps.max(1);
    let mut steps = AllocationConfig::step_count(budget, step);
    if steps > max_steps as f64 {
        log::warn!(
            "step {step} needs {steps} iterations, coarsening to {max_steps} steps of {}",
            budget / max_steps as f64
        );
        step = budget / max_steps as f64;
        steps = max_steps as f64;
    }
    let steps = steps as u64;
    let mut units = vec![0u64; tier_count];
    let mut raised_now = base_raised.clone();

    for step_index in 0..steps {
        let mut best_idx = 0;
        let mut best_profit = f64::NEG_INFINITY;
        for (idx, tier) in tiers[..tier_count].iter().enumerate() {
            let marginal = priced_fill(tier, raised_now[idx], step, pricing).profit_usd();
            // strict > keeps the lowest index on ties
            if marginal > best_profit {
                best_profit = marginal;
                best_idx = idx;
            }
        }
        units[best_idx] += 1;
        raised_now[best_idx] = base_raised[best_idx] + units[best_idx] as f64 * step;
        debug!("step {step_index}: tier {best_idx} marginal profit {best_profit:.6} USD");
    }

    let allocation: Vec<f64> = units.iter().map(|&count| count as f64 * step).collect();
    let allocated = steps as f64 * step;
    let remainder = budget - allocated;
    AllocationOutcome {
        allocation,
        raised_after: raised_now,
        steps,
        step,
        unallocated: if remainder < step * STEP_COUNT_EPSILON {
            0.0
        } else {
            remainder
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tier::DEFAULT_TIERS;

    fn zero_states(n: usize) -> Vec<TierState> {
        vec![TierState::new(0); n]
    }

    #[test]
    fn whole_unit_mode_drops_fractional_remainder() {
        let out = allocate(&DEFAULT_TIERS, &zero_states(5), 10.75, Pricing::new(1.0, 100.0));
        assert_eq!(out.steps, 10);
        assert_eq!(out.allocated_total(), 10.0);
        assert!((out.unallocated - 0.75).abs() < 1e-12);
    }

    #[test]
    fn unrationed_tiers_favor_cheapest_price() {
        let out = allocate(&DEFAULT_TIERS, &zero_states(5), 10.0, Pricing::new(1.0, 100.0));
        assert_eq!(out.allocation, vec![10.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(out.raised_after[0], 10.0);
    }

    #[test]
    fn equal_tiers_tie_to_lowest_index() {
        let tiers = [Tier::new(0.5, 1_000); 3];
        let out = allocate(&tiers, &zero_states(3), 4.0, Pricing::new(1.0, 1.0));
        assert_eq!(out.allocation, vec![4.0, 0.0, 0.0]);
    }

    #[test]
    fn loss_making_units_are_still_placed() {
        // resale far below cost: every marginal profit is negative
        let out = allocate(&DEFAULT_TIERS, &zero_states(5), 3.0, Pricing::new(0.000_001, 100.0));
        assert_eq!(out.allocated_total(), 3.0);
    }

    #[test]
    fn fine_steps_allocate_fractional_budget() {
        let config = AllocationConfig::with_step(0.25);
        let out = allocate_with(&DEFAULT_TIERS, &zero_states(5), 10.75, Pricing::new(1.0, 100.0), config);
        assert_eq!(out.steps, 43);
        assert!((out.allocated_total() - 10.75).abs() < 1e-12);
        assert_eq!(out.unallocated, 0.0);
    }

    #[test]
    fn step_that_divides_budget_exactly_is_not_lost() {
        let out = allocate_with(
            &DEFAULT_TIERS,
            &zero_states(5),
            0.3,
            Pricing::new(1.0, 100.0),
            AllocationConfig::with_step(0.1),
        );
        assert_eq!(out.steps, 3);
        assert!((out.allocated_total() - 0.3).abs() < 1e-12);
        assert_eq!(out.unallocated, 0.0);
    }

    #[test]
    fn genuine_remainder_is_still_dropped() {
        let out = allocate_with(
            &DEFAULT_TIERS,
            &zero_states(5),
            0.35,
            Pricing::new(1.0, 100.0),
            AllocationConfig::with_step(0.1),
        );
        assert_eq!(out.steps, 3);
        assert!((out.unallocated - 0.05).abs() < 1e-12);
    }

    #[test]
    fn tiny_step_is_coarsened_to_the_iteration_cap() {
        let config = AllocationConfig::with_step(1e-300).with_max_steps(1_000);
        let out = allocate_with(&DEFAULT_TIERS, &zero_states(5), 10.0, Pricing::new(1.0, 100.0), config);
        assert_eq!(out.steps, 1_000);
        assert!((out.step - 0.01).abs() < 1e-15);
        assert!((out.allocated_total() - 10.0).abs() < 1e-9);
        assert_eq!(out.unallocated, 0.0);
    }

    #[test]
    fn invalid_step_falls_back_to_whole_units() {
        let out = allocate_with(
            &DEFAULT_TIERS,
            &zero_states(5),
            5.0,
            Pricing::new(1.0, 100.0),
            AllocationConfig::with_step(0.0),
        );
        assert_eq!(out.step, WHOLE_UNIT_STEP);
        assert_eq!(out.steps, 5);
    }

    #[test]
    fn empty_registry_allocates_nothing() {
        let out = allocate(&[], &[], 10.0, Pricing::new(1.0, 1.0));
        assert!(out.allocation.is_empty());
        assert_eq!(out.unallocated, 10.0);
    }
}
