//! Tier registry: fixed price/supply slots of the sale and the raised amount
//! already committed to each one.

use serde::{Deserialize, Serialize};

/// Immutable registry entry. `price` is denominated in the deposit asset (bbSOL per token).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub price: f64,
    pub supply: u64,
}

impl Tier {
    pub const fn new(price: f64, supply: u64) -> Self {
        Self { price, supply }
    }

    /// Deposit-asset amount the tier absorbs before it is fully subscribed.
    pub fn capacity(&self) -> f64 {
        self.supply as f64 * self.price
    }

    /// Raised amount as a percentage of capacity. Zero capacity reports 0.
    pub fn overfund_pct(&self, raised: f64) -> f64 {
        let capacity = self.capacity();
        if capacity > 0.0 {
            raised / capacity * 100.0
        } else {
            0.0
        }
    }

    /// Legend label, e.g. `Tier $0.000153 (122%) overfund`.
    pub fn label(&self, raised: f64) -> String {
        format!(
            "Tier ${:.6} ({}%) overfund",
            self.price,
            self.overfund_pct(raised).trunc() as i64
        )
    }
}

/// Per-tier simulation input: deposit-asset amount committed before this run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierState {
    pub raised: u64,
}

impl TierState {
    pub const fn new(raised: u64) -> Self {
        Self { raised }
    }

    pub fn raised_f64(&self) -> f64 {
        self.raised as f64
    }
}

pub const TIER_SUPPLY: u64 = 1_600_000;

/// The five FRAG sale tiers.
pub const DEFAULT_TIERS: [Tier; 5] = [
    Tier::new(0.000152709, TIER_SUPPLY),
    Tier::new(0.000213793, TIER_SUPPLY),
    Tier::new(0.000274876, TIER_SUPPLY),
    Tier::new(0.00033596, TIER_SUPPLY),
    Tier::new(0.000397044, TIER_SUPPLY),
];

pub fn default_tiers() -> Vec<Tier> {
    DEFAULT_TIERS.to_vec()
}

/// Build states from raw raised amounts, one per tier.
pub fn states_from_raised(raised: &[u64]) -> Vec<TierState> {
    raised.iter().copied().map(TierState::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tier_capacity() {
        let capacity = DEFAULT_TIERS[0].capacity();
        assert!((capacity - 244.3344).abs() < 1e-3, "capacity was {capacity}");
    }

    #[test]
    fn capacities_increase_with_price() {
        let caps: Vec<f64> = DEFAULT_TIERS.iter().map(Tier::capacity).collect();
        assert!(caps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn overfund_guards_zero_capacity() {
        let empty = Tier::new(0.0, TIER_SUPPLY);
        assert_eq!(empty.overfund_pct(50.0), 0.0);
    }

    #[test]
    fn label_truncates_overfund_percentage() {
        let tier = DEFAULT_TIERS[0];
        let label = tier.label(300.0);
        assert_eq!(label, "Tier $0.000153 (122%) overfund");
    }
}
