//! Pro-rata fill: how much of a deposit increment an oversubscribed tier accepts.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FillOutcome {
    /// Fraction of the increment that is filled, in [0, 1].
    pub pct_allocated: f64,
    /// `increment * pct_allocated`.
    pub amount_used: f64,
}

impl FillOutcome {
    pub const EMPTY: Self = Self {
        pct_allocated: 0.0,
        amount_used: 0.0,
    };
}

/// Fill `increment` against a tier with `capacity` that already holds `raised`.
///
/// Once `raised + increment` exceeds capacity every depositor is rationed to
/// `capacity / (raised + increment)` of what they sent. Zero demand or zero
/// capacity fills nothing.
pub fn fill(capacity: f64, raised: f64, increment: f64) -> FillOutcome {
    let demand = raised + increment;
    if demand <= 0.0 || capacity <= 0.0 {
        return FillOutcome::EMPTY;
    }
    let pct_allocated = (capacity / demand).min(1.0);
    FillOutcome {
        pct_allocated,
        amount_used: increment * pct_allocated,
    }
}
