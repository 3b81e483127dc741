use serde::Serialize;

/// Resale price at which the most profitable tier changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdEvent {
    /// First swept price where `new_tier` is best.
    pub price: f64,
    pub previous_tier: usize,
    pub new_tier: usize,
}

/// Contiguous price interval where one tier stays best.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestTierBand {
    pub tier: usize,
    pub start: f64,
    pub end: f64,
}

/// Index of the highest profit at each point; ties go to the lowest tier.
pub fn best_tier_indices(curves: &[Vec<f64>], points: usize) -> Vec<usize> {
    if curves.is_empty() {
        return Vec::new();
    }
    (0..points)
        .map(|j| {
            let mut best_idx = 0;
            let mut best_profit = curves[0][j];
            for (idx, curve) in curves.iter().enumerate().skip(1) {
                if curve[j] > best_profit {
                    best_profit = curve[j];
                    best_idx = idx;
                }
            }
            best_idx
        })
        .collect()
}

/// Scan best-tier indices in price order and record every change. Points beyond the
/// shorter of the two slices are ignored.
pub fn detect_thresholds(prices: &[f64], best_tier: &[usize]) -> Vec<ThresholdEvent> {
    let mut points = prices.iter().zip(best_tier);
    let Some((_, &first)) = points.next() else {
        return Vec::new();
    };
    let mut current = first;
    let mut events = Vec::new();
    for (&price, &tier) in points {
        if tier != current {
            let event = ThresholdEvent {
                price,
                previous_tier: current,
                new_tier: tier,
            };
            log::debug!(
                "threshold at {:.4}: tier {} -> tier {}",
                event.price,
                event.previous_tier,
                event.new_tier
            );
            events.push(event);
            current = tier;
        }
    }
    events
}

/// Split the swept domain into bands at each threshold. The last band closes at the
/// final swept price.
pub fn best_tier_bands(
    prices: &[f64],
    best_tier: &[usize],
    thresholds: &[ThresholdEvent],
) -> Vec<BestTierBand> {
    let (Some(&first_price), Some(&last_price), Some(&first_tier)) =
        (prices.first(), prices.last(), best_tier.first())
    else {
        return Vec::new();
    };
    let mut bands = Vec::with_capacity(thresholds.len() + 1);
    let mut start = first_price;
    let mut tier = first_tier;
    for event in thresholds {
        bands.push(BestTierBand {
            tier,
            start,
            end: event.price,
        });
        start = event.price;
        tier = event.new_tier;
    }
    bands.push(BestTierBand {
        tier,
        start,
        end: last_price,
    });
    bands
}
