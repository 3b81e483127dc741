//! Plain-text and JSON presentation of simulation results.

use std::fmt::Write as _;

use serde::Serialize;

use crate::data::scenario::Scenario;
use crate::data::tier::Tier;
use crate::optimizer::{plan_allocation, AllocationPlan};
use crate::sale::{evaluate_all, highlight_rows, EvaluationResult, Pricing, RowHighlight};
use crate::sweep::{sweep_range, BestTierBand, SweepResult, ThresholdEvent};

/// Everything the tool computes for one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub deposit: f64,
    pub exchange_rate: f64,
    pub resale_price: f64,
    pub evaluations: Vec<EvaluationResult>,
    pub highlights: Vec<RowHighlight>,
    pub allocation: AllocationPlan,
    pub thresholds: Vec<ThresholdEvent>,
    pub bands: Vec<BestTierBand>,
    pub tier_labels: Vec<String>,
}

pub fn evaluate_scenario(scenario: &Scenario) -> (Vec<EvaluationResult>, Vec<RowHighlight>) {
    let pricing = Pricing::new(scenario.resale_price, scenario.exchange_rate);
    let results = evaluate_all(&scenario.tiers, &scenario.states(), scenario.deposit, pricing);
    let highlights = highlight_rows(&results);
    (results, highlights)
}

pub fn allocate_scenario(scenario: &Scenario) -> AllocationPlan {
    let pricing = Pricing::new(scenario.resale_price, scenario.exchange_rate);
    plan_allocation(
        &scenario.tiers,
        &scenario.states(),
        scenario.deposit,
        pricing,
        scenario.allocation,
    )
}

pub fn sweep_scenario(scenario: &Scenario) -> SweepResult {
    sweep_range(
        &scenario.tiers,
        &scenario.states(),
        scenario.deposit,
        scenario.exchange_rate,
        scenario.sweep,
    )
}

pub fn tier_labels(scenario: &Scenario) -> Vec<String> {
    scenario
        .tiers
        .iter()
        .zip(&scenario.raised)
        .map(|(tier, &raised)| tier.label(raised as f64))
        .collect()
}

pub fn build_report(scenario: &Scenario) -> ScenarioReport {
    let (evaluations, highlights) = evaluate_scenario(scenario);
    let allocation = allocate_scenario(scenario);
    let swept = sweep_scenario(scenario);
    let bands = swept.bands();
    ScenarioReport {
        deposit: scenario.deposit,
        exchange_rate: scenario.exchange_rate,
        resale_price: scenario.resale_price,
        evaluations,
        highlights,
        allocation,
        thresholds: swept.thresholds,
        bands,
        tier_labels: tier_labels(scenario),
    }
}

fn highlight_marker(highlight: RowHighlight) -> &'static str {
    match highlight {
        RowHighlight::Best => "BEST",
        RowHighlight::Profitable => "profit",
        RowHighlight::Loss => "loss",
    }
}

pub fn render_evaluation_table(
    results: &[EvaluationResult],
    highlights: &[RowHighlight],
    deposit: f64,
    resale_price: f64,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Simulation: deposit of {deposit} bbSOL in each tier\nEstimated sale price: ${resale_price:.4} USD\n"
    );
    let header = format!(
        "{:>12} | {:>12} | {:>11} | {:>11} | {:>12} | {:>11} | {:>13} | {:>11} | {:>15} | {:>6}",
        "Tier",
        "Overfund (%)",
        "% Allocated",
        "bbSOL Used",
        "FRAG Tokens",
        "USD Spent",
        "USD Received",
        "Profit USD",
        "Profit/Loss (%)",
        "Class"
    );
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{}", "-".repeat(header.len()));
    for (r, highlight) in results.iter().zip(highlights) {
        let _ = writeln!(
            out,
            "{:>12.8} | {:>11.2}% | {:>10.2}% | {:>11.4} | {:>12.2} | ${:>10.2} | ${:>12.2} | ${:>10.2} | {:>+14.2}% | {:>6}",
            r.price,
            r.overfund_pct,
            r.pct_allocated * 100.0,
            r.amount_used,
            r.tokens,
            r.usd_spent,
            r.usd_received,
            r.profit_usd,
            r.profit_pct,
            highlight_marker(*highlight)
        );
    }
    out
}

pub fn render_allocation(plan: &AllocationPlan, tiers: &[Tier]) -> String {
    let summary = &plan.summary;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Suggested allocation for {} bbSOL (maximizing absolute USD profit):",
        summary.budget
    );
    for (tier, deposited) in tiers.iter().zip(&plan.outcome.allocation) {
        let _ = writeln!(out, "  Tier {:.8} bbSOL: {:.2} bbSOL", tier.price, deposited);
    }
    if plan.outcome.unallocated > 0.0 {
        let _ = writeln!(out, "  Unallocated remainder: {:.4} bbSOL", plan.outcome.unallocated);
    }
    let _ = writeln!(
        out,
        "\nEstimated total return: ${:.2} USD for {:.2} bbSOL effectively used.",
        summary.total_return_usd, summary.total_used
    );
    let _ = writeln!(out, "Total cost: ${:.2} USD", summary.total_cost_usd);
    let _ = writeln!(out, "Estimated total profit: ${:.2} USD", summary.total_profit_usd);
    if let Some(avg) = summary.avg_return_per_used {
        let _ = writeln!(out, "Average return per bbSOL used: ${avg:.2} USD");
    }
    if let Some(avg) = summary.avg_return_per_deposited {
        let _ = writeln!(out, "Average return per bbSOL deposited: ${avg:.2} USD");
    }
    out
}

pub fn render_thresholds(thresholds: &[ThresholdEvent], labels: &[String]) -> String {
    let label = |idx: usize| {
        labels
            .get(idx)
            .cloned()
            .unwrap_or_else(|| format!("Tier {}", idx + 1))
    };
    let mut out = String::new();
    if thresholds.is_empty() {
        let _ = writeln!(out, "No best-tier changes across the swept price range.");
        return out;
    }
    let _ = writeln!(out, "Best-tier thresholds:");
    for event in thresholds {
        let _ = writeln!(
            out,
            "  ${:.2}: {} -> {}",
            event.price,
            label(event.previous_tier),
            label(event.new_tier)
        );
    }
    out
}

pub fn render_report(report: &ScenarioReport, tiers: &[Tier]) -> String {
    let mut out = render_evaluation_table(
        &report.evaluations,
        &report.highlights,
        report.deposit,
        report.resale_price,
    );
    out.push('\n');
    out.push_str(&render_allocation(&report.allocation, tiers));
    out.push('\n');
    out.push_str(&render_thresholds(&report.thresholds, &report.tier_labels));
    out
}
