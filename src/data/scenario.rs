//! Scenario configuration: tiers, raised amounts, prices and sweep settings.
//! Loaded from YAML (or JSON when the path ends in `.json`); every field falls
//! back to the FRAG sale defaults.

use std::env;
use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::tier::{default_tiers, states_from_raised, Tier, TierState};
use crate::data::validate::{validate_scenario, ValidationReport};
use crate::optimizer::AllocationConfig;
use crate::sweep::PriceRange;

pub const SCENARIO_ENV_VAR: &str = "FRAGSIM_SCENARIO";
pub const DEFAULT_DEPOSIT: f64 = 10.0;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse scenario YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("failed to parse scenario JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("scenario is invalid: {} error(s)", .0.error_count())]
    Invalid(ValidationReport),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub tiers: Vec<Tier>,
    /// One raised amount per tier, in deposit-asset units. Omitted means zero everywhere.
    // Field-level default: a missing `raised` must come through empty (not the five
    // container-default zeros) so `parse_scenario` can size it to an overridden tier list.
    #[serde(default)]
    pub raised: Vec<u64>,
    /// Deposit asset (bbSOL) price in USD.
    pub exchange_rate: f64,
    /// Estimated token resale price in USD.
    pub resale_price: f64,
    pub deposit: f64,
    pub sweep: PriceRange,
    pub allocation: AllocationConfig,
}

impl Default for Scenario {
    fn default() -> Self {
        let tiers = default_tiers();
        let raised = vec![0; tiers.len()];
        Self {
            tiers,
            raised,
            exchange_rate: 1.0,
            resale_price: 1.0,
            deposit: DEFAULT_DEPOSIT,
            sweep: PriceRange::default(),
            allocation: AllocationConfig::default(),
        }
    }
}

impl Scenario {
    pub fn states(&self) -> Vec<TierState> {
        states_from_raised(&self.raised)
    }

    /// Run [validate_scenario] and turn any error diagnostics into [ScenarioError::Invalid].
    pub fn validated(self) -> Result<Self, ScenarioError> {
        let report = validate_scenario(&self);
        for diag in &report.diagnostics {
            log::warn!("{diag}");
        }
        if report.has_errors() {
            return Err(ScenarioError::Invalid(report));
        }
        Ok(self)
    }
}

/// Parse a scenario from text. `json` selects the JSON parser instead of YAML.
pub fn parse_scenario(raw: &str, json: bool) -> Result<Scenario, ScenarioError> {
    let mut scenario: Scenario = if json {
        serde_json::from_str(raw)?
    } else {
        serde_yaml::from_str(raw)?
    };
    if scenario.raised.is_empty() {
        scenario.raised = vec![0; scenario.tiers.len()];
    }
    Ok(scenario)
}

pub fn load_scenario(path: impl AsRef<Path>) -> Result<Scenario, ScenarioError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
    let scenario = parse_scenario(&raw, json)?;
    info!(
        "loaded scenario from {} ({} tiers)",
        path.display(),
        scenario.tiers.len()
    );
    Ok(scenario)
}

/// Load from `path`, else from `FRAGSIM_SCENARIO`, else the built-in defaults.
pub fn load_scenario_or_default(path: Option<&str>) -> Result<Scenario, ScenarioError> {
    if let Some(path) = path {
        return load_scenario(path);
    }
    match env::var(SCENARIO_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => load_scenario(path.trim()),
        _ => Ok(Scenario::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_fields_override_defaults() {
        let raw = "exchange_rate: 180.5\nresale_price: 0.42\nraised: [300, 120, 0, 0, 15]\n";
        let scenario = parse_scenario(raw, false).expect("yaml should parse");
        assert_eq!(scenario.exchange_rate, 180.5);
        assert_eq!(scenario.resale_price, 0.42);
        assert_eq!(scenario.raised, vec![300, 120, 0, 0, 15]);
        assert_eq!(scenario.deposit, DEFAULT_DEPOSIT);
        assert_eq!(scenario.tiers.len(), 5);
        assert_eq!(scenario.sweep.points, 1000);
    }

    #[test]
    fn tier_override_without_raised_starts_at_zero() {
        let raw = r#"{"tiers": [{"price": 0.5, "supply": 100}, {"price": 1.0, "supply": 10}]}"#;
        let scenario = parse_scenario(raw, true).expect("json should parse");
        assert_eq!(scenario.raised, vec![0, 0]);
    }

    #[test]
    fn invalid_scenario_is_rejected() {
        let scenario = Scenario {
            exchange_rate: 0.0,
            ..Scenario::default()
        };
        let err = scenario.validated().expect_err("zero exchange rate is invalid");
        assert!(matches!(err, ScenarioError::Invalid(ref report) if report.error_count() == 1));
    }

    #[test]
    fn malformed_yaml_reports_parse_error() {
        let err = parse_scenario("raised: [1, two]", false).expect_err("should fail");
        assert!(matches!(err, ScenarioError::ParseYaml(_)));
    }
}
