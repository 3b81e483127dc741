pub mod scenario;
pub mod tier;
pub mod validate;

pub use scenario::{load_scenario, load_scenario_or_default, parse_scenario, Scenario, ScenarioError};
pub use tier::{default_tiers, Tier, TierState, DEFAULT_TIERS};
