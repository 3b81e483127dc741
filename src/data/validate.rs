//! Input boundary: raw text to validated numbers, plus scenario-level checks.
//! The simulation core assumes everything reaching it passed through here.

use std::fmt;

use thiserror::Error;

use crate::data::scenario::Scenario;
use crate::optimizer::{AllocationConfig, MAX_ALLOCATION_STEPS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("'{0}' must not be negative")]
    Negative(String),
    #[error("'{0}' must be greater than zero")]
    NotPositive(String),
    #[error("'{0}' is not a finite number")]
    NotFinite(String),
}

/// Parse a raised amount: a non-negative whole number.
pub fn parse_non_negative_int(raw: &str) -> Result<u64, InvalidInput> {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(value) if value < 0 => Err(InvalidInput::Negative(trimmed.to_string())),
        Ok(value) => Ok(value as u64),
        Err(_) => trimmed
            .parse::<u64>()
            .map_err(|_| InvalidInput::NotANumber(trimmed.to_string())),
    }
}

fn parse_finite(raw: &str) -> Result<f64, InvalidInput> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| InvalidInput::NotANumber(trimmed.to_string()))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InvalidInput::NotFinite(trimmed.to_string()))
    }
}

pub fn parse_non_negative_float(raw: &str) -> Result<f64, InvalidInput> {
    let value = parse_finite(raw)?;
    if value < 0.0 {
        return Err(InvalidInput::Negative(raw.trim().to_string()));
    }
    Ok(value)
}

/// Prices and exchange rates.
pub fn parse_positive_float(raw: &str) -> Result<f64, InvalidInput> {
    let value = parse_finite(raw)?;
    if value <= 0.0 {
        return Err(InvalidInput::NotPositive(raw.trim().to_string()));
    }
    Ok(value)
}

/// Comma-separated raised amounts, e.g. `300,120,0,0,15`.
pub fn parse_raised_list(raw: &str) -> Result<Vec<u64>, InvalidInput> {
    raw.split(',').map(parse_non_negative_int).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Error)
            .count()
    }
}

fn check_positive(report: &mut ValidationReport, context: &str, value: f64) {
    if !value.is_finite() || value <= 0.0 {
        report.push(
            ValidationSeverity::Error,
            context,
            format!("must be a positive finite number, got {value}"),
        );
    }
}

/// Check a fully resolved scenario before it reaches the simulation core.
pub fn validate_scenario(scenario: &Scenario) -> ValidationReport {
    let mut report = ValidationReport::default();

    if scenario.tiers.is_empty() {
        report.push(ValidationSeverity::Error, "tiers", "at least one tier is required");
    }
    for (idx, tier) in scenario.tiers.iter().enumerate() {
        let context = format!("tiers[{idx}]");
        check_positive(&mut report, &format!("{context}.price"), tier.price);
        if tier.supply == 0 {
            report.push(ValidationSeverity::Error, format!("{context}.supply"), "must be greater than zero");
        }
    }

    if scenario.raised.len() != scenario.tiers.len() {
        report.push(
            ValidationSeverity::Error,
            "raised",
            format!(
                "expected {} raised amounts (one per tier), got {}",
                scenario.tiers.len(),
                scenario.raised.len()
            ),
        );
    }

    check_positive(&mut report, "exchange_rate", scenario.exchange_rate);
    check_positive(&mut report, "resale_price", scenario.resale_price);

    if !scenario.deposit.is_finite() || scenario.deposit < 0.0 {
        report.push(
            ValidationSeverity::Error,
            "deposit",
            format!("must be a non-negative finite number, got {}", scenario.deposit),
        );
    } else if scenario.deposit.fract() != 0.0 && scenario.allocation.step == 1.0 {
        report.push(
            ValidationSeverity::Warning,
            "deposit",
            format!(
                "fractional remainder {:.4} is not allocated in whole-unit mode",
                scenario.deposit.fract()
            ),
        );
    }

    check_positive(&mut report, "allocation.step", scenario.allocation.step);
    let step = scenario.allocation.step;
    if step.is_finite() && step > 0.0 && scenario.deposit.is_finite() && scenario.deposit >= 0.0 {
        let steps = AllocationConfig::step_count(scenario.deposit, step);
        if steps > MAX_ALLOCATION_STEPS as f64 {
            report.push(
                ValidationSeverity::Error,
                "allocation.step",
                format!(
                    "step {step} needs {steps:e} iterations for deposit {}, limit is {MAX_ALLOCATION_STEPS}",
                    scenario.deposit
                ),
            );
        }
    }

    let sweep = &scenario.sweep;
    check_positive(&mut report, "sweep.start", sweep.start);
    check_positive(&mut report, "sweep.end", sweep.end);
    if sweep.end < sweep.start {
        report.push(
            ValidationSeverity::Error,
            "sweep",
            format!("end {} is below start {}", sweep.end, sweep.start),
        );
    }
    if sweep.points < 2 {
        report.push(
            ValidationSeverity::Warning,
            "sweep.points",
            "fewer than two points cannot produce thresholds",
        );
    }

    report
}
