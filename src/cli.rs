use std::io;

use crate::data::scenario::{load_scenario_or_default, Scenario, ScenarioError};
use crate::data::validate::{
    parse_non_negative_float, parse_positive_float, parse_raised_list, validate_scenario,
};
use crate::prompt::collect_scenario_inputs;
use crate::report::{
    allocate_scenario, build_report, evaluate_scenario, render_allocation,
    render_evaluation_table, render_report, render_thresholds, sweep_scenario, tier_labels,
};
use crate::sweep::export_csv::write_sweep_csv_file;

const USAGE: &str =
    "usage: fragsim <evaluate|allocate|sweep|report|interactive|validate> [--scenario <path>] \
[--raised a,b,c,d,e] [--rate <usd>] [--price <usd>] [--deposit <bbsol>] [--step <bbsol>] \
[--csv <path>] [--json]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Evaluate,
    Allocate,
    Sweep,
    Report,
    Interactive,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("evaluate") => Some(Command::Evaluate),
        Some("allocate") => Some(Command::Allocate),
        Some("sweep") => Some(Command::Sweep),
        Some("report") => Some(Command::Report),
        Some("interactive") => Some(Command::Interactive),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

/// Flags shared by every command. Numeric flags override the scenario file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub scenario_path: Option<String>,
    pub raised: Option<Vec<u64>>,
    pub exchange_rate: Option<f64>,
    pub resale_price: Option<f64>,
    pub deposit: Option<f64>,
    pub step: Option<f64>,
    pub csv_path: Option<String>,
    pub json: bool,
}

impl CliOptions {
    pub fn apply(&self, mut scenario: Scenario) -> Scenario {
        if let Some(raised) = &self.raised {
            scenario.raised = raised.clone();
        }
        if let Some(rate) = self.exchange_rate {
            scenario.exchange_rate = rate;
        }
        if let Some(price) = self.resale_price {
            scenario.resale_price = price;
        }
        if let Some(deposit) = self.deposit {
            scenario.deposit = deposit;
        }
        if let Some(step) = self.step {
            scenario.allocation.step = step;
        }
        scenario
    }
}

/// Parse everything after the command name.
pub fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter().skip(2);
    while let Some(flag) = iter.next() {
        if flag == "--json" {
            options.json = true;
            continue;
        }
        let Some(value) = iter.next() else {
            return Err(format!("missing value for {flag}"));
        };
        let invalid = |err: crate::data::validate::InvalidInput| format!("invalid {flag}: {err}");
        match flag.as_str() {
            "--scenario" => options.scenario_path = Some(value.clone()),
            "--csv" => options.csv_path = Some(value.clone()),
            "--raised" => options.raised = Some(parse_raised_list(value).map_err(invalid)?),
            "--rate" => options.exchange_rate = Some(parse_positive_float(value).map_err(invalid)?),
            "--price" => options.resale_price = Some(parse_positive_float(value).map_err(invalid)?),
            "--deposit" => options.deposit = Some(parse_non_negative_float(value).map_err(invalid)?),
            "--step" => options.step = Some(parse_positive_float(value).map_err(invalid)?),
            other => return Err(format!("unknown option '{other}'")),
        }
    }
    Ok(options)
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let options = match parse_options(args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{USAGE}");
            return 2;
        }
    };

    match command {
        Command::Validate => handle_validate(&options),
        Command::Interactive => handle_interactive(&options),
        _ => match resolve_scenario(&options) {
            Ok(scenario) => match command {
                Command::Evaluate => handle_evaluate(&scenario, &options),
                Command::Allocate => handle_allocate(&scenario, &options),
                Command::Sweep => handle_sweep(&scenario, &options),
                _ => handle_report(&scenario, &options),
            },
            Err(err) => report_scenario_error(&err),
        },
    }
}

fn resolve_scenario(options: &CliOptions) -> Result<Scenario, ScenarioError> {
    let scenario = load_scenario_or_default(options.scenario_path.as_deref())?;
    options.apply(scenario).validated()
}

fn report_scenario_error(err: &ScenarioError) -> i32 {
    eprintln!("{err}");
    if let ScenarioError::Invalid(report) = err {
        for diag in &report.diagnostics {
            eprintln!("- {diag}");
        }
    }
    1
}

fn print_json<T: serde::Serialize>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

fn handle_evaluate(scenario: &Scenario, options: &CliOptions) -> i32 {
    let (results, highlights) = evaluate_scenario(scenario);
    if options.json {
        return print_json(&results, "evaluation");
    }
    print!(
        "{}",
        render_evaluation_table(&results, &highlights, scenario.deposit, scenario.resale_price)
    );
    0
}

fn handle_allocate(scenario: &Scenario, options: &CliOptions) -> i32 {
    let plan = allocate_scenario(scenario);
    if options.json {
        return print_json(&plan, "allocation");
    }
    print!("{}", render_allocation(&plan, &scenario.tiers));
    0
}

fn handle_sweep(scenario: &Scenario, options: &CliOptions) -> i32 {
    let result = sweep_scenario(scenario);
    if let Some(path) = &options.csv_path {
        if let Err(err) = write_sweep_csv_file(&result, path) {
            eprintln!("{err}");
            return 1;
        }
        log::info!("wrote {} sweep rows to {path}", result.prices.len());
    }
    if options.json {
        return print_json(
            &serde_json::json!({
                "thresholds": result.thresholds,
                "bands": result.bands(),
            }),
            "sweep",
        );
    }
    print!("{}", render_thresholds(&result.thresholds, &tier_labels(scenario)));
    0
}

fn handle_report(scenario: &Scenario, options: &CliOptions) -> i32 {
    let report = build_report(scenario);
    if options.json {
        return print_json(&report, "report");
    }
    print!("{}", render_report(&report, &scenario.tiers));
    0
}

fn handle_interactive(options: &CliOptions) -> i32 {
    let base = match load_scenario_or_default(options.scenario_path.as_deref()) {
        Ok(scenario) => options.apply(scenario),
        Err(err) => return report_scenario_error(&err),
    };
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let collected = match collect_scenario_inputs(base, &mut input, &mut output) {
        Ok(scenario) => scenario,
        Err(err) => {
            eprintln!("input failed: {err}");
            return 1;
        }
    };
    println!();
    match collected.validated() {
        Ok(scenario) => handle_report(&scenario, options),
        Err(err) => report_scenario_error(&err),
    }
}

fn handle_validate(options: &CliOptions) -> i32 {
    let scenario = match load_scenario_or_default(options.scenario_path.as_deref()) {
        Ok(scenario) => options.apply(scenario),
        Err(err) => return report_scenario_error(&err),
    };
    let report = validate_scenario(&scenario);
    if report.has_errors() {
        eprintln!("validation failed: {} issue(s)", report.error_count());
        for diag in &report.diagnostics {
            eprintln!("- {diag}");
        }
        return 1;
    }
    for diag in &report.diagnostics {
        eprintln!("- {diag}");
    }
    println!("validation passed: {} tiers", scenario.tiers.len());
    0
}
