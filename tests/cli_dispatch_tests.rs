use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_fragsim")
}

fn unique_temp_path(name: &str, ext: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("fragsim-{name}-{stamp}.{ext}"))
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(bin())
        .args(args)
        .env_remove("FRAGSIM_SCENARIO")
        .output()
        .expect("fragsim should run")
}

#[test]
fn unknown_command_prints_usage() {
    let output = run(&["bogus"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: fragsim"));
}

#[test]
fn evaluate_command_emits_one_json_row_per_tier() {
    let output = run(&["evaluate", "--raised", "3000,600,1200,300,0", "--rate", "1500", "--price", "2", "--json"]);
    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("evaluate should emit json");
    let rows = payload.as_array().expect("array of rows");
    assert_eq!(rows.len(), 5);
    assert!(rows[0]["pct_allocated"].as_f64().expect("number") < 1.0);
    assert_eq!(rows[4]["pct_allocated"].as_f64(), Some(1.0));
}

#[test]
fn allocate_command_reports_split() {
    let output = run(&["allocate", "--raised", "3000,600,1200,300,0", "--rate", "1500", "--price", "2", "--json"]);
    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("allocate should emit json");
    let allocation: Vec<f64> = payload["outcome"]["allocation"]
        .as_array()
        .expect("allocation array")
        .iter()
        .filter_map(serde_json::Value::as_f64)
        .collect();
    assert_eq!(allocation, vec![0.0, 3.0, 0.0, 7.0, 0.0]);
    assert!(payload["summary"]["total_profit_usd"].is_number());
}

#[test]
fn sweep_command_writes_csv() {
    let path = unique_temp_path("sweep", "csv");
    let output = run(&[
        "sweep",
        "--raised",
        "3000,600,1200,300,0",
        "--rate",
        "1500",
        "--csv",
        path.to_string_lossy().as_ref(),
    ]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Best-tier thresholds"));

    let csv = fs::read_to_string(&path).expect("csv should exist");
    assert_eq!(csv.lines().count(), 1001);
    let _ = fs::remove_file(path);
}

#[test]
fn report_reads_yaml_scenario() {
    let path = unique_temp_path("scenario", "yaml");
    fs::write(
        &path,
        "exchange_rate: 2000\nresale_price: 0.8\nraised: [2000, 1500, 800, 300, 0]\nsweep: { points: 200 }\n",
    )
    .expect("fixture should be written");

    let output = run(&["report", "--scenario", path.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Profit/Loss (%)"));
    assert!(stdout.contains("Estimated total profit"));
    assert!(stdout.contains("Best-tier thresholds"));

    let _ = fs::remove_file(path);
}

#[test]
fn invalid_scenario_exits_non_zero() {
    let output = run(&["report", "--raised", "1,2"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("scenario is invalid"));
}

#[test]
fn validate_command_flags_bad_file() {
    let path = unique_temp_path("bad", "json");
    fs::write(&path, r#"{"exchange_rate": -1, "raised": [0, 0, 0, 0, 0]}"#)
        .expect("fixture should be written");

    let output = run(&["validate", "--scenario", path.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed"));
    assert!(stderr.contains("exchange_rate"));

    let _ = fs::remove_file(path);
}

#[test]
fn interactive_command_reprompts_and_reports() {
    let mut child = Command::new(bin())
        .args(["interactive", "--json"])
        .env_remove("FRAGSIM_SCENARIO")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("interactive should start");
    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(b"3000\n-1\n600\n1200\n300\n0\n1500\n2\n")
        .expect("answers should be written");
    let output = child.wait_with_output().expect("interactive should finish");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Please enter a non-negative integer value."));
    let json_start = stdout.find("\n{").expect("report json follows the prompts");
    let payload: serde_json::Value =
        serde_json::from_str(&stdout[json_start..]).expect("report should be json");
    assert_eq!(payload["evaluations"].as_array().map(Vec::len), Some(5));
}

#[test]
fn step_too_small_for_deposit_is_rejected() {
    let output = run(&["report", "--step", "1e-300"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("allocation.step"));
}
