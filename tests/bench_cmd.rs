use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn cargo_bin() -> Command { Command::cargo_bin("bench").unwrap() }

fn result_files(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("benchmark_results_") && n.ends_with(".json"))
        })
        .collect()
}

fn load_single_result(dir: &Path) -> serde_json::Value {
    let files = result_files(dir);
    assert_eq!(files.len(), 1, "expected one results file, found {files:?}");
    let name = files[0].file_name().unwrap().to_str().unwrap().to_string();
    // benchmark_results_YYYYMMDD_HHMMSS.json
    let stamp = &name["benchmark_results_".len()..name.len() - ".json".len()];
    assert_eq!(stamp.len(), 15);
    assert_eq!(&stamp[8..9], "_");
    assert!(stamp.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    serde_json::from_str(&fs::read_to_string(&files[0]).unwrap()).unwrap()
}

#[test]
fn no_arguments_prints_usage_and_runs_nothing() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin()
        .current_dir(dir.path())
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Usage:"));
    assert!(result_files(dir.path()).is_empty());
}

#[test]
fn two_positionals_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin()
        .current_dir(dir.path())
        .args(["echo", "hi"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
    assert!(result_files(dir.path()).is_empty());
}

#[test]
fn help_exits_zero() {
    cargo_bin()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("--shell"));
}

#[test]
fn zero_runs_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin()
        .current_dir(dir.path())
        .args(["--runs", "0", "true"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("at least 1"));
}

#[cfg(unix)]
#[test]
fn default_run_count_is_one_hundred() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin()
        .current_dir(dir.path())
        .env_remove("BF_BENCH_RUNS")
        .timeout(Duration::from_secs(60))
        .arg("true")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Benchmark results saved to benchmark_results_"));

    let json = load_single_result(dir.path());
    assert_eq!(json["command"], "true");
    assert_eq!(json["timings"].as_array().unwrap().len(), 100);
}

#[cfg(unix)]
#[test]
fn results_file_holds_sorted_timings_and_statistics() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin()
        .current_dir(dir.path())
        .timeout(Duration::from_secs(30))
        .args(["--runs", "7", "echo hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Benchmark results saved to"))
        // The command's own output is captured and discarded.
        .stdout(predicate::str::contains("hello").not());

    let json = load_single_result(dir.path());
    assert_eq!(json["command"], "echo hello");

    let timings: Vec<f64> = json["timings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(timings.len(), 7);
    assert!(timings.windows(2).all(|w| w[0] <= w[1]));

    let stats = &json["statistics"];
    let get = |k: &str| stats[k].as_f64().unwrap();
    assert_eq!(get("min"), timings[0]);
    assert_eq!(get("max"), timings[6]);
    assert_eq!(get("median"), timings[3]);
    assert_eq!(get("10th_percentile"), timings[0]);
    assert_eq!(get("90th_percentile"), timings[6]);
    assert!(get("min") <= get("mean") && get("mean") <= get("max"));
}

#[cfg(unix)]
#[test]
fn runs_fall_back_to_environment() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin()
        .current_dir(dir.path())
        .env("BF_BENCH_RUNS", "3")
        .timeout(Duration::from_secs(30))
        .arg("true")
        .assert()
        .success();

    let json = load_single_result(dir.path());
    assert_eq!(json["timings"].as_array().unwrap().len(), 3);
}

#[cfg(unix)]
#[test]
fn failing_runs_are_reported_and_still_counted() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin()
        .current_dir(dir.path())
        .timeout(Duration::from_secs(30))
        .args(["-n", "4", "false"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Error while executing command").count(4))
        .stdout(predicate::str::contains("Benchmark results saved to"));

    let json = load_single_result(dir.path());
    assert_eq!(json["timings"].as_array().unwrap().len(), 4);
}

#[cfg(unix)]
#[test]
fn missing_program_is_reported_per_run() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin()
        .current_dir(dir.path())
        .timeout(Duration::from_secs(30))
        .args(["-n", "2", "no-such-program-for-bf-tools-bench"])
        .assert()
        .success()
        .stderr(predicate::str::contains("failed to start"));

    let json = load_single_result(dir.path());
    assert_eq!(json["timings"].as_array().unwrap().len(), 2);
}

#[cfg(unix)]
#[test]
fn compound_commands_need_the_shell_flag() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin()
        .current_dir(dir.path())
        .timeout(Duration::from_secs(30))
        .args(["--shell", "-n", "2", "true && exit 3"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Error while executing command").count(2));

    let json = load_single_result(dir.path());
    assert_eq!(json["command"], "true && exit 3");
}
