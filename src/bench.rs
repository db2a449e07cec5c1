//! Command microbenchmarks.
//!
//! A [`CommandSpec`] describes one process to spawn: either an explicit
//! argument vector or, when opted in, a string handed to the platform shell.
//! [`run_benchmark`] executes it a fixed number of times, strictly one after
//! another, timing each attempt with a monotonic clock. The timer wraps the
//! whole attempt, so failed runs (non-zero exit, or a program that could not
//! be started) are reported and still counted.
//!
//! There is no per-run timeout: a command that never exits blocks the
//! benchmark until the process is killed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::Instant;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info};

/// Number of runs when none is configured.
pub const DEFAULT_RUNS: usize = 100;

/// Errors produced while running or recording a benchmark.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("command is empty")]
    EmptyCommand,

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("command '{command}' failed ({status})")]
    NonZeroExit { command: String, status: ExitStatus },

    #[error("no timings were recorded")]
    NoTimings,

    #[error("failed to serialize benchmark results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A process to spawn for each run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    display: String,
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    /// Build a spec from a command line.
    ///
    /// Without `shell`, the line is split on whitespace and the first word
    /// is the program; quoting is not interpreted. With `shell`, the whole
    /// line is passed to `sh -c` (`cmd /C` on Windows) so pipes, `&&` and
    /// quoting work as they would in a terminal.
    pub fn parse(command: &str, shell: bool) -> Result<Self, BenchError> {
        if command.trim().is_empty() {
            return Err(BenchError::EmptyCommand);
        }

        if shell {
            let (program, flag) = shell_invocation();
            return Ok(Self {
                display: command.to_string(),
                program: program.to_string(),
                args: vec![flag.to_string(), command.to_string()],
            });
        }

        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next().ok_or(BenchError::EmptyCommand)?;
        Ok(Self {
            display: command.to_string(),
            program,
            args: words.collect(),
        })
    }

    /// Build a spec from an explicit argument vector; `argv[0]` is the program.
    pub fn from_argv<I, S>(argv: I) -> Result<Self, BenchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv.next().ok_or(BenchError::EmptyCommand)?;
        if program.is_empty() {
            return Err(BenchError::EmptyCommand);
        }
        let args: Vec<String> = argv.collect();
        let display = std::iter::once(program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        Ok(Self {
            display,
            program,
            args,
        })
    }

    /// The command line as given by the user.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Executable that is spawned: the first word, or the shell in `--shell` mode.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to [`program`](Self::program) as-is, without shell parsing.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Spawn the process once and wait for it. Output is captured and
    /// discarded.
    pub fn run_once(&self) -> Result<(), BenchError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| BenchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(BenchError::NonZeroExit {
                command: self.display.clone(),
                status: output.status,
            })
        }
    }
}

#[cfg(windows)]
fn shell_invocation() -> (&'static str, &'static str) {
    ("cmd", "/C")
}

#[cfg(not(windows))]
fn shell_invocation() -> (&'static str, &'static str) {
    ("sh", "-c")
}

/// Summary statistics over a set of timings, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    #[serde(rename = "10th_percentile")]
    pub p10: f64,
    #[serde(rename = "90th_percentile")]
    pub p90: f64,
}

impl Statistics {
    /// Sort `timings` ascending in place and summarise them.
    ///
    /// Percentiles use truncating nearest-rank indexing (`⌊n × p⌋` into the
    /// sorted data), not interpolation. Returns `None` for empty input.
    pub fn from_timings(timings: &mut [f64]) -> Option<Self> {
        if timings.is_empty() {
            return None;
        }
        timings.sort_by(f64::total_cmp);

        let n = timings.len();
        let min = timings[0];
        let max = timings[n - 1];
        let mean = (timings.iter().sum::<f64>() / n as f64).clamp(min, max);
        let median = if n % 2 == 1 {
            timings[n / 2]
        } else {
            (timings[n / 2 - 1] + timings[n / 2]) / 2.0
        };

        Some(Self {
            min,
            max,
            mean,
            median,
            p10: timings[nearest_rank_index(n, 0.1)],
            p90: timings[nearest_rank_index(n, 0.9)],
        })
    }
}

/// Index of the `fraction` percentile in a sorted slice of length `len`.
pub fn nearest_rank_index(len: usize, fraction: f64) -> usize {
    ((len as f64 * fraction) as usize).min(len.saturating_sub(1))
}

/// The persisted outcome of one benchmark invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub command: String,
    /// Seconds per run, sorted ascending.
    pub timings: Vec<f64>,
    pub statistics: Statistics,
}

impl BenchmarkResult {
    pub fn new(command: impl Into<String>, mut timings: Vec<f64>) -> Result<Self, BenchError> {
        let statistics = Statistics::from_timings(&mut timings).ok_or(BenchError::NoTimings)?;
        Ok(Self {
            command: command.into(),
            timings,
            statistics,
        })
    }

    /// Pretty JSON with four-space indentation.
    pub fn to_json(&self) -> Result<Vec<u8>, BenchError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(buf)
    }

    /// Write the JSON document to `path`, replacing any existing file.
    pub fn write_json(&self, path: &Path) -> Result<(), BenchError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| BenchError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `benchmark_results_YYYYMMDD_HHMMSS.json` for the given local time.
pub fn results_file_name(now: &NaiveDateTime) -> String {
    format!("benchmark_results_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Run `spec` `runs` times in sequence and summarise the timings.
///
/// Every failed attempt is passed to `on_failure` together with its
/// zero-based run index; its elapsed time is still recorded.
pub fn run_benchmark<F>(
    spec: &CommandSpec,
    runs: usize,
    mut on_failure: F,
) -> Result<BenchmarkResult, BenchError>
where
    F: FnMut(usize, &BenchError),
{
    info!(command = spec.display(), runs, "starting benchmark");
    let mut timings = Vec::with_capacity(runs);

    for run in 0..runs {
        let start = Instant::now();
        let outcome = spec.run_once();
        let elapsed = start.elapsed().as_secs_f64();

        if let Err(err) = &outcome {
            on_failure(run, err);
        }
        debug!(run, elapsed, ok = outcome.is_ok(), "run finished");
        timings.push(elapsed);
    }

    BenchmarkResult::new(spec.display(), timings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hundred() -> Vec<f64> {
        // 1..=100 shuffled deterministically.
        (0..100).map(|i| ((i * 37) % 100 + 1) as f64).collect()
    }

    #[test]
    fn statistics_on_hundred_values() {
        let mut timings = hundred();
        let stats = Statistics::from_timings(&mut timings).unwrap();

        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 100.0);
        assert_eq!(stats.mean, 50.5);
        assert_eq!(stats.median, 50.5);
        // Nearest rank: index 10 and 90 of the sorted data.
        assert_eq!(stats.p10, 11.0);
        assert_eq!(stats.p90, 91.0);
        assert!(timings.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn statistics_are_ordered() {
        let inputs: [&[f64]; 4] = [
            &[0.3, 0.1, 0.2],
            &[5.0],
            &[0.1; 100],
            &[2.5, 0.001, 9.75, 0.5, 0.5, 3.25, 1e-6, 7.0],
        ];
        for input in inputs {
            let mut timings = input.to_vec();
            let s = Statistics::from_timings(&mut timings).unwrap();
            assert!(s.min <= s.p10 && s.p10 <= s.median, "{s:?}");
            assert!(s.median <= s.p90 && s.p90 <= s.max, "{s:?}");
            assert!(s.min <= s.mean && s.mean <= s.max, "{s:?}");
        }
    }

    #[test]
    fn odd_count_median_is_middle_value() {
        let mut timings = vec![3.0, 1.0, 2.0];
        let stats = Statistics::from_timings(&mut timings).unwrap();
        assert_eq!(stats.median, 2.0);
        assert_eq!(stats.p10, 1.0);
        assert_eq!(stats.p90, 3.0);
    }

    #[test]
    fn empty_timings_have_no_statistics() {
        assert!(Statistics::from_timings(&mut []).is_none());
        assert!(matches!(
            BenchmarkResult::new("x", Vec::new()),
            Err(BenchError::NoTimings)
        ));
    }

    #[test]
    fn nearest_rank_truncates() {
        assert_eq!(nearest_rank_index(100, 0.1), 10);
        assert_eq!(nearest_rank_index(100, 0.9), 90);
        assert_eq!(nearest_rank_index(15, 0.9), 13);
        assert_eq!(nearest_rank_index(1, 0.9), 0);
    }

    #[test]
    fn json_uses_expected_field_names() {
        let result = BenchmarkResult::new("sleep 0", vec![0.2, 0.1]).unwrap();
        let json = String::from_utf8(result.to_json().unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["command"], "sleep 0");
        assert_eq!(value["timings"], serde_json::json!([0.1, 0.2]));
        let stats = &value["statistics"];
        for key in ["min", "max", "mean", "median", "10th_percentile", "90th_percentile"] {
            assert!(stats[key].is_number(), "missing {key}");
        }
        assert!(json.contains("\n    \"command\""));
    }

    #[test]
    fn results_file_name_has_second_resolution() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 2)
            .unwrap();
        assert_eq!(results_file_name(&now), "benchmark_results_20240309_070502.json");
    }

    #[test]
    fn parse_splits_words_without_shell() {
        let spec = CommandSpec::parse("  echo  hello   world ", false).unwrap();
        assert_eq!(spec.program(), "echo");
        assert_eq!(spec.args(), ["hello", "world"]);
        assert_eq!(spec.display(), "  echo  hello   world ");
    }

    #[test]
    fn parse_with_shell_wraps_whole_line() {
        let spec = CommandSpec::parse("true && echo hi | wc -c", true).unwrap();
        let (program, flag) = shell_invocation();
        assert_eq!(spec.program(), program);
        assert_eq!(spec.args(), [flag, "true && echo hi | wc -c"]);
    }

    #[test]
    fn empty_commands_are_rejected() {
        assert!(matches!(CommandSpec::parse("", false), Err(BenchError::EmptyCommand)));
        assert!(matches!(CommandSpec::parse("   ", true), Err(BenchError::EmptyCommand)));
        assert!(matches!(
            CommandSpec::from_argv(Vec::<String>::new()),
            Err(BenchError::EmptyCommand)
        ));
    }

    #[test]
    fn from_argv_keeps_arguments_intact() {
        let spec = CommandSpec::from_argv(["printf", "%s\n", "two words"]).unwrap();
        assert_eq!(spec.program(), "printf");
        assert_eq!(spec.args(), ["%s\n", "two words"]);
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let spec = CommandSpec::parse("definitely-not-a-real-program-bf-tools", false).unwrap();
        assert!(matches!(spec.run_once(), Err(BenchError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn failing_runs_are_reported_and_counted() {
        let spec = CommandSpec::parse("false", false).unwrap();
        let mut failures = Vec::new();
        let result = run_benchmark(&spec, 4, |run, err| {
            assert!(matches!(err, BenchError::NonZeroExit { .. }));
            failures.push(run);
        })
        .unwrap();

        assert_eq!(failures, [0, 1, 2, 3]);
        assert_eq!(result.timings.len(), 4);
        assert_eq!(result.command, "false");
    }

    #[cfg(unix)]
    #[test]
    fn successful_runs_produce_sorted_timings() {
        let spec = CommandSpec::parse("exit 0", true).unwrap();
        let result = run_benchmark(&spec, 5, |_, err| panic!("unexpected failure: {err}")).unwrap();

        assert_eq!(result.timings.len(), 5);
        assert!(result.timings.windows(2).all(|w| w[0] <= w[1]));
        assert!(result.timings.iter().all(|t| *t >= 0.0));
        assert_eq!(result.statistics.min, result.timings[0]);
    }
}
