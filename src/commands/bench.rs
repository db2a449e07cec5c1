use std::io::{self, IsTerminal, Write};
use std::path::Path;

use chrono::Local;
use clap::Args;
use tracing::warn;

use crate::bench::{BenchmarkResult, CommandSpec, DEFAULT_RUNS, results_file_name, run_benchmark};
use crate::cli_util::{flag_or_env, print_error, usage_and_exit};
use crate::theme::SummaryTheme;

/// Environment fallback for `--runs`.
pub const RUNS_ENV: &str = "BF_BENCH_RUNS";

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct BenchArgs {
    /// Run COMMAND through the platform shell (sh -c, or cmd /C on Windows)
    #[arg(long = "shell")]
    pub shell: bool,

    /// Number of runs (fallback BF_BENCH_RUNS; default 100)
    #[arg(short = 'n', long = "runs", value_name = "N")]
    pub runs: Option<usize>,

    /// The command to benchmark, as a single argument
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: BenchArgs) -> i32 {
    if args.help {
        usage_and_exit(&usage(program), 0);
    }

    let BenchArgs {
        shell,
        runs,
        command,
        ..
    } = args;

    let [command] = command.as_slice() else {
        usage_and_exit(&usage(program), 2);
    };

    let runs = flag_or_env(runs, RUNS_ENV).unwrap_or(DEFAULT_RUNS);
    if runs == 0 {
        eprintln!("{program}: the number of runs must be at least 1");
        usage_and_exit(&usage(program), 2);
    }

    let spec = match CommandSpec::parse(command, shell) {
        Ok(spec) => spec,
        Err(err) => {
            print_error(program, &err);
            usage_and_exit(&usage(program), 2);
        }
    };

    let result = match run_benchmark(&spec, runs, |_, err| {
        eprintln!("Error while executing command: {err}");
    }) {
        Ok(result) => result,
        Err(err) => {
            print_error(program, &err);
            return 1;
        }
    };

    let file_name = results_file_name(&Local::now().naive_local());
    if let Err(err) = result.write_json(Path::new(&file_name)) {
        warn!(file = %file_name, "could not persist benchmark results");
        print_error(program, &err);
        return 1;
    }

    print_summary(&result, io::stderr().is_terminal());
    println!("Benchmark results saved to {file_name}");
    let _ = io::stdout().flush();
    0
}

/// Human-readable digest of the statistics on stderr, in milliseconds.
fn print_summary(result: &BenchmarkResult, color: bool) {
    let theme = SummaryTheme::new(color);
    let s = &result.statistics;
    let heading = format!("{} runs of `{}`", result.timings.len(), result.command);
    eprintln!("{}", theme.paint(theme.heading, &heading));

    let rows = [
        ("min", s.min, theme.fastest),
        ("p10", s.p10, theme.fastest),
        ("median", s.median, theme.typical),
        ("mean", s.mean, theme.typical),
        ("p90", s.p90, theme.slow),
        ("max", s.max, theme.slowest),
    ];
    for (label, seconds, style) in rows {
        let label = theme.paint(theme.label, &format!("{label:<7}"));
        let value = theme.paint(style, &format!("{:>12.3} ms", seconds * 1000.0));
        eprintln!("  {label}{value}");
    }
    let _ = io::stderr().flush();
}

fn usage(program: &str) -> String {
    format!(
        r#"Usage:
  {0} [--shell] [--runs N] "<COMMAND>"

Options:
  --shell             Run COMMAND through the platform shell (sh -c, or cmd /C on Windows)
  --runs,  -n <N>     Number of sequential runs (fallback BF_BENCH_RUNS; default {1})
  --help,  -h         Show this help

Description:
  Runs COMMAND repeatedly, one run after another, timing each run. Statistics
  (min, max, mean, median, 10th and 90th percentile) are written together with
  every timing to benchmark_results_YYYYMMDD_HHMMSS.json in the current directory.

Notes:
  - Without --shell, COMMAND is split on whitespace; quotes, pipes and && are not interpreted.
  - Runs that exit non-zero are reported on stderr and still counted.
  - There is no per-run timeout; a command that never exits blocks the benchmark.
  - Options must come before COMMAND.

Examples:
  {0} "ls -la"
  {0} --shell "make clean && make"
"#,
        program, DEFAULT_RUNS
    )
}
