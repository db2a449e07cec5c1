use bf_tools::cli_util::{program_name, usage_and_exit};
use bf_tools::commands::{bench, clean, encode, run};
use bf_tools::logging;
use clap::{Parser, Subcommand};

fn top_usage(program: &str) -> String {
    format!(
        r#"Usage:
  {0} bench  [--shell] [--runs N] "<COMMAND>"  # Time COMMAND over repeated runs, save JSON results
  {0} encode [--output PATH] "<TEXT>"          # Generate Brainfuck that prints TEXT into res.bf
  {0} clean  <PATH>                            # Print only the Brainfuck instructions in PATH
  {0} run    [--mode MODE] [--output PATH] <PATH>  # Interpret PATH, or translate it with bf2c/bf2js

Run "{0} <subcommand> --help" for more info.
"#,
        program
    )
}

#[derive(Parser, Debug)]
#[command(name = "bf-tools", disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Bench(bench::BenchArgs),
    Encode(encode::EncodeArgs),
    Clean(clean::CleanArgs),
    Run(run::RunArgs),
}

fn main() {
    logging::init();
    let program = program_name("bf-tools");

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        usage_and_exit(&top_usage(&program), if cli.help { 0 } else { 2 });
    };
    if cli.help {
        usage_and_exit(&top_usage(&program), 0);
    }

    let code = match command {
        Command::Bench(args) => bench::run(&format!("{program} bench"), args),
        Command::Encode(args) => encode::run(&format!("{program} encode"), args),
        Command::Clean(args) => clean::run(&format!("{program} clean"), args),
        Command::Run(args) => run::run(&format!("{program} run"), args),
    };

    std::process::exit(code);
}
