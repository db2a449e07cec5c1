use bf_tools::cli_util::program_name;
use bf_tools::commands::bench::{self, BenchArgs};
use bf_tools::logging;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bench", disable_help_flag = true)]
struct Cli {
    #[command(flatten)]
    args: BenchArgs,
}

fn main() {
    logging::init();
    let program = program_name("bench");
    let cli = Cli::parse();
    std::process::exit(bench::run(&program, cli.args));
}
