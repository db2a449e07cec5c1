use bf_tools::cli_util::program_name;
use bf_tools::commands::run::{self, RunArgs};
use bf_tools::logging;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bf_run", disable_help_flag = true)]
struct Cli {
    #[command(flatten)]
    args: RunArgs,
}

fn main() {
    logging::init();
    let program = program_name("bf_run");
    let cli = Cli::parse();
    std::process::exit(run::run(&program, cli.args));
}
