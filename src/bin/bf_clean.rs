use bf_tools::cli_util::program_name;
use bf_tools::commands::clean::{self, CleanArgs};
use bf_tools::logging;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bf_clean", disable_help_flag = true)]
struct Cli {
    #[command(flatten)]
    args: CleanArgs,
}

fn main() {
    logging::init();
    let program = program_name("bf_clean");
    let cli = Cli::parse();
    std::process::exit(clean::run(&program, cli.args));
}
