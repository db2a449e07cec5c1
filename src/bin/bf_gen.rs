use bf_tools::cli_util::program_name;
use bf_tools::commands::encode::{self, EncodeArgs};
use bf_tools::logging;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bf_gen", disable_help_flag = true)]
struct Cli {
    #[command(flatten)]
    args: EncodeArgs,
}

fn main() {
    logging::init();
    let program = program_name("bf_gen");
    let cli = Cli::parse();
    std::process::exit(encode::run(&program, cli.args));
}
