use std::io::{self, Write};

use clap::Args;

use crate::cleaner::{CleanError, clean_file};
use crate::cli_util::usage_and_exit;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct CleanArgs {
    /// Brainfuck source file to clean
    #[arg(value_name = "PATH", trailing_var_arg = true, allow_hyphen_values = true)]
    pub path: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: CleanArgs) -> i32 {
    if args.help {
        usage_and_exit(&usage(program), 0);
    }

    let [path] = args.path.as_slice() else {
        usage_and_exit(&usage(program), 2);
    };

    match clean_file(path) {
        Ok(cleaned) => {
            println!("{cleaned}");
            let _ = io::stdout().flush();
            0
        }
        Err(err @ CleanError::NotFound { .. }) => {
            eprintln!("Error: {err}");
            let _ = io::stderr().flush();
            0
        }
        Err(err) => {
            eprintln!("An error occurred: {err}");
            let _ = io::stderr().flush();
            0
        }
    }
}

fn usage(program: &str) -> String {
    format!(
        r#"Usage:
  {0} <PATH>

Options:
  --help, -h   Show this help

Description:
  Prints the Brainfuck instructions (><+-.,[]) found in PATH, in order, and
  drops everything else: comments, whitespace, and any other characters.

Notes:
  - Loop brackets are not checked for balance.
  - The file must be UTF-8 text.
  - A missing or unreadable file is reported on stderr, not stdout, and the
    exit status stays 0; stdout only ever carries cleaned code.
  - PATH may start with '-'.
"#,
        program
    )
}
