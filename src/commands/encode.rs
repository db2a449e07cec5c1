use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;

use crate::cli_util::{print_error, usage_and_exit};
use crate::encoder::{DEFAULT_OUTPUT, EncodeError, encode_to_file};

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct EncodeArgs {
    /// Write the program to PATH instead of res.bf
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Text to encode, as a single argument (backslash escapes are decoded)
    #[arg(value_name = "TEXT", trailing_var_arg = true, allow_hyphen_values = true)]
    pub text: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: EncodeArgs) -> i32 {
    if args.help {
        usage_and_exit(&usage(program), 0);
    }

    let EncodeArgs { output, text, .. } = args;

    let [text] = text.as_slice() else {
        usage_and_exit(&usage(program), 2);
    };

    let path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    match encode_to_file(text, &path) {
        Ok(_) => {
            println!("Brainfuck code written to {}", path.display());
            let _ = io::stdout().flush();
            0
        }
        Err(err @ EncodeError::Escape(_)) => {
            eprintln!("{program}: {err}");
            let _ = io::stderr().flush();
            1
        }
        Err(err) => {
            print_error(program, &err);
            1
        }
    }
}

fn usage(program: &str) -> String {
    format!(
        r#"Usage:
  {0} [--output PATH] "<TEXT>"

Options:
  --output, -o <PATH>  Write the program to PATH (default: {1} in the current directory)
  --help,   -h         Show this help

Description:
  Generates Brainfuck code that prints TEXT using a single memory cell: for each
  character the cell is moved up or down to its code point, then printed.

Notes:
  - Escapes such as \n, \t, \\, \xHH and \uHHHH in TEXT are decoded first;
    write \\ for a literal backslash.
  - An existing output file is overwritten.
  - Characters above U+00FF need an interpreter whose cells can hold their code point.
  - Options must come before TEXT; TEXT may itself start with '-'.
"#,
        program, DEFAULT_OUTPUT
    )
}
