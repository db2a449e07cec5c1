use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::cli_util::{print_error, usage_and_exit};
use crate::interpreter::{Interpreter, Optimization, Program};
use crate::transpiler::{Target, transpile, transpile_to_file};

/// How `run` handles the program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Interpret with folded instructions
    #[value(name = "interp")]
    Interp,
    /// Interpret one instruction per source character
    #[value(name = "raw")]
    Raw,
    /// Translate to C
    #[value(name = "bf2c")]
    Bf2c,
    /// Translate to JavaScript (Node.js)
    #[value(name = "bf2js")]
    Bf2js,
}

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Execution or translation mode
    #[arg(short = 'm', long = "mode", value_enum, default_value_t = Mode::Interp)]
    pub mode: Mode,

    /// Write translated code to PATH instead of stdout (bf2c and bf2js only)
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Brainfuck source file
    #[arg(value_name = "PATH", trailing_var_arg = true, allow_hyphen_values = true)]
    pub path: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(&usage(program), 0);
    }

    let RunArgs {
        mode, output, path, ..
    } = args;

    let [path] = path.as_slice() else {
        usage_and_exit(&usage(program), 2);
    };

    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("{program}: failed to read {path}: {err}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    let target = match mode {
        Mode::Interp => return interpret(program, &source, Optimization::Folded, output),
        Mode::Raw => return interpret(program, &source, Optimization::Raw, output),
        Mode::Bf2c => Target::C,
        Mode::Bf2js => Target::JavaScript,
    };

    match output {
        Some(out) => match transpile_to_file(&source, target, &out) {
            Ok(()) => {
                println!("Transpiled to {}: {}", target.name(), out.display());
                let _ = io::stdout().flush();
                0
            }
            Err(err) => {
                print_error(program, &err);
                1
            }
        },
        None => match transpile(&source, target) {
            Ok(code) => {
                print!("{code}");
                let _ = io::stdout().flush();
                0
            }
            Err(err) => {
                print_error(program, &err);
                1
            }
        },
    }
}

fn interpret(
    program: &str,
    source: &str,
    optimization: Optimization,
    output: Option<PathBuf>,
) -> i32 {
    if output.is_some() {
        eprintln!("{program}: --output only applies to bf2c and bf2js");
        usage_and_exit(&usage(program), 2);
    }

    let parsed = match Program::parse(source, optimization) {
        Ok(p) => p,
        Err(err) => {
            print_error(program, &err);
            return 1;
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();
    match Interpreter::new().run(&parsed, &mut input, &mut out) {
        Ok(()) => 0,
        Err(err) => {
            drop(out);
            print_error(program, &err);
            1
        }
    }
}

fn usage(program: &str) -> String {
    format!(
        r#"Usage:
  {0} [--mode MODE] [--output PATH] <PATH>

Options:
  --mode,   -m <MODE>  interp (default), raw, bf2c or bf2js
  --output, -o <PATH>  Write translated code to PATH instead of stdout (bf2c, bf2js)
  --help,   -h         Show this help

Description:
  Runs the Brainfuck program in PATH, or translates it to C or JavaScript.
  Characters other than ><+-.,[] are ignored.

Modes:
  interp  Interpret; repeated +-<> are merged and [-] clears the cell
  raw     Interpret one instruction at a time
  bf2c    Print an equivalent C program
  bf2js   Print an equivalent Node.js program

Notes:
  - Memory is 30000 byte cells that wrap on overflow; moving outside it is an error.
  - Input is read from stdin; at EOF the current cell is set to 0.
  - Program output is written as raw bytes with no trailing newline.
  - Options must come before PATH.
"#,
        program
    )
}
