//! Small Brainfuck and benchmarking utilities.
//!
//! Four independent tools share this crate:
//!
//! - [`bench`]: run a command many times in sequence and record wall-clock
//!   statistics to a timestamped JSON file.
//! - [`encoder`]: turn text into Brainfuck source that prints it, moving a
//!   single cell from one code point to the next.
//! - [`cleaner`]: strip everything that is not one of the eight Brainfuck
//!   instructions from a source file.
//! - [`interpreter`] and [`transpiler`]: run Brainfuck on a 30,000-cell byte
//!   tape, or translate it to C or JavaScript.
//!
//! Quick start:
//!
//! ```
//! use bf_tools::{clean, encode};
//!
//! let code = encode("Hi");
//! assert_eq!(clean(&format!("prints Hi: {code}")), code);
//! ```
//!
//! The encoder type and the interpreter together:
//!
//! ```
//! use bf_tools::BrainfuckEncoder;
//! use bf_tools::interpreter::execute;
//!
//! let encoder = BrainfuckEncoder::new("ok\n");
//! let program = encoder.generate();
//! assert_eq!(program.matches('.').count(), 3);
//! assert_eq!(execute(&program, b"").unwrap(), b"ok\n");
//! ```

pub mod bench;
pub mod cleaner;
pub mod cli_util;
pub mod commands;
pub mod encoder;
pub mod escape;
pub mod interpreter;
pub mod logging;
pub mod theme;
pub mod transpiler;

pub use bench::{BenchError, BenchmarkResult, CommandSpec, Statistics, run_benchmark};
pub use cleaner::{CleanError, clean, clean_file};
pub use encoder::{BrainfuckEncoder, EncodeError, encode, encode_to_file};
pub use escape::{EscapeError, decode_escapes};
pub use interpreter::{InterpretError, Interpreter, Optimization, Program, execute};
pub use transpiler::{Target, TranspileError, transpile, transpile_to_file};
