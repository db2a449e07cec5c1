//! A tiny Brainfuck generator.
//!
//! [`BrainfuckEncoder`] turns text into Brainfuck source that prints it,
//! using a single memory cell:
//!
//! - The cell starts at 0.
//! - For each character, emit `+` or `-` until the cell holds the character's
//!   code point, then emit `.`.
//! - No loops and no pointer movement are ever emitted.
//!
//! Code points above 255 are emitted at their full value; only interpreters
//! with cells wide enough to hold them will print them back.
//!
//! Quick start:
//!
//! ```
//! use bf_tools::BrainfuckEncoder;
//!
//! let code = BrainfuckEncoder::new("AB").generate();
//! assert_eq!(code, format!("{}.+.", "+".repeat(65)));
//! ```

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::escape::{EscapeError, decode_escapes};

/// File name the encoder writes to when no output path is given.
pub const DEFAULT_OUTPUT: &str = "res.bf";

/// Errors that can occur while encoding command-line text to a file.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The input text contained a malformed escape sequence.
    #[error("Parse error: {0}")]
    Escape(#[from] EscapeError),

    /// The generated program could not be written.
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Generates a program that prints `input` using only the first cell.
///
/// For each character the cell is moved by `+` or `-` from the previous code
/// point to the next one, then printed with `.`.
///
/// ```
/// use bf_tools::BrainfuckEncoder;
///
/// assert_eq!(BrainfuckEncoder::new("\u{2}\u{1}").generate(), "++.-.");
/// ```
pub struct BrainfuckEncoder<'a> {
    input: &'a str,
}

impl<'a> BrainfuckEncoder<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Generate the program. Identical input always yields identical output.
    pub fn generate(&self) -> String {
        let mut output = String::new();
        let mut cursor: i64 = 0;

        for ch in self.input.chars() {
            let target = i64::from(u32::from(ch));
            push_delta(&mut output, cursor, target);
            output.push('.');
            cursor = target;
        }

        output
    }
}

/// Append the `+`/`-` run that moves the cell from `cursor` to `target`.
fn push_delta(output: &mut String, cursor: i64, target: i64) {
    let (op, count) = match target.cmp(&cursor) {
        Ordering::Greater => ('+', target - cursor),
        Ordering::Less => ('-', cursor - target),
        Ordering::Equal => return,
    };
    output.extend(std::iter::repeat_n(op, count.unsigned_abs() as usize));
}

/// Shorthand for `BrainfuckEncoder::new(text).generate()`.
pub fn encode(text: &str) -> String {
    BrainfuckEncoder::new(text).generate()
}

/// Decode escapes in `raw`, encode the result, and write it to `path`,
/// replacing any existing file. Returns the generated program.
pub fn encode_to_file(raw: &str, path: &Path) -> Result<String, EncodeError> {
    let text = decode_escapes(raw)?;
    let program = encode(&text);
    debug!(
        chars = text.chars().count(),
        instructions = program.len(),
        path = %path.display(),
        "writing generated program"
    );

    fs::write(path, &program).map_err(|source| EncodeError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(program)
}
