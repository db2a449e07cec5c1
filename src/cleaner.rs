//! Strip comments and whitespace from Brainfuck source.
//!
//! Everything outside the instruction set `><+-.,[]` is dropped and the
//! remaining instructions keep their order. Loop brackets are not checked
//! for balance; malformed nesting passes through untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// The eight Brainfuck instructions.
pub const INSTRUCTIONS: [char; 8] = ['>', '<', '+', '-', '.', ',', '[', ']'];

/// Errors that can occur while loading a file to clean.
#[derive(Debug, thiserror::Error)]
pub enum CleanError {
    /// The path does not exist.
    #[error("The file '{}' was not found.", .path.display())]
    NotFound { path: PathBuf },

    /// Any other read failure: permissions, a directory, invalid UTF-8.
    #[error("{source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[inline]
pub fn is_instruction(ch: char) -> bool {
    matches!(ch, '>' | '<' | '+' | '-' | '.' | ',' | '[' | ']')
}

/// Keep only Brainfuck instruction characters.
pub fn clean(source: &str) -> String {
    source.chars().filter(|&c| is_instruction(c)).collect()
}

/// Read `path` as UTF-8 text and [`clean`] it.
pub fn clean_file(path: impl AsRef<Path>) -> Result<String, CleanError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            CleanError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            CleanError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let cleaned = clean(&content);
    debug!(
        path = %path.display(),
        read = content.len(),
        kept = cleaned.len(),
        "cleaned source file"
    );
    Ok(cleaned)
}
