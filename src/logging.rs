//! Diagnostic logging setup shared by every binary.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Install a `tracing` subscriber that writes to stderr.
///
/// `RUST_LOG` overrides the level (e.g. `RUST_LOG=bf_tools=debug`). Calling
/// this more than once is harmless; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
