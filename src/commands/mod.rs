//! Command-line front ends. Each `run` returns the process exit code.

pub mod bench;
pub mod clean;
pub mod encode;
pub mod run;
