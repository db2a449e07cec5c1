use std::env;
use std::error::Error;
use std::io::{self, Write};
use std::str::FromStr;

/// Name the binary was invoked as, for usage and error prefixes.
pub fn program_name(fallback: &str) -> String {
    env::args().next().unwrap_or_else(|| fallback.to_string())
}

/// Print a usage block to stderr and exit with `code`.
pub fn usage_and_exit(usage: &str, code: i32) -> ! {
    eprintln!("{usage}");
    let _ = io::stderr().flush();
    std::process::exit(code);
}

/// Resolve a setting: explicit flag first, then the environment variable.
/// Unparseable environment values are ignored.
pub fn flag_or_env<T: FromStr>(flag: Option<T>, var: &str) -> Option<T> {
    flag.or_else(|| env::var(var).ok().and_then(|s| s.trim().parse::<T>().ok()))
}

/// Print `err` and its chain of sources, prefixed with the program name.
pub fn print_error(program: &str, err: &dyn Error) {
    let mut msg = format!("{program}: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !msg.ends_with(&cause_msg) {
            msg.push_str(": ");
            msg.push_str(&cause_msg);
        }
        source = cause.source();
    }
    eprintln!("{msg}");
    let _ = io::stderr().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_environment() {
        assert_eq!(flag_or_env(Some(7usize), "BF_TOOLS_TEST_UNSET_VAR"), Some(7));
    }

    #[test]
    fn missing_environment_gives_none() {
        assert_eq!(flag_or_env::<usize>(None, "BF_TOOLS_TEST_UNSET_VAR"), None);
    }
}
