//! Diagnostic logging for both binaries.
//!
//! Fatal errors are printed as a single `<prog>: <message>` line by the binaries
//! themselves; tracing output is for diagnosing translation and handoff decisions.

use std::env;

use tracing_subscriber::prelude::*;

/// Filter directive for diagnostic output, e.g. `WENV_LOG=debug`.
pub const LOG_ENV: &str = "WENV_LOG";

fn filter_directive() -> String {
    env::var(LOG_ENV)
        .or_else(|_| env::var("RUST_LOG"))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "warn".to_string())
}

/// Install a stderr fmt subscriber. Safe to call more than once.
pub fn init(program: &str) {
    let directive = filter_directive();
    let env_filter = tracing_subscriber::EnvFilter::try_new(&directive).unwrap_or_else(|_| {
        eprintln!("{program}: ignoring invalid {LOG_ENV} filter {directive:?}");
        tracing_subscriber::EnvFilter::new("warn")
    });
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();
    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("{program}: global subscriber already set");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init("wenv");
        init("wenv");
        tracing::debug!("still alive");
    }
}
