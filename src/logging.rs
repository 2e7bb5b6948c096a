// Logging setup. Diagnostics go to stderr through `tracing`; stdout is
// reserved for command output, which may be binary.

use anyhow::anyhow;
use std::io::IsTerminal;
use tracing_subscriber::filter::EnvFilter;

/// Filter directive for a `-v` count. Warnings always show so the operator
/// sees overrides such as a corrected folder id.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "openrelik_cli=info,warn",
        2 => "openrelik_cli=debug,warn",
        _ => "trace",
    }
}

/// Install the global subscriber. `RUST_LOG` wins when no `-v` is given.
pub fn init(verbosity: u8) -> anyhow::Result<()> {
    let filter = if verbosity == 0 {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive(0)))
    } else {
        EnvFilter::try_new(default_directive(verbosity))
    }
    .map_err(|e| anyhow!("invalid log filter: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("logging already initialized: {e}"))
}
