use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

use crate::flags::Flags;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "MISH_LOG";

/// Logs go to stderr. `MISH_LOG` wins over `--debug`; otherwise only
/// warnings are shown.
pub fn init(flags: &Flags) {
    let default_level = if flags.is_set("debug") { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init();

    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {}", e);
    }
}
