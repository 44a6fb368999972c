use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use signal_hook::consts::SIGCHLD;
use tracing::debug;

use crate::process::ProcessError;

/// Keeps the shell alive when Ctrl-C hits the foreground process group.
/// Children get the default disposition back when they exec.
pub fn setup_interrupt_handler() -> Result<(), ProcessError> {
    ctrlc::set_handler(|| debug!("interrupt received by shell"))
        .map_err(|e| ProcessError::SignalError(e.to_string()))
}

/// Sets `flag` whenever a child changes state.
pub fn watch_children(flag: Arc<AtomicBool>) -> Result<(), ProcessError> {
    signal_hook::flag::register(SIGCHLD, flag)
        .map(|_| ())
        .map_err(|e| ProcessError::SignalError(e.to_string()))
}
