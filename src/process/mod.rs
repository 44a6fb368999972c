use std::fmt;

use nix::sys::signal::Signal;
use nix::unistd::Pid;

pub mod executor;
pub mod jobs;
pub mod signal;

pub use executor::{ProcessExecutor, EXEC_FAILURE_STATUS};
pub use jobs::{BackgroundJob, FinishedJob, JobTable};

#[derive(Debug)]
pub enum ProcessError {
    Fork(nix::Error),
    Wait(nix::Error),
    InvalidArgument(String),
    SignalError(String),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Fork(e) => write!(f, "failed to create process: {}", e),
            ProcessError::Wait(e) => write!(f, "failed to wait for process: {}", e),
            ProcessError::InvalidArgument(arg) => {
                write!(f, "argument contains a NUL byte: {:?}", arg)
            }
            ProcessError::SignalError(msg) => write!(f, "Signal error: {}", msg),
        }
    }
}

impl std::error::Error for ProcessError {}

/// Outcome of dispatching one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Return value of an in-process built-in.
    Builtin(i32),
    /// Foreground child terminated normally.
    Exited(i32),
    /// Foreground child was killed by a signal.
    Signaled(Signal),
    /// Background child left running.
    Detached(Pid),
}

impl CommandStatus {
    /// Shell-style integer status: signals map to `128 + signo`, detached
    /// launches count as success.
    pub fn code(&self) -> i32 {
        match *self {
            CommandStatus::Builtin(code) | CommandStatus::Exited(code) => code,
            CommandStatus::Signaled(signal) => 128 + signal as i32,
            CommandStatus::Detached(_) => 0,
        }
    }

    pub fn success(&self) -> bool {
        self.code() == 0
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandStatus::Builtin(0) | CommandStatus::Exited(0) => write!(f, "Done"),
            CommandStatus::Builtin(code) | CommandStatus::Exited(code) => {
                write!(f, "Exit {}", code)
            }
            CommandStatus::Signaled(signal) => write!(f, "Killed ({})", signal),
            CommandStatus::Detached(pid) => write!(f, "Running (pid {})", pid),
        }
    }
}
