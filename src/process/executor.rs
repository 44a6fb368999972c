use std::ffi::CString;
use std::ptr;

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, write, ForkResult, Pid};
use tracing::debug;

use super::{CommandStatus, ProcessError};
use crate::core::parser::ParsedCommand;

/// Status a child exits with when its program image could not be replaced.
pub const EXEC_FAILURE_STATUS: i32 = 127;

// Everything the child needs is built before forking, including the
// null-terminated pointer array, so between fork and exec it neither
// allocates nor calls anything that is not async-signal-safe.
struct LaunchPlan {
    // owns the strings `argv_ptrs` points into
    argv: Vec<CString>,
    argv_ptrs: Vec<*const libc::c_char>,
    not_found: Vec<u8>,
}

impl LaunchPlan {
    fn new(cmd: &ParsedCommand) -> Result<Self, ProcessError> {
        let argv = cmd
            .arguments
            .iter()
            .map(|arg| {
                CString::new(arg.as_bytes())
                    .map_err(|_| ProcessError::InvalidArgument(arg.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let argv_ptrs = argv
            .iter()
            .map(|arg| arg.as_ptr())
            .chain(std::iter::once(ptr::null()))
            .collect();

        Ok(Self {
            argv,
            argv_ptrs,
            not_found: format!("{}: command not found\n", cmd.name).into_bytes(),
        })
    }

    fn exec(self) -> ! {
        // execvp only returns on failure
        unsafe { libc::execvp(self.argv[0].as_ptr(), self.argv_ptrs.as_ptr()) };
        let _ = write(libc::STDERR_FILENO, &self.not_found);
        unsafe { libc::_exit(EXEC_FAILURE_STATUS) }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Forks a child that execs `cmd.name` with `cmd.arguments` as argv.
    /// Returns the child's pid to the parent; the child never returns.
    pub fn spawn(&self, cmd: &ParsedCommand) -> Result<Pid, ProcessError> {
        let plan = LaunchPlan::new(cmd)?;

        match unsafe { fork() }.map_err(ProcessError::Fork)? {
            ForkResult::Parent { child } => {
                debug!(
                    "spawned {} as pid {} (background: {})",
                    cmd.name, child, cmd.is_background
                );
                Ok(child)
            }
            ForkResult::Child => plan.exec(),
        }
    }

    /// Blocks until `pid` terminates.
    pub fn wait(&self, pid: Pid) -> Result<CommandStatus, ProcessError> {
        loop {
            match waitpid(pid, None) {
                Ok(WaitStatus::Exited(_, code)) => {
                    debug!("pid {} exited with {}", pid, code);
                    return Ok(CommandStatus::Exited(code));
                }
                Ok(WaitStatus::Signaled(_, signal, _)) => {
                    debug!("pid {} killed by {}", pid, signal);
                    return Ok(CommandStatus::Signaled(signal));
                }
                Ok(status) => debug!("ignoring wait event {:?}", status),
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(ProcessError::Wait(e)),
            }
        }
    }

    pub fn run_foreground(&self, cmd: &ParsedCommand) -> Result<CommandStatus, ProcessError> {
        let pid = self.spawn(cmd)?;
        self.wait(pid)
    }
}
