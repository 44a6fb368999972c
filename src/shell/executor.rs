use std::io::{self, Write};

use tracing::{debug, warn};

use crate::core::{Builtins, ParsedCommand, ShellState};
use crate::process::{CommandStatus, FinishedJob, JobTable, ProcessError, ProcessExecutor};

/// Routes parsed commands to a built-in or to a forked child.
pub struct Dispatcher {
    builtins: Builtins,
    executor: ProcessExecutor,
    jobs: JobTable,
}

impl Dispatcher {
    pub fn new(builtins: Builtins) -> Self {
        Self {
            builtins,
            executor: ProcessExecutor::new(),
            jobs: JobTable::new(),
        }
    }

    pub fn dispatch(
        &mut self,
        state: &mut ShellState,
        cmd: &ParsedCommand,
    ) -> Result<CommandStatus, ProcessError> {
        if let Some(builtin) = self.builtins.get(&cmd.name) {
            debug!("running builtin {}", cmd.name);
            return Ok(CommandStatus::Builtin(builtin.execute(state, cmd)));
        }

        // anything still buffered would otherwise appear after the child's output
        if let Err(e) = io::stdout().flush() {
            warn!("failed to flush stdout before launching {}: {}", cmd.name, e);
        }

        let pid = self.executor.spawn(cmd)?;
        if cmd.is_background {
            self.jobs.track(pid, &cmd.raw_text);
            return Ok(CommandStatus::Detached(pid));
        }
        self.executor.wait(pid)
    }

    pub fn reap_finished(&mut self) -> Vec<FinishedJob> {
        self.jobs.poll()
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    pub fn jobs(&self) -> &JobTable {
        &self.jobs
    }

    pub fn jobs_mut(&mut self) -> &mut JobTable {
        &mut self.jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse;
    use crate::process::EXEC_FAILURE_STATUS;
    use nix::sys::signal::{kill, Signal};
    use std::thread;
    use std::time::{Duration, Instant};

    fn dispatch_line(
        dispatcher: &mut Dispatcher,
        state: &mut ShellState,
        line: &str,
    ) -> CommandStatus {
        let cmd = parse(line).expect("test line should parse");
        dispatcher.dispatch(state, &cmd).expect("dispatch succeeds")
    }

    #[test]
    fn test_builtin_runs_in_process() {
        let mut dispatcher = Dispatcher::new(Builtins::with_defaults());
        let mut state = ShellState::new();

        let status = dispatch_line(&mut dispatcher, &mut state, "exit");
        assert_eq!(status, CommandStatus::Builtin(0));
        assert!(state.should_exit());
        assert!(dispatcher.jobs().is_empty());
    }

    #[test]
    fn test_builtin_shadows_external() {
        let mut builtins = Builtins::new();
        builtins.register("true", |_: &mut ShellState, _: &ParsedCommand| 42);
        let mut dispatcher = Dispatcher::new(builtins);
        let mut state = ShellState::new();

        assert_eq!(
            dispatch_line(&mut dispatcher, &mut state, "true"),
            CommandStatus::Builtin(42)
        );
    }

    #[test]
    fn test_external_exit_status_is_surfaced() {
        let mut dispatcher = Dispatcher::new(Builtins::with_defaults());
        let mut state = ShellState::new();

        assert_eq!(
            dispatch_line(&mut dispatcher, &mut state, "false"),
            CommandStatus::Exited(1)
        );
        assert!(!state.should_exit());
    }

    #[test]
    fn test_unknown_command_does_not_affect_shell() {
        let mut dispatcher = Dispatcher::new(Builtins::with_defaults());
        let mut state = ShellState::new();

        let status = dispatch_line(&mut dispatcher, &mut state, "nosuchcmd123");
        assert_eq!(status, CommandStatus::Exited(EXEC_FAILURE_STATUS));
        assert!(!state.should_exit());

        // still usable afterwards
        assert_eq!(
            dispatch_line(&mut dispatcher, &mut state, "true"),
            CommandStatus::Exited(0)
        );
    }

    #[test]
    fn test_foreground_waits_for_child() {
        let mut dispatcher = Dispatcher::new(Builtins::with_defaults());
        let mut state = ShellState::new();

        let start = Instant::now();
        let status = dispatch_line(&mut dispatcher, &mut state, "sleep 0.3");
        assert_eq!(status, CommandStatus::Exited(0));
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[test]
    fn test_background_returns_immediately() {
        let mut dispatcher = Dispatcher::new(Builtins::with_defaults());
        let mut state = ShellState::new();

        let start = Instant::now();
        let status = dispatch_line(&mut dispatcher, &mut state, "sleep 5 &");
        assert!(start.elapsed() < Duration::from_secs(2));

        let pid = match status {
            CommandStatus::Detached(pid) => pid,
            other => panic!("expected detached launch, got {:?}", other),
        };
        assert_eq!(dispatcher.jobs().len(), 1);
        assert_eq!(dispatcher.jobs().jobs()[0].pid, pid);
        assert!(dispatcher.reap_finished().is_empty());

        kill(pid, Signal::SIGKILL).expect("kill succeeds");
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut finished = Vec::new();
        while finished.is_empty() && Instant::now() < deadline {
            finished = dispatcher.reap_finished();
            thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].job.command, "sleep 5 ");
        assert!(dispatcher.jobs().is_empty());
    }
}
