use std::io::{self, IsTerminal, Stdout, Write};

use tracing::{debug, warn};

mod executor;

pub use executor::Dispatcher;

use crate::{
    core::{parse, prompt, Builtins, ParseError, ShellState},
    error::ShellError,
    flags::Flags,
    highlight::Highlighter,
    input::{EditorReader, LineReader, StreamReader},
    process::{signal, CommandStatus},
};

/// The read-parse-dispatch loop.
pub struct Shell<W: Write = Stdout> {
    reader: Box<dyn LineReader>,
    out: W,
    state: ShellState,
    dispatcher: Dispatcher,
    highlighter: Highlighter,
    flags: Flags,
}

impl Shell<Stdout> {
    /// Uses the line editor when stdin is a terminal and a plain stream
    /// reader otherwise.
    pub fn new(flags: Flags) -> Result<Self, ShellError> {
        let reader: Box<dyn LineReader> = if io::stdin().is_terminal() {
            Box::new(EditorReader::new()?)
        } else {
            Box::new(StreamReader::stdin())
        };
        Ok(Self::with_io(flags, reader, io::stdout()))
    }
}

impl<W: Write> Shell<W> {
    pub fn with_io(flags: Flags, reader: Box<dyn LineReader>, out: W) -> Self {
        Shell {
            reader,
            out,
            state: ShellState::new(),
            dispatcher: Dispatcher::new(Builtins::with_defaults()),
            highlighter: Highlighter::new(),
            flags,
        }
    }

    pub fn with_builtins(mut self, builtins: Builtins) -> Self {
        self.dispatcher = Dispatcher::new(builtins);
        self
    }

    /// Process-wide handlers; call once, from the real shell only.
    pub fn install_signal_handlers(&mut self) -> Result<(), ShellError> {
        signal::setup_interrupt_handler()?;
        self.dispatcher.jobs_mut().watch_sigchld()?;
        Ok(())
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn request_exit(&mut self) {
        self.state.request_exit();
    }

    pub fn build_prompt(&self) -> String {
        prompt::build_prompt()
    }

    pub fn run(&mut self) -> Result<i32, ShellError> {
        while !self.state.should_exit() {
            self.step()?;
        }
        debug!("leaving read loop with code {}", self.state.exit_code());
        Ok(self.state.exit_code())
    }

    /// One iteration: reap, prompt, read, dispatch.
    pub fn step(&mut self) -> Result<(), ShellError> {
        self.report_finished_jobs();

        let prompt = self.build_prompt();
        let line = match self.reader.read_line(&prompt) {
            Ok(Some(line)) => line,
            Ok(None) => {
                writeln!(self.out, "exit")?;
                self.out.flush()?;
                if self.dispatcher.builtins().is_builtin("exit") {
                    self.execute_line("exit");
                }
                // closed input ends the loop even if "exit" was rebound
                self.state.request_exit();
                return Ok(());
            }
            Err(e) => {
                warn!("read failed: {}", e);
                eprintln!("{}", self.highlighter.error(&e.to_string()));
                self.state.request_exit();
                return Ok(());
            }
        };

        if line.is_empty() {
            return Ok(());
        }

        self.execute_line(&line);
        Ok(())
    }

    /// Parses and dispatches one line. Launch failures are reported here and
    /// never end the loop.
    pub fn execute_line(&mut self, line: &str) -> Option<CommandStatus> {
        let cmd = match parse(line) {
            Ok(cmd) => cmd,
            Err(ParseError::Empty) => return None,
        };

        match self.dispatcher.dispatch(&mut self.state, &cmd) {
            Ok(status) => {
                debug!("{} -> {:?}", cmd.name, status);
                self.state.record(status);
                Some(status)
            }
            Err(e) => {
                warn!("failed to launch {}: {}", cmd.name, e);
                eprintln!("{}", self.highlighter.error(&format!("{}: {}", cmd.name, e)));
                None
            }
        }
    }

    /// Runs a single line outside the loop and returns its status code.
    /// A launch failure counts as 1, a blank line as 0.
    pub fn run_command(&mut self, line: &str) -> i32 {
        if line.trim().is_empty() {
            return 0;
        }
        self.execute_line(line).map_or(1, |status| status.code())
    }

    fn report_finished_jobs(&mut self) {
        for finished in self.dispatcher.reap_finished() {
            if self.flags.is_set("quiet") {
                continue;
            }
            let notice = finished.to_string();
            if finished.status.success() {
                eprintln!("{}", self.highlighter.success(&notice));
            } else {
                eprintln!("{}", self.highlighter.warning(&notice));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ParsedCommand;
    use std::cell::Cell;
    use std::io::Cursor;
    use std::rc::Rc;

    fn shell_with_input(input: &str) -> Shell<Vec<u8>> {
        let reader = StreamReader::new(Cursor::new(input.to_string()), io::sink());
        Shell::with_io(Flags::default(), Box::new(reader), Vec::new())
    }

    fn output(shell: &Shell<Vec<u8>>) -> String {
        String::from_utf8_lossy(shell.output()).into_owned()
    }

    #[test]
    fn test_eof_exits_and_echoes() {
        let mut shell = shell_with_input("");

        assert_eq!(shell.run().unwrap(), 0);
        assert!(shell.state().should_exit());
        assert_eq!(output(&shell), "exit\n");
    }

    #[test]
    fn test_empty_line_is_skipped() {
        let mut shell = shell_with_input("\n");

        shell.step().unwrap();
        assert!(!shell.state().should_exit());
        assert_eq!(shell.state().last_status(), None);
        assert_eq!(output(&shell), "");
    }

    #[test]
    fn test_whitespace_line_is_a_noop() {
        let mut shell = shell_with_input("   \t\n  &\n");

        shell.step().unwrap();
        shell.step().unwrap();
        assert!(!shell.state().should_exit());
        assert_eq!(shell.state().last_status(), None);
    }

    #[test]
    fn test_typed_exit_stops_loop() {
        let mut shell = shell_with_input("exit\nfalse\n");

        assert_eq!(shell.run().unwrap(), 0);
        assert_eq!(shell.state().last_status(), Some(CommandStatus::Builtin(0)));
        assert_eq!(output(&shell), "");
    }

    #[test]
    fn test_exit_code_is_returned() {
        let mut shell = shell_with_input("exit 3\n");
        assert_eq!(shell.run().unwrap(), 3);
    }

    #[test]
    fn test_external_status_is_recorded() {
        let mut shell = shell_with_input("false\n");

        shell.step().unwrap();
        assert_eq!(shell.state().last_status(), Some(CommandStatus::Exited(1)));
        assert!(!shell.state().should_exit());
    }

    #[test]
    fn test_unknown_command_keeps_shell_running() {
        let mut shell = shell_with_input("nosuchcmd123\ntrue\n");

        shell.step().unwrap();
        assert_eq!(shell.state().last_status(), Some(CommandStatus::Exited(127)));
        assert!(!shell.state().should_exit());

        assert_eq!(shell.run().unwrap(), 0);
        assert_eq!(output(&shell), "exit\n");
    }

    #[test]
    fn test_only_nonempty_lines_are_dispatched() {
        let calls = Rc::new(Cell::new(0));
        let mut builtins = Builtins::with_defaults();
        let counter = Rc::clone(&calls);
        builtins.register("tick", move |_: &mut ShellState, _: &ParsedCommand| {
            counter.set(counter.get() + 1);
            0
        });

        let mut shell = shell_with_input("tick\n\n  \ntick a b &\n").with_builtins(builtins);
        assert_eq!(shell.run().unwrap(), 0);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_eof_exits_without_exit_builtin() {
        let mut shell = shell_with_input("").with_builtins(Builtins::new());

        assert_eq!(shell.run().unwrap(), 0);
        assert!(shell.state().should_exit());
        assert_eq!(output(&shell), "exit\n");
    }

    #[test]
    fn test_builtin_can_request_exit_mid_iteration() {
        let mut builtins = Builtins::new();
        builtins.register("bye", |state: &mut ShellState, _: &ParsedCommand| {
            state.request_exit_with(5);
            5
        });

        let mut shell = shell_with_input("bye\ntrue\n").with_builtins(builtins);
        assert_eq!(shell.run().unwrap(), 5);
        assert_eq!(shell.state().last_status(), Some(CommandStatus::Builtin(5)));
    }

    #[test]
    fn test_run_command_codes() {
        let mut shell = shell_with_input("");
        assert_eq!(shell.run_command("false"), 1);
        assert_eq!(shell.run_command("   "), 0);
        assert_eq!(shell.run_command("nosuchcmd123"), 127);
        assert_eq!(shell.run_command("exit 4"), 4);
        assert!(shell.state().should_exit());
    }

    #[test]
    fn test_request_exit() {
        let mut shell = shell_with_input("true\n");
        shell.request_exit();
        assert_eq!(shell.run().unwrap(), 0);
        assert_eq!(shell.state().last_status(), None);
    }
}
