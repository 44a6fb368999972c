use super::Builtin;
use crate::core::parser::ParsedCommand;
use crate::core::state::ShellState;

/// `exit [code]`
#[derive(Clone)]
pub struct ExitCommand;

impl Default for ExitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Builtin for ExitCommand {
    fn execute(&self, state: &mut ShellState, cmd: &ParsedCommand) -> i32 {
        match cmd.args().first() {
            None => {
                state.request_exit();
                0
            }
            Some(arg) => match arg.parse::<i32>() {
                Ok(code) => {
                    state.request_exit_with(code);
                    code
                }
                Err(_) => {
                    eprintln!("exit: {}: numeric argument required", arg);
                    2
                }
            },
        }
    }
}
