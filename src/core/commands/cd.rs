use std::env;
use std::path::PathBuf;

use tracing::debug;

use super::Builtin;
use crate::core::parser::ParsedCommand;
use crate::core::state::ShellState;

/// `cd [dir]`, defaulting to the home directory.
#[derive(Clone)]
pub struct CdCommand;

impl Default for CdCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CdCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Builtin for CdCommand {
    fn execute(&self, _state: &mut ShellState, cmd: &ParsedCommand) -> i32 {
        let target = match cmd.args().first() {
            Some(path) => PathBuf::from(path),
            None => match dirs::home_dir() {
                Some(home) => home,
                None => {
                    eprintln!("cd: home directory not found");
                    return 1;
                }
            },
        };

        match env::set_current_dir(&target) {
            Ok(()) => {
                debug!("changed directory to {}", target.display());
                0
            }
            Err(e) => {
                eprintln!("cd: {}: {}", target.display(), e);
                1
            }
        }
    }
}
