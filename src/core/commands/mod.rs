use std::collections::BTreeMap;

mod cd;
mod exit;

pub use cd::CdCommand;
pub use exit::ExitCommand;

use crate::core::parser::ParsedCommand;
use crate::core::state::ShellState;

/// A command that runs inside the shell process.
pub trait Builtin {
    fn execute(&self, state: &mut ShellState, cmd: &ParsedCommand) -> i32;
}

impl<F> Builtin for F
where
    F: Fn(&mut ShellState, &ParsedCommand) -> i32,
{
    fn execute(&self, state: &mut ShellState, cmd: &ParsedCommand) -> i32 {
        self(state, cmd)
    }
}

/// Built-in handlers keyed by command name.
#[derive(Default)]
pub struct Builtins {
    commands: BTreeMap<String, Box<dyn Builtin>>,
}

impl Builtins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut builtins = Self::new();
        builtins.register("exit", ExitCommand::new());
        builtins.register("cd", CdCommand::new());
        builtins
    }

    /// Replaces any handler already registered under `name`.
    pub fn register(&mut self, name: impl Into<String>, handler: impl Builtin + 'static) {
        self.commands.insert(name.into(), Box::new(handler));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Builtin> {
        self.commands.get(name).map(|handler| &**handler)
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }
}
