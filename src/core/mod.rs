pub mod commands;
pub mod parser;
pub mod prompt;
pub mod state;

pub use commands::{Builtin, Builtins};
pub use parser::{parse, ParseError, ParsedCommand};
pub use state::ShellState;
