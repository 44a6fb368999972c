mod editor;
mod stream;

pub use editor::EditorReader;
pub use stream::StreamReader;

use crate::error::ShellError;

/// Source of command lines for the read loop.
pub trait LineReader {
    /// Shows `prompt` and blocks for one line, without its line terminator.
    /// `Ok(None)` means the input is closed.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError>;
}
