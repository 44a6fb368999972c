use std::io::{self, BufRead, StdinLock, Stdout, Write};

use super::LineReader;
use crate::error::ShellError;

/// Reads newline-delimited commands from any buffered stream, writing the
/// prompt to `prompt_out`. Used when stdin is not a terminal.
pub struct StreamReader<R, P> {
    input: R,
    prompt_out: P,
}

impl StreamReader<StdinLock<'static>, Stdout> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, P: Write> StreamReader<R, P> {
    pub fn new(input: R, prompt_out: P) -> Self {
        Self { input, prompt_out }
    }

    pub fn prompt_output(&self) -> &P {
        &self.prompt_out
    }
}

impl<R: BufRead, P: Write> LineReader for StreamReader<R, P> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        self.prompt_out.write_all(prompt.as_bytes())?;
        self.prompt_out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}
