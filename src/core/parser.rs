use std::fmt;

const BACKGROUND_MARKER: char = '&';

/// One tokenized input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// The input line with the background marker removed.
    pub raw_text: String,
    pub name: String,
    /// argv-style: `name` is at index 0.
    pub arguments: Vec<String>,
    pub argument_count: usize,
    pub is_background: bool,
}

impl ParsedCommand {
    /// Arguments after the command name.
    pub fn args(&self) -> &[String] {
        &self.arguments[1..]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty command"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Splits `line` on whitespace. A single trailing `&` (ignoring trailing
/// whitespace) marks the command as background and is dropped; any other
/// `&` is an ordinary character.
pub fn parse(line: &str) -> Result<ParsedCommand, ParseError> {
    let (raw_text, is_background) = match line.trim_end().strip_suffix(BACKGROUND_MARKER) {
        Some(rest) => (rest, true),
        None => (line, false),
    };

    let arguments: Vec<String> = raw_text.split_whitespace().map(String::from).collect();
    let name = arguments.first().cloned().ok_or(ParseError::Empty)?;

    Ok(ParsedCommand {
        raw_text: raw_text.to_string(),
        name,
        argument_count: arguments.len(),
        arguments,
        is_background,
    })
}
