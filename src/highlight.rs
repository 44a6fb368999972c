use std::io::{self, IsTerminal};

use inksac::prelude::*;

/// Colours messages the shell itself prints to stderr. Plain text when stderr
/// is not a terminal or the terminal has no colour support.
#[derive(Debug, Clone, Copy)]
pub struct Highlighter {
    color_support: ColorSupport,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self::for_terminal(io::stderr().is_terminal())
    }

    pub fn for_terminal(is_terminal: bool) -> Self {
        if !is_terminal {
            return Self::plain();
        }
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    pub fn plain() -> Self {
        Self {
            color_support: ColorSupport::NoColor,
        }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if matches!(self.color_support, ColorSupport::NoColor) {
            return text.to_string();
        }
        text.style(style).to_string()
    }

    pub fn error(&self, message: &str) -> String {
        let style = Style::builder().foreground(Color::Red).bold().build();
        self.paint(message, style)
    }

    pub fn success(&self, message: &str) -> String {
        let style = Style::builder().foreground(Color::Green).build();
        self.paint(message, style)
    }

    pub fn warning(&self, message: &str) -> String {
        let style = Style::builder().foreground(Color::Yellow).build();
        self.paint(message, style)
    }
}
