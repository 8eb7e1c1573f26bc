use std::fmt;

use crate::source::Position;

/// Structural parse failure with the position it was detected at.
///
/// These never abort a parse; the builder records them and returns the
/// best-effort partial tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub position: Position,
}

impl ParseError {
    pub fn at_line(message: String, line: usize) -> Self {
        Self {
            message,
            position: Position::new(line as u32, 0),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.position)
    }
}

impl std::error::Error for ParseError {}
