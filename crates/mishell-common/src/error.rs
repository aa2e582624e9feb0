//! Non-fatal, tagged control-flow outcomes. These are not `anyhow::Error`:
//! they're expected results the top loop and evaluator match on, not
//! failures propagated with `?` and `.context(...)`.

use std::fmt;

/// What `read_line` returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The user accepted a line by pressing Enter.
    Line(String),
    /// ^C: discard the partial line, reprompt.
    EndOfText,
    /// ^D: exit the shell with status 0.
    EndOfTransmission,
}

/// Parser failure. Aborts the current line only; the shell continues
/// after printing the message to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// A pipeline stage has no leading word.
    ExpectedCommand,
    /// A `>`/`>>` was not followed by a word.
    ExpectedTarget,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::ExpectedCommand => write!(f, "syntax error: expected command"),
            ParseError::ExpectedTarget => write!(f, "syntax error: expected redirect target"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Evaluator-level, non-fatal failures. Printed as a diagnostic; the
/// containing line is abandoned, the shell continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// `resolve(name)` found neither a built-in nor an executable.
    CommandNotFound(String),
    /// A redirect named an fd other than 0, 1, or 2.
    UnsupportedRedirect(u8),
    /// Opening or seeking the redirect target failed.
    RedirectIo { path: String, reason: String },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::CommandNotFound(name) => write!(f, "{name}: command not found"),
            EvalError::UnsupportedRedirect(fd) => write!(f, "unsupported redirect fd {fd}"),
            EvalError::RedirectIo { path, reason } => write!(f, "{path}: {reason}"),
        }
    }
}

impl std::error::Error for EvalError {}
