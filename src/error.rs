//! Parse failure types.
//!
//!     Failures are data, not faults: the facade returns them, it never
//!     panics. There are exactly two recoverable kinds. Anything that is
//!     merely malformed markdown is not an error at all; the tokenizer is a
//!     recovering parser and always produces a tree.

use std::fmt;

/// The two recoverable parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The content length exceeded the configured `max_input_size`.
    InputTooLarge,
    /// The tokenizer reported a non-success status.
    TokenizeFailure,
}

/// A parse failure.
///
/// `line` and `column` are part of the contract but currently always `None`:
/// the tokenizer integration point does not surface positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl ParseError {
    pub fn input_too_large() -> Self {
        Self {
            kind: ParseErrorKind::InputTooLarge,
            line: None,
            column: None,
        }
    }

    pub fn tokenize_failure() -> Self {
        Self {
            kind: ParseErrorKind::TokenizeFailure,
            line: None,
            column: None,
        }
    }

    /// The fixed, host-visible message for this failure kind.
    pub fn message(&self) -> &'static str {
        match self.kind {
            ParseErrorKind::InputTooLarge => "Input exceeds maximum size limit",
            ParseErrorKind::TokenizeFailure => "Failed to parse markdown",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ParseError {}
