//! Error types for conform-codec

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while decoding input text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unexpected character {ch:?} at byte {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unterminated string starting at byte {offset}")]
    UnterminatedString { offset: usize },

    #[error("unsupported escape sequence '\\{ch}' at byte {offset}")]
    UnsupportedEscape { ch: char, offset: usize },

    #[error("invalid number at byte {offset}: {message}")]
    InvalidNumber { offset: usize, message: String },

    #[error("unexpected {found} at byte {offset}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        offset: usize,
    },

    #[error("trailing data after the top-level value at byte {offset}")]
    TrailingData { offset: usize },

    #[error("nesting deeper than {limit} levels at byte {offset}")]
    TooDeep { limit: usize, offset: usize },

    #[error("unexpected end of input")]
    UnexpectedEnd,
}
