//! Error types for conform-core

/// Result type for conform-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a run before any file is touched.
///
/// Everything past request decoding is folded into result data: per-file
/// check failures become issues, per-file fix failures become structured
/// result errors. Only a malformed request is a hard error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request text did not decode
    #[error(transparent)]
    Codec(#[from] conform_codec::Error),

    /// Request decoded but does not have the shape of a run request
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl Error {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}
