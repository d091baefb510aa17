//! Stream failures
//!
//! Running out of input at a packet boundary is not a failure: readers
//! report it as the end of the stream. The variants here are the cases a
//! caller has to act on.

use classad_diagnostics::ClassAdError;
use std::io;
use thiserror::Error;

/// Result type for Cedar stream operations
pub type CedarResult<T> = Result<T, CedarError>;

#[derive(Debug, Error)]
pub enum CedarError {
    /// The underlying channel failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A typed value was cut off by the end of its message
    #[error("end of message while reading {what}")]
    UnexpectedEnd { what: &'static str },

    /// Bytes that are not valid modified UTF-8
    #[error("bad string encoding: {message}")]
    BadEncoding { message: String },

    /// A packet header declaring more payload than the reader accepts
    #[error("packet of {len} bytes exceeds the limit of {max}")]
    PacketTooLarge { len: usize, max: usize },

    /// A record that cannot be written or read in the legacy layout
    #[error(transparent)]
    Record(#[from] ClassAdError),
}

impl CedarError {
    pub fn unexpected_end(what: &'static str) -> Self {
        Self::UnexpectedEnd { what }
    }

    /// Create a bad encoding error
    pub fn bad_encoding(message: impl Into<String>) -> Self {
        Self::BadEncoding {
            message: message.into(),
        }
    }

    /// Whether this is the end of a message rather than a broken stream
    pub fn is_end_of_message(&self) -> bool {
        matches!(self, Self::UnexpectedEnd { .. })
    }
}

impl From<CedarError> for io::Error {
    fn from(err: CedarError) -> Self {
        match err {
            CedarError::Io(e) => e,
            CedarError::UnexpectedEnd { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
