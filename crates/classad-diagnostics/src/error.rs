//! ClassAd error types

use crate::ErrorCode;
use thiserror::Error;

/// Typed failure shared by the value model, the parser and the transport layer
///
/// None of these is a language-level result. The evaluator turns any of them
/// into an Error value carrying the display text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassAdError {
    /// Text that could not be decoded (literals, escapes, times, syntax)
    #[error("{code}: {message}")]
    Parse {
        code: ErrorCode,
        message: String,
        input: String,
    },

    /// A value used in a context that requires another kind
    #[error("{code}: {message}")]
    Conversion { code: ErrorCode, message: String },

    /// A record that cannot be written to, or read from, the legacy layout
    #[error("{code}: {message}")]
    Transport { code: ErrorCode, message: String },
}

impl ClassAdError {
    /// Create a parse error
    pub fn parse(code: ErrorCode, message: impl Into<String>, input: impl Into<String>) -> Self {
        Self::Parse {
            code,
            message: message.into(),
            input: input.into(),
        }
    }

    /// Create a conversion error
    pub fn conversion(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Conversion {
            code,
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Transport {
            code,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Parse { code, .. } => *code,
            Self::Conversion { code, .. } => *code,
            Self::Transport { code, .. } => *code,
        }
    }

    /// The message without the code prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Parse { message, .. } => message,
            Self::Conversion { message, .. } => message,
            Self::Transport { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CAD0001, CAD0100, CAD0200};

    #[test]
    fn test_parse_error_display() {
        let err = ClassAdError::parse(CAD0001, "ill-formed real \"1.2.3\"", "1.2.3");

        assert_eq!(err.to_string(), "CAD0001: ill-formed real \"1.2.3\"");
        assert_eq!(err.code(), CAD0001);
        assert!(matches!(err, ClassAdError::Parse { ref input, .. } if input == "1.2.3"));
    }

    #[test]
    fn test_message_strips_code() {
        let err = ClassAdError::conversion(CAD0100, "string \"x\" in integer context");
        assert_eq!(err.message(), "string \"x\" in integer context");

        let err = ClassAdError::transport(CAD0200, "no MyType attribute");
        assert!(err.code().is_transport_error());
    }
}
