//! Evaluation errors
//!
//! An [`EvalError`] never escapes the evaluator: it is raised by an operator
//! or a builtin and turned into an Error value carrying its display text.

use classad_diagnostics::ClassAdError;
use thiserror::Error;

/// Result type for operators and builtins
pub type EvalResult<T> = Result<T, EvalError>;

/// Failures raised while applying an operator or a builtin function
#[derive(Debug, Error, Clone)]
pub enum EvalError {
    /// Operand kinds the operation is not defined on
    #[error("{message}")]
    TypeMismatch { message: String },

    /// Integer division or modulo by zero
    #[error("division by zero")]
    DivisionByZero,

    /// A builtin received an argument it cannot use
    #[error("{function}: {message}")]
    InvalidArgument { function: String, message: String },

    #[error("wrong number of args to {function}")]
    Arity { function: String },

    /// Pattern rejected by the regex engine
    #[error("{function}: bad pattern '{pattern}': {message}")]
    InvalidRegex {
        function: String,
        pattern: String,
        message: String,
    },

    /// A value used in the wrong context
    #[error("{}", .0.message())]
    Conversion(#[from] ClassAdError),
}

impl EvalError {
    /// Create a type mismatch error
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn arity(function: impl Into<String>) -> Self {
        Self::Arity {
            function: function.into(),
        }
    }

    /// Create a bad pattern error
    pub fn invalid_regex(
        function: impl Into<String>,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidRegex {
            function: function.into(),
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}
