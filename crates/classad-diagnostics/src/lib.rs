//! ClassAd diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the ClassAd
//! crates: structured error codes and the typed failure returned by text
//! decoding, value conversion and record transport.

mod error;
mod error_code;

pub use error::*;
pub use error_code::*;

/// Result type for ClassAd operations that can fail outside the language
pub type Result<T> = std::result::Result<T, ClassAdError>;
