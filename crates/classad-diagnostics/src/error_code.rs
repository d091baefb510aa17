//! ClassAd error codes following a structured numbering system
//!
//! Error code ranges:
//! - CAD0001-CAD0099: Text errors (literal decoding, canonical syntax)
//! - CAD0100-CAD0199: Conversion errors (a value used in the wrong context)
//! - CAD0200-CAD0299: Transport errors (legacy record layout, wire framing)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a text error (0001-0099)
    pub const fn is_text_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a conversion error (0100-0199)
    pub const fn is_conversion_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a transport error (0200-0299)
    pub const fn is_transport_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CAD{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Text errors (0001-0099)
    map.insert(1, ErrorInfo::new("Invalid real literal"));
    map.insert(
        2,
        ErrorInfo::new("Invalid string escape sequence")
            .with_help("Escapes are \\n \\t \\b \\r \\f \\\\ \\' \\\" or up to three octal digits"),
    );
    map.insert(3, ErrorInfo::new("Invalid relative time"));
    map.insert(4, ErrorInfo::new("Invalid absolute time"));
    map.insert(5, ErrorInfo::new("Invalid attribute name"));
    map.insert(6, ErrorInfo::new("Unexpected token"));
    map.insert(7, ErrorInfo::new("Unexpected end of input"));
    map.insert(
        8,
        ErrorInfo::new("Reserved attribute name")
            .with_help("The name \"parent\" navigates scopes and cannot be defined"),
    );
    map.insert(9, ErrorInfo::new("Invalid integer literal"));

    // Conversion errors (0100-0199)
    map.insert(100, ErrorInfo::new("Value used in the wrong context"));
    map.insert(101, ErrorInfo::new("Values of these types cannot be compared"));

    // Transport errors (0200-0299)
    map.insert(200, ErrorInfo::new("Missing MyType attribute"));
    map.insert(201, ErrorInfo::new("MyType attribute is not a string"));
    map.insert(202, ErrorInfo::new("Missing TargetType attribute"));
    map.insert(203, ErrorInfo::new("TargetType attribute is not a string"));
    map.insert(204, ErrorInfo::new("Malformed legacy record"));

    map
});

// Text errors
pub const CAD0001: ErrorCode = ErrorCode::new(1);
pub const CAD0002: ErrorCode = ErrorCode::new(2);
pub const CAD0003: ErrorCode = ErrorCode::new(3);
pub const CAD0004: ErrorCode = ErrorCode::new(4);
pub const CAD0005: ErrorCode = ErrorCode::new(5);
pub const CAD0006: ErrorCode = ErrorCode::new(6);
pub const CAD0007: ErrorCode = ErrorCode::new(7);
pub const CAD0008: ErrorCode = ErrorCode::new(8);
pub const CAD0009: ErrorCode = ErrorCode::new(9);

// Conversion errors
pub const CAD0100: ErrorCode = ErrorCode::new(100);
pub const CAD0101: ErrorCode = ErrorCode::new(101);

// Transport errors
pub const CAD0200: ErrorCode = ErrorCode::new(200);
pub const CAD0201: ErrorCode = ErrorCode::new(201);
pub const CAD0202: ErrorCode = ErrorCode::new(202);
pub const CAD0203: ErrorCode = ErrorCode::new(203);
pub const CAD0204: ErrorCode = ErrorCode::new(204);
