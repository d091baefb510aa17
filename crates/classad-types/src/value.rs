//! ClassAd constant values

use crate::escape::write_escaped;
use crate::real::format_real;
use crate::time::{AbsTime, RelTime};
use classad_diagnostics::{CAD0100, CAD0101, ClassAdError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A self-evaluating constant
///
/// Undefined and Error carry a diagnostic that is not part of their printed
/// form. Strings, reasons and times are cheap to clone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// No value; the reason is kept for diagnostics
    Undefined(Arc<str>),
    /// A type mismatch or other invalid operation
    Error(Arc<str>),
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(Arc<str>),
    AbsTime(AbsTime),
    RelTime(RelTime),
}

/// The runtime kind of a [`Value`], without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Undefined,
    Error,
    Boolean,
    Integer,
    Real,
    String,
    AbsTime,
    RelTime,
}

impl ValueKind {
    /// The name used in diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Error => "error",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::String => "string",
            Self::AbsTime => "timestamp",
            Self::RelTime => "time interval",
        }
    }

    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }

    pub const fn is_time(self) -> bool {
        matches!(self, Self::AbsTime | Self::RelTime)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    // === Constructors ===

    pub fn undefined(reason: impl Into<Arc<str>>) -> Self {
        Self::Undefined(reason.into())
    }

    pub fn error(reason: impl Into<Arc<str>>) -> Self {
        Self::Error(reason.into())
    }

    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Self::String(s.into())
    }

    pub const fn boolean(b: bool) -> Self {
        Self::Boolean(b)
    }

    pub const fn integer(i: i64) -> Self {
        Self::Integer(i)
    }

    pub const fn real(d: f64) -> Self {
        Self::Real(d)
    }

    pub const fn abs_time(millis: i64, offset_secs: i32) -> Self {
        Self::AbsTime(AbsTime::new(millis, offset_secs))
    }

    pub const fn rel_time(millis: i64) -> Self {
        Self::RelTime(RelTime::new(millis))
    }

    // === Classification ===

    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Undefined(_) => ValueKind::Undefined,
            Self::Error(_) => ValueKind::Error,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Integer(_) => ValueKind::Integer,
            Self::Real(_) => ValueKind::Real,
            Self::String(_) => ValueKind::String,
            Self::AbsTime(_) => ValueKind::AbsTime,
            Self::RelTime(_) => ValueKind::RelTime,
        }
    }

    /// The type name used in diagnostics
    pub const fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined(_))
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// True only for the boolean `true`; never fails
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::Boolean(true))
    }

    pub const fn is_numeric(&self) -> bool {
        self.kind().is_numeric()
    }

    /// The diagnostic carried by Undefined or Error
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Undefined(r) | Self::Error(r) => Some(r),
            _ => None,
        }
    }

    // === Accessors ===

    fn wrong_context(&self, context: &str) -> ClassAdError {
        ClassAdError::conversion(
            CAD0100,
            format!("{} {} in {} context", self.type_name(), self, context),
        )
    }

    pub fn as_boolean(&self) -> Result<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            _ => Err(self.wrong_context("boolean")),
        }
    }

    pub fn as_integer(&self) -> Result<i64> {
        match self {
            Self::Integer(i) => Ok(*i),
            _ => Err(self.wrong_context("integer")),
        }
    }

    /// The value as a real; integers widen
    pub fn as_real(&self) -> Result<f64> {
        match self {
            Self::Real(d) => Ok(*d),
            Self::Integer(i) => Ok(*i as f64),
            _ => Err(self.wrong_context("real")),
        }
    }

    pub fn as_string(&self) -> Result<&str> {
        match self {
            Self::String(s) => Ok(s),
            _ => Err(self.wrong_context("string")),
        }
    }

    /// Milliseconds of an interval, or since the epoch for a timestamp
    pub fn millis(&self) -> Result<i64> {
        match self {
            Self::AbsTime(t) => Ok(t.millis),
            Self::RelTime(t) => Ok(t.millis),
            _ => Err(self.wrong_context("integer")),
        }
    }

    /// Zone offset of a timestamp, in seconds east of Greenwich
    pub fn zone(&self) -> Result<i32> {
        match self {
            Self::AbsTime(t) => Ok(t.offset_secs),
            _ => Err(ClassAdError::conversion(
                CAD0100,
                format!("zone({})", self.type_name()),
            )),
        }
    }

    // === Comparison ===

    /// Equality in the sense of the `==` operator
    ///
    /// Integers and reals compare numerically, strings ignore case, and
    /// times compare only with a time of the same kind. Every other pairing,
    /// including any Undefined or Error operand, cannot be compared.
    pub fn loosely_equals(&self, other: &Value) -> Result<bool> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Ok(a == b),
            (Self::Integer(_) | Self::Real(_), Self::Integer(_) | Self::Real(_)) => {
                Ok(self.as_real()? == other.as_real()?)
            }
            (Self::Boolean(a), Self::Boolean(b)) => Ok(a == b),
            (Self::String(a), Self::String(b)) => Ok(eq_ignore_case(a, b)),
            (Self::AbsTime(a), Self::AbsTime(b)) => Ok(a.millis == b.millis),
            (Self::RelTime(a), Self::RelTime(b)) => Ok(a.millis == b.millis),
            _ => Err(ClassAdError::conversion(
                CAD0101,
                format!(
                    "attempt to compare {} == {}",
                    self.type_name(),
                    other.type_name()
                ),
            )),
        }
    }

    /// Identity in the sense of the `is` operator
    ///
    /// Both values must have the same kind: `3 is 3.0` is false. Strings
    /// compare case-sensitively, reals by value (two NaNs are identical),
    /// timestamps by instant and zone. Any Undefined is identical to any
    /// other Undefined, and likewise for Error. Never fails.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined(_), Self::Undefined(_)) | (Self::Error(_), Self::Error(_)) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::AbsTime(a), Self::AbsTime(b)) => a == b,
            (Self::RelTime(a), Self::RelTime(b)) => a == b,
            _ => false,
        }
    }
}

/// Unicode-aware case-insensitive equality
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.is_identical(other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Self::Real(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<AbsTime> for Value {
    fn from(t: AbsTime) -> Self {
        Self::AbsTime(t)
    }
}

impl From<RelTime> for Value {
    fn from(t: RelTime) -> Self {
        Self::RelTime(t)
    }
}

impl fmt::Display for Value {
    /// The canonical text: `UNDEFINED`, `ERROR`, `true`, `42`,
    /// `2.500000000000000E+00`, `"text"`, `absTime("...")`, `relTime("...")`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined(_) => f.write_str("UNDEFINED"),
            Self::Error(_) => f.write_str("ERROR"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(d) => f.write_str(&format_real(*d)),
            Self::String(s) => write_escaped(f, s, '"'),
            Self::AbsTime(t) => write!(f, "absTime(\"{t}\")"),
            Self::RelTime(t) => write!(f, "relTime(\"{t}\")"),
        }
    }
}
