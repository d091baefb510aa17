//! ClassAd value model
//!
//! This crate defines the constant values of the ClassAd language and the
//! text codecs shared by the printer and the parser:
//! - [`Value`]: Undefined, Error, Boolean, Integer, Real, String, absolute
//!   time and relative time
//! - Real numbers in canonical scientific notation ([`format_real`],
//!   [`parse_real`])
//! - Quoted strings with backslash escapes ([`escape_string`],
//!   [`unquote_string`])
//! - Timestamps and intervals ([`AbsTime`], [`RelTime`])
//!
//! Lists and records are not constants; they live in the expression tree.

mod escape;
mod real;
mod time;
mod value;

pub use escape::{escape_string, unquote_string, write_escaped};
pub use real::{format_real, parse_real};
pub use time::{AbsTime, RelTime};
pub use value::{Value, ValueKind};
