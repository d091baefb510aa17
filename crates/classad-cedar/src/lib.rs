//! Cedar packet streams
//!
//! Cedar frames a byte stream into messages. A message is one or more
//! packets, each a one-byte flag, a four-byte big-endian length and that
//! many payload bytes; a non-zero flag marks the last packet of a message.
//!
//! - [`CedarWriter`] buffers output into packets and marks message ends
//! - [`CedarReader`] reads back one message at a time, reporting the end of
//!   a message as the end of its byte stream
//! - [`legacy`] writes and reads records in the older attribute-list layout
//!   carried over Cedar
//!
//! Both ends also encode typed scalars the way the protocol expects:
//! integral values in 8-byte big-endian slots, IEEE floats and doubles, and
//! NUL-terminated modified UTF-8 strings.
//!
//! ```ignore
//! use classad_cedar::{CedarReader, CedarWriter};
//!
//! let mut writer = CedarWriter::new(Vec::new());
//! writer.write_int(7)?;
//! writer.write_utf("slot1")?;
//! writer.end_of_message()?;
//! let bytes = writer.finish()?;
//!
//! let mut reader = CedarReader::new(bytes.as_slice());
//! assert_eq!(reader.read_int()?, 7);
//! assert_eq!(reader.read_utf()?, "slot1");
//! ```

mod error;
mod input;
pub mod legacy;
mod output;
mod utf;

pub use error::{CedarError, CedarResult};
pub use input::{CedarReader, DEFAULT_MAX_PACKET_LEN};
pub use legacy::{LegacyAdReader, LegacyAdWriter, transmit};
pub use output::{CedarWriter, DEFAULT_PACKET_SIZE};

/// Bytes in a packet header: the flag and the length
pub const HEADER_LEN: usize = 5;
