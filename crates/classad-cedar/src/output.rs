//! The writing end of a Cedar stream

use crate::HEADER_LEN;
use crate::error::CedarResult;
use crate::utf;
use std::io::{self, Write};

/// Payload bytes per packet unless configured otherwise
pub const DEFAULT_PACKET_SIZE: usize = 8192;

/// Writes messages as Cedar packets to an inner sink
///
/// Bytes are buffered until a packet is full, [`flush`](Write::flush) is
/// called, or the message ends.
pub struct CedarWriter<W: Write> {
    inner: W,
    buffer: Vec<u8>,
    packet_size: usize,
    /// Flag and length of the packet emitted last
    last_packet: Option<(bool, usize)>,
    byte_count: u64,
}

impl<W: Write> CedarWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_packet_size(inner, DEFAULT_PACKET_SIZE)
    }

    /// A writer whose packets carry at most `packet_size` payload bytes
    ///
    /// A size of zero is taken as one.
    pub fn with_packet_size(inner: W, packet_size: usize) -> Self {
        let packet_size = packet_size.max(1);
        Self {
            inner,
            buffer: Vec::with_capacity(packet_size),
            packet_size,
            last_packet: None,
            byte_count: 0,
        }
    }

    pub fn packet_size(&self) -> usize {
        self.packet_size
    }

    /// Bytes handed to the inner sink so far, headers included
    pub fn byte_count(&self) -> u64 {
        self.byte_count
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// End the current message
    ///
    /// Always emits a final packet, holding whatever is buffered, unless
    /// nothing is buffered and the previous packet was already an empty
    /// final one.
    pub fn end_of_message(&mut self) -> CedarResult<()> {
        if self.buffer.is_empty() && self.last_packet == Some((true, 0)) {
            log::debug!("end of message already marked");
            return Ok(());
        }
        self.emit(true)
    }

    /// End the stream and hand back the inner sink
    ///
    /// Buffered bytes go out in a final packet. Nothing is emitted when the
    /// buffer is empty and the last packet already ended a message.
    pub fn finish(mut self) -> CedarResult<W> {
        let ended = matches!(self.last_packet, Some((true, _)));
        if !ended || !self.buffer.is_empty() {
            self.emit(true)?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }

    /// Emit the buffer as one packet
    fn emit(&mut self, last: bool) -> CedarResult<()> {
        let len = self.buffer.len();
        let mut header = [0u8; HEADER_LEN];
        header[0] = u8::from(last);
        // The buffer never exceeds the packet size, which a u32 holds
        header[1..].copy_from_slice(&(len as u32).to_be_bytes());
        self.inner.write_all(&header)?;
        self.inner.write_all(&self.buffer)?;
        self.byte_count += (HEADER_LEN + len) as u64;
        self.buffer.clear();
        self.last_packet = Some((last, len));
        log::debug!("emitted {} packet of {len} bytes", if last { "final" } else { "partial" });
        Ok(())
    }

    fn put(&mut self, mut bytes: &[u8]) -> CedarResult<()> {
        while !bytes.is_empty() {
            if self.buffer.len() == self.packet_size {
                self.emit(false)?;
            }
            let room = self.packet_size - self.buffer.len();
            let (now, rest) = bytes.split_at(room.min(bytes.len()));
            self.buffer.extend_from_slice(now);
            bytes = rest;
        }
        Ok(())
    }

    // === Typed scalars ===

    /// `true` or `false` as 1 or 0 in an 8-byte slot
    pub fn write_bool(&mut self, v: bool) -> CedarResult<()> {
        self.write_long(i64::from(v))
    }

    /// A single raw byte
    pub fn write_byte(&mut self, v: u8) -> CedarResult<()> {
        self.put(&[v])
    }

    pub fn write_short(&mut self, v: i16) -> CedarResult<()> {
        self.write_long(i64::from(v))
    }

    /// A UTF-16 code unit, zero-extended
    pub fn write_char(&mut self, v: u16) -> CedarResult<()> {
        self.write_long(i64::from(v))
    }

    pub fn write_int(&mut self, v: i32) -> CedarResult<()> {
        self.write_long(i64::from(v))
    }

    pub fn write_long(&mut self, v: i64) -> CedarResult<()> {
        self.put(&v.to_be_bytes())
    }

    pub fn write_float(&mut self, v: f32) -> CedarResult<()> {
        self.put(&v.to_bits().to_be_bytes())
    }

    pub fn write_double(&mut self, v: f64) -> CedarResult<()> {
        self.put(&v.to_bits().to_be_bytes())
    }

    /// `s` in modified UTF-8 followed by a zero byte
    pub fn write_utf(&mut self, s: &str) -> CedarResult<()> {
        let mut encoded = Vec::with_capacity(s.len() + 1);
        utf::encode(s, &mut encoded);
        self.put(&encoded)
    }
}

impl<W: Write> Write for CedarWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.put(buf)?;
        Ok(buf.len())
    }

    /// Emit buffered bytes as a non-final packet, then flush the sink
    fn flush(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            self.emit(false)?;
        }
        self.inner.flush()
    }
}

impl<W: Write> std::fmt::Debug for CedarWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CedarWriter")
            .field("packet_size", &self.packet_size)
            .field("buffered", &self.buffer.len())
            .field("byte_count", &self.byte_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_small_message_is_one_final_packet() {
        let mut writer = CedarWriter::new(Vec::new());
        writer.write_all(b"abc").unwrap();
        writer.end_of_message().unwrap();
        assert_eq!(writer.byte_count(), 8);
        assert_eq!(writer.finish().unwrap(), [1, 0, 0, 0, 3, b'a', b'b', b'c']);
    }

    #[test]
    fn test_full_buffer_spills_into_partial_packets() {
        let mut writer = CedarWriter::with_packet_size(Vec::new(), 2);
        writer.write_all(b"abcde").unwrap();
        writer.end_of_message().unwrap();
        let bytes = writer.finish().unwrap();
        assert_eq!(
            bytes,
            [
                0, 0, 0, 0, 2, b'a', b'b', //
                0, 0, 0, 0, 2, b'c', b'd', //
                1, 0, 0, 0, 1, b'e',
            ]
        );
    }

    #[test]
    fn test_flush_skips_an_empty_buffer() {
        let mut writer = CedarWriter::new(Vec::new());
        writer.flush().unwrap();
        assert_eq!(writer.byte_count(), 0);
        writer.write_byte(9).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.get_ref().as_slice(), [0, 0, 0, 0, 1, 9]);
    }

    #[test]
    fn test_repeated_end_of_message_adds_one_empty_packet() {
        let mut writer = CedarWriter::new(Vec::new());
        writer.end_of_message().unwrap();
        writer.end_of_message().unwrap();
        assert_eq!(writer.finish().unwrap(), [1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_finish_ends_an_open_message() {
        let mut writer = CedarWriter::new(Vec::new());
        writer.write_byte(7).unwrap();
        assert_eq!(writer.finish().unwrap(), [1, 0, 0, 0, 1, 7]);

        let writer = CedarWriter::new(Vec::new());
        assert_eq!(writer.finish().unwrap(), [1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_integral_scalars_fill_eight_bytes() {
        let mut writer = CedarWriter::new(Vec::new());
        writer.write_int(-2).unwrap();
        writer.write_char(0xFFFF).unwrap();
        writer.write_bool(true).unwrap();
        let bytes = writer.finish().unwrap();
        assert_eq!(
            &bytes[HEADER_LEN..],
            [
                0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE, //
                0, 0, 0, 0, 0, 0, 0xFF, 0xFF, //
                0, 0, 0, 0, 0, 0, 0, 1,
            ]
        );
    }

    #[test]
    fn test_float_is_four_bytes() {
        let mut writer = CedarWriter::new(Vec::new());
        writer.write_float(1.0).unwrap();
        let bytes = writer.finish().unwrap();
        assert_eq!(&bytes[HEADER_LEN..], [0x3F, 0x80, 0, 0]);
    }
}
