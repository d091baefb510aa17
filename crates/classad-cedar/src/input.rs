//! The reading end of a Cedar stream
//!
//! The reader presents one message at a time as a byte stream: reads
//! return end-of-file at the end of the current message until
//! [`CedarReader::next_message`] moves on. Input that stops at a packet
//! boundary, or part-way through a packet, is the end of the stream and
//! not an error; only channel failures and oversized packet headers are.

use crate::HEADER_LEN;
use crate::error::{CedarError, CedarResult};
use crate::utf;
use std::io::{self, ErrorKind, Read};

/// Largest packet payload accepted unless configured otherwise (16 MiB)
pub const DEFAULT_MAX_PACKET_LEN: usize = 16 * 1024 * 1024;

/// Reads Cedar packets from an inner source
pub struct CedarReader<R: Read> {
    inner: R,
    /// Payload of the current packet
    buffer: Vec<u8>,
    pos: usize,
    /// The current packet is the last of its message
    final_packet: bool,
    max_packet_len: usize,
    byte_count: u64,
}

impl<R: Read> CedarReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_max_packet_len(inner, DEFAULT_MAX_PACKET_LEN)
    }

    /// A reader that rejects packets declaring more than `max` payload bytes
    pub fn with_max_packet_len(inner: R, max: usize) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            pos: 0,
            final_packet: false,
            max_packet_len: max,
            byte_count: 0,
        }
    }

    /// Bytes taken from the inner source so far, headers included
    pub fn byte_count(&self) -> u64 {
        self.byte_count
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Skip the rest of the current message and start the next one
    ///
    /// Returns `false` when there is no further message. The reader then
    /// behaves as if positioned in an empty message.
    pub fn next_message(&mut self) -> CedarResult<bool> {
        while !self.final_packet {
            if !self.fill_packet()? {
                break;
            }
        }
        if self.final_packet {
            self.final_packet = false;
            if self.fill_packet()? {
                log::debug!("started next message");
                return Ok(true);
            }
        }
        self.final_packet = true;
        self.buffer.clear();
        self.pos = 0;
        Ok(false)
    }

    /// Replace the current packet with the next one of this message
    ///
    /// Returns `false` at the end of the message or of the input.
    fn fill_packet(&mut self) -> CedarResult<bool> {
        self.buffer.clear();
        self.pos = 0;
        if self.final_packet {
            return Ok(false);
        }

        let mut header = [0u8; HEADER_LEN];
        match self.fill(&mut header)? {
            0 => return Ok(false),
            HEADER_LEN => {}
            n => {
                log::warn!("truncated packet header ({n} of {HEADER_LEN} bytes); treating as end of stream");
                return Ok(false);
            }
        }
        let len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]) as usize;
        if len > self.max_packet_len {
            return Err(CedarError::PacketTooLarge {
                len,
                max: self.max_packet_len,
            });
        }
        self.final_packet = header[0] != 0;

        self.buffer.resize(len, 0);
        let got = self.fill_buffer()?;
        if got < len {
            log::warn!("truncated packet body ({got} of {len} bytes); treating as end of stream");
            self.buffer.clear();
            return Ok(false);
        }
        log::debug!(
            "read {} packet of {len} bytes",
            if self.final_packet { "final" } else { "partial" }
        );
        Ok(true)
    }

    /// Read into `buf` until it is full or the source runs dry
    fn fill(&mut self, buf: &mut [u8]) -> CedarResult<usize> {
        let mut got = 0;
        while got < buf.len() {
            match self.inner.read(&mut buf[got..]) {
                Ok(0) => break,
                Ok(n) => got += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.byte_count += got as u64;
        Ok(got)
    }

    fn fill_buffer(&mut self) -> CedarResult<usize> {
        let mut buffer = std::mem::take(&mut self.buffer);
        let got = self.fill(&mut buffer);
        self.buffer = buffer;
        got
    }

    /// Make sure unread payload is available; `false` at end of message
    fn ensure_data(&mut self) -> CedarResult<bool> {
        while self.pos >= self.buffer.len() {
            if !self.fill_packet()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn next_byte(&mut self) -> CedarResult<Option<u8>> {
        if !self.ensure_data()? {
            return Ok(None);
        }
        let b = self.buffer[self.pos];
        self.pos += 1;
        Ok(Some(b))
    }

    fn read_array<const N: usize>(&mut self, what: &'static str) -> CedarResult<[u8; N]> {
        let mut out = [0u8; N];
        let mut got = 0;
        while got < N {
            if !self.ensure_data()? {
                return Err(CedarError::unexpected_end(what));
            }
            let n = (N - got).min(self.buffer.len() - self.pos);
            out[got..got + n].copy_from_slice(&self.buffer[self.pos..self.pos + n]);
            self.pos += n;
            got += n;
        }
        Ok(out)
    }

    // === Typed scalars ===

    pub fn read_bool(&mut self) -> CedarResult<bool> {
        Ok(self.read_long_as("a boolean")? != 0)
    }

    pub fn read_byte(&mut self) -> CedarResult<u8> {
        let [b] = self.read_array::<1>("a byte")?;
        Ok(b)
    }

    /// The low 16 bits of an 8-byte slot
    pub fn read_short(&mut self) -> CedarResult<i16> {
        Ok(self.read_long_as("a short")? as i16)
    }

    pub fn read_char(&mut self) -> CedarResult<u16> {
        Ok(self.read_long_as("a char")? as u16)
    }

    /// The low 32 bits of an 8-byte slot
    pub fn read_int(&mut self) -> CedarResult<i32> {
        Ok(self.read_long_as("an int")? as i32)
    }

    pub fn read_long(&mut self) -> CedarResult<i64> {
        self.read_long_as("a long")
    }

    fn read_long_as(&mut self, what: &'static str) -> CedarResult<i64> {
        Ok(i64::from_be_bytes(self.read_array(what)?))
    }

    pub fn read_float(&mut self) -> CedarResult<f32> {
        Ok(f32::from_bits(u32::from_be_bytes(self.read_array("a float")?)))
    }

    pub fn read_double(&mut self) -> CedarResult<f64> {
        Ok(f64::from_bits(u64::from_be_bytes(self.read_array("a double")?)))
    }

    /// A NUL-terminated modified UTF-8 string
    ///
    /// The message must hold the whole string including its terminator.
    pub fn read_utf(&mut self) -> CedarResult<String> {
        if !self.ensure_data()? {
            return Err(CedarError::unexpected_end("a string"));
        }
        let (text, terminated) = utf::decode(|| self.next_byte())?;
        if !terminated {
            log::debug!("string {text:?} cut short by the end of its message");
            return Err(CedarError::unexpected_end("a string terminator"));
        }
        Ok(text)
    }
}

impl<R: Read> Read for CedarReader<R> {
    /// Read from the current message; `Ok(0)` at its end
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() || !self.ensure_data()? {
            return Ok(0);
        }
        let n = out.len().min(self.buffer.len() - self.pos);
        out[..n].copy_from_slice(&self.buffer[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl<R: Read> std::fmt::Debug for CedarReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CedarReader")
            .field("unread", &(self.buffer.len() - self.pos))
            .field("final_packet", &self.final_packet)
            .field("byte_count", &self.byte_count)
            .finish()
    }
}
