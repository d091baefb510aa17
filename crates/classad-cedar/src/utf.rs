//! Modified UTF-8, as written by `write_utf` and read by `read_utf`
//!
//! Text is encoded as UTF-16 code units, each in one to three bytes:
//!
//! | code unit        | bytes                          |
//! |------------------|--------------------------------|
//! | 0x0001..=0x007F  | `0xxxxxxx`                     |
//! | 0x0000, ..0x07FF | `110xxxxx 10xxxxxx`            |
//! | 0x0800..=0xFFFF  | `1110xxxx 10xxxxxx 10xxxxxx`   |
//!
//! so U+0000 is `C0 80` and a character above U+FFFF is a surrogate pair
//! of three-byte units. A single zero byte ends the string.

use crate::error::{CedarError, CedarResult};

/// Append the encoding of `s` and its terminator to `out`
pub fn encode(s: &str, out: &mut Vec<u8>) {
    for unit in s.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | (unit >> 6) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | (unit >> 12) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out.push(0);
}

/// Decodes one string from a source of bytes
///
/// `next` yields the following byte, or `None` at the end of the message.
/// Returns the text and whether the terminator was seen.
pub fn decode(mut next: impl FnMut() -> CedarResult<Option<u8>>) -> CedarResult<(String, bool)> {
    let mut units: Vec<u16> = Vec::new();

    let terminated = loop {
        let Some(lead) = next()? else {
            break false;
        };
        let unit = match lead {
            0 => break true,
            0x01..=0x7F => u16::from(lead),
            _ if lead & 0xE0 == 0xC0 => {
                let low = continuation(&mut next, lead)?;
                (u16::from(lead & 0x1F) << 6) | low
            }
            _ if lead & 0xF0 == 0xE0 => {
                let middle = continuation(&mut next, lead)?;
                let low = continuation(&mut next, lead)?;
                (u16::from(lead & 0x0F) << 12) | (middle << 6) | low
            }
            _ => {
                return Err(CedarError::bad_encoding(format!(
                    "{lead:#04x} cannot start a character"
                )));
            }
        };
        units.push(unit);
    };

    let text = String::from_utf16(&units)
        .map_err(|_| CedarError::bad_encoding("unpaired surrogate"))?;
    Ok((text, terminated))
}

/// The six payload bits of the byte after `lead`
fn continuation(
    next: &mut impl FnMut() -> CedarResult<Option<u8>>,
    lead: u8,
) -> CedarResult<u16> {
    match next()? {
        Some(b) if b & 0xC0 == 0x80 => Ok(u16::from(b & 0x3F)),
        Some(b) => Err(CedarError::bad_encoding(format!(
            "byte {b:#04x} after {lead:#04x} is not a continuation byte"
        ))),
        None => Err(CedarError::bad_encoding(format!(
            "string ends inside the sequence started by {lead:#04x}"
        ))),
    }
}
