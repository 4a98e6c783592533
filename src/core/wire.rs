//! # Wire Primitives
//!
//! Cursor-based reader and buffer helpers for the game wire format.
//!
//! Every multi-byte payload integer on this protocol is little-endian and
//! floats are IEEE-754 single precision; the 2-byte packet header is the sole
//! big-endian field and is handled by the framer, not here. Variable-length
//! names travel as a little-endian length prefix followed by one byte per
//! character (no multi-byte text on this protocol).
//!
//! The reader tracks its position explicitly so the framer can report exactly
//! how many bytes a decode consumed. That count is what drives stream
//! framing: the protocol has no length field, so the cursor is the only
//! source of packet boundaries.

use bytes::{BufMut, BytesMut};

use crate::error::{ProtocolError, Result};

/// Cursor over a payload slice with explicit position tracking.
///
/// All read methods fail with `TruncatedPayload` instead of panicking when
/// the slice runs out; name reads fail with `InvalidEncoding` when the
/// declared length overruns the remainder.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }

    /// Bytes left in the slice.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn need(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(ProtocolError::TruncatedPayload {
                needed: self.pos + n,
                available: self.buf.len(),
            });
        }
        Ok(())
    }

    /// Take `n` raw bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        self.need(n)?;
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Take everything left in the slice.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let out = &self.buf[self.pos..];
        self.pos = self.buf.len();
        out
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn u16_le(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u32_le(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// 6-byte little-endian unsigned integer (used by the coin counter).
    pub fn u48_le(&mut self) -> Result<u64> {
        let b = self.take(6)?;
        let mut raw = [0u8; 8];
        raw[..6].copy_from_slice(b);
        Ok(u64::from_le_bytes(raw))
    }

    pub fn f32_le(&mut self) -> Result<f32> {
        let b = self.take(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Length-prefixed name: u16 LE byte count, then one byte per character.
    ///
    /// Bytes map to chars 1:1 so any observed traffic survives a round-trip,
    /// including names outside ASCII.
    pub fn name(&mut self) -> Result<String> {
        let len = self.u16_le()? as usize;
        if self.remaining() < len {
            return Err(ProtocolError::InvalidEncoding(format!(
                "declared name length {len} exceeds {} remaining bytes",
                self.remaining()
            )));
        }
        let bytes = self.take(len)?;
        Ok(bytes.iter().map(|&b| b as char).collect())
    }
}

/// Append a length-prefixed name: u16 LE byte count, one byte per character.
pub fn put_name(buf: &mut BytesMut, name: &str) -> Result<()> {
    let len = name.chars().count();
    if len > u16::MAX as usize {
        return Err(ProtocolError::InvalidEncoding(format!(
            "name of {len} characters exceeds u16 length prefix"
        )));
    }
    buf.put_u16_le(len as u16);
    for c in name.chars() {
        let code = c as u32;
        if code > 0xFF {
            return Err(ProtocolError::InvalidEncoding(format!(
                "character {c:?} does not fit the single-byte wire encoding"
            )));
        }
        buf.put_u8(code as u8);
    }
    Ok(())
}

/// Append a 6-byte little-endian unsigned integer, dropping bits above 48.
pub fn put_u48_le(buf: &mut BytesMut, value: u64) {
    buf.put_slice(&value.to_le_bytes()[..6]);
}
