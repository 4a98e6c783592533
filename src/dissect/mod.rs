//! # Stream Dissection
//!
//! Framing and iteration over multi-packet buffers.
//!
//! One socket read on this protocol may carry any number of concatenated
//! packets, and the only way to find the boundary between two packets is to
//! decode the first one. The framer ([`parse_one`]) produces a single packet
//! plus the byte count it consumed; the [`Dissector`] drives the framer in a
//! loop over an arbitrary buffer, yielding decoded frames until the buffer is
//! exhausted.
//!
//! The dissector is a pure function of its input buffer: synchronous,
//! stateless across calls, and restartable. The relay calls it once per
//! socket-read event with no locking, even though the relay itself runs one
//! task pair per proxied port.
//!
//! Unknown type codes decode opaque, and the opaque codec swallows the whole
//! remaining buffer. Only the last packet in a buffer may therefore be of an
//! unknown type without corrupting subsequent framing. That is a property of
//! the protocol, not of this implementation.

pub mod filter;

use tracing::trace;

use crate::config::WireConfig;
use crate::core::codec::{self, PacketKind};
use crate::core::packet::{Packet, PacketHeader, HEADER_LEN};
use crate::core::registry::Registry;
use crate::error::{ProtocolError, Result};
use self::filter::PacketFilter;

/// Parse exactly one packet off the front of `buf`.
///
/// Returns the packet and how many bytes it consumed, header included, so
/// the caller can advance through a multi-packet buffer. The count is taken
/// from the decode cursor, never from re-encoding: `PlayerState` re-encodes
/// one byte longer than it decodes, and measuring the encode would skew every
/// following frame.
pub fn parse_one(registry: &Registry, wire: &WireConfig, buf: &[u8]) -> Result<(Packet, usize)> {
    let header = PacketHeader::parse(buf)?;
    let kind = registry
        .lookup(header.code())
        .unwrap_or(PacketKind::Opaque);
    let (payload, used) = codec::decode_payload(kind, &buf[HEADER_LEN..], wire)?;
    Ok((
        Packet { header, payload },
        HEADER_LEN + used,
    ))
}

/// One dissected packet with its position in the source buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub packet: Packet,
    /// Byte offset of this packet's header within the dissected buffer.
    pub offset: usize,
    /// Total bytes this packet occupied, header included.
    pub consumed: usize,
}

/// Registry-driven stream dissector.
///
/// Owns its registry and wire constants by injection; construct once at
/// startup and share freely, every method takes `&self`.
#[derive(Debug, Clone, Default)]
pub struct Dissector {
    registry: Registry,
    wire: WireConfig,
}

impl Dissector {
    pub fn new(registry: Registry, wire: WireConfig) -> Self {
        Self { registry, wire }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn wire(&self) -> &WireConfig {
        &self.wire
    }

    /// Iterate over every packet in `buf`.
    ///
    /// The iterator is finite and lazy; it stops at the end of the buffer,
    /// or after yielding the first error.
    pub fn dissect<'a>(&'a self, buf: &'a [u8]) -> Frames<'a> {
        Frames {
            dissector: self,
            buf,
            offset: 0,
            done: false,
        }
    }

    /// Iterate over the packets in `buf` that pass `filter`.
    ///
    /// Filtering selects what is *yielded for display only*: frames that
    /// fail the predicate still advance framing and still count their bytes.
    /// Errors always come through.
    pub fn dissect_filtered<'a>(
        &'a self,
        buf: &'a [u8],
        filter: &'a PacketFilter,
    ) -> impl Iterator<Item = Result<Frame>> + 'a {
        self.dissect(buf).filter(move |item| match item {
            Ok(frame) => filter.matches(&self.registry, frame.packet.header.code()),
            Err(_) => true,
        })
    }

    /// Dissect the whole buffer eagerly, failing on the first error.
    pub fn split(&self, buf: &[u8]) -> Result<Vec<Frame>> {
        self.dissect(buf).collect()
    }
}

/// Lazy frame iterator returned by [`Dissector::dissect`].
#[derive(Debug)]
pub struct Frames<'a> {
    dissector: &'a Dissector,
    buf: &'a [u8],
    offset: usize,
    done: bool,
}

impl<'a> Frames<'a> {
    /// Offset the next frame would start at; equals the buffer length once
    /// iteration completes cleanly.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset == self.buf.len() {
            return None;
        }

        let parsed = parse_one(
            &self.dissector.registry,
            &self.dissector.wire,
            &self.buf[self.offset..],
        );
        let (packet, consumed) = match parsed {
            Ok(ok) => ok,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        // Both guards are unreachable while the codecs stay bounds-checked
        // and the header is 2 bytes, but a zero-advance or overrun here
        // would loop forever or panic downstream.
        if consumed == 0 {
            self.done = true;
            return Some(Err(ProtocolError::FramingError {
                offset: self.offset,
                reason: "decode consumed zero bytes",
            }));
        }
        if self.offset + consumed > self.buf.len() {
            self.done = true;
            return Some(Err(ProtocolError::FramingError {
                offset: self.offset,
                reason: "decode overran the buffer",
            }));
        }

        let frame = Frame {
            packet,
            offset: self.offset,
            consumed,
        };
        trace!(
            offset = frame.offset,
            consumed = frame.consumed,
            code = %frame.packet.header,
            "framed packet"
        );
        self.offset += consumed;
        Some(Ok(frame))
    }
}
