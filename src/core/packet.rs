//! # Packet Model
//!
//! Header, payload sum type, and the assembled packet.
//!
//! A packet on this protocol is a 2-byte big-endian type code followed by a
//! variant-specific little-endian payload. There is no length field anywhere;
//! boundaries fall out of how much each payload decode consumes.
//!
//! The payload is a closed sum type: one variant per known packet shape plus
//! `Opaque` for everything the registry does not know. Making the fallback a
//! first-class variant keeps the framer's dispatch a single exhaustive match
//! instead of a parallel default path.

use std::fmt;

use crate::core::codec;
use crate::error::{ProtocolError, Result};

/// Wire size of the packet header.
pub const HEADER_LEN: usize = 2;

/// The 2-byte packet header. Immutable once constructed; always big-endian
/// on the wire regardless of host byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    code: u16,
}

impl PacketHeader {
    pub fn new(code: u16) -> Self {
        Self { code }
    }

    /// Parse the leading 2 bytes of a buffer as a type code.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_LEN {
            return Err(ProtocolError::TruncatedHeader(buf.len()));
        }
        Ok(Self {
            code: u16::from_be_bytes([buf[0], buf[1]]),
        })
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn encode(&self) -> [u8; HEADER_LEN] {
        self.code.to_be_bytes()
    }
}

impl fmt::Display for PacketHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.code)
    }
}

/// Jump direction carried by the 1-byte jump payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpAction {
    Up,
    Down,
}

impl fmt::Display for JumpAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpAction::Up => write!(f, "Up"),
            JumpAction::Down => write!(f, "Down"),
        }
    }
}

/// Decoded payload, one variant per known packet shape.
///
/// `unk*` fields are byte runs observed on the wire whose meaning is still
/// unknown; they are carried verbatim so re-encoding stays byte-identical.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Raw undecoded bytes for unknown or intentionally unparsed types.
    Opaque { data: Vec<u8> },
    NewInventoryItem {
        name: String,
        quantity: u32,
    },
    AttackState {
        id: u32,
        name: String,
        tag: u32,
    },
    ItemPickup {
        id: u32,
    },
    RemoveElement {
        id: u32,
    },
    /// Decode never reads the reserved trailing byte that encode appends;
    /// the asymmetry is the protocol's, not ours.
    PlayerState {
        id: u32,
        name: String,
    },
    NewElement {
        id: u32,
        unk1: [u8; 5],
        name: String,
        x: f32,
        y: f32,
        z: f32,
        unk2: [u8; 10],
    },
    FastTravel {
        src: String,
        dst: String,
    },
    Position {
        x: f32,
        y: f32,
        z: f32,
        look: u32,
        unk: u16,
        key: u16,
    },
    EnemyPosition {
        id: u32,
        x: f32,
        y: f32,
        z: f32,
        rest: Vec<u8>,
    },
    Reload,
    Beacon {
        data: Vec<u8>,
    },
    Shoot {
        weapon: String,
        tail: Vec<u8>,
    },
    /// Stored value is `(raw + 1) % 10`; decode is lossy on purpose, see the
    /// codec module notes.
    ChangeTool {
        slot: u8,
    },
    Jump {
        action: JumpAction,
    },
    Burst {
        action: u8,
    },
    ShootServer {
        data: Vec<u8>,
    },
    HpModify {
        data: Vec<u8>,
    },
    Sell {
        id: u32,
        name: String,
        quantity: u32,
    },
    Exchange {
        name: String,
        quantity: u32,
        data: [u8; 2],
        partner: String,
        coins: u64,
    },
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Opaque { data } => write!(f, "Unknown payload: {}", hex::encode(data)),
            Payload::NewInventoryItem { name, quantity } => {
                write!(f, "New inventory: {name} x{quantity}")
            }
            Payload::AttackState { id, name, tag } => {
                write!(f, "Attack state: {id} {name} tag {tag}")
            }
            Payload::ItemPickup { id } => write!(f, "Item pickup: {id}"),
            Payload::RemoveElement { id } => write!(f, "Remove element: {id}"),
            Payload::PlayerState { id, name } => write!(f, "Player state: {id} {name}"),
            Payload::NewElement {
                id,
                name,
                x,
                y,
                z,
                unk2,
                ..
            } => write!(
                f,
                "New element: {id}:{name} {x} / {y} / {z} {}",
                hex::encode(unk2)
            ),
            Payload::FastTravel { src, dst } => write!(f, "Fast travel: {src} -> {dst}"),
            Payload::Position { x, y, z, look, .. } => {
                write!(f, "Position packet: {x} / {y} / {z} / {look}")
            }
            Payload::EnemyPosition { id, x, y, z, rest } => {
                let head = &rest[..rest.len().min(10)];
                write!(f, "Enemy position: id {id} {x} / {y} / {z} {}..", hex::encode(head))
            }
            Payload::Reload => write!(f, "Reload"),
            Payload::Beacon { data } => write!(f, "Beacon: {}", hex::encode(data)),
            Payload::Shoot { weapon, tail } => {
                write!(f, "Shoot: weapon {weapon} data {}", hex::encode(tail))
            }
            Payload::ChangeTool { slot } => write!(f, "Change tool: {slot}"),
            Payload::Jump { action } => write!(f, "Jump: {action}"),
            Payload::Burst { action } => write!(f, "Burst: {action}"),
            Payload::ShootServer { data } => write!(f, "Shoot (server): {}", hex::encode(data)),
            Payload::HpModify { data } => write!(f, "HP modification: {}", hex::encode(data)),
            Payload::Sell { id, name, quantity } => {
                write!(f, "Sell: id {id} {name} x{quantity}")
            }
            Payload::Exchange {
                name,
                quantity,
                partner,
                coins,
                ..
            } => write!(f, "Exchange: {name} x{quantity} with {partner} ({coins} coins)"),
        }
    }
}

/// A complete packet: header plus decoded payload. Owns both.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub header: PacketHeader,
    pub payload: Payload,
}

impl Packet {
    pub fn new(code: u16, payload: Payload) -> Self {
        Self {
            header: PacketHeader::new(code),
            payload,
        }
    }

    /// Re-encode to wire bytes: 2-byte big-endian header, then the payload.
    ///
    /// For every variant except `PlayerState` and `ChangeTool` this
    /// reproduces the exact bytes the packet was decoded from.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = bytes::BytesMut::with_capacity(HEADER_LEN + 32);
        buf.extend_from_slice(&self.header.encode());
        codec::encode_payload(&self.payload, &mut buf)?;
        Ok(buf.to_vec())
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.header, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_big_endian() {
        let hdr = PacketHeader::new(0x6d76);
        assert_eq!(hdr.encode(), [0x6d, 0x76]);
        assert_eq!(PacketHeader::parse(&[0x6d, 0x76, 0xff]).unwrap(), hdr);
    }

    #[test]
    fn header_requires_two_bytes() {
        assert!(matches!(
            PacketHeader::parse(&[0x6d]),
            Err(ProtocolError::TruncatedHeader(1))
        ));
        assert!(matches!(
            PacketHeader::parse(&[]),
            Err(ProtocolError::TruncatedHeader(0))
        ));
    }

    #[test]
    fn packet_renders_header_and_payload() {
        let pkt = Packet::new(0x6a70, Payload::Jump { action: JumpAction::Up });
        assert_eq!(pkt.to_string(), "0x6a70 Jump: Up");
    }
}
