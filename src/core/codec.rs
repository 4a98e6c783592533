//! # Payload Codecs
//!
//! One decode/encode pair per known packet shape.
//!
//! Decode reads only from the payload slice that follows the 2-byte header
//! and reports, via the reader's cursor, exactly how many bytes it consumed.
//! Trailing excess belongs to the *next* packet in the stream; that cursor
//! count is the framing mechanism on a protocol with no length field.
//!
//! Encode reproduces the exact layout decode consumed, with two wire quirks
//! kept as-is:
//! - `PlayerState` appends one reserved zero byte decode never reads back;
//! - `ChangeTool` stores `(raw + 1) % 10`, which no encode can invert. This
//!   looks like a transcription artifact from the original reverse
//!   engineering; it is preserved until traffic captures say otherwise.
//!
//! The fixed lengths of the `Beacon` body and the `Shoot` tail were measured
//! from observed traffic and may differ across server builds, so they come
//! from [`WireConfig`] rather than literals here.

use bytes::{BufMut, BytesMut};

use crate::config::WireConfig;
use crate::core::packet::{JumpAction, Payload};
use crate::core::wire::{put_name, put_u48_le, Reader};
use crate::error::Result;

/// Tag selecting which payload codec applies to a type code.
///
/// The registry maps type codes to these; the framer falls back to `Opaque`
/// for codes the registry does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    Opaque,
    NewInventoryItem,
    AttackState,
    ItemPickup,
    RemoveElement,
    PlayerState,
    NewElement,
    FastTravel,
    Position,
    EnemyPosition,
    Reload,
    Beacon,
    Shoot,
    ChangeTool,
    Jump,
    Burst,
    ShootServer,
    HpModify,
    Sell,
    Exchange,
}

/// Decode one payload of the given kind from `buf`.
///
/// Returns the decoded value and the number of payload bytes consumed.
pub fn decode_payload(
    kind: PacketKind,
    buf: &[u8],
    wire: &WireConfig,
) -> Result<(Payload, usize)> {
    let mut r = Reader::new(buf);
    let payload = match kind {
        PacketKind::Opaque => Payload::Opaque {
            data: r.take_rest().to_vec(),
        },
        PacketKind::NewInventoryItem => {
            let name = r.name()?;
            let quantity = r.u32_le()?;
            Payload::NewInventoryItem { name, quantity }
        }
        PacketKind::AttackState => {
            let id = r.u32_le()?;
            let name = r.name()?;
            let tag = r.u32_le()?;
            Payload::AttackState { id, name, tag }
        }
        PacketKind::ItemPickup => Payload::ItemPickup { id: r.u32_le()? },
        PacketKind::RemoveElement => Payload::RemoveElement { id: r.u32_le()? },
        PacketKind::PlayerState => {
            let id = r.u32_le()?;
            let name = r.name()?;
            Payload::PlayerState { id, name }
        }
        PacketKind::NewElement => {
            let id = r.u32_le()?;
            let mut unk1 = [0u8; 5];
            unk1.copy_from_slice(r.take(5)?);
            let name = r.name()?;
            let x = r.f32_le()?;
            let y = r.f32_le()?;
            let z = r.f32_le()?;
            let mut unk2 = [0u8; 10];
            unk2.copy_from_slice(r.take(10)?);
            Payload::NewElement {
                id,
                unk1,
                name,
                x,
                y,
                z,
                unk2,
            }
        }
        PacketKind::FastTravel => {
            let src = r.name()?;
            let dst = r.name()?;
            Payload::FastTravel { src, dst }
        }
        PacketKind::Position => {
            let x = r.f32_le()?;
            let y = r.f32_le()?;
            let z = r.f32_le()?;
            let look = r.u32_le()?;
            let unk = r.u16_le()?;
            let key = r.u16_le()?;
            Payload::Position {
                x,
                y,
                z,
                look,
                unk,
                key,
            }
        }
        PacketKind::EnemyPosition => {
            let id = r.u32_le()?;
            let x = r.f32_le()?;
            let y = r.f32_le()?;
            let z = r.f32_le()?;
            let rest = r.take_rest().to_vec();
            Payload::EnemyPosition { id, x, y, z, rest }
        }
        PacketKind::Reload => Payload::Reload,
        PacketKind::Beacon => Payload::Beacon {
            data: r.take(wire.beacon_length)?.to_vec(),
        },
        PacketKind::Shoot => {
            let weapon = r.name()?;
            let tail = r.take(wire.shoot_tail_length)?.to_vec();
            Payload::Shoot { weapon, tail }
        }
        PacketKind::ChangeTool => {
            let raw = r.u8()?;
            Payload::ChangeTool {
                slot: ((u16::from(raw) + 1) % 10) as u8,
            }
        }
        PacketKind::Jump => {
            let action = if r.u8()? == 0x01 {
                JumpAction::Up
            } else {
                JumpAction::Down
            };
            Payload::Jump { action }
        }
        PacketKind::Burst => Payload::Burst { action: r.u8()? },
        PacketKind::ShootServer => Payload::ShootServer {
            data: r.take_rest().to_vec(),
        },
        PacketKind::HpModify => Payload::HpModify {
            data: r.take_rest().to_vec(),
        },
        PacketKind::Sell => {
            let id = r.u32_le()?;
            let name = r.name()?;
            let quantity = r.u32_le()?;
            Payload::Sell { id, name, quantity }
        }
        PacketKind::Exchange => {
            let name = r.name()?;
            let quantity = r.u32_le()?;
            let mut data = [0u8; 2];
            data.copy_from_slice(r.take(2)?);
            let partner = r.name()?;
            let coins = r.u48_le()?;
            Payload::Exchange {
                name,
                quantity,
                data,
                partner,
                coins,
            }
        }
    };
    Ok((payload, r.consumed()))
}

/// Append one payload's wire bytes to `buf`.
pub fn encode_payload(payload: &Payload, buf: &mut BytesMut) -> Result<()> {
    match payload {
        Payload::Opaque { data } => buf.put_slice(data),
        Payload::NewInventoryItem { name, quantity } => {
            put_name(buf, name)?;
            buf.put_u32_le(*quantity);
        }
        Payload::AttackState { id, name, tag } => {
            buf.put_u32_le(*id);
            put_name(buf, name)?;
            buf.put_u32_le(*tag);
        }
        Payload::ItemPickup { id } => buf.put_u32_le(*id),
        Payload::RemoveElement { id } => buf.put_u32_le(*id),
        Payload::PlayerState { id, name } => {
            buf.put_u32_le(*id);
            put_name(buf, name)?;
            // reserved byte the peer expects; decode never reads it
            buf.put_u8(0x00);
        }
        Payload::NewElement {
            id,
            unk1,
            name,
            x,
            y,
            z,
            unk2,
        } => {
            buf.put_u32_le(*id);
            buf.put_slice(unk1);
            put_name(buf, name)?;
            buf.put_f32_le(*x);
            buf.put_f32_le(*y);
            buf.put_f32_le(*z);
            buf.put_slice(unk2);
        }
        Payload::FastTravel { src, dst } => {
            put_name(buf, src)?;
            put_name(buf, dst)?;
        }
        Payload::Position {
            x,
            y,
            z,
            look,
            unk,
            key,
        } => {
            buf.put_f32_le(*x);
            buf.put_f32_le(*y);
            buf.put_f32_le(*z);
            buf.put_u32_le(*look);
            buf.put_u16_le(*unk);
            buf.put_u16_le(*key);
        }
        Payload::EnemyPosition { id, x, y, z, rest } => {
            buf.put_u32_le(*id);
            buf.put_f32_le(*x);
            buf.put_f32_le(*y);
            buf.put_f32_le(*z);
            buf.put_slice(rest);
        }
        Payload::Reload => {}
        Payload::Beacon { data } => buf.put_slice(data),
        Payload::Shoot { weapon, tail } => {
            put_name(buf, weapon)?;
            buf.put_slice(tail);
        }
        Payload::ChangeTool { slot } => buf.put_u8(*slot),
        Payload::Jump { action } => buf.put_u8(match action {
            JumpAction::Up => 0x01,
            JumpAction::Down => 0x00,
        }),
        Payload::Burst { action } => buf.put_u8(*action),
        Payload::ShootServer { data } => buf.put_slice(data),
        Payload::HpModify { data } => buf.put_slice(data),
        Payload::Sell { id, name, quantity } => {
            buf.put_u32_le(*id);
            put_name(buf, name)?;
            buf.put_u32_le(*quantity);
        }
        Payload::Exchange {
            name,
            quantity,
            data,
            partner,
            coins,
        } => {
            put_name(buf, name)?;
            buf.put_u32_le(*quantity);
            buf.put_slice(data);
            put_name(buf, partner)?;
            put_u48_le(buf, *coins);
        }
    }
    Ok(())
}
