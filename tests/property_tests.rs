//! Property-based tests using proptest
//!
//! These validate the round-trip contract and framing arithmetic across a
//! wide range of generated inputs.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use relay_protocol::{codes, parse_one, Dissector, Packet, Payload};

fn dissector() -> Dissector {
    Dissector::default()
}

// Property: opaque payloads survive a byte round-trip for any buffer
proptest! {
    #[test]
    fn prop_opaque_roundtrip(data in prop::collection::vec(any::<u8>(), 0..4096)) {
        let d = dissector();
        let mut buf = vec![0xbe, 0xef]; // unregistered code
        buf.extend_from_slice(&data);

        let (packet, consumed) = parse_one(d.registry(), d.wire(), &buf).expect("decode");
        prop_assert_eq!(consumed, buf.len());
        prop_assert_eq!(packet.encode().expect("encode"), buf);
    }
}

// Property: position packets survive a value round-trip for finite fields
proptest! {
    #[test]
    fn prop_position_value_roundtrip(
        x in -1.0e6f32..1.0e6,
        y in -1.0e6f32..1.0e6,
        z in -1.0e6f32..1.0e6,
        look in any::<u32>(),
        unk in any::<u16>(),
        key in any::<u16>(),
    ) {
        let d = dissector();
        let packet = Packet::new(codes::POSITION, Payload::Position { x, y, z, look, unk, key });
        let bytes = packet.encode().expect("encode");
        prop_assert_eq!(bytes.len(), 22);

        let (decoded, consumed) = parse_one(d.registry(), d.wire(), &bytes).expect("decode");
        prop_assert_eq!(consumed, 22);
        prop_assert_eq!(decoded, packet);
    }
}

// Property: names built from arbitrary single bytes round-trip through the
// length-prefixed text encoding
proptest! {
    #[test]
    fn prop_fast_travel_name_roundtrip(
        src in prop::collection::vec(any::<u8>(), 0..64),
        dst in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let d = dissector();
        let mut buf = vec![0x66, 0x74];
        buf.extend_from_slice(&(src.len() as u16).to_le_bytes());
        buf.extend_from_slice(&src);
        buf.extend_from_slice(&(dst.len() as u16).to_le_bytes());
        buf.extend_from_slice(&dst);

        let (packet, consumed) = parse_one(d.registry(), d.wire(), &buf).expect("decode");
        prop_assert_eq!(consumed, buf.len());
        prop_assert_eq!(packet.encode().expect("encode"), buf);
    }
}

// Property: N concatenated packets dissect into N frames whose consumed sum
// is the buffer length
proptest! {
    #[test]
    fn prop_framing_sum(kinds in prop::collection::vec(0u8..3, 1..50)) {
        let d = dissector();
        let mut buf = Vec::new();
        for kind in &kinds {
            match kind {
                0 => buf.extend_from_slice(&[0x6a, 0x70, 0x01]), // jump
                1 => buf.extend_from_slice(&[0x72, 0x6c]),       // reload
                _ => {
                    buf.extend_from_slice(&[0x65, 0x65]);        // item pickup
                    buf.extend_from_slice(&7u32.to_le_bytes());
                }
            }
        }

        let frames = d.split(&buf).expect("dissect");
        prop_assert_eq!(frames.len(), kinds.len());
        prop_assert_eq!(frames.iter().map(|f| f.consumed).sum::<usize>(), buf.len());
    }
}

// Property: dissection of a valid buffer is deterministic and restartable
proptest! {
    #[test]
    fn prop_dissection_restartable(payload in prop::collection::vec(any::<u8>(), 0..256)) {
        let d = dissector();
        let mut buf = vec![0x2b, 0x2b]; // hp modify, opaque remainder
        buf.extend_from_slice(&payload);

        let first = d.split(&buf).expect("dissect");
        let second = d.split(&buf).expect("dissect");
        prop_assert_eq!(first, second);
    }
}
