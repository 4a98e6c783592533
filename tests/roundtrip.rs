#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Round-trip fidelity tests: every variant must re-encode to the exact
//! bytes it was decoded from, minus the two documented wire quirks.

use relay_protocol::{codes, parse_one, Dissector, JumpAction, Packet, Payload};

fn dissector() -> Dissector {
    Dissector::default()
}

/// Decode a full packet buffer and assert the re-encode is byte-identical.
fn assert_byte_roundtrip(buf: &[u8]) -> Packet {
    let d = dissector();
    let (packet, consumed) = parse_one(d.registry(), d.wire(), buf).expect("decode");
    assert_eq!(consumed, buf.len(), "sample should be exactly one packet");
    let encoded = packet.encode().expect("encode");
    assert_eq!(encoded, buf, "byte round-trip");
    packet
}

fn le_name(name: &str) -> Vec<u8> {
    let mut out = (name.len() as u16).to_le_bytes().to_vec();
    out.extend_from_slice(name.as_bytes());
    out
}

// ============================================================================
// WORKED EXAMPLES FROM OBSERVED TRAFFIC
// ============================================================================

#[test]
fn position_worked_example() {
    let mut buf = vec![0x6d, 0x76];
    buf.extend_from_slice(&1.0f32.to_le_bytes());
    buf.extend_from_slice(&2.0f32.to_le_bytes());
    buf.extend_from_slice(&3.0f32.to_le_bytes());
    buf.extend_from_slice(&5u32.to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes());
    buf.extend_from_slice(&7u16.to_le_bytes());
    assert_eq!(buf.len(), 22);

    let packet = assert_byte_roundtrip(&buf);
    assert_eq!(packet.header.code(), codes::POSITION);
    assert_eq!(
        packet.payload,
        Payload::Position {
            x: 1.0,
            y: 2.0,
            z: 3.0,
            look: 5,
            unk: 0,
            key: 7
        }
    );
}

#[test]
fn jump_worked_examples() {
    let up = assert_byte_roundtrip(&[0x6a, 0x70, 0x01]);
    assert_eq!(up.payload, Payload::Jump { action: JumpAction::Up });

    let down = assert_byte_roundtrip(&[0x6a, 0x70, 0x00]);
    assert_eq!(down.payload, Payload::Jump { action: JumpAction::Down });
}

// ============================================================================
// PER-VARIANT ROUND-TRIPS
// ============================================================================

#[test]
fn new_inventory_item_roundtrip() {
    let mut buf = vec![0x63, 0x70];
    buf.extend_from_slice(&le_name("pickaxe"));
    buf.extend_from_slice(&3u32.to_le_bytes());
    let packet = assert_byte_roundtrip(&buf);
    assert_eq!(
        packet.payload,
        Payload::NewInventoryItem {
            name: "pickaxe".into(),
            quantity: 3
        }
    );
}

#[test]
fn attack_state_roundtrip() {
    let mut buf = vec![0x74, 0x72];
    buf.extend_from_slice(&77u32.to_le_bytes());
    buf.extend_from_slice(&le_name("sword"));
    buf.extend_from_slice(&0xdeadbeefu32.to_le_bytes());
    assert_byte_roundtrip(&buf);
}

#[test]
fn item_pickup_and_remove_element_roundtrip() {
    let mut buf = vec![0x65, 0x65];
    buf.extend_from_slice(&1234u32.to_le_bytes());
    let packet = assert_byte_roundtrip(&buf);
    assert_eq!(packet.payload, Payload::ItemPickup { id: 1234 });

    let mut buf = vec![0x78, 0x78];
    buf.extend_from_slice(&1234u32.to_le_bytes());
    let packet = assert_byte_roundtrip(&buf);
    assert_eq!(packet.payload, Payload::RemoveElement { id: 1234 });
}

#[test]
fn new_element_roundtrip() {
    let mut buf = vec![0x6d, 0x6b];
    buf.extend_from_slice(&9u32.to_le_bytes());
    buf.extend_from_slice(&[0x11; 5]);
    buf.extend_from_slice(&le_name("tree"));
    for v in [10.5f32, -3.25, 0.0] {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    buf.extend_from_slice(&[0x22; 10]);
    let packet = assert_byte_roundtrip(&buf);
    match packet.payload {
        Payload::NewElement { id, name, x, y, z, .. } => {
            assert_eq!(id, 9);
            assert_eq!(name, "tree");
            assert_eq!((x, y, z), (10.5, -3.25, 0.0));
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn fast_travel_roundtrip() {
    let mut buf = vec![0x66, 0x74];
    buf.extend_from_slice(&le_name("spawn"));
    buf.extend_from_slice(&le_name("mine"));
    let packet = assert_byte_roundtrip(&buf);
    assert_eq!(
        packet.payload,
        Payload::FastTravel {
            src: "spawn".into(),
            dst: "mine".into()
        }
    );
}

#[test]
fn enemy_position_keeps_opaque_tail() {
    let mut buf = vec![0x70, 0x73];
    buf.extend_from_slice(&3493u32.to_le_bytes());
    for v in [-99.5f32, 12.0, 1044.25] {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    buf.extend_from_slice(&[0xca, 0xfe, 0xba, 0xbe]);
    let packet = assert_byte_roundtrip(&buf);
    match packet.payload {
        Payload::EnemyPosition { id, rest, .. } => {
            assert_eq!(id, 3493);
            assert_eq!(rest, vec![0xca, 0xfe, 0xba, 0xbe]);
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn reload_beacon_and_burst_roundtrip() {
    let packet = assert_byte_roundtrip(&[0x72, 0x6c]);
    assert_eq!(packet.payload, Payload::Reload);

    let mut buf = vec![0x17, 0x03];
    buf.extend_from_slice(&[0xab; 35]);
    assert_byte_roundtrip(&buf);

    let packet = assert_byte_roundtrip(&[0x66, 0x72, 0x02]);
    assert_eq!(packet.payload, Payload::Burst { action: 2 });
}

#[test]
fn shoot_roundtrip_with_fixed_tail() {
    let mut buf = vec![0x2a, 0x69];
    buf.extend_from_slice(&le_name("rifle"));
    buf.extend_from_slice(&[0x77; 12]);
    let packet = assert_byte_roundtrip(&buf);
    assert_eq!(
        packet.payload,
        Payload::Shoot {
            weapon: "rifle".into(),
            tail: vec![0x77; 12]
        }
    );
}

#[test]
fn server_opaque_variants_roundtrip() {
    let mut buf = vec![0x6c, 0x61];
    buf.extend_from_slice(&[0x01, 0x02, 0x03]);
    let packet = assert_byte_roundtrip(&buf);
    assert!(matches!(packet.payload, Payload::ShootServer { .. }));

    let mut buf = vec![0x2b, 0x2b];
    buf.extend_from_slice(&[0x09, 0x08]);
    let packet = assert_byte_roundtrip(&buf);
    assert!(matches!(packet.payload, Payload::HpModify { .. }));
}

#[test]
fn sell_and_exchange_roundtrip() {
    let mut buf = vec![0x24, 0x73];
    buf.extend_from_slice(&55u32.to_le_bytes());
    buf.extend_from_slice(&le_name("ore"));
    buf.extend_from_slice(&40u32.to_le_bytes());
    assert_byte_roundtrip(&buf);

    let mut buf = vec![0x72, 0x6d];
    buf.extend_from_slice(&le_name("ore"));
    buf.extend_from_slice(&40u32.to_le_bytes());
    buf.extend_from_slice(&[0x00, 0x01]);
    buf.extend_from_slice(&le_name("merchant"));
    buf.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0xff, 0x00]);
    let packet = assert_byte_roundtrip(&buf);
    match packet.payload {
        Payload::Exchange { coins, .. } => assert_eq!(coins, 0x00ff_ffff_ffff),
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn opaque_fallback_roundtrip() {
    // 0xbeef is not a registered code
    let buf = [0xbe, 0xef, 0x10, 0x20, 0x30];
    let packet = assert_byte_roundtrip(&buf);
    assert_eq!(
        packet.payload,
        Payload::Opaque {
            data: vec![0x10, 0x20, 0x30]
        }
    );
}

// ============================================================================
// DOCUMENTED ASYMMETRIES
// ============================================================================

#[test]
fn player_state_encode_appends_reserved_byte() {
    let mut buf = vec![0x73, 0x74];
    buf.extend_from_slice(&8u32.to_le_bytes());
    buf.extend_from_slice(&le_name("miner"));

    let d = dissector();
    let (packet, consumed) = parse_one(d.registry(), d.wire(), &buf).unwrap();
    assert_eq!(consumed, buf.len());

    let encoded = packet.encode().unwrap();
    assert_eq!(encoded.len(), buf.len() + 1);
    assert_eq!(&encoded[..buf.len()], &buf[..]);
    assert_eq!(*encoded.last().unwrap(), 0x00);
}

#[test]
fn change_tool_decode_is_not_invertible() {
    let d = dissector();
    let (packet, _) = parse_one(d.registry(), d.wire(), &[0x73, 0x3d, 0x04]).unwrap();
    // stored value is (raw + 1) % 10, so re-encoding shifts the byte
    assert_eq!(packet.payload, Payload::ChangeTool { slot: 5 });
    assert_eq!(packet.encode().unwrap(), vec![0x73, 0x3d, 0x05]);
}

// ============================================================================
// VALUE ROUND-TRIPS (decode(encode(v)) == v)
// ============================================================================

#[test]
fn value_roundtrip_for_structured_variants() {
    let d = dissector();
    let samples = vec![
        Packet::new(codes::ITEM_PICKUP, Payload::ItemPickup { id: 42 }),
        Packet::new(
            codes::SELL,
            Payload::Sell {
                id: 1,
                name: "gem".into(),
                quantity: 2,
            },
        ),
        Packet::new(
            codes::FAST_TRAVEL,
            Payload::FastTravel {
                src: "a".into(),
                dst: "b".into(),
            },
        ),
        Packet::new(codes::JUMP, Payload::Jump { action: JumpAction::Down }),
        Packet::new(codes::RELOAD, Payload::Reload),
    ];

    for packet in samples {
        let bytes = packet.encode().unwrap();
        let (decoded, consumed) = parse_one(d.registry(), d.wire(), &bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded, packet);
    }
}
