//! # relay-protocol
//!
//! Transparent man-in-the-middle relay core for a proprietary binary game
//! protocol, built around a registry-driven dissection engine.
//!
//! The engine classifies inbound byte streams into typed packets, decodes
//! their payloads against per-type binary layouts, and re-encodes them
//! byte-for-byte. One socket read may carry several concatenated packets and
//! the protocol has no length field, so packet boundaries are found by
//! decoding: each payload codec reports exactly how many bytes it consumed.
//!
//! ## Layers
//! - [`core`]: packet model, payload codecs, type-code registry (pure)
//! - [`dissect`]: packet framer and multi-packet stream dissector
//! - [`relay`]: tokio TCP proxy that forwards raw bytes and observes them
//! - [`config`], [`error`], [`utils`]: configuration, errors, logging/metrics
//!
//! ## Round-trip fidelity
//!
//! `encode(decode(bytes)) == bytes` holds for every registered variant and
//! for the opaque fallback. The relay must never corrupt traffic it merely
//! observes, so this is the crate's core correctness contract. Two wire
//! quirks inherited from the protocol are documented in
//! [`core::codec`]: the `PlayerState` encode-only reserved byte and the
//! lossy `ChangeTool` decode.
//!
//! ## Example
//! ```
//! use relay_protocol::{Dissector, Payload};
//!
//! let dissector = Dissector::default();
//! let buf = [0x6a, 0x70, 0x01, 0x72, 0x6c]; // jump + reload
//! let frames = dissector.split(&buf).unwrap();
//! assert_eq!(frames.len(), 2);
//! assert!(matches!(frames[1].packet.payload, Payload::Reload));
//! ```

pub mod config;
pub mod core;
pub mod dissect;
pub mod error;
pub mod relay;
pub mod utils;

pub use crate::config::{RelayConfig, WireConfig};
pub use crate::core::codec::PacketKind;
pub use crate::core::packet::{JumpAction, Packet, PacketHeader, Payload, HEADER_LEN};
pub use crate::core::registry::{codes, Registry};
pub use crate::dissect::filter::{FilterMode, PacketFilter};
pub use crate::dissect::{parse_one, Dissector, Frame};
pub use crate::error::{ProtocolError, Result};
