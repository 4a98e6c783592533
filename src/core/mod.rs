//! # Core Protocol Components
//!
//! Packet model, payload codecs, and the type-code registry.
//!
//! This module is the pure, synchronous heart of the relay: bytes in, typed
//! packets out, and back to the identical bytes. Nothing here blocks, holds
//! shared mutable state, or touches a socket.
//!
//! ## Components
//! - **Packet**: header + payload sum type with human-readable rendering
//! - **Codec**: per-variant decode/encode over the little-endian wire layout
//! - **Registry**: immutable type-code to codec table, built once at startup
//! - **Wire**: cursor reader and buffer helpers the codecs are written with
//!
//! ## Wire Format
//! ```text
//! [TypeCode(2, big-endian)] [Payload(variant-specific, little-endian)]
//! ```
//!
//! There is no packet-length field; framing derives entirely from how many
//! bytes each payload decode consumes.

pub mod codec;
pub mod packet;
pub mod registry;
pub mod wire;
