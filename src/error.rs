//! # Error Types
//!
//! Error handling for the relay protocol core.
//!
//! This module defines every error variant the dissection engine and the
//! relay can produce, from truncated wire data to socket failures.
//!
//! ## Error Categories
//! - **Wire Errors**: truncated headers/payloads, bad text lengths
//! - **Framing Errors**: stream iteration that would stall or overrun
//! - **I/O Errors**: relay-side socket failures
//! - **Configuration Errors**: invalid or unreadable configuration
//!
//! All variants are recoverable by the caller: the core never terminates the
//! process, and a dissection failure never blocks raw traffic forwarding.
//! Unknown packet type codes are *not* errors; they fall back to opaque
//! decoding upstream.

use std::io;
use thiserror::Error;

/// Primary error type for dissection and relay operations.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Fewer than the two bytes needed for a packet header.
    #[error("truncated header: {0} bytes available, need 2")]
    TruncatedHeader(usize),

    /// The payload slice is shorter than the variant's minimum length.
    #[error("truncated payload: need {needed} bytes, {available} available")]
    TruncatedPayload { needed: usize, available: usize },

    /// A declared text length exceeds the remaining slice, or the name bytes
    /// are not single-byte text.
    #[error("invalid text encoding: {0}")]
    InvalidEncoding(String),

    /// Stream iteration would consume zero bytes or overrun the buffer.
    #[error("framing error at offset {offset}: {reason}")]
    FramingError { offset: usize, reason: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
