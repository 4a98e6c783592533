//! Observability counters for the relay and the dissection engine.
//!
//! Uses atomic counters for thread-safe collection; the dissector itself
//! stays pure and the relay's pump tasks record here instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

use crate::relay::Direction;

/// Metrics collector for relay operations.
#[derive(Debug)]
pub struct Metrics {
    /// Total sessions established
    pub connections_total: AtomicU64,
    /// Currently active sessions
    pub connections_active: AtomicU64,
    /// Total packets dissected
    pub packets_dissected: AtomicU64,
    /// Packets that fell back to the opaque codec
    pub packets_opaque: AtomicU64,
    /// Buffers whose dissection failed (still forwarded raw)
    pub decode_errors: AtomicU64,
    /// Bytes forwarded client to server
    pub bytes_client_to_server: AtomicU64,
    /// Bytes forwarded server to client
    pub bytes_server_to_client: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            connections_total: AtomicU64::new(0),
            connections_active: AtomicU64::new(0),
            packets_dissected: AtomicU64::new(0),
            packets_opaque: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
            bytes_client_to_server: AtomicU64::new(0),
            bytes_server_to_client: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn packet_dissected(&self, opaque: bool) {
        self.packets_dissected.fetch_add(1, Ordering::Relaxed);
        if opaque {
            self.packets_opaque.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_forwarded(&self, direction: Direction, count: u64) {
        match direction {
            Direction::ClientToServer => {
                self.bytes_client_to_server.fetch_add(count, Ordering::Relaxed)
            }
            Direction::ServerToClient => {
                self.bytes_server_to_client.fetch_add(count, Ordering::Relaxed)
            }
        };
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            packets_dissected: self.packets_dissected.load(Ordering::Relaxed),
            packets_opaque: self.packets_opaque.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            bytes_client_to_server: self.bytes_client_to_server.load(Ordering::Relaxed),
            bytes_server_to_client: self.bytes_server_to_client.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            connections_total = snapshot.connections_total,
            connections_active = snapshot.connections_active,
            packets_dissected = snapshot.packets_dissected,
            packets_opaque = snapshot.packets_opaque,
            decode_errors = snapshot.decode_errors,
            bytes_client_to_server = snapshot.bytes_client_to_server,
            bytes_server_to_client = snapshot.bytes_server_to_client,
            uptime_seconds = snapshot.uptime_seconds,
            "relay metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub connections_total: u64,
    pub connections_active: u64,
    pub packets_dissected: u64,
    pub packets_opaque: u64,
    pub decode_errors: u64,
    pub bytes_client_to_server: u64,
    pub bytes_server_to_client: u64,
    pub uptime_seconds: u64,
}

/// Global metrics instance
static METRICS: once_cell::sync::Lazy<Metrics> = once_cell::sync::Lazy::new(Metrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static Metrics {
    &METRICS
}
