//! # Transparent TCP Relay
//!
//! The man-in-the-middle plumbing the dissection engine was built for.
//!
//! One listener per proxied port (the master/matchmaking port plus a
//! contiguous range of game ports). Each accepted client gets a fresh
//! connection to the real server and a pair of pump tasks, one per
//! direction. Every buffer a pump reads is dissected and logged best-effort,
//! then forwarded verbatim: observation never modifies, reorders, or blocks
//! traffic, and a dissection failure downgrades to a warning while the raw
//! bytes still go through.

use std::fmt;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{
    tcp::{OwnedReadHalf, OwnedWriteHalf},
    TcpListener, TcpStream,
};
use tracing::{debug, error, info, instrument, warn};

use crate::config::RelayConfig;
use crate::core::registry::Registry;
use crate::dissect::Dissector;
use crate::error::Result;
use crate::utils::metrics::global_metrics;

/// Which way a pump is carrying bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ClientToServer,
    ServerToClient,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ClientToServer => write!(f, "client->server"),
            Direction::ServerToClient => write!(f, "server->client"),
        }
    }
}

/// Transparent relay over every configured port.
pub struct Relay {
    config: RelayConfig,
    dissector: Arc<Dissector>,
}

impl Relay {
    /// Build a relay from configuration, using the standard packet registry.
    pub fn new(config: RelayConfig) -> Self {
        let dissector = Arc::new(Dissector::new(Registry::standard(), config.wire.clone()));
        Self { config, dissector }
    }

    /// Build a relay with a caller-supplied dissector (e.g. a custom
    /// registry for a different game build).
    pub fn with_dissector(config: RelayConfig, dissector: Dissector) -> Self {
        Self {
            config,
            dissector: Arc::new(dissector),
        }
    }

    /// Bind every configured port and relay until ctrl-c.
    pub async fn run(self) -> Result<()> {
        let mut tasks = Vec::new();
        for port in self.config.proxy.ports() {
            let addr = format!("{}:{port}", self.config.proxy.listen_host);
            let listener = TcpListener::bind(&addr).await?;
            info!(address = %addr, "relay listening");

            let upstream = format!("{}:{port}", self.config.proxy.upstream_host);
            let dissector = self.dissector.clone();
            let buf_size = self.config.proxy.read_buffer_size;
            tasks.push(tokio::spawn(async move {
                if let Err(e) = serve(listener, upstream, dissector, buf_size).await {
                    error!(error = %e, "port relay terminated");
                }
            }));
        }

        tokio::signal::ctrl_c().await?;
        info!("received CTRL+C, shutting down relay");
        global_metrics().log_metrics();

        for task in &tasks {
            task.abort();
        }
        Ok(())
    }
}

/// Accept clients on `listener` forever, proxying each to `upstream`.
///
/// One client at a time per port, matching how the game connects; when a
/// session ends the listener goes back to accepting.
#[instrument(skip_all, fields(upstream = %upstream))]
pub async fn serve(
    listener: TcpListener,
    upstream: String,
    dissector: Arc<Dissector>,
    buf_size: usize,
) -> Result<()> {
    loop {
        let (client, peer) = listener.accept().await?;
        info!(peer = %peer, "client connected");
        global_metrics().connection_opened();

        let server = match TcpStream::connect(&upstream).await {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "failed to reach upstream server");
                global_metrics().connection_closed();
                continue;
            }
        };
        debug!("upstream connection established");

        let (client_rd, client_wr) = client.into_split();
        let (server_rd, server_wr) = server.into_split();

        let c2s = tokio::spawn(pump(
            client_rd,
            server_wr,
            Direction::ClientToServer,
            dissector.clone(),
            buf_size,
        ));
        let s2c = tokio::spawn(pump(
            server_rd,
            client_wr,
            Direction::ServerToClient,
            dissector.clone(),
            buf_size,
        ));

        // Either half ending (EOF or socket error) ends the session.
        let _ = c2s.await;
        let _ = s2c.await;
        global_metrics().connection_closed();
        info!(peer = %peer, "session closed");
    }
}

/// Forward bytes one way, dissecting each read for observation.
async fn pump(
    mut rd: OwnedReadHalf,
    mut wr: OwnedWriteHalf,
    direction: Direction,
    dissector: Arc<Dissector>,
    buf_size: usize,
) {
    let mut buf = vec![0u8; buf_size];
    loop {
        let n = match rd.read(&mut buf).await {
            Ok(0) => {
                debug!(direction = %direction, "peer closed");
                break;
            }
            Ok(n) => n,
            Err(e) => {
                warn!(direction = %direction, error = %e, "read failed");
                break;
            }
        };

        observe(&dissector, direction, &buf[..n]);

        if let Err(e) = wr.write_all(&buf[..n]).await {
            warn!(direction = %direction, error = %e, "forward failed");
            break;
        }
        global_metrics().bytes_forwarded(direction, n as u64);
    }
    // half-close so the peer's read loop sees EOF instead of hanging
    let _ = wr.shutdown().await;
}

/// Best-effort dissection of one read buffer. Never fails the pump.
fn observe(dissector: &Dissector, direction: Direction, data: &[u8]) {
    // two zero bytes is the idle keep-alive; not worth a log line
    if data == [0x00, 0x00] {
        return;
    }

    for item in dissector.dissect(data) {
        match item {
            Ok(frame) => {
                global_metrics().packet_dissected(
                    !dissector.registry().contains(frame.packet.header.code()),
                );
                debug!(direction = %direction, offset = frame.offset, "{}", frame.packet);
            }
            Err(e) => {
                global_metrics().decode_error();
                warn!(direction = %direction, error = %e, "dissection failed, forwarding raw");
                break;
            }
        }
    }
}
