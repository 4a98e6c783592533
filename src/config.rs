//! # Configuration Management
//!
//! Centralized configuration for the relay and the dissection engine.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-variable overrides via `from_env()`
//!
//! The wire-layout constants that were reverse-engineered from observed
//! traffic (the beacon body length, the shoot tail length) live in
//! [`WireConfig`] rather than in the codecs, so a server build that frames
//! them differently needs a config change, not a recompile.

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::Level;

/// Observed beacon body length on the current server build.
pub const DEFAULT_BEACON_LENGTH: usize = 35;

/// Observed opaque tail length of a client shoot packet.
pub const DEFAULT_SHOOT_TAIL_LENGTH: usize = 12;

/// Default socket read size; one read may carry many packets.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

/// Top-level relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RelayConfig {
    /// Proxy listener configuration
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Wire-layout constants for the dissection engine
    #[serde(default)]
    pub wire: WireConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RelayConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ProtocolError::ConfigError(format!("failed to read config file: {e}")))?;
        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("RELAY_UPSTREAM_HOST") {
            config.proxy.upstream_host = host;
        }

        if let Ok(host) = std::env::var("RELAY_LISTEN_HOST") {
            config.proxy.listen_host = host;
        }

        if let Ok(port) = std::env::var("RELAY_MASTER_PORT") {
            if let Ok(val) = port.parse::<u16>() {
                config.proxy.master_port = val;
            }
        }

        if let Ok(size) = std::env::var("RELAY_READ_BUFFER_SIZE") {
            if let Ok(val) = size.parse::<usize>() {
                config.proxy.read_buffer_size = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Validate the configuration for common misconfigurations.
    ///
    /// Returns a list of validation errors. Empty list means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.proxy.validate());
        errors.extend(self.wire.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Proxy listener and upstream settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Address to accept game clients on (e.g. "0.0.0.0")
    pub listen_host: String,

    /// Hostname or IP of the real game server
    pub upstream_host: String,

    /// Matchmaking port, proxied alongside the game ports
    pub master_port: u16,

    /// First game port of the proxied range
    pub game_port_first: u16,

    /// Number of consecutive game ports to proxy
    pub game_port_count: u16,

    /// Socket read size per pump iteration
    pub read_buffer_size: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen_host: String::from("0.0.0.0"),
            upstream_host: String::from("127.0.0.1"),
            master_port: 3333,
            game_port_first: 3000,
            game_port_count: 6,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl ProxyConfig {
    /// Every port this proxy listens on: the game range plus the master port.
    pub fn ports(&self) -> Vec<u16> {
        let mut ports: Vec<u16> = (0..self.game_port_count)
            .map(|i| self.game_port_first + i)
            .collect();
        ports.push(self.master_port);
        ports
    }

    /// Validate proxy configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.listen_host.is_empty() {
            errors.push("listen host cannot be empty".to_string());
        }

        if self.upstream_host.is_empty() {
            errors.push("upstream host cannot be empty".to_string());
        }

        if self.game_port_count == 0 {
            errors.push("game port count must be greater than 0".to_string());
        }

        if u32::from(self.game_port_first) + u32::from(self.game_port_count) > 0x1_0000 {
            errors.push(format!(
                "game port range {}..{} overflows the port space",
                self.game_port_first,
                u32::from(self.game_port_first) + u32::from(self.game_port_count)
            ));
        }

        let in_game_range = self.master_port >= self.game_port_first
            && u32::from(self.master_port)
                < u32::from(self.game_port_first) + u32::from(self.game_port_count);
        if in_game_range {
            errors.push(format!(
                "master port {} collides with the game port range",
                self.master_port
            ));
        }

        if self.read_buffer_size < 2 {
            errors.push("read buffer must hold at least a packet header (2 bytes)".to_string());
        } else if self.read_buffer_size > 1024 * 1024 {
            errors.push(format!(
                "read buffer very large: {} bytes (maximum recommended: 1 MB)",
                self.read_buffer_size
            ));
        }

        errors
    }
}

/// Wire-layout constants for payloads whose fixed lengths were measured from
/// traffic rather than documented anywhere.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WireConfig {
    /// Beacon body length in bytes
    pub beacon_length: usize,

    /// Opaque tail length of a client shoot packet, in bytes
    pub shoot_tail_length: usize,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            beacon_length: DEFAULT_BEACON_LENGTH,
            shoot_tail_length: DEFAULT_SHOOT_TAIL_LENGTH,
        }
    }
}

impl WireConfig {
    /// Validate wire constants
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.beacon_length == 0 {
            errors.push("beacon length cannot be 0".to_string());
        } else if self.beacon_length > 1024 {
            errors.push(format!(
                "beacon length implausibly large: {} bytes",
                self.beacon_length
            ));
        }

        if self.shoot_tail_length > 1024 {
            errors.push(format!(
                "shoot tail length implausibly large: {} bytes",
                self.shoot_tail_length
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("relay-protocol"),
            log_level: Level::INFO,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("invalid log level: {level_str}")))
    }
}
