use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::metadata::ServerAddress;

pub const DEFAULT_SERVER_IP: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 8765;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default = "default_shares")]
    pub shares: Vec<ShareMapping>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            client: ClientConfig::default(),
            shares: default_shares(),
        }
    }
}

/// Location of the remote metadata server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_ip")]
    pub ip: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Address to send metadata requests to.
    ///
    /// An empty ip or a zero port falls back to `127.0.0.1:8765`.
    pub fn address(&self) -> ServerAddress {
        ServerAddress::new(self.ip.clone(), self.port)
    }
}

fn default_ip() -> String {
    DEFAULT_SERVER_IP.to_string()
}
fn default_port() -> u16 {
    DEFAULT_SERVER_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: default_ip(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Per-request timeout for the outbound HTTP client (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Maps a network share (`\\host\share`) onto a local directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShareMapping {
    /// Share host name, compared case-sensitively
    pub host: String,

    /// Share root directly below the host
    pub share: String,

    /// Local directory the share is mounted at
    pub local_root: String,
}

impl ShareMapping {
    pub fn new(
        host: impl Into<String>,
        share: impl Into<String>,
        local_root: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            share: share.into(),
            local_root: local_root.into(),
        }
    }
}

impl Default for ShareMapping {
    fn default() -> Self {
        Self::new("shun920", "av", "/volume1/av")
    }
}

pub fn default_shares() -> Vec<ShareMapping> {
    vec![ShareMapping::default()]
}
