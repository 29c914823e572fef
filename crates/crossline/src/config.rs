//! Server configuration.

use std::path::Path;

use crossline_transport::DEFAULT_MAX_LINE_LEN;
use serde::{Deserialize, Serialize};

use crate::CrosslineError;

/// The port the original game client expects.
pub const DEFAULT_PORT: u16 = 12345;

/// Settings for a [`CrosslineServer`](crate::CrosslineServer).
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```json
/// { "bind_addr": "127.0.0.1:4000" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub bind_addr: String,

    /// Longest inbound line accepted before the connection is dropped.
    pub max_line_len: usize,

    /// Capacity of the coordinator's command queue.
    pub command_queue: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            max_line_len: DEFAULT_MAX_LINE_LEN,
            command_queue: 32,
        }
    }
}

impl ServerConfig {
    /// Parses a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self, CrosslineError> {
        serde_json::from_str(text).map_err(|e| CrosslineError::Config(e.to_string()))
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, CrosslineError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CrosslineError::Config(format!("{}: {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// Replaces the host and/or port of `bind_addr`, keeping the other half.
    pub fn override_bind(&mut self, host: Option<&str>, port: Option<u16>) {
        if host.is_none() && port.is_none() {
            return;
        }
        let (current_host, current_port) = match self.bind_addr.rsplit_once(':') {
            Some((h, p)) => (h.to_string(), p.parse().unwrap_or(DEFAULT_PORT)),
            None => (self.bind_addr.clone(), DEFAULT_PORT),
        };
        let host = host.map(str::to_string).unwrap_or(current_host);
        let port = port.unwrap_or(current_port);
        self.bind_addr = format!("{host}:{port}");
    }
}
