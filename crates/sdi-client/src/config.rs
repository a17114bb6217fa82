//! Client configuration.

use serde::{Deserialize, Serialize};

use crate::ClientError;

/// Port the game server listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 5577;

/// Simulation ticks per second.
pub const DEFAULT_TICK_RATE_HZ: u32 = 60;

/// Everything the client needs to reach a server and run its tick loop.
///
/// Every field except `host` has a default, so a JSON document only needs
/// the values it wants to change:
///
/// ```json
/// { "host": "192.168.1.20", "tick_rate_hz": 30 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server host name or address.
    #[serde(default)]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,

    /// Slot count of the entity registry. Ids at or above this are fatal.
    #[serde(default = "default_entity_capacity")]
    pub entity_capacity: usize,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_tick_rate_hz() -> u32 {
    DEFAULT_TICK_RATE_HZ
}

fn default_entity_capacity() -> usize {
    sdi_world::DEFAULT_CAPACITY
}

impl ClientConfig {
    /// Highest tick rate the frame clock accepts.
    pub const MAX_TICK_RATE_HZ: u32 = 240;

    /// A config for `host` with every other value at its default.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            entity_capacity: sdi_world::DEFAULT_CAPACITY,
        }
    }

    /// Parses a JSON config document and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, ClientError> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    /// Checks the values the client cannot run with.
    pub fn validated(self) -> Result<Self, ClientError> {
        if self.host.trim().is_empty() {
            return Err(ClientError::InvalidConfig("host must not be empty".into()));
        }
        if self.tick_rate_hz == 0 || self.tick_rate_hz > Self::MAX_TICK_RATE_HZ {
            return Err(ClientError::InvalidConfig(format!(
                "tick_rate_hz must be between 1 and {}, got {}",
                Self::MAX_TICK_RATE_HZ,
                self.tick_rate_hz
            )));
        }
        if self.entity_capacity == 0 {
            return Err(ClientError::InvalidConfig(
                "entity_capacity must be positive".into(),
            ));
        }
        Ok(self)
    }

    /// The connect target, `host:port`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
