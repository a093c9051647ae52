//! Connection options and broker configuration.
//!
//! [`ConnectOptions`] is the snapshot a [`Client`](super::Client) turns into a
//! CONNECT packet. It can be built in code:
//!
//! ```rust
//! use libmqtt::mqtt::{ConnectOptions, QoS};
//!
//! let options = ConnectOptions::new("weather-station")
//!     .clean_session(true)
//!     .keep_alive(30)
//!     .credentials("station", "hunter2")
//!     .last_will("stations/weather-station", "offline", QoS::AtLeastOnce, true);
//! assert_eq!(options.keep_alive, 30);
//! ```
//!
//! or loaded, together with the broker address, from JSON:
//!
//! ```rust
//! use libmqtt::mqtt::BrokerConfig;
//!
//! let config = BrokerConfig::from_json(
//!     r#"{"host":"broker.local","connect":{"client_id":"probe","keep_alive":15}}"#,
//! )
//! .unwrap();
//! assert_eq!(config.port, 1883);
//! assert_eq!(config.connect.keep_alive, 15);
//! ```

use super::error::ConfigError;
use super::packet::QoS;
use crate::network::Security;
use alloc::string::String;
use serde::Deserialize;

/// Keep-alive interval, in seconds, used when none is configured.
pub const DEFAULT_KEEP_ALIVE: u16 = 60;

/// Expected period of [`Client::tick`](super::Client::tick), in milliseconds.
pub const KEEP_ALIVE_TICK_MS: u32 = 1000;

/// Default port for plain MQTT.
pub const DEFAULT_PORT: u16 = 1883;

/// Longest configuration string, in bytes after unescaping, that may contain
/// JSON escape sequences.
pub const MAX_ESCAPED_STRING: usize = 256;

/// MQTT protocol revision announced in CONNECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ProtocolVersion {
    /// MQTT 3.1: protocol name "MQIsdp", level 3.
    #[serde(rename = "3.1")]
    V31,
    /// MQTT 3.1.1: protocol name "MQTT", level 4.
    #[serde(rename = "3.1.1")]
    V311,
}

impl ProtocolVersion {
    /// Protocol name string carried in CONNECT.
    pub fn name(&self) -> &'static str {
        match self {
            ProtocolVersion::V31 => "MQIsdp",
            ProtocolVersion::V311 => "MQTT",
        }
    }

    /// Protocol level byte carried in CONNECT.
    pub fn level(&self) -> u8 {
        match self {
            ProtocolVersion::V31 => 3,
            ProtocolVersion::V311 => 4,
        }
    }

    /// Match a protocol name and level read off the wire.
    pub fn from_wire(name: &str, level: u8) -> Option<Self> {
        match (name, level) {
            ("MQIsdp", 3) => Some(ProtocolVersion::V31),
            ("MQTT", 4) => Some(ProtocolVersion::V311),
            _ => None,
        }
    }
}

/// MQTT 3.1.1 unless the crate is built with the `v31` feature.
impl Default for ProtocolVersion {
    fn default() -> Self {
        if cfg!(feature = "v31") {
            ProtocolVersion::V31
        } else {
            ProtocolVersion::V311
        }
    }
}

/// Message the broker publishes on the client's behalf if it disconnects
/// without sending DISCONNECT.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LastWill {
    /// Topic the will is published to.
    pub topic: String,
    /// Will payload.
    pub message: String,
    /// QoS of the will publication.
    #[serde(default)]
    pub qos: QoS,
    /// Whether the will is retained.
    #[serde(default)]
    pub retain: bool,
}

/// Parameters of one connection attempt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectOptions {
    /// Client identifier presented to the broker.
    pub client_id: String,
    /// Ask the broker to discard any stored session.
    #[serde(default)]
    pub clean_session: bool,
    /// Keep-alive interval in seconds; 0 disables keep-alive pings.
    #[serde(default = "default_keep_alive")]
    pub keep_alive: u16,
    /// User name; empty counts as absent.
    #[serde(default)]
    pub username: Option<String>,
    /// Password; only sent with a non-empty user name.
    #[serde(default)]
    pub password: Option<String>,
    /// Optional last will.
    #[serde(default)]
    pub last_will: Option<LastWill>,
    /// Protocol revision.
    #[serde(default)]
    pub protocol: ProtocolVersion,
}

fn default_keep_alive() -> u16 {
    DEFAULT_KEEP_ALIVE
}

impl ConnectOptions {
    /// Options for `client_id` with everything else at its default.
    pub fn new(client_id: &str) -> Self {
        Self {
            client_id: String::from(client_id),
            ..Self::default()
        }
    }

    /// Set the clean-session flag.
    pub fn clean_session(mut self, clean_session: bool) -> Self {
        self.clean_session = clean_session;
        self
    }

    /// Set the keep-alive interval in seconds.
    pub fn keep_alive(mut self, seconds: u16) -> Self {
        self.keep_alive = seconds;
        self
    }

    /// Set the user name and password.
    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.username = Some(String::from(username));
        self.password = Some(String::from(password));
        self
    }

    /// Set the last will.
    pub fn last_will(mut self, topic: &str, message: &str, qos: QoS, retain: bool) -> Self {
        self.last_will = Some(LastWill {
            topic: String::from(topic),
            message: String::from(message),
            qos,
            retain,
        });
        self
    }

    /// Override the protocol revision.
    pub fn protocol(mut self, protocol: ProtocolVersion) -> Self {
        self.protocol = protocol;
        self
    }
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            clean_session: false,
            keep_alive: DEFAULT_KEEP_ALIVE,
            username: None,
            password: None,
            last_will: None,
            protocol: ProtocolVersion::default(),
        }
    }
}

/// Where and how to connect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BrokerConfig {
    /// Broker host name or address.
    pub host: String,
    /// Broker port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request a TLS transport.
    #[serde(default)]
    pub secure: bool,
    /// Options for the CONNECT packet.
    #[serde(default)]
    pub connect: ConnectOptions,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl BrokerConfig {
    /// Parse a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Parse`] if the document is not valid JSON for this
    ///   shape, or an escaped string unescapes to more than
    ///   [`MAX_ESCAPED_STRING`] bytes
    /// - [`ConfigError::MissingHost`] if `host` is empty
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut scratch = [0u8; MAX_ESCAPED_STRING];
        let (config, _): (BrokerConfig, usize) =
            serde_json_core::from_str_escaped(json, &mut scratch)
                .map_err(|_| ConfigError::Parse)?;
        if config.host.is_empty() {
            return Err(ConfigError::MissingHost);
        }
        Ok(config)
    }

    /// Transport security requested by this configuration.
    pub fn security(&self) -> Security {
        if self.secure {
            Security::Tls
        } else {
            Security::Plain
        }
    }
}
