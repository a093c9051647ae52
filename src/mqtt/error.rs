//! Error types for the MQTT engine.
//!
//! Errors are small `Copy` enums so they can be returned and logged without
//! allocation. Each layer has its own type; [`Error`] is what the
//! [`Client`](super::Client) surfaces to callers.

use crate::network::error::Error as NetworkError;
use core::fmt;

/// Failures while building an outbound packet.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EncodeError {
    /// A string or binary field is longer than the 65,535 bytes its length
    /// prefix can describe.
    StringTooLong,
    /// The packet's remaining length exceeds what the 4-byte varint can hold.
    PacketTooLarge,
    /// Topic names and topic filters must not be empty.
    EmptyTopic,
    /// A packet that carries a packet identifier was given none (or zero).
    MissingPacketId,
}

/// Failures while parsing an inbound packet buffer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DecodeError {
    /// The buffer ends before a field (or the declared remaining length) does.
    Truncated,
    /// The packet type nibble does not name a known packet.
    UnknownPacketType(u8),
    /// The remaining length continuation sequence runs past 4 bytes.
    MalformedLength,
    /// The body does not match its packet type (bad flags, leftover bytes,
    /// reserved return codes, zero packet identifiers).
    MalformedPacket,
    /// A QoS field holds the reserved value 3.
    InvalidQoS(u8),
    /// A string field is not valid UTF-8.
    InvalidUtf8,
    /// A CONNECT names a protocol this crate does not speak.
    UnsupportedProtocol,
}

/// Failures while reassembling packets from the byte stream.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FrameError {
    /// Four remaining-length bytes were read without a terminating byte.
    MalformedLength,
    /// The declared packet does not fit the reassembly buffer.
    TooLarge {
        /// Declared remaining length of the rejected packet.
        declared: usize,
    },
}

/// Failures while loading a [`BrokerConfig`](super::BrokerConfig).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConfigError {
    /// The document is not valid JSON for the expected shape.
    Parse,
    /// No broker host was given.
    MissingHost,
}

/// Errors surfaced by the [`Client`](super::Client).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The transport failed; the connection has been torn down.
    Network(NetworkError),
    /// An outbound packet could not be encoded; nothing was sent.
    Encode(EncodeError),
    /// An inbound packet could not be decoded; the connection has been torn down.
    Decode(DecodeError),
    /// The byte stream could not be framed; the connection has been torn down.
    Frame(FrameError),
    /// The operation requires an accepted session.
    NotConnected,
    /// `connect` was called while a connection exists or is being set up.
    AlreadyConnected,
    /// Every packet identifier is held by an unacknowledged exchange.
    PacketIdsExhausted,
}

impl From<EncodeError> for Error {
    fn from(e: EncodeError) -> Self {
        Error::Encode(e)
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Error::Frame(e)
    }
}

impl From<NetworkError> for Error {
    fn from(e: NetworkError) -> Self {
        Error::Network(e)
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::StringTooLong => f.write_str("field longer than 65535 bytes"),
            EncodeError::PacketTooLarge => f.write_str("packet exceeds maximum remaining length"),
            EncodeError::EmptyTopic => f.write_str("empty topic"),
            EncodeError::MissingPacketId => f.write_str("missing packet identifier"),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Truncated => f.write_str("packet truncated"),
            DecodeError::UnknownPacketType(t) => write!(f, "unknown packet type {}", t),
            DecodeError::MalformedLength => f.write_str("malformed remaining length"),
            DecodeError::MalformedPacket => f.write_str("malformed packet"),
            DecodeError::InvalidQoS(q) => write!(f, "invalid QoS {}", q),
            DecodeError::InvalidUtf8 => f.write_str("invalid UTF-8 string"),
            DecodeError::UnsupportedProtocol => f.write_str("unsupported protocol"),
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::MalformedLength => f.write_str("malformed remaining length"),
            FrameError::TooLarge { declared } => {
                write!(f, "packet of {} bytes exceeds buffer", declared)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse => f.write_str("invalid configuration document"),
            ConfigError::MissingHost => f.write_str("missing broker host"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Network(e) => write!(f, "network: {}", e),
            Error::Encode(e) => write!(f, "encode: {}", e),
            Error::Decode(e) => write!(f, "decode: {}", e),
            Error::Frame(e) => write!(f, "framing: {}", e),
            Error::NotConnected => f.write_str("not connected"),
            Error::AlreadyConnected => f.write_str("already connected"),
            Error::PacketIdsExhausted => f.write_str("no free packet identifier"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EncodeError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            EncodeError::StringTooLong => defmt::write!(f, "StringTooLong"),
            EncodeError::PacketTooLarge => defmt::write!(f, "PacketTooLarge"),
            EncodeError::EmptyTopic => defmt::write!(f, "EmptyTopic"),
            EncodeError::MissingPacketId => defmt::write!(f, "MissingPacketId"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DecodeError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DecodeError::Truncated => defmt::write!(f, "Truncated"),
            DecodeError::UnknownPacketType(t) => defmt::write!(f, "UnknownPacketType({})", t),
            DecodeError::MalformedLength => defmt::write!(f, "MalformedLength"),
            DecodeError::MalformedPacket => defmt::write!(f, "MalformedPacket"),
            DecodeError::InvalidQoS(q) => defmt::write!(f, "InvalidQoS({})", q),
            DecodeError::InvalidUtf8 => defmt::write!(f, "InvalidUtf8"),
            DecodeError::UnsupportedProtocol => defmt::write!(f, "UnsupportedProtocol"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FrameError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            FrameError::MalformedLength => defmt::write!(f, "MalformedLength"),
            FrameError::TooLarge { declared } => defmt::write!(f, "TooLarge({})", declared),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ConfigError::Parse => defmt::write!(f, "Parse"),
            ConfigError::MissingHost => defmt::write!(f, "MissingHost"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Network(e) => defmt::write!(f, "Network({})", e),
            Error::Encode(e) => defmt::write!(f, "Encode({})", e),
            Error::Decode(e) => defmt::write!(f, "Decode({})", e),
            Error::Frame(e) => defmt::write!(f, "Frame({})", e),
            Error::NotConnected => defmt::write!(f, "NotConnected"),
            Error::AlreadyConnected => defmt::write!(f, "AlreadyConnected"),
            Error::PacketIdsExhausted => defmt::write!(f, "PacketIdsExhausted"),
        }
    }
}
