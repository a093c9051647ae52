//! MQTT 3.1 / 3.1.1 client protocol engine.
//!
//! The engine is layered leaf-first:
//!
//! - [`varint`]: the remaining-length field codec
//! - [`packet`]: byte-exact encoding and decoding of control packets
//! - [`framer`]: reassembly of a chunked byte stream into packet buffers
//! - [`session`]: the transport-free state machine (handshake, QoS flows,
//!   keep-alive, packet identifiers)
//! - [`client`]: the driver binding a [`network`](crate::network) transport to
//!   the layers above
//!
//! Most applications only need [`Client`], [`ConnectOptions`], [`Event`] and
//! [`QoS`].

pub mod client;
pub mod error;
pub mod framer;
pub mod options;
pub mod packet;
pub mod session;
pub mod varint;

pub use client::Client;
pub use error::{ConfigError, DecodeError, EncodeError, Error, FrameError};
pub use framer::{DEFAULT_MAX_PACKET_SIZE, Reassembler};
pub use options::{
    BrokerConfig, ConnectOptions, DEFAULT_KEEP_ALIVE, KEEP_ALIVE_TICK_MS, LastWill,
    ProtocolVersion,
};
pub use packet::{ConnectReturnCode, Packet, QoS, SubscribeReturnCode};
pub use session::{Action, Event, Session, State};
