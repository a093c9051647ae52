//! # libmqtt - MQTT client protocol engine
//!
//! A Rust MQTT 3.1/3.1.1 client designed for IoT devices. The protocol engine
//! (packet codec, stream reassembler and session state machine) works in
//! `no_std` environments with an allocator, and is driven by the caller over
//! any byte-stream transport implementing the [`network`] traits.
//!
//! ## Features
//!
//! - Byte-exact encoding and decoding of every MQTT 3.1.1 control packet
//! - Stream reassembly tolerant of arbitrary (even single-byte) deliveries
//! - QoS 0, 1 and 2 publish flows with packet identifier bookkeeping
//! - Keep-alive pings driven by an external periodic tick
//! - Typed event queue for connection, acknowledgement and message events
//! - JSON configuration through `serde-json-core`
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libmqtt = "0.1.0"
//! ```
//!
//! ### Client Example
//!
//! ```rust,no_run
//! use libmqtt::mqtt::{Client, ConnectOptions, Event, QoS};
//! use libmqtt::network::{Close, Connect, Connection, Read, Security, Write};
//! # struct MockConnection;
//! # impl Connection for MockConnection {}
//! # impl Read for MockConnection {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl Write for MockConnection {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Close for MockConnection {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockNetwork;
//! # impl Connect for MockNetwork {
//! #     type Connection = MockConnection;
//! #     type Error = libmqtt::network::error::Error;
//! #     fn connect(&mut self, _host: &str, _port: u16, _security: Security) -> Result<MockConnection, Self::Error> {
//! #         Ok(MockConnection)
//! #     }
//! # }
//!
//! let mut client: Client<MockNetwork> = Client::new(MockNetwork, "broker.local", 1883);
//! let options = ConnectOptions::new("sensor_device_01").keep_alive(30);
//!
//! client.connect(options, Security::Plain)?;
//! // Call `client.tick()` once per second from a timer, and poll for events:
//! while let Some(event) = client.poll()? {
//!     if let Event::Connected { .. } = event {
//!         client.publish("sensors/temperature", b"23.5", QoS::AtLeastOnce, false)?;
//!     }
//! }
//! # Ok::<(), libmqtt::mqtt::Error>(())
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support and the blocking TCP transport
//! - `v31`: Speak MQTT 3.1 ("MQIsdp") instead of 3.1.1 by default
//! - `defmt`: Enable defmt logging and `defmt::Format` impls
//! - `log`: Route logging through the `log` facade

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

extern crate alloc;

#[macro_use]
mod logging;

/// Transport abstraction the protocol engine runs over.
///
/// Contains the connection traits a transport must implement, the common
/// transport error type, and (with the `std` feature) a blocking TCP transport.
pub mod network;

/// MQTT protocol engine: codec, stream reassembler, session and client.
pub mod mqtt;
