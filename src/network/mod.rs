//! Transport abstraction for the MQTT engine.
//!
//! The protocol engine never touches sockets directly. Instead it is generic over
//! the small set of traits defined here, so the same client runs over a hosted
//! TCP stream, an embedded network stack, a TLS session, or an in-memory mock.
//!
//! # Contract
//!
//! - [`Read::read`] returns `Ok(0)` when no data is available *right now*. End of
//!   stream and transport failures are reported as errors.
//! - Bytes are delivered in order, possibly in arbitrarily small chunks.
//! - [`Close::close`] consumes the connection, so a closed connection cannot be
//!   used again.

#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

/// Blocking TCP transport over `std::net`.
#[cfg(feature = "std")]
pub mod tcp;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connect, Connection, Read, Security, Write};
}

/// Read bytes from a connection.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read available data into `buf`, returning the number of bytes read.
    ///
    /// `Ok(0)` means nothing is available yet; it does not signal end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Write bytes to a connection.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection, returning how many bytes were accepted.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Close a connection.
pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A bidirectional byte-stream connection.
pub trait Connection: Read + Write + Close {}

/// Whether a connection should be opened in the clear or over TLS.
///
/// TLS itself is the transport's business; the engine only forwards the
/// caller's choice to [`Connect::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// Plain TCP, usually port 1883.
    #[default]
    Plain,
    /// TLS-secured stream, usually port 8883.
    Tls,
}

/// Opens connections to a remote host (client side).
///
/// [`Client`](crate::mqtt::Client) reports connect failures as
/// [`error::Error`], so drivers it uses convert their error into it.
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection to `host:port`.
    fn connect(
        &mut self,
        host: &str,
        port: u16,
        security: Security,
    ) -> Result<Self::Connection, Self::Error>;
}
