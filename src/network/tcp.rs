//! Blocking TCP transport built on `std::net::TcpStream`.
//!
//! Reads use a short timeout so that [`Client::poll`](crate::mqtt::Client::poll)
//! returns control to the caller regularly; a timed-out read reports `Ok(0)`.
//! TLS is not provided here: asking for [`Security::Tls`] fails with
//! [`Error::Unsupported`], and callers wanting TLS supply their own [`Connect`].

use super::error::Error;
use super::{Close, Connect, Connection, Read, Security, Write};
use std::io::{ErrorKind, Read as StdRead, Write as StdWrite};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

/// Default read timeout applied to new connections.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Opens [`TcpConnection`]s.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    read_timeout: Duration,
}

impl TcpConnector {
    /// Create a connector using [`DEFAULT_READ_TIMEOUT`].
    pub fn new() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Create a connector whose connections time reads out after `read_timeout`.
    pub fn with_read_timeout(read_timeout: Duration) -> Self {
        Self { read_timeout }
    }
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connect for TcpConnector {
    type Connection = TcpConnection;
    type Error = Error;

    fn connect(
        &mut self,
        host: &str,
        port: u16,
        security: Security,
    ) -> Result<Self::Connection, Self::Error> {
        if security == Security::Tls {
            return Err(Error::Unsupported);
        }
        let stream = TcpStream::connect((host, port)).map_err(|e| match e.kind() {
            ErrorKind::InvalidInput => Error::InvalidAddress,
            _ => Error::ConnectionRefused,
        })?;
        stream
            .set_read_timeout(Some(self.read_timeout))
            .map_err(|_| Error::ConnectionRefused)?;
        stream
            .set_nodelay(true)
            .map_err(|_| Error::ConnectionRefused)?;
        Ok(TcpConnection { stream })
    }
}

/// A connected TCP stream.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
}

impl Read for TcpConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.stream.read(buf) {
            Ok(0) => Err(Error::ConnectionClosed),
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => Ok(0),
            Err(e) if e.kind() == ErrorKind::Interrupted => Ok(0),
            Err(_) => Err(Error::ReadError),
        }
    }
}

impl Write for TcpConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.stream.write(buf).map_err(|_| Error::WriteError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stream.flush().map_err(|_| Error::WriteError)
    }
}

impl Close for TcpConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            Err(_) => Err(Error::NotOpen),
        }
    }
}

impl Connection for TcpConnection {}
