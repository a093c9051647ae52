//! Client driver: binds a transport, a [`Reassembler`] and a [`Session`].
//!
//! The client performs the actual reads and writes, and applies the error
//! policy: transport failures and protocol violations close the connection and
//! return to [`State::Disconnected`]; no reconnect is attempted.

use super::error::Error;
use super::framer::{ReadError, Reassembler, DEFAULT_MAX_PACKET_SIZE};
use super::options::{BrokerConfig, ConnectOptions};
use super::packet::QoS;
use super::session::{Action, Event, Session, State};
use crate::network::error::Error as NetworkError;
use crate::network::{Close, Connect, Security, Write};
use alloc::string::String;
use core::fmt;

/// MQTT client over a transport opened by `N`.
///
/// `MAX` bounds the size of an inbound packet.
pub struct Client<N: Connect, const MAX: usize = DEFAULT_MAX_PACKET_SIZE> {
    network: N,
    host: String,
    port: u16,
    connection: Option<N::Connection>,
    framer: Reassembler<MAX>,
    session: Session,
}

impl<N: Connect, const MAX: usize> fmt::Debug for Client<N, MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("open", &self.connection.is_some())
            .field("session", &self.session)
            .finish()
    }
}

impl<N, const MAX: usize> Client<N, MAX>
where
    N: Connect,
    N::Error: Into<NetworkError>,
{
    /// Create a disconnected client for the broker at `host:port`.
    pub fn new(network: N, host: &str, port: u16) -> Self {
        Self {
            network,
            host: String::from(host),
            port,
            connection: None,
            framer: Reassembler::new(),
            session: Session::new(),
        }
    }

    /// Create a disconnected client for the broker named in `config`.
    ///
    /// Connect with `config.connect` and `config.security()`.
    pub fn from_config(network: N, config: &BrokerConfig) -> Self {
        Self::new(network, &config.host, config.port)
    }

    /// Current session state.
    pub fn state(&self) -> State {
        self.session.state()
    }

    /// Open the transport and send CONNECT.
    ///
    /// The client is `Connecting` until the broker's CONNACK is read by
    /// [`poll`](Self::poll).
    pub fn connect(&mut self, options: ConnectOptions, security: Security) -> Result<(), Error> {
        if self.connection.is_some() || self.session.state() != State::Disconnected {
            return Err(Error::AlreadyConnected);
        }
        let mut connection = self
            .network
            .connect(&self.host, self.port, security)
            .map_err(|e| Error::Network(e.into()))?;
        info!("transport open to port {}", self.port);

        let bytes = match self.session.begin_connect(&options) {
            Ok(bytes) => bytes,
            Err(e) => {
                if connection.close().is_err() {
                    warn!("transport close failed");
                }
                return Err(e);
            }
        };
        self.framer.reset();
        self.connection = Some(connection);
        self.send(&bytes)
    }

    /// Publish `payload` to `topic`.
    ///
    /// Returns the packet identifier for QoS 1 and 2, which the matching
    /// [`Event::Published`] carries.
    pub fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<Option<u16>, Error> {
        let (packet_id, bytes) = self.session.publish(topic, payload, qos, retain)?;
        self.send(&bytes)?;
        Ok(packet_id)
    }

    /// Subscribe to one topic filter; returns the packet identifier.
    pub fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<u16, Error> {
        let (packet_id, bytes) = self.session.subscribe(topic, qos)?;
        self.send(&bytes)?;
        Ok(packet_id)
    }

    /// Unsubscribe from one topic filter; returns the packet identifier.
    pub fn unsubscribe(&mut self, topic: &str) -> Result<u16, Error> {
        let (packet_id, bytes) = self.session.unsubscribe(topic)?;
        self.send(&bytes)?;
        Ok(packet_id)
    }

    /// Read whatever the transport has, dispatch complete packets, and return
    /// the next event.
    ///
    /// Returns `Ok(None)` once the transport has nothing more and no event is
    /// queued. Replies the session asks for are written before returning.
    pub fn poll(&mut self) -> Result<Option<Event>, Error> {
        while !self.session.has_events() {
            let Some(connection) = self.connection.as_mut() else {
                break;
            };
            let read = match self.framer.read_from(connection) {
                Ok(n) => n,
                Err(ReadError::Transport(_)) => {
                    error!("transport read failed");
                    self.teardown();
                    return Err(Error::Network(NetworkError::ReadError));
                }
                Err(ReadError::Frame(e)) => {
                    self.teardown();
                    return Err(Error::Frame(e));
                }
            };
            if let Some(frame) = self.framer.take_frame() {
                self.dispatch(&frame)?;
            } else if read == 0 {
                break;
            }
        }
        Ok(self.session.next_event())
    }

    /// Pop a queued event without reading the transport.
    pub fn next_event(&mut self) -> Option<Event> {
        self.session.next_event()
    }

    /// Keep-alive tick; call once every
    /// [`KEEP_ALIVE_TICK_MS`](super::KEEP_ALIVE_TICK_MS).
    pub fn tick(&mut self) -> Result<(), Error> {
        match self.session.tick() {
            Some(ping) => self.send(&ping),
            None => Ok(()),
        }
    }

    /// Send DISCONNECT if a session is up, then close the transport.
    ///
    /// Idempotent; always leaves the client `Disconnected`.
    pub fn disconnect(&mut self) -> Result<(), Error> {
        if let Some(bytes) = self.session.disconnect() {
            if self.write_all(&bytes).is_err() {
                warn!("DISCONNECT could not be sent");
            }
        }
        self.teardown();
        Ok(())
    }

    fn dispatch(&mut self, frame: &[u8]) -> Result<(), Error> {
        match self.session.handle_frame(frame) {
            Ok(Some(Action::Send(bytes))) => self.send(&bytes),
            Ok(Some(Action::Close)) => {
                self.teardown();
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                error!("dropping connection on undecodable packet");
                self.teardown();
                Err(Error::Decode(e))
            }
        }
    }

    /// Write `bytes`, tearing the connection down on failure.
    fn send(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.write_all(bytes).inspect_err(|_| {
            error!("transport write failed");
            self.teardown();
        })
    }

    fn write_all(&mut self, mut bytes: &[u8]) -> Result<(), Error> {
        let connection = self
            .connection
            .as_mut()
            .ok_or(Error::Network(NetworkError::NotOpen))?;
        while !bytes.is_empty() {
            match connection.write(bytes) {
                Ok(0) | Err(_) => return Err(Error::Network(NetworkError::WriteError)),
                Ok(n) => bytes = &bytes[n.min(bytes.len())..],
            }
        }
        connection
            .flush()
            .map_err(|_| Error::Network(NetworkError::WriteError))
    }

    fn teardown(&mut self) {
        if let Some(connection) = self.connection.take() {
            if connection.close().is_err() {
                warn!("transport close failed");
            }
            info!("transport closed");
        }
        self.framer.reset();
        self.session.connection_lost();
    }
}
