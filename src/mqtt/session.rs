//! Session state machine.
//!
//! [`Session`] sequences MQTT packets without touching a transport: outbound
//! operations return the bytes to send, inbound frames go through
//! [`Session::handle_frame`] and may produce an [`Action`], and the periodic
//! [`Session::tick`] may produce a keep-alive ping. Everything the caller needs
//! to know about is queued as an [`Event`].
//!
//! ```text
//!                 begin_connect               CONNACK 0
//!  Disconnected ───────────────▶ Connecting ───────────▶ Connected
//!        ▲                           │                       │
//!        └──── CONNACK refused ──────┘                       │
//!        └──────────── connection_lost / disconnect ─────────┘
//! ```
//!
//! Packet identifiers come from a per-session counter that increments before
//! use, wraps, and skips zero. An identifier stays reserved until its exchange
//! completes (PUBACK, PUBCOMP, SUBACK or UNSUBACK) or the connection ends, and
//! is never handed out twice while reserved.

use super::error::{DecodeError, Error};
use super::options::ConnectOptions;
use super::packet::{
    ConnAck, Connect, ConnectReturnCode, Packet, Publish, QoS, SubAck, Subscribe,
    SubscribeReturnCode, Unsubscribe,
};
use alloc::collections::{BTreeMap, VecDeque};
use alloc::string::String;
use alloc::vec::Vec;

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// No transport, or the transport has been closed.
    #[default]
    Disconnected,
    /// CONNECT sent, waiting for CONNACK.
    Connecting,
    /// The broker accepted the session.
    Connected,
}

#[cfg(feature = "defmt")]
impl defmt::Format for State {
    fn format(&self, f: defmt::Formatter) {
        match self {
            State::Disconnected => defmt::write!(f, "Disconnected"),
            State::Connecting => defmt::write!(f, "Connecting"),
            State::Connected => defmt::write!(f, "Connected"),
        }
    }
}

/// Something the caller should know about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The broker accepted the connection.
    Connected {
        /// Whether the broker resumed a stored session.
        session_present: bool,
    },
    /// The broker refused the connection; the transport is closed.
    ConnectionRefused(ConnectReturnCode),
    /// The connection ended.
    Disconnected,
    /// A message arrived on a subscribed topic.
    Message {
        /// Topic the message was published to.
        topic: String,
        /// Message payload.
        payload: Vec<u8>,
        /// QoS it was delivered with.
        qos: QoS,
        /// Whether it is a retained message.
        retain: bool,
        /// Whether the broker flagged it as a redelivery.
        dup: bool,
    },
    /// An outbound QoS 1 or 2 publish was acknowledged.
    Published {
        /// Identifier returned by the publish call.
        packet_id: u16,
        /// QoS of the completed flow.
        qos: QoS,
    },
    /// A subscription was granted.
    Subscribed {
        /// Identifier returned by the subscribe call.
        packet_id: u16,
        /// Maximum QoS the broker granted.
        granted: QoS,
    },
    /// The broker refused a subscription.
    SubscribeFailed {
        /// Identifier returned by the subscribe call.
        packet_id: u16,
    },
    /// An unsubscribe was acknowledged.
    Unsubscribed {
        /// Identifier returned by the unsubscribe call.
        packet_id: u16,
    },
    /// The broker answered a keep-alive ping.
    PingResponse,
}

/// What the driver must do with the transport after an inbound packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Write these bytes.
    Send(Vec<u8>),
    /// Close the transport.
    Close,
}

/// An exchange awaiting its final acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Publish1,
    Publish2 { released: bool },
    Subscribe,
    Unsubscribe,
}

/// Transport-free MQTT client session.
#[derive(Debug, Default)]
pub struct Session {
    state: State,
    keep_alive: u16,
    idle_ticks: u16,
    last_packet_id: u16,
    pending: BTreeMap<u16, Pending>,
    events: VecDeque<Event>,
}

impl Session {
    /// Create a disconnected session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Ticks counted since the last keep-alive ping.
    pub fn idle_ticks(&self) -> u16 {
        self.idle_ticks
    }

    /// Number of exchanges awaiting acknowledgement.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Pop the oldest queued event.
    pub fn next_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    /// Whether any event is queued.
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Start a connection: returns the CONNECT bytes and enters `Connecting`.
    ///
    /// Must be called once the transport is open.
    pub fn begin_connect(&mut self, options: &ConnectOptions) -> Result<Vec<u8>, Error> {
        if self.state != State::Disconnected {
            return Err(Error::AlreadyConnected);
        }
        let bytes = Packet::Connect(Connect::from_options(options)).encode()?;
        self.state = State::Connecting;
        self.keep_alive = options.keep_alive;
        self.idle_ticks = 0;
        Ok(bytes)
    }

    /// Build a PUBLISH. Returns its packet identifier (for QoS above 0) and bytes.
    pub fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(Option<u16>, Vec<u8>), Error> {
        self.require_connected()?;
        let packet_id = match qos {
            QoS::AtMostOnce => None,
            _ => Some(self.free_packet_id()?),
        };
        let bytes = Packet::Publish(Publish {
            dup: false,
            qos,
            retain,
            topic: String::from(topic),
            packet_id,
            payload: payload.to_vec(),
        })
        .encode()?;
        match (packet_id, qos) {
            (Some(id), QoS::AtLeastOnce) => self.reserve(id, Pending::Publish1),
            (Some(id), QoS::ExactlyOnce) => {
                self.reserve(id, Pending::Publish2 { released: false })
            }
            _ => {}
        }
        Ok((packet_id, bytes))
    }

    /// Build a SUBSCRIBE for one topic filter.
    pub fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(u16, Vec<u8>), Error> {
        self.require_connected()?;
        let packet_id = self.free_packet_id()?;
        let bytes = Packet::Subscribe(Subscribe {
            packet_id,
            topic: String::from(topic),
            qos,
        })
        .encode()?;
        self.reserve(packet_id, Pending::Subscribe);
        Ok((packet_id, bytes))
    }

    /// Build an UNSUBSCRIBE for one topic filter.
    pub fn unsubscribe(&mut self, topic: &str) -> Result<(u16, Vec<u8>), Error> {
        self.require_connected()?;
        let packet_id = self.free_packet_id()?;
        let bytes = Packet::Unsubscribe(Unsubscribe {
            packet_id,
            topic: String::from(topic),
        })
        .encode()?;
        self.reserve(packet_id, Pending::Unsubscribe);
        Ok((packet_id, bytes))
    }

    /// Decode and dispatch one complete packet.
    ///
    /// A packet that fails to decode is not dispatched; the caller must drop the
    /// connection.
    pub fn handle_frame(&mut self, frame: &[u8]) -> Result<Option<Action>, DecodeError> {
        let packet = Packet::decode(frame)?;
        Ok(self.handle_packet(packet))
    }

    /// Dispatch one decoded packet.
    pub fn handle_packet(&mut self, packet: Packet) -> Option<Action> {
        trace!("received {}", packet.packet_type().name());
        match (self.state, packet) {
            (State::Connecting, Packet::ConnAck(ack)) => self.on_connack(ack),
            (State::Connected, packet) => self.on_packet(packet),
            (_, packet) => {
                debug!(
                    "ignoring {} while not connected",
                    packet.packet_type().name()
                );
                None
            }
        }
    }

    /// Advance the keep-alive counter by one tick.
    ///
    /// Returns PINGREQ bytes when the counter reaches the keep-alive interval.
    pub fn tick(&mut self) -> Option<Vec<u8>> {
        if self.state != State::Connected || self.keep_alive == 0 {
            return None;
        }
        self.idle_ticks = self.idle_ticks.saturating_add(1);
        if self.idle_ticks < self.keep_alive {
            return None;
        }
        self.idle_ticks = 0;
        debug!("keep-alive ping");
        Packet::PingReq.encode().ok()
    }

    /// Graceful shutdown: returns DISCONNECT bytes if a session was up, then
    /// behaves like [`connection_lost`](Self::connection_lost).
    pub fn disconnect(&mut self) -> Option<Vec<u8>> {
        let bytes = match self.state {
            State::Connected => Packet::Disconnect.encode().ok(),
            _ => None,
        };
        self.connection_lost();
        bytes
    }

    /// The transport is gone: forget outstanding exchanges and return to
    /// `Disconnected`, queueing [`Event::Disconnected`] if a connection existed.
    pub fn connection_lost(&mut self) {
        if self.state == State::Disconnected {
            return;
        }
        info!("session closed with {} exchanges pending", self.pending.len());
        self.state = State::Disconnected;
        self.idle_ticks = 0;
        self.pending.clear();
        self.events.push_back(Event::Disconnected);
    }

    fn on_connack(&mut self, ack: ConnAck) -> Option<Action> {
        if ack.code.is_accepted() {
            info!("connection accepted");
            self.state = State::Connected;
            self.idle_ticks = 0;
            self.events.push_back(Event::Connected {
                session_present: ack.session_present,
            });
            None
        } else {
            error!("connection refused: {}", ack.code.description());
            self.events.push_back(Event::ConnectionRefused(ack.code));
            self.connection_lost();
            Some(Action::Close)
        }
    }

    fn on_packet(&mut self, packet: Packet) -> Option<Action> {
        match packet {
            Packet::Publish(publish) => {
                let reply = match (publish.qos, publish.packet_id) {
                    (QoS::AtLeastOnce, Some(id)) => reply(Packet::PubAck(id)),
                    (QoS::ExactlyOnce, Some(id)) => reply(Packet::PubRec(id)),
                    _ => None,
                };
                self.events.push_back(Event::Message {
                    topic: publish.topic,
                    payload: publish.payload,
                    qos: publish.qos,
                    retain: publish.retain,
                    dup: publish.dup,
                });
                reply
            }
            Packet::PubAck(id) => {
                if self.complete(id, Pending::Publish1) {
                    debug!("PUBACK {}", id);
                    self.events.push_back(Event::Published {
                        packet_id: id,
                        qos: QoS::AtLeastOnce,
                    });
                }
                None
            }
            Packet::PubRec(id) => {
                match self.pending.get_mut(&id) {
                    Some(Pending::Publish2 { released }) => *released = true,
                    _ => warn!("PUBREC for unknown packet {}", id),
                }
                reply(Packet::PubRel(id))
            }
            Packet::PubRel(id) => reply(Packet::PubComp(id)),
            Packet::PubComp(id) => {
                match self.pending.get(&id) {
                    Some(&Pending::Publish2 { released }) => {
                        if !released {
                            warn!("PUBCOMP {} arrived before PUBREC", id);
                        }
                        self.pending.remove(&id);
                        debug!("PUBCOMP {}", id);
                        self.events.push_back(Event::Published {
                            packet_id: id,
                            qos: QoS::ExactlyOnce,
                        });
                    }
                    _ => warn!("PUBCOMP for unknown packet {}", id),
                }
                None
            }
            Packet::SubAck(SubAck { packet_id, code }) => {
                if self.complete(packet_id, Pending::Subscribe) {
                    self.events.push_back(match code {
                        SubscribeReturnCode::Success(granted) => Event::Subscribed {
                            packet_id,
                            granted,
                        },
                        SubscribeReturnCode::Failure => {
                            warn!("subscription {} refused", packet_id);
                            Event::SubscribeFailed { packet_id }
                        }
                    });
                }
                None
            }
            Packet::UnsubAck(id) => {
                if self.complete(id, Pending::Unsubscribe) {
                    self.events
                        .push_back(Event::Unsubscribed { packet_id: id });
                }
                None
            }
            Packet::PingReq => reply(Packet::PingResp),
            Packet::PingResp => {
                self.events.push_back(Event::PingResponse);
                None
            }
            other => {
                warn!("unexpected {} from broker", other.packet_type().name());
                None
            }
        }
    }

    /// Remove `id` if it is pending as `kind`; false for unknown or mismatched ids.
    fn complete(&mut self, id: u16, kind: Pending) -> bool {
        if self.pending.get(&id) == Some(&kind) {
            self.pending.remove(&id);
            true
        } else {
            warn!("unexpected acknowledgement for packet {}", id);
            false
        }
    }

    fn require_connected(&self) -> Result<(), Error> {
        match self.state {
            State::Connected => Ok(()),
            _ => Err(Error::NotConnected),
        }
    }

    /// Next identifier after the last one issued that is not reserved.
    fn free_packet_id(&self) -> Result<u16, Error> {
        let mut id = self.last_packet_id;
        for _ in 0..u16::MAX {
            id = id.wrapping_add(1);
            if id == 0 {
                id = 1;
            }
            if !self.pending.contains_key(&id) {
                return Ok(id);
            }
        }
        Err(Error::PacketIdsExhausted)
    }

    fn reserve(&mut self, id: u16, kind: Pending) {
        self.last_packet_id = id;
        self.pending.insert(id, kind);
    }
}

fn reply(packet: Packet) -> Option<Action> {
    packet.encode().ok().map(Action::Send)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn connected() -> Session {
        let mut session = Session::new();
        session
            .begin_connect(&ConnectOptions::new("test").keep_alive(3))
            .unwrap();
        assert_eq!(session.handle_frame(&[0x20, 0x02, 0x00, 0x00]), Ok(None));
        assert_eq!(
            session.next_event(),
            Some(Event::Connected {
                session_present: false
            })
        );
        session
    }

    fn send(packet: Packet) -> Option<Action> {
        Some(Action::Send(packet.encode().unwrap()))
    }

    #[test]
    fn connack_accepted_connects_once() {
        let mut session = Session::new();
        let connect = session
            .begin_connect(&ConnectOptions::new("test"))
            .unwrap();
        assert_eq!(connect[0], 0x10);
        assert_eq!(session.state(), State::Connecting);
        session.handle_frame(&[0x20, 0x02, 0x01, 0x00]).unwrap();
        assert_eq!(session.state(), State::Connected);
        assert_eq!(
            session.next_event(),
            Some(Event::Connected {
                session_present: true
            })
        );
        assert_eq!(session.next_event(), None);

        // a second CONNACK is ignored
        session.handle_frame(&[0x20, 0x02, 0x00, 0x00]).unwrap();
        assert_eq!(session.next_event(), None);
    }

    #[test]
    fn connack_refused_closes_without_connected_event() {
        let refusals = [
            (1, ConnectReturnCode::UnacceptableProtocolVersion),
            (2, ConnectReturnCode::IdentifierRejected),
            (3, ConnectReturnCode::ServerUnavailable),
            (4, ConnectReturnCode::BadCredentials),
            (5, ConnectReturnCode::NotAuthorized),
        ];
        for (byte, code) in refusals {
            let mut session = Session::new();
            session.begin_connect(&ConnectOptions::new("test")).unwrap();
            assert_eq!(
                session.handle_frame(&[0x20, 0x02, 0x00, byte]),
                Ok(Some(Action::Close)),
                "return code {}",
                byte
            );
            assert_eq!(session.state(), State::Disconnected);
            assert_eq!(session.next_event(), Some(Event::ConnectionRefused(code)));
            assert_eq!(session.next_event(), Some(Event::Disconnected));
            assert_eq!(session.next_event(), None);
        }
    }

    #[test]
    fn packets_before_connack_are_ignored() {
        let mut session = Session::new();
        session.begin_connect(&ConnectOptions::new("test")).unwrap();
        assert_eq!(session.handle_packet(Packet::PingReq), None);
        assert_eq!(session.handle_packet(Packet::PubRel(4)), None);
        assert!(!session.has_events());
        assert_eq!(session.state(), State::Connecting);
    }

    #[test]
    fn operations_require_connected() {
        let mut session = Session::new();
        assert_eq!(
            session.publish("t", b"x", QoS::AtMostOnce, false),
            Err(Error::NotConnected)
        );
        assert_eq!(session.subscribe("t", QoS::AtMostOnce), Err(Error::NotConnected));
        session.begin_connect(&ConnectOptions::new("test")).unwrap();
        assert_eq!(session.unsubscribe("t"), Err(Error::NotConnected));
        assert_eq!(
            session.begin_connect(&ConnectOptions::new("test")),
            Err(Error::AlreadyConnected)
        );
    }

    #[test]
    fn qos1_publish_acknowledged_exactly_once() {
        let mut session = connected();
        let (id, bytes) = session
            .publish("t", b"x", QoS::AtLeastOnce, false)
            .unwrap();
        let id = id.unwrap();
        assert_eq!(id, 1);
        assert_eq!(bytes[0], 0x32);
        assert_eq!(session.handle_packet(Packet::PubAck(id)), None);
        assert_eq!(
            session.next_event(),
            Some(Event::Published {
                packet_id: id,
                qos: QoS::AtLeastOnce
            })
        );
        // duplicate acknowledgement is not reported again
        assert_eq!(session.handle_packet(Packet::PubAck(id)), None);
        assert_eq!(session.next_event(), None);
        assert_eq!(session.pending(), 0);
    }

    #[test]
    fn qos2_publish_runs_full_handshake() {
        let mut session = connected();
        let (id, _) = session
            .publish("t", b"x", QoS::ExactlyOnce, false)
            .unwrap();
        let id = id.unwrap();
        assert_eq!(
            session.handle_packet(Packet::PubRec(id)),
            send(Packet::PubRel(id))
        );
        assert!(!session.has_events());
        assert_eq!(session.handle_packet(Packet::PubComp(id)), None);
        assert_eq!(
            session.next_event(),
            Some(Event::Published {
                packet_id: id,
                qos: QoS::ExactlyOnce
            })
        );
        assert_eq!(session.handle_packet(Packet::PubComp(id)), None);
        assert_eq!(session.next_event(), None);
    }

    #[test]
    fn qos0_publish_has_no_identifier() {
        let mut session = connected();
        let (id, bytes) = session
            .publish("t", b"x", QoS::AtMostOnce, true)
            .unwrap();
        assert_eq!(id, None);
        assert_eq!(bytes, vec![0x31, 0x04, 0x00, 0x01, b't', b'x']);
        assert_eq!(session.pending(), 0);
    }

    #[test]
    fn inbound_publishes_are_acknowledged_by_qos() {
        let mut session = connected();
        let inbound = |qos, packet_id| {
            Packet::Publish(Publish {
                dup: false,
                qos,
                retain: false,
                topic: "in".into(),
                packet_id,
                payload: b"hello".to_vec(),
            })
        };
        assert_eq!(session.handle_packet(inbound(QoS::AtMostOnce, None)), None);
        assert_eq!(
            session.handle_packet(inbound(QoS::AtLeastOnce, Some(5))),
            send(Packet::PubAck(5))
        );
        assert_eq!(
            session.handle_packet(inbound(QoS::ExactlyOnce, Some(6))),
            send(Packet::PubRec(6))
        );
        assert_eq!(
            session.handle_packet(Packet::PubRel(6)),
            send(Packet::PubComp(6))
        );
        for qos in [QoS::AtMostOnce, QoS::AtLeastOnce, QoS::ExactlyOnce] {
            assert_eq!(
                session.next_event(),
                Some(Event::Message {
                    topic: "in".into(),
                    payload: b"hello".to_vec(),
                    qos,
                    retain: false,
                    dup: false,
                })
            );
        }
    }

    #[test]
    fn subscribe_and_unsubscribe_acknowledgements() {
        let mut session = connected();
        let (granted_id, _) = session.subscribe("a/#", QoS::ExactlyOnce).unwrap();
        let (refused_id, _) = session.subscribe("b", QoS::AtMostOnce).unwrap();
        let (unsub_id, _) = session.unsubscribe("a/#").unwrap();
        assert_eq!((granted_id, refused_id, unsub_id), (1, 2, 3));

        session.handle_packet(Packet::SubAck(SubAck {
            packet_id: granted_id,
            code: SubscribeReturnCode::Success(QoS::AtLeastOnce),
        }));
        session.handle_packet(Packet::SubAck(SubAck {
            packet_id: refused_id,
            code: SubscribeReturnCode::Failure,
        }));
        session.handle_packet(Packet::UnsubAck(unsub_id));

        assert_eq!(
            session.next_event(),
            Some(Event::Subscribed {
                packet_id: 1,
                granted: QoS::AtLeastOnce
            })
        );
        assert_eq!(
            session.next_event(),
            Some(Event::SubscribeFailed { packet_id: 2 })
        );
        assert_eq!(
            session.next_event(),
            Some(Event::Unsubscribed { packet_id: 3 })
        );
        assert_eq!(session.state(), State::Connected);
    }

    #[test]
    fn mismatched_acknowledgement_is_dropped() {
        let mut session = connected();
        let (id, _) = session.subscribe("a", QoS::AtMostOnce).unwrap();
        assert_eq!(session.handle_packet(Packet::PubAck(id)), None);
        assert!(!session.has_events());
        assert_eq!(session.pending(), 1);
    }

    #[test]
    fn ping_request_and_response() {
        let mut session = connected();
        assert_eq!(session.handle_packet(Packet::PingReq), send(Packet::PingResp));
        assert_eq!(session.handle_packet(Packet::PingResp), None);
        assert_eq!(session.next_event(), Some(Event::PingResponse));
    }

    #[test]
    fn keep_alive_pings_on_interval() {
        let mut session = connected();
        assert_eq!(session.tick(), None);
        assert_eq!(session.tick(), None);
        assert_eq!(session.tick(), Some(vec![0xC0, 0x00]));
        assert_eq!(session.idle_ticks(), 0);
        // inbound traffic does not reset the counter
        session.tick();
        session.handle_packet(Packet::PingResp);
        session.tick();
        assert_eq!(session.tick(), Some(vec![0xC0, 0x00]));
    }

    #[test]
    fn keep_alive_zero_never_pings() {
        let mut session = Session::new();
        session
            .begin_connect(&ConnectOptions::new("test").keep_alive(0))
            .unwrap();
        session.handle_frame(&[0x20, 0x02, 0x00, 0x00]).unwrap();
        for _ in 0..1000 {
            assert_eq!(session.tick(), None);
        }
    }

    #[test]
    fn ticks_before_connack_do_not_count() {
        let mut session = Session::new();
        session
            .begin_connect(&ConnectOptions::new("test").keep_alive(1))
            .unwrap();
        assert_eq!(session.tick(), None);
        assert_eq!(session.idle_ticks(), 0);
    }

    #[test]
    fn packet_ids_wrap_and_skip_zero() {
        let mut session = connected();
        session.last_packet_id = u16::MAX - 1;
        let (a, _) = session.subscribe("t", QoS::AtMostOnce).unwrap();
        let (b, _) = session.subscribe("t", QoS::AtMostOnce).unwrap();
        assert_eq!((a, b), (u16::MAX, 1));
    }

    #[test]
    fn packet_ids_skip_reserved_identifiers() {
        let mut session = connected();
        session.pending.insert(1, Pending::Subscribe);
        session.pending.insert(2, Pending::Subscribe);
        let (id, _) = session.unsubscribe("t").unwrap();
        assert_eq!(id, 3);
    }

    #[test]
    fn packet_ids_exhausted() {
        let mut session = connected();
        for id in 1..=u16::MAX {
            session.pending.insert(id, Pending::Publish1);
        }
        assert_eq!(
            session.publish("t", b"x", QoS::AtLeastOnce, false),
            Err(Error::PacketIdsExhausted)
        );
        // QoS 0 needs no identifier
        assert!(session.publish("t", b"x", QoS::AtMostOnce, false).is_ok());
    }

    #[test]
    fn failed_encode_reserves_nothing() {
        let mut session = connected();
        assert_eq!(
            session.subscribe("", QoS::AtMostOnce),
            Err(Error::Encode(crate::mqtt::error::EncodeError::EmptyTopic))
        );
        assert_eq!(session.pending(), 0);
        let (id, _) = session.subscribe("t", QoS::AtMostOnce).unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn disconnect_sends_disconnect_and_clears_pending() {
        let mut session = connected();
        session.publish("t", b"x", QoS::AtLeastOnce, false).unwrap();
        assert_eq!(session.disconnect(), Some(vec![0xE0, 0x00]));
        assert_eq!(session.state(), State::Disconnected);
        assert_eq!(session.pending(), 0);
        assert_eq!(session.next_event(), Some(Event::Disconnected));
        assert_eq!(session.disconnect(), None);
        assert_eq!(session.next_event(), None);
    }

    #[test]
    fn malformed_frame_is_not_dispatched() {
        let mut session = connected();
        assert_eq!(
            session.handle_frame(&[0x30, 0x05, 0x00, 0x09, b't']),
            Err(DecodeError::Truncated)
        );
        assert!(!session.has_events());
    }
}
