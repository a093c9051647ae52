//! MQTT control packet codec.
//!
//! Every packet is a fixed header byte (packet type in the high nibble, per-type
//! flags in the low nibble), a [remaining length](super::varint), and a body.
//! [`Packet::encode`] produces the exact wire bytes of a packet and
//! [`Packet::decode`] parses one complete packet buffer, as emitted by the
//! [`Reassembler`](super::Reassembler), back into a [`Packet`].
//!
//! All integers are big-endian. Strings carry a 2-byte length prefix followed by
//! UTF-8 bytes. Decoding never reads past the supplied buffer: any field whose
//! declared length runs off the end yields [`DecodeError::Truncated`].
//!
//! # Examples
//!
//! ```rust
//! use libmqtt::mqtt::packet::{Packet, Publish};
//! use libmqtt::mqtt::QoS;
//!
//! let publish = Packet::Publish(Publish {
//!     dup: false,
//!     qos: QoS::AtLeastOnce,
//!     retain: false,
//!     topic: "sensors/temperature".into(),
//!     packet_id: Some(7),
//!     payload: b"23.5".to_vec(),
//! });
//!
//! let bytes = publish.encode().unwrap();
//! assert_eq!(bytes[0], 0x32);
//! assert_eq!(Packet::decode(&bytes).unwrap(), publish);
//! ```

use super::error::{DecodeError, EncodeError};
use super::options::{ConnectOptions, LastWill, ProtocolVersion};
use super::varint;
use alloc::string::String;
use alloc::vec::Vec;
use serde::Deserialize;

// Fixed header layout.
const TYPE_SHIFT: u8 = 4;
const FLAGS_MASK: u8 = 0x0F;
const DUP: u8 = 0x08;
const QOS_MASK: u8 = 0x06;
const QOS_SHIFT: u8 = 1;
const RETAIN: u8 = 0x01;
/// Flags MQTT 3.1.1 requires on PUBREL, SUBSCRIBE and UNSUBSCRIBE.
const RESERVED_FLAGS: u8 = 0x02;

// CONNECT flags byte layout.
const USERNAME: u8 = 0x80;
const PASSWORD: u8 = 0x40;
const WILL_RETAIN: u8 = 0x20;
const WILL_QOS_MASK: u8 = 0x18;
const WILL_QOS_SHIFT: u8 = 3;
const WILL: u8 = 0x04;
const CLEAN_SESSION: u8 = 0x02;
const CONNECT_RESERVED: u8 = 0x01;

// CONNACK acknowledge flags.
const SESSION_PRESENT: u8 = 0x01;

/// SUBACK return code for a refused subscription.
pub const SUBSCRIBE_FAILURE: u8 = 0x80;

/// MQTT control packet types, as carried in the high nibble of the fixed header.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    /// Client request to connect to a broker.
    Connect = 1,
    /// Connect acknowledgement.
    ConnAck = 2,
    /// Publish message.
    Publish = 3,
    /// QoS 1 publish acknowledgement.
    PubAck = 4,
    /// QoS 2 publish received (part 1).
    PubRec = 5,
    /// QoS 2 publish release (part 2).
    PubRel = 6,
    /// QoS 2 publish complete (part 3).
    PubComp = 7,
    /// Subscribe request.
    Subscribe = 8,
    /// Subscribe acknowledgement.
    SubAck = 9,
    /// Unsubscribe request.
    Unsubscribe = 10,
    /// Unsubscribe acknowledgement.
    UnsubAck = 11,
    /// Ping request.
    PingReq = 12,
    /// Ping response.
    PingResp = 13,
    /// Client is disconnecting.
    Disconnect = 14,
}

impl PacketType {
    /// Interpret the high nibble of a fixed header byte.
    pub fn from_header(byte: u8) -> Result<Self, DecodeError> {
        let nibble = byte >> TYPE_SHIFT;
        Ok(match nibble {
            1 => Self::Connect,
            2 => Self::ConnAck,
            3 => Self::Publish,
            4 => Self::PubAck,
            5 => Self::PubRec,
            6 => Self::PubRel,
            7 => Self::PubComp,
            8 => Self::Subscribe,
            9 => Self::SubAck,
            10 => Self::Unsubscribe,
            11 => Self::UnsubAck,
            12 => Self::PingReq,
            13 => Self::PingResp,
            14 => Self::Disconnect,
            other => return Err(DecodeError::UnknownPacketType(other)),
        })
    }

    /// Packet name as written in the MQTT specification.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::ConnAck => "CONNACK",
            Self::Publish => "PUBLISH",
            Self::PubAck => "PUBACK",
            Self::PubRec => "PUBREC",
            Self::PubRel => "PUBREL",
            Self::PubComp => "PUBCOMP",
            Self::Subscribe => "SUBSCRIBE",
            Self::SubAck => "SUBACK",
            Self::Unsubscribe => "UNSUBSCRIBE",
            Self::UnsubAck => "UNSUBACK",
            Self::PingReq => "PINGREQ",
            Self::PingResp => "PINGRESP",
            Self::Disconnect => "DISCONNECT",
        }
    }
}

/// Quality of Service levels for MQTT messages.
///
/// QoS defines the guarantee of delivery for a specific message. Higher QoS levels
/// provide stronger delivery guarantees but require more network round trips.
///
/// ```rust
/// use libmqtt::mqtt::QoS;
///
/// assert_eq!(QoS::AtMostOnce as u8, 0);
/// assert_eq!(QoS::try_from(2u8), Ok(QoS::ExactlyOnce));
/// assert!(QoS::try_from(3u8).is_err());
/// ```
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "u8")]
pub enum QoS {
    /// **QoS 0**: At most once delivery. No acknowledgement.
    #[default]
    AtMostOnce = 0,
    /// **QoS 1**: At least once delivery, acknowledged with PUBACK.
    AtLeastOnce = 1,
    /// **QoS 2**: Exactly once delivery, PUBREC/PUBREL/PUBCOMP handshake.
    ExactlyOnce = 2,
}

impl TryFrom<u8> for QoS {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(QoS::AtMostOnce),
            1 => Ok(QoS::AtLeastOnce),
            2 => Ok(QoS::ExactlyOnce),
            other => Err(DecodeError::InvalidQoS(other)),
        }
    }
}

/// CONNACK return codes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectReturnCode {
    /// Connection accepted.
    Accepted = 0,
    /// The broker does not support the requested protocol level.
    UnacceptableProtocolVersion = 1,
    /// The client identifier is valid UTF-8 but not allowed.
    IdentifierRejected = 2,
    /// The network connection is up but the MQTT service is unavailable.
    ServerUnavailable = 3,
    /// The user name or password is malformed.
    BadCredentials = 4,
    /// The client is not authorized to connect.
    NotAuthorized = 5,
}

impl ConnectReturnCode {
    /// Parse a CONNACK return code; values above 5 are reserved.
    pub fn from_byte(byte: u8) -> Result<Self, DecodeError> {
        Ok(match byte {
            0 => Self::Accepted,
            1 => Self::UnacceptableProtocolVersion,
            2 => Self::IdentifierRejected,
            3 => Self::ServerUnavailable,
            4 => Self::BadCredentials,
            5 => Self::NotAuthorized,
            _ => return Err(DecodeError::MalformedPacket),
        })
    }

    /// Whether the broker accepted the session.
    pub fn is_accepted(&self) -> bool {
        *self == Self::Accepted
    }

    /// Human-readable reason, suitable for logs.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Accepted => "connection accepted",
            Self::UnacceptableProtocolVersion => {
                "the server does not support the requested MQTT protocol level"
            }
            Self::IdentifierRejected => "the client identifier is not allowed by the server",
            Self::ServerUnavailable => "the MQTT service is unavailable",
            Self::BadCredentials => "the user name or password is malformed",
            Self::NotAuthorized => "the client is not authorized to connect",
        }
    }
}

/// SUBACK return code: the granted QoS, or a refusal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeReturnCode {
    /// Subscription accepted with the given maximum QoS.
    Success(QoS),
    /// Subscription refused (`0x80`).
    Failure,
}

impl SubscribeReturnCode {
    /// Parse a SUBACK return code.
    pub fn from_byte(byte: u8) -> Result<Self, DecodeError> {
        match byte {
            SUBSCRIBE_FAILURE => Ok(Self::Failure),
            0..=2 => QoS::try_from(byte).map(Self::Success),
            _ => Err(DecodeError::MalformedPacket),
        }
    }

    /// Wire value of the return code.
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Success(qos) => qos as u8,
            Self::Failure => SUBSCRIBE_FAILURE,
        }
    }
}

/// CONNECT packet contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connect {
    /// Protocol name and level to announce.
    pub protocol: ProtocolVersion,
    /// Client identifier.
    pub client_id: String,
    /// Keep-alive interval in seconds.
    pub keep_alive: u16,
    /// Whether the broker should discard previous session state.
    pub clean_session: bool,
    /// Message the broker publishes if this client disappears.
    pub last_will: Option<LastWill>,
    /// User name, if any.
    pub username: Option<String>,
    /// Password; only sent together with a user name.
    pub password: Option<String>,
}

impl Connect {
    /// Build the CONNECT for a connection attempt from the caller's options.
    ///
    /// Empty strings count as absent: a password without a user name is
    /// dropped, and a will is only kept when both its topic and message are set.
    pub fn from_options(options: &ConnectOptions) -> Self {
        let username = options.username.clone().filter(|u| !u.is_empty());
        let password = match username {
            Some(_) => options.password.clone().filter(|p| !p.is_empty()),
            None => None,
        };
        let last_will = options
            .last_will
            .clone()
            .filter(|w| !w.topic.is_empty() && !w.message.is_empty());
        Self {
            protocol: options.protocol,
            client_id: options.client_id.clone(),
            keep_alive: options.keep_alive,
            clean_session: options.clean_session,
            last_will,
            username,
            password,
        }
    }

    fn will(&self) -> Option<&LastWill> {
        self.last_will
            .as_ref()
            .filter(|w| !w.topic.is_empty() && !w.message.is_empty())
    }

    fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|u| !u.is_empty())
    }

    fn password(&self) -> Option<&str> {
        self.username()?;
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    /// The connect flags byte derived from the packet's fields.
    pub fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.username().is_some() {
            flags |= USERNAME;
        }
        if self.password().is_some() {
            flags |= PASSWORD;
        }
        if let Some(will) = self.will() {
            flags |= WILL;
            flags |= (will.qos as u8) << WILL_QOS_SHIFT;
            if will.retain {
                flags |= WILL_RETAIN;
            }
        }
        if self.clean_session {
            flags |= CLEAN_SESSION;
        }
        flags
    }
}

/// CONNACK packet contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnAck {
    /// Whether the broker resumed a stored session.
    pub session_present: bool,
    /// Outcome of the connection attempt.
    pub code: ConnectReturnCode,
}

/// PUBLISH packet contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publish {
    /// Redelivery flag.
    pub dup: bool,
    /// Delivery guarantee.
    pub qos: QoS,
    /// Whether the broker should retain the message.
    pub retain: bool,
    /// Topic name.
    pub topic: String,
    /// Packet identifier; present exactly when `qos` is above 0.
    pub packet_id: Option<u16>,
    /// Application payload, running to the end of the packet.
    pub payload: Vec<u8>,
}

/// SUBSCRIBE packet contents (one topic filter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscribe {
    /// Packet identifier.
    pub packet_id: u16,
    /// Topic filter, wildcards allowed.
    pub topic: String,
    /// Maximum QoS requested.
    pub qos: QoS,
}

/// SUBACK packet contents (one return code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubAck {
    /// Identifier of the SUBSCRIBE being acknowledged.
    pub packet_id: u16,
    /// Granted QoS or failure.
    pub code: SubscribeReturnCode,
}

/// UNSUBSCRIBE packet contents (one topic filter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsubscribe {
    /// Packet identifier.
    pub packet_id: u16,
    /// Topic filter to remove.
    pub topic: String,
}

/// A decoded or to-be-encoded MQTT control packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// CONNECT
    Connect(Connect),
    /// CONNACK
    ConnAck(ConnAck),
    /// PUBLISH
    Publish(Publish),
    /// PUBACK with its packet identifier
    PubAck(u16),
    /// PUBREC with its packet identifier
    PubRec(u16),
    /// PUBREL with its packet identifier
    PubRel(u16),
    /// PUBCOMP with its packet identifier
    PubComp(u16),
    /// SUBSCRIBE
    Subscribe(Subscribe),
    /// SUBACK
    SubAck(SubAck),
    /// UNSUBSCRIBE
    Unsubscribe(Unsubscribe),
    /// UNSUBACK with its packet identifier
    UnsubAck(u16),
    /// PINGREQ
    PingReq,
    /// PINGRESP
    PingResp,
    /// DISCONNECT
    Disconnect,
}

impl Packet {
    /// The packet's type.
    pub fn packet_type(&self) -> PacketType {
        match self {
            Packet::Connect(_) => PacketType::Connect,
            Packet::ConnAck(_) => PacketType::ConnAck,
            Packet::Publish(_) => PacketType::Publish,
            Packet::PubAck(_) => PacketType::PubAck,
            Packet::PubRec(_) => PacketType::PubRec,
            Packet::PubRel(_) => PacketType::PubRel,
            Packet::PubComp(_) => PacketType::PubComp,
            Packet::Subscribe(_) => PacketType::Subscribe,
            Packet::SubAck(_) => PacketType::SubAck,
            Packet::Unsubscribe(_) => PacketType::Unsubscribe,
            Packet::UnsubAck(_) => PacketType::UnsubAck,
            Packet::PingReq => PacketType::PingReq,
            Packet::PingResp => PacketType::PingResp,
            Packet::Disconnect => PacketType::Disconnect,
        }
    }

    /// Serialize the packet into its exact wire bytes.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::StringTooLong`] for a string over 65,535 bytes
    /// - [`EncodeError::PacketTooLarge`] if the body exceeds the maximum remaining length
    /// - [`EncodeError::EmptyTopic`] for an empty topic name or filter
    /// - [`EncodeError::MissingPacketId`] for a zero or absent identifier where one is required
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut body = Vec::new();
        let flags = match self {
            Packet::Connect(connect) => {
                let flags = connect.flags();
                put_str(&mut body, connect.protocol.name())?;
                body.push(connect.protocol.level());
                body.push(flags);
                put_u16(&mut body, connect.keep_alive);
                put_str(&mut body, &connect.client_id)?;
                if let Some(will) = connect.will() {
                    put_str(&mut body, &will.topic)?;
                    put_str(&mut body, &will.message)?;
                }
                if let Some(username) = connect.username() {
                    put_str(&mut body, username)?;
                }
                if let Some(password) = connect.password() {
                    put_str(&mut body, password)?;
                }
                0
            }
            Packet::ConnAck(ack) => {
                body.push(if ack.session_present { SESSION_PRESENT } else { 0 });
                body.push(ack.code as u8);
                0
            }
            Packet::Publish(publish) => {
                put_topic(&mut body, &publish.topic)?;
                if publish.qos != QoS::AtMostOnce {
                    put_u16(&mut body, nonzero_id(publish.packet_id)?);
                }
                body.extend_from_slice(&publish.payload);
                let mut flags = (publish.qos as u8) << QOS_SHIFT;
                if publish.dup {
                    flags |= DUP;
                }
                if publish.retain {
                    flags |= RETAIN;
                }
                flags
            }
            Packet::PubAck(id) | Packet::PubRec(id) | Packet::PubComp(id) | Packet::UnsubAck(id) => {
                put_u16(&mut body, nonzero_id(Some(*id))?);
                0
            }
            Packet::PubRel(id) => {
                put_u16(&mut body, nonzero_id(Some(*id))?);
                RESERVED_FLAGS
            }
            Packet::Subscribe(subscribe) => {
                put_u16(&mut body, nonzero_id(Some(subscribe.packet_id))?);
                put_topic(&mut body, &subscribe.topic)?;
                body.push(subscribe.qos as u8);
                RESERVED_FLAGS
            }
            Packet::SubAck(ack) => {
                put_u16(&mut body, nonzero_id(Some(ack.packet_id))?);
                body.push(ack.code.to_byte());
                0
            }
            Packet::Unsubscribe(unsubscribe) => {
                put_u16(&mut body, nonzero_id(Some(unsubscribe.packet_id))?);
                put_topic(&mut body, &unsubscribe.topic)?;
                RESERVED_FLAGS
            }
            Packet::PingReq | Packet::PingResp | Packet::Disconnect => 0,
        };

        let length = varint::encode(body.len())?;
        let mut out = Vec::with_capacity(1 + length.len() + body.len());
        out.push(((self.packet_type() as u8) << TYPE_SHIFT) | flags);
        out.extend_from_slice(&length);
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// Parse one complete packet.
    ///
    /// `bytes` must hold exactly one packet: fixed header, remaining length and
    /// the full body.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Truncated`] if the declared length or any field runs past the buffer
    /// - [`DecodeError::UnknownPacketType`] for reserved type nibbles
    /// - [`DecodeError::MalformedLength`] for an over-long continuation sequence
    /// - [`DecodeError::MalformedPacket`], [`DecodeError::InvalidQoS`],
    ///   [`DecodeError::InvalidUtf8`], [`DecodeError::UnsupportedProtocol`] for bad bodies
    pub fn decode(bytes: &[u8]) -> Result<Packet, DecodeError> {
        let (&header, rest) = bytes.split_first().ok_or(DecodeError::Truncated)?;
        let kind = PacketType::from_header(header)?;
        let flags = header & FLAGS_MASK;
        let (remaining, used) = varint::decode(rest)?;
        let body = rest
            .get(used..used + remaining)
            .ok_or(DecodeError::Truncated)?;
        if rest.len() != used + remaining {
            return Err(DecodeError::MalformedPacket);
        }

        let mut cursor = Cursor::new(body);
        let packet = match kind {
            PacketType::Connect => Packet::Connect(decode_connect(&mut cursor)?),
            PacketType::ConnAck => {
                let ack_flags = cursor.u8()?;
                if ack_flags & !SESSION_PRESENT != 0 {
                    return Err(DecodeError::MalformedPacket);
                }
                Packet::ConnAck(ConnAck {
                    session_present: ack_flags & SESSION_PRESENT != 0,
                    code: ConnectReturnCode::from_byte(cursor.u8()?)?,
                })
            }
            PacketType::Publish => {
                let qos = QoS::try_from((flags & QOS_MASK) >> QOS_SHIFT)?;
                let topic = cursor.string()?;
                let packet_id = match qos {
                    QoS::AtMostOnce => None,
                    _ => Some(cursor.packet_id()?),
                };
                Packet::Publish(Publish {
                    dup: flags & DUP != 0,
                    qos,
                    retain: flags & RETAIN != 0,
                    topic,
                    packet_id,
                    payload: cursor.rest().to_vec(),
                })
            }
            PacketType::PubAck => Packet::PubAck(cursor.packet_id()?),
            PacketType::PubRec => Packet::PubRec(cursor.packet_id()?),
            PacketType::PubRel => Packet::PubRel(cursor.packet_id()?),
            PacketType::PubComp => Packet::PubComp(cursor.packet_id()?),
            PacketType::Subscribe => Packet::Subscribe(Subscribe {
                packet_id: cursor.packet_id()?,
                topic: cursor.string()?,
                qos: QoS::try_from(cursor.u8()?)?,
            }),
            PacketType::SubAck => Packet::SubAck(SubAck {
                packet_id: cursor.packet_id()?,
                code: SubscribeReturnCode::from_byte(cursor.u8()?)?,
            }),
            PacketType::Unsubscribe => Packet::Unsubscribe(Unsubscribe {
                packet_id: cursor.packet_id()?,
                topic: cursor.string()?,
            }),
            PacketType::UnsubAck => Packet::UnsubAck(cursor.packet_id()?),
            PacketType::PingReq => Packet::PingReq,
            PacketType::PingResp => Packet::PingResp,
            PacketType::Disconnect => Packet::Disconnect,
        };
        cursor.finish()?;
        Ok(packet)
    }
}

fn decode_connect(cursor: &mut Cursor<'_>) -> Result<Connect, DecodeError> {
    let name = cursor.string()?;
    let level = cursor.u8()?;
    let protocol =
        ProtocolVersion::from_wire(&name, level).ok_or(DecodeError::UnsupportedProtocol)?;
    let flags = cursor.u8()?;
    if flags & CONNECT_RESERVED != 0 {
        return Err(DecodeError::MalformedPacket);
    }
    if flags & WILL == 0 && flags & (WILL_QOS_MASK | WILL_RETAIN) != 0 {
        return Err(DecodeError::MalformedPacket);
    }
    if flags & PASSWORD != 0 && flags & USERNAME == 0 {
        return Err(DecodeError::MalformedPacket);
    }
    let keep_alive = cursor.u16()?;
    let client_id = cursor.string()?;
    let last_will = if flags & WILL != 0 {
        let topic = cursor.string()?;
        let message = cursor.string()?;
        Some(LastWill {
            topic,
            message,
            qos: QoS::try_from((flags & WILL_QOS_MASK) >> WILL_QOS_SHIFT)?,
            retain: flags & WILL_RETAIN != 0,
        })
    } else {
        None
    };
    let username = if flags & USERNAME != 0 {
        Some(cursor.string()?)
    } else {
        None
    };
    let password = if flags & PASSWORD != 0 {
        Some(cursor.string()?)
    } else {
        None
    };
    Ok(Connect {
        protocol,
        client_id,
        keep_alive,
        clean_session: flags & CLEAN_SESSION != 0,
        last_will,
        username,
        password,
    })
}

fn nonzero_id(id: Option<u16>) -> Result<u16, EncodeError> {
    match id {
        Some(id) if id != 0 => Ok(id),
        _ => Err(EncodeError::MissingPacketId),
    }
}

fn put_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn put_str(buf: &mut Vec<u8>, value: &str) -> Result<(), EncodeError> {
    let len = u16::try_from(value.len()).map_err(|_| EncodeError::StringTooLong)?;
    put_u16(buf, len);
    buf.extend_from_slice(value.as_bytes());
    Ok(())
}

fn put_topic(buf: &mut Vec<u8>, topic: &str) -> Result<(), EncodeError> {
    if topic.is_empty() {
        return Err(EncodeError::EmptyTopic);
    }
    put_str(buf, topic)
}

/// Bounds-checked reader over a packet body.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos.checked_add(n).ok_or(DecodeError::Truncated)?;
        let bytes = self.buf.get(self.pos..end).ok_or(DecodeError::Truncated)?;
        self.pos = end;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn packet_id(&mut self) -> Result<u16, DecodeError> {
        match self.u16()? {
            0 => Err(DecodeError::MalformedPacket),
            id => Ok(id),
        }
    }

    fn string(&mut self) -> Result<String, DecodeError> {
        let len = self.u16()? as usize;
        let bytes = self.take(len)?;
        core::str::from_utf8(bytes)
            .map(String::from)
            .map_err(|_| DecodeError::InvalidUtf8)
    }

    fn rest(&mut self) -> &'a [u8] {
        let bytes = &self.buf[self.pos..];
        self.pos = self.buf.len();
        bytes
    }

    fn finish(&self) -> Result<(), DecodeError> {
        if self.pos == self.buf.len() {
            Ok(())
        } else {
            Err(DecodeError::MalformedPacket)
        }
    }
}
