use crate::ack::Ack;
use crate::connect::{ConnAck, Connect};
use crate::error::{MqttError, Result};
use crate::header::Header;
use crate::packet::Payload;
use crate::protocol::{MessageType, QosLevel};
use crate::publish::Publish;
use crate::subscribe::{SubAck, Subscribe, Unsubscribe};
use crate::CodecConfig;
use bytes::BytesMut;
use std::io::{Read, Write};
use tracing::{debug, trace};

/// Payload codec of a single message shape.
pub trait Packet: Sized {
    fn header(&self) -> &Header;

    fn encode_payload(&self, buf: &mut BytesMut) -> Result<()>;

    fn decode_payload(header: Header, payload: &mut Payload) -> Result<Self>;

    /// Reads exactly `remaining_length` bytes off `source` and decodes them.
    fn decode<R: Read>(source: &mut R, header: Header, remaining_length: usize) -> Result<Self> {
        let mut payload = Payload::read_from(source, remaining_length)?;
        Self::decode_payload(header, &mut payload)
    }
}

/// Any MQTT 3.1 control packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Connect(Connect),
    ConnAck(ConnAck),
    Publish(Publish),
    PubAck(Ack),
    PubRec(Ack),
    PubRel(Ack),
    PubComp(Ack),
    Subscribe(Subscribe),
    SubAck(SubAck),
    Unsubscribe(Unsubscribe),
    UnsubAck(Ack),
    PingReq(Header),
    PingResp(Header),
    Disconnect(Header),
}

impl Message {
    pub fn puback(message_id: u16) -> Self {
        Message::PubAck(Ack::new(message_id))
    }

    pub fn pubrec(message_id: u16) -> Self {
        Message::PubRec(Ack::new(message_id))
    }

    /// PUBREL is sent at QoS 1.
    pub fn pubrel(message_id: u16) -> Self {
        let mut ack = Ack::new(message_id);
        ack.header.qos = QosLevel::AtLeastOnce;
        Message::PubRel(ack)
    }

    pub fn pubcomp(message_id: u16) -> Self {
        Message::PubComp(Ack::new(message_id))
    }

    pub fn unsuback(message_id: u16) -> Self {
        Message::UnsubAck(Ack::new(message_id))
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            Message::Connect(_) => MessageType::Connect,
            Message::ConnAck(_) => MessageType::ConnAck,
            Message::Publish(_) => MessageType::Publish,
            Message::PubAck(_) => MessageType::PubAck,
            Message::PubRec(_) => MessageType::PubRec,
            Message::PubRel(_) => MessageType::PubRel,
            Message::PubComp(_) => MessageType::PubComp,
            Message::Subscribe(_) => MessageType::Subscribe,
            Message::SubAck(_) => MessageType::SubAck,
            Message::Unsubscribe(_) => MessageType::Unsubscribe,
            Message::UnsubAck(_) => MessageType::UnsubAck,
            Message::PingReq(_) => MessageType::PingReq,
            Message::PingResp(_) => MessageType::PingResp,
            Message::Disconnect(_) => MessageType::Disconnect,
        }
    }

    pub fn header(&self) -> &Header {
        match self {
            Message::Connect(m) => m.header(),
            Message::ConnAck(m) => m.header(),
            Message::Publish(m) => m.header(),
            Message::PubAck(m) | Message::PubRec(m) | Message::PubRel(m) | Message::PubComp(m) | Message::UnsubAck(m) => {
                m.header()
            }
            Message::Subscribe(m) => m.header(),
            Message::SubAck(m) => m.header(),
            Message::Unsubscribe(m) => m.header(),
            Message::PingReq(h) | Message::PingResp(h) | Message::Disconnect(h) => h,
        }
    }

    fn encode_payload(&self, buf: &mut BytesMut) -> Result<()> {
        match self {
            Message::Connect(m) => m.encode_payload(buf),
            Message::ConnAck(m) => m.encode_payload(buf),
            Message::Publish(m) => m.encode_payload(buf),
            Message::PubAck(m) | Message::PubRec(m) | Message::PubRel(m) | Message::PubComp(m) | Message::UnsubAck(m) => {
                m.encode_payload(buf)
            }
            Message::Subscribe(m) => m.encode_payload(buf),
            Message::SubAck(m) => m.encode_payload(buf),
            Message::Unsubscribe(m) => m.encode_payload(buf),
            Message::PingReq(_) | Message::PingResp(_) | Message::Disconnect(_) => Ok(()),
        }
    }

    /// Appends the complete packet to `buf`. On error `buf` is left untouched.
    pub fn encode_to(&self, buf: &mut BytesMut) -> Result<()> {
        self.encode_to_with(buf, &CodecConfig::default())
    }

    pub(crate) fn encode_to_with(&self, buf: &mut BytesMut, config: &CodecConfig) -> Result<()> {
        let msg_type = self.message_type();
        let mut payload = BytesMut::new();
        self.encode_payload(&mut payload)?;
        if payload.len() > config.max_packet_size() {
            return Err(MqttError::PacketTooLarge(payload.len()));
        }
        self.header().encode(buf, msg_type, payload.len())?;
        buf.extend_from_slice(&payload);
        trace!("Encoded {} packet with remaining length {}", msg_type, payload.len());
        Ok(())
    }

    /// Nothing reaches `sink` unless the whole packet encodes.
    pub fn encode<W: Write>(&self, sink: &mut W) -> Result<()> {
        self.encode_with(sink, &CodecConfig::default())
    }

    pub fn encode_with<W: Write>(&self, sink: &mut W, config: &CodecConfig) -> Result<()> {
        let mut buf = BytesMut::new();
        self.encode_to_with(&mut buf, config)?;
        sink.write_all(&buf)?;
        Ok(())
    }

    pub fn decode<R: Read>(source: &mut R) -> Result<Message> {
        Message::decode_with(source, &CodecConfig::default())
    }

    pub fn decode_with<R: Read>(source: &mut R, config: &CodecConfig) -> Result<Message> {
        let (msg_type, remaining_length, header) = Header::decode(source)?;
        config.check_remaining_length(remaining_length)?;
        let payload = Payload::read_from(source, remaining_length)?;
        Message::decode_payload(msg_type, header, payload)
    }

    pub fn decode_payload(msg_type: MessageType, header: Header, mut payload: Payload) -> Result<Message> {
        let remaining_length = payload.remaining();
        let result = match msg_type {
            MessageType::Connect => Connect::decode_payload(header, &mut payload).map(Message::Connect),
            MessageType::ConnAck => ConnAck::decode_payload(header, &mut payload).map(Message::ConnAck),
            MessageType::Publish => Publish::decode_payload(header, &mut payload).map(Message::Publish),
            MessageType::PubAck => Ack::decode_payload(header, &mut payload).map(Message::PubAck),
            MessageType::PubRec => Ack::decode_payload(header, &mut payload).map(Message::PubRec),
            MessageType::PubRel => Ack::decode_payload(header, &mut payload).map(Message::PubRel),
            MessageType::PubComp => Ack::decode_payload(header, &mut payload).map(Message::PubComp),
            MessageType::Subscribe => Subscribe::decode_payload(header, &mut payload).map(Message::Subscribe),
            MessageType::SubAck => SubAck::decode_payload(header, &mut payload).map(Message::SubAck),
            MessageType::Unsubscribe => Unsubscribe::decode_payload(header, &mut payload).map(Message::Unsubscribe),
            MessageType::UnsubAck => Ack::decode_payload(header, &mut payload).map(Message::UnsubAck),
            MessageType::PingReq => Ok(Message::PingReq(header)),
            MessageType::PingResp => Ok(Message::PingResp(header)),
            MessageType::Disconnect => Ok(Message::Disconnect(header)),
        };
        match result {
            Ok(message) => {
                payload.finish(msg_type);
                trace!("Decoded {} packet with remaining length {}", msg_type, remaining_length);
                Ok(message)
            }
            Err(e) => {
                debug!("Rejected {} packet: {}", msg_type, e);
                Err(e)
            }
        }
    }
}

macro_rules! impl_from_packet {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Message {
                fn from(packet: $ty) -> Self {
                    Message::$ty(packet)
                }
            }
        )*
    };
}

impl_from_packet!(Connect, ConnAck, Publish, Subscribe, SubAck, Unsubscribe);
