use crate::error::{MqttError, Result};
use crate::header::Header;
use crate::message::Packet;
use crate::packet::{write_string, Payload};
use crate::protocol::QosLevel;
use bytes::{BufMut, BytesMut};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub topic: String,
    pub qos: QosLevel,
}

impl Subscription {
    pub fn new(topic: impl Into<String>, qos: QosLevel) -> Self {
        Subscription { topic: topic.into(), qos }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscribe {
    pub header: Header,
    pub message_id: u16,
    pub subscriptions: Vec<Subscription>,
}

impl Subscribe {
    /// SUBSCRIBE goes out at QoS 1.
    pub fn new(message_id: u16, subscriptions: Vec<Subscription>) -> Self {
        Subscribe {
            header: Header::new(QosLevel::AtLeastOnce),
            message_id,
            subscriptions,
        }
    }
}

impl Packet for Subscribe {
    fn header(&self) -> &Header {
        &self.header
    }

    fn encode_payload(&self, buf: &mut BytesMut) -> Result<()> {
        if self.header.qos.has_id() {
            buf.put_u16(self.message_id);
        }
        for subscription in &self.subscriptions {
            if !subscription.qos.is_valid() {
                return Err(MqttError::BadQos(subscription.qos.into()));
            }
            write_string(buf, &subscription.topic)?;
            buf.put_u8(subscription.qos.into());
        }
        Ok(())
    }

    fn decode_payload(header: Header, payload: &mut Payload) -> Result<Self> {
        if !header.qos.is_valid() {
            return Err(MqttError::BadQos(header.qos.into()));
        }
        let message_id = if header.qos.has_id() { payload.read_u16()? } else { 0 };
        let mut subscriptions = Vec::new();
        while payload.has_remaining() {
            let topic = payload.read_string()?;
            let qos = QosLevel::try_from(payload.read_u8()?)?;
            subscriptions.push(Subscription { topic, qos });
        }
        Ok(Subscribe { header, message_id, subscriptions })
    }
}

/// SUBACK packet, one granted QoS level per requested topic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubAck {
    pub header: Header,
    pub message_id: u16,
    pub granted: Vec<QosLevel>,
}

impl SubAck {
    pub fn new(message_id: u16, granted: Vec<QosLevel>) -> Self {
        SubAck { header: Header::default(), message_id, granted }
    }
}

impl Packet for SubAck {
    fn header(&self) -> &Header {
        &self.header
    }

    fn encode_payload(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u16(self.message_id);
        for qos in &self.granted {
            buf.put_u8((*qos).into());
        }
        Ok(())
    }

    fn decode_payload(header: Header, payload: &mut Payload) -> Result<Self> {
        let message_id = payload.read_u16()?;
        let mut granted = Vec::with_capacity(payload.remaining());
        while payload.has_remaining() {
            // only the low two bits are significant
            granted.push(QosLevel::from_bits(payload.read_u8()?));
        }
        Ok(SubAck { header, message_id, granted })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsubscribe {
    pub header: Header,
    pub message_id: u16,
    pub topics: Vec<String>,
}

impl Unsubscribe {
    /// UNSUBSCRIBE goes out at QoS 1.
    pub fn new(message_id: u16, topics: Vec<String>) -> Self {
        Unsubscribe {
            header: Header::new(QosLevel::AtLeastOnce),
            message_id,
            topics,
        }
    }
}

impl Packet for Unsubscribe {
    fn header(&self) -> &Header {
        &self.header
    }

    fn encode_payload(&self, buf: &mut BytesMut) -> Result<()> {
        if self.header.qos.has_id() {
            buf.put_u16(self.message_id);
        }
        for topic in &self.topics {
            write_string(buf, topic)?;
        }
        Ok(())
    }

    fn decode_payload(header: Header, payload: &mut Payload) -> Result<Self> {
        if !header.qos.is_valid() {
            return Err(MqttError::BadQos(header.qos.into()));
        }
        let message_id = if header.qos.has_id() { payload.read_u16()? } else { 0 };
        let mut topics = Vec::new();
        while payload.has_remaining() {
            topics.push(payload.read_string()?);
        }
        Ok(Unsubscribe { header, message_id, topics })
    }
}
