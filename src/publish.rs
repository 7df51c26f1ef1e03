use crate::error::{MqttError, Result};
use crate::header::Header;
use crate::message::Packet;
use crate::packet::{write_string, Payload};
use crate::protocol::QosLevel;
use bytes::{BufMut, Bytes, BytesMut};

/// `message_id` is `0` and absent from the wire at QoS 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publish {
    pub header: Header,
    pub topic: String,
    pub message_id: u16,
    /// Application data. Not length-prefixed; it runs to the end of the packet.
    pub payload: Bytes,
}

impl Publish {
    pub fn new(topic: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Publish {
            header: Header::default(),
            topic: topic.into(),
            message_id: 0,
            payload: payload.into(),
        }
    }

    pub fn with_qos(mut self, qos: QosLevel, message_id: u16) -> Self {
        self.header.qos = qos;
        self.message_id = message_id;
        self
    }
}

impl Packet for Publish {
    fn header(&self) -> &Header {
        &self.header
    }

    fn encode_payload(&self, buf: &mut BytesMut) -> Result<()> {
        write_string(buf, &self.topic)?;
        if self.header.qos.has_id() {
            buf.put_u16(self.message_id);
        }
        buf.put_slice(&self.payload);
        Ok(())
    }

    fn decode_payload(header: Header, payload: &mut Payload) -> Result<Self> {
        if !header.qos.is_valid() {
            return Err(MqttError::BadQos(header.qos.into()));
        }
        let topic = payload.read_string()?;
        let message_id = if header.qos.has_id() { payload.read_u16()? } else { 0 };
        Ok(Publish {
            header,
            topic,
            message_id,
            payload: payload.read_rest(),
        })
    }
}
