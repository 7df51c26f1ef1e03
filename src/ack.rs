use crate::error::Result;
use crate::header::Header;
use crate::message::Packet;
use crate::packet::Payload;
use bytes::{BufMut, BytesMut};

/// PUBACK, PUBREC, PUBREL, PUBCOMP and UNSUBACK body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ack {
    pub header: Header,
    pub message_id: u16,
}

impl Ack {
    pub fn new(message_id: u16) -> Self {
        Ack { header: Header::default(), message_id }
    }
}

impl Packet for Ack {
    fn header(&self) -> &Header {
        &self.header
    }

    fn encode_payload(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u16(self.message_id);
        Ok(())
    }

    fn decode_payload(header: Header, payload: &mut Payload) -> Result<Self> {
        let message_id = payload.read_u16()?;
        Ok(Ack { header, message_id })
    }
}
