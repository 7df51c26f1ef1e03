use crate::error::{read_error, MqttError, Result};
use crate::packet::{read_remaining_length, remaining_length_len, write_remaining_length, MAX_REMAINING_LENGTH};
use crate::protocol::{MessageType, QosLevel};
use bytes::{BufMut, BytesMut};
use std::io::Read;

const DUP_FLAG: u8 = 0b0000_1000;
const QOS_MASK: u8 = 0b0000_0110;
const RETAIN_FLAG: u8 = 0b0000_0001;

/// Flag bits of the fixed header shared by every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub dup: bool,
    pub qos: QosLevel,
    pub retain: bool,
}

impl Header {
    pub fn new(qos: QosLevel) -> Self {
        Header { dup: false, qos, retain: false }
    }

    pub fn first_byte(&self, msg_type: MessageType) -> u8 {
        let mut byte = (msg_type as u8) << 4;
        if self.dup {
            byte |= DUP_FLAG;
        }
        byte |= u8::from(self.qos) << 1;
        if self.retain {
            byte |= RETAIN_FLAG;
        }
        byte
    }

    pub fn parse_first_byte(byte: u8) -> Result<(MessageType, Header)> {
        let msg_type = MessageType::try_from(byte >> 4)?;
        let header = Header {
            dup: byte & DUP_FLAG != 0,
            qos: QosLevel::from_bits((byte & QOS_MASK) >> 1),
            retain: byte & RETAIN_FLAG != 0,
        };
        Ok((msg_type, header))
    }

    /// Writes the fixed header. Nothing is written if the QoS level or length is invalid.
    pub fn encode(&self, buf: &mut BytesMut, msg_type: MessageType, remaining_length: usize) -> Result<()> {
        if !self.qos.is_valid() {
            return Err(MqttError::BadQos(self.qos.into()));
        }
        if remaining_length > MAX_REMAINING_LENGTH {
            return Err(MqttError::PacketTooLarge(remaining_length));
        }
        buf.reserve(1 + remaining_length_len(remaining_length));
        buf.put_u8(self.first_byte(msg_type));
        write_remaining_length(buf, remaining_length)
    }

    pub fn decode<R: Read>(source: &mut R) -> Result<(MessageType, usize, Header)> {
        let mut byte = [0u8; 1];
        source.read_exact(&mut byte).map_err(read_error)?;
        let (msg_type, header) = Header::parse_first_byte(byte[0])?;
        let remaining_length = read_remaining_length(source)?;
        Ok((msg_type, remaining_length, header))
    }
}
