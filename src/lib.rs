//! Binary codec for the MQTT 3.1 wire protocol.
//!
//! ```
//! use rustie_mqtt_codec::{Message, Publish, QosLevel};
//!
//! let publish = Publish::new("sensors/kitchen", &b"21.5"[..]).with_qos(QosLevel::AtLeastOnce, 7);
//! let mut wire = Vec::new();
//! Message::Publish(publish.clone()).encode(&mut wire).unwrap();
//!
//! let decoded = rustie_mqtt_codec::decode_read(&mut &wire[..]).unwrap();
//! assert_eq!(decoded, Message::Publish(publish));
//! ```

mod ack;
mod connect;
mod error;
mod header;
mod message;
pub mod packet;
mod protocol;
mod publish;
pub mod stream;
mod subscribe;

pub use ack::Ack;
pub use connect::{ConnAck, Connect, LastWill};
pub use error::{MqttError, Result};
pub use header::Header;
pub use message::{Message, Packet};
pub use protocol::{MessageType, ProtocolVersion, QosLevel, ReturnCode};
pub use publish::Publish;
pub use subscribe::{SubAck, Subscribe, Subscription, Unsubscribe};

use packet::MAX_REMAINING_LENGTH;
use std::io::Read;

/// Limits applied while encoding and decoding.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    max_packet_size: usize,
}

impl CodecConfig {
    pub fn new() -> Self {
        CodecConfig { max_packet_size: MAX_REMAINING_LENGTH }
    }

    /// Sets the largest remaining length accepted on decode and produced on encode.
    /// Values above the protocol maximum of 268,435,455 are capped to it.
    pub fn with_max_packet_size(mut self, max_packet_size: usize) -> Self {
        self.max_packet_size = max_packet_size.min(MAX_REMAINING_LENGTH);
        self
    }

    pub fn max_packet_size(&self) -> usize {
        self.max_packet_size
    }

    pub(crate) fn check_remaining_length(&self, remaining_length: usize) -> Result<()> {
        if remaining_length > self.max_packet_size {
            return Err(MqttError::PacketTooLarge(remaining_length));
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig::new()
    }
}

pub fn decode_read<R: Read>(source: &mut R) -> Result<Message> {
    Message::decode(source)
}
