use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MqttError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid QoS level: {0}")]
    BadQos(u8),
    #[error("Invalid message type: {0}")]
    BadMsgType(u8),
    #[error("Invalid will QoS level: {0}")]
    BadWillQos(u8),
    #[error("Invalid CONNACK return code: {0}")]
    BadReturnCode(u8),
    #[error("Malformed remaining length")]
    MalformedLength,
    #[error("Stream ended before the packet was complete")]
    TruncatedStream,
    #[error("Field of {wanted} bytes overruns the {remaining} bytes left in the packet")]
    Overrun { wanted: usize, remaining: usize },
    #[error("Packet too large: {0}")]
    PacketTooLarge(usize),
    #[error("String too long: {0} bytes")]
    StringTooLong(usize),
    #[error("Invalid UTF-8 string")]
    InvalidUtf8,
}

pub type Result<T> = std::result::Result<T, MqttError>;

pub(crate) fn read_error(e: io::Error) -> MqttError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        MqttError::TruncatedStream
    } else {
        MqttError::Io(e)
    }
}
