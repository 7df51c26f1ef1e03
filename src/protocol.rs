use crate::error::MqttError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    Connect = 1,
    ConnAck = 2,
    Publish = 3,
    PubAck = 4,
    PubRec = 5,
    PubRel = 6,
    PubComp = 7,
    Subscribe = 8,
    SubAck = 9,
    Unsubscribe = 10,
    UnsubAck = 11,
    PingReq = 12,
    PingResp = 13,
    Disconnect = 14,
}

impl TryFrom<u8> for MessageType {
    type Error = MqttError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MessageType::Connect),
            2 => Ok(MessageType::ConnAck),
            3 => Ok(MessageType::Publish),
            4 => Ok(MessageType::PubAck),
            5 => Ok(MessageType::PubRec),
            6 => Ok(MessageType::PubRel),
            7 => Ok(MessageType::PubComp),
            8 => Ok(MessageType::Subscribe),
            9 => Ok(MessageType::SubAck),
            10 => Ok(MessageType::Unsubscribe),
            11 => Ok(MessageType::UnsubAck),
            12 => Ok(MessageType::PingReq),
            13 => Ok(MessageType::PingResp),
            14 => Ok(MessageType::Disconnect),
            _ => Err(MqttError::BadMsgType(value)),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageType::Connect => "CONNECT",
            MessageType::ConnAck => "CONNACK",
            MessageType::Publish => "PUBLISH",
            MessageType::PubAck => "PUBACK",
            MessageType::PubRec => "PUBREC",
            MessageType::PubRel => "PUBREL",
            MessageType::PubComp => "PUBCOMP",
            MessageType::Subscribe => "SUBSCRIBE",
            MessageType::SubAck => "SUBACK",
            MessageType::Unsubscribe => "UNSUBSCRIBE",
            MessageType::UnsubAck => "UNSUBACK",
            MessageType::PingReq => "PINGREQ",
            MessageType::PingResp => "PINGRESP",
            MessageType::Disconnect => "DISCONNECT",
        };
        f.write_str(name)
    }
}

/// `Reserved` (3) is representable so it can be rejected with `BadQos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum QosLevel {
    #[default]
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
    Reserved = 3,
}

impl QosLevel {
    /// Takes the low two bits of `bits`.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => QosLevel::AtMostOnce,
            1 => QosLevel::AtLeastOnce,
            2 => QosLevel::ExactlyOnce,
            _ => QosLevel::Reserved,
        }
    }

    pub fn is_valid(self) -> bool {
        self != QosLevel::Reserved
    }

    /// Levels 1 and 2 carry a message identifier.
    pub fn has_id(self) -> bool {
        matches!(self, QosLevel::AtLeastOnce | QosLevel::ExactlyOnce)
    }
}

impl TryFrom<u8> for QosLevel {
    type Error = MqttError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(QosLevel::AtMostOnce),
            1 => Ok(QosLevel::AtLeastOnce),
            2 => Ok(QosLevel::ExactlyOnce),
            _ => Err(MqttError::BadQos(value)),
        }
    }
}

impl From<QosLevel> for u8 {
    fn from(qos: QosLevel) -> u8 {
        qos as u8
    }
}

/// CONNACK return codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ReturnCode {
    #[default]
    Accepted = 0,
    UnacceptableProtocolVersion = 1,
    IdentifierRejected = 2,
    ServerUnavailable = 3,
    BadUsernameOrPassword = 4,
    NotAuthorized = 5,
}

impl ReturnCode {
    pub fn is_accepted(self) -> bool {
        self == ReturnCode::Accepted
    }
}

impl TryFrom<u8> for ReturnCode {
    type Error = MqttError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ReturnCode::Accepted),
            1 => Ok(ReturnCode::UnacceptableProtocolVersion),
            2 => Ok(ReturnCode::IdentifierRejected),
            3 => Ok(ReturnCode::ServerUnavailable),
            4 => Ok(ReturnCode::BadUsernameOrPassword),
            5 => Ok(ReturnCode::NotAuthorized),
            _ => Err(MqttError::BadReturnCode(value)),
        }
    }
}

/// Protocol levels the CONNECT packet can announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    V3_1,
    V3_1_1,
}

impl ProtocolVersion {
    pub fn name(self) -> &'static str {
        match self {
            ProtocolVersion::V3_1 => "MQIsdp",
            ProtocolVersion::V3_1_1 => "MQTT",
        }
    }

    pub fn level(self) -> u8 {
        match self {
            ProtocolVersion::V3_1 => 3,
            ProtocolVersion::V3_1_1 => 4,
        }
    }

    pub fn from_name_and_level(name: &str, level: u8) -> Option<Self> {
        match (name, level) {
            ("MQIsdp", 3) => Some(ProtocolVersion::V3_1),
            ("MQTT", 4) => Some(ProtocolVersion::V3_1_1),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_range() {
        assert!(matches!(MessageType::try_from(0), Err(MqttError::BadMsgType(0))));
        assert!(matches!(MessageType::try_from(15), Err(MqttError::BadMsgType(15))));
        for value in 1..=14u8 {
            assert_eq!(MessageType::try_from(value).unwrap() as u8, value);
        }
    }

    #[test]
    fn test_qos_has_id() {
        assert!(!QosLevel::AtMostOnce.has_id());
        assert!(QosLevel::AtLeastOnce.has_id());
        assert!(QosLevel::ExactlyOnce.has_id());
        assert!(!QosLevel::Reserved.has_id());
        assert!(!QosLevel::Reserved.is_valid());
        assert_eq!(QosLevel::from_bits(0x82), QosLevel::ExactlyOnce);
        assert!(matches!(QosLevel::try_from(3), Err(MqttError::BadQos(3))));
    }

    #[test]
    fn test_return_code_range() {
        assert_eq!(ReturnCode::try_from(5).unwrap(), ReturnCode::NotAuthorized);
        assert!(matches!(ReturnCode::try_from(6), Err(MqttError::BadReturnCode(6))));
    }

    #[test]
    fn test_protocol_version_lookup() {
        assert_eq!(ProtocolVersion::from_name_and_level("MQIsdp", 3), Some(ProtocolVersion::V3_1));
        assert_eq!(ProtocolVersion::from_name_and_level("MQTT", 4), Some(ProtocolVersion::V3_1_1));
        assert_eq!(ProtocolVersion::from_name_and_level("MQTT", 3), None);
    }
}
