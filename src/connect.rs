use crate::error::{MqttError, Result};
use crate::header::Header;
use crate::message::Packet;
use crate::packet::{write_string, Payload};
use crate::protocol::{ProtocolVersion, QosLevel, ReturnCode};
use bytes::{BufMut, BytesMut};

const USERNAME_FLAG: u8 = 0b1000_0000;
const PASSWORD_FLAG: u8 = 0b0100_0000;
const WILL_RETAIN_FLAG: u8 = 0b0010_0000;
const WILL_QOS_MASK: u8 = 0b0001_1000;
const WILL_FLAG: u8 = 0b0000_0100;
const CLEAN_SESSION_FLAG: u8 = 0b0000_0010;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connect {
    pub header: Header,
    pub protocol_name: String,
    pub protocol_level: u8,
    pub clean_session: bool,
    pub keep_alive: u16,
    pub client_id: String,
    pub will: Option<LastWill>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Message the server publishes on the client's behalf if the connection drops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastWill {
    pub topic: String,
    pub message: String,
    pub qos: QosLevel,
    pub retain: bool,
}

impl Connect {
    /// Creates an MQTT 3.1 CONNECT with a clean session and no keep-alive.
    pub fn new(client_id: impl Into<String>) -> Self {
        let version = ProtocolVersion::V3_1;
        Connect {
            header: Header::default(),
            protocol_name: version.name().to_string(),
            protocol_level: version.level(),
            clean_session: true,
            keep_alive: 0,
            client_id: client_id.into(),
            will: None,
            username: None,
            password: None,
        }
    }

    pub fn with_protocol(mut self, version: ProtocolVersion) -> Self {
        self.protocol_name = version.name().to_string();
        self.protocol_level = version.level();
        self
    }

    /// The announced protocol, if it is one this crate knows.
    pub fn protocol_version(&self) -> Option<ProtocolVersion> {
        ProtocolVersion::from_name_and_level(&self.protocol_name, self.protocol_level)
    }

    fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.username.is_some() {
            flags |= USERNAME_FLAG;
        }
        if self.password.is_some() {
            flags |= PASSWORD_FLAG;
        }
        if let Some(will) = &self.will {
            flags |= WILL_FLAG;
            flags |= u8::from(will.qos) << 3;
            if will.retain {
                flags |= WILL_RETAIN_FLAG;
            }
        }
        if self.clean_session {
            flags |= CLEAN_SESSION_FLAG;
        }
        flags
    }
}

impl Packet for Connect {
    fn header(&self) -> &Header {
        &self.header
    }

    fn encode_payload(&self, buf: &mut BytesMut) -> Result<()> {
        if let Some(will) = &self.will {
            if !will.qos.is_valid() {
                return Err(MqttError::BadWillQos(will.qos.into()));
            }
        }

        write_string(buf, &self.protocol_name)?;
        buf.put_u8(self.protocol_level);
        buf.put_u8(self.flags());
        buf.put_u16(self.keep_alive);
        write_string(buf, &self.client_id)?;
        if let Some(will) = &self.will {
            write_string(buf, &will.topic)?;
            write_string(buf, &will.message)?;
        }
        if let Some(username) = &self.username {
            write_string(buf, username)?;
        }
        if let Some(password) = &self.password {
            write_string(buf, password)?;
        }
        Ok(())
    }

    fn decode_payload(header: Header, payload: &mut Payload) -> Result<Self> {
        let protocol_name = payload.read_string()?;
        let protocol_level = payload.read_u8()?;
        let flags = payload.read_u8()?;
        let keep_alive = payload.read_u16()?;
        let client_id = payload.read_string()?;

        let will = if flags & WILL_FLAG != 0 {
            let qos = QosLevel::from_bits((flags & WILL_QOS_MASK) >> 3);
            if !qos.is_valid() {
                return Err(MqttError::BadWillQos(qos.into()));
            }
            Some(LastWill {
                topic: payload.read_string()?,
                message: payload.read_string()?,
                qos,
                retain: flags & WILL_RETAIN_FLAG != 0,
            })
        } else {
            None
        };
        let username = if flags & USERNAME_FLAG != 0 { Some(payload.read_string()?) } else { None };
        let password = if flags & PASSWORD_FLAG != 0 { Some(payload.read_string()?) } else { None };

        Ok(Connect {
            header,
            protocol_name,
            protocol_level,
            clean_session: flags & CLEAN_SESSION_FLAG != 0,
            keep_alive,
            client_id,
            will,
            username,
            password,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnAck {
    pub header: Header,
    pub return_code: ReturnCode,
}

impl ConnAck {
    pub fn new(return_code: ReturnCode) -> Self {
        ConnAck { header: Header::default(), return_code }
    }
}

impl Packet for ConnAck {
    fn header(&self) -> &Header {
        &self.header
    }

    fn encode_payload(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(0);
        buf.put_u8(self.return_code as u8);
        Ok(())
    }

    fn decode_payload(header: Header, payload: &mut Payload) -> Result<Self> {
        // reserved
        payload.read_u8()?;
        let return_code = ReturnCode::try_from(payload.read_u8()?)?;
        Ok(ConnAck { header, return_code })
    }
}
