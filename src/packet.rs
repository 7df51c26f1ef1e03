use crate::error::{read_error, MqttError, Result};
use crate::protocol::MessageType;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Read;
use tracing::warn;

/// Largest value a four byte remaining length can hold.
pub const MAX_REMAINING_LENGTH: usize = 268_435_455;

/// Longest string a two byte length prefix can describe.
pub const MAX_STRING_LENGTH: usize = u16::MAX as usize;

const MAX_LENGTH_BYTES: usize = 4;

/// Remaining-length decoder fed one byte at a time.
#[derive(Debug)]
pub(crate) struct LengthDecoder {
    value: usize,
    multiplier: usize,
    count: usize,
}

impl LengthDecoder {
    pub(crate) fn new() -> Self {
        LengthDecoder { value: 0, multiplier: 1, count: 0 }
    }

    /// Returns the decoded length once a byte without the continuation bit arrives.
    pub(crate) fn push(&mut self, byte: u8) -> Result<Option<usize>> {
        self.value += ((byte & 0x7F) as usize) * self.multiplier;
        self.count += 1;
        if byte & 0x80 == 0 {
            return Ok(Some(self.value));
        }
        if self.count == MAX_LENGTH_BYTES {
            return Err(MqttError::MalformedLength);
        }
        self.multiplier *= 128;
        Ok(None)
    }
}

pub fn read_remaining_length<R: Read>(source: &mut R) -> Result<usize> {
    let mut decoder = LengthDecoder::new();
    let mut byte = [0u8; 1];
    loop {
        source.read_exact(&mut byte).map_err(read_error)?;
        if let Some(length) = decoder.push(byte[0])? {
            return Ok(length);
        }
    }
}

/// Appends the minimal encoding of `length`; zero is a single zero byte.
pub fn write_remaining_length(buf: &mut BytesMut, length: usize) -> Result<()> {
    if length > MAX_REMAINING_LENGTH {
        return Err(MqttError::PacketTooLarge(length));
    }
    let mut x = length;
    loop {
        let mut byte = (x % 128) as u8;
        x /= 128;
        if x > 0 {
            byte |= 0x80;
        }
        buf.put_u8(byte);
        if x == 0 {
            return Ok(());
        }
    }
}

pub fn remaining_length_len(length: usize) -> usize {
    match length {
        0..=127 => 1,
        128..=16_383 => 2,
        16_384..=2_097_151 => 3,
        _ => 4,
    }
}

pub fn write_string(buf: &mut BytesMut, s: &str) -> Result<()> {
    let len = s.len();
    if len > MAX_STRING_LENGTH {
        return Err(MqttError::StringTooLong(len));
    }
    buf.put_u16(len as u16);
    buf.put_slice(s.as_bytes());
    Ok(())
}

/// Bytes of one packet after the fixed header. Reads past the end are `Overrun`.
#[derive(Debug)]
pub struct Payload {
    data: Bytes,
}

impl Payload {
    pub fn new(data: Bytes) -> Self {
        Payload { data }
    }

    /// Reads `length` bytes off `source`; a short read is `TruncatedStream`.
    pub fn read_from<R: Read>(source: &mut R, length: usize) -> Result<Self> {
        let mut buf = Vec::new();
        source.take(length as u64).read_to_end(&mut buf).map_err(read_error)?;
        if buf.len() < length {
            return Err(MqttError::TruncatedStream);
        }
        Ok(Payload::new(Bytes::from(buf)))
    }

    pub fn remaining(&self) -> usize {
        self.data.remaining()
    }

    pub fn has_remaining(&self) -> bool {
        self.data.has_remaining()
    }

    fn ensure(&self, wanted: usize) -> Result<()> {
        let remaining = self.remaining();
        if wanted > remaining {
            return Err(MqttError::Overrun { wanted, remaining });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.data.get_u8())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.data.get_u16())
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u16()? as usize;
        self.ensure(len)?;
        let raw = self.data.split_to(len);
        String::from_utf8(raw.to_vec()).map_err(|_| MqttError::InvalidUtf8)
    }

    /// Takes everything left in the packet.
    pub fn read_rest(&mut self) -> Bytes {
        self.data.split_off(0)
    }

    pub(crate) fn finish(self, msg_type: MessageType) {
        if self.has_remaining() {
            warn!("Discarding {} trailing bytes of {} packet", self.remaining(), msg_type);
        }
    }
}
