//! Reading and writing messages over tokio streams.

use crate::error::{read_error, MqttError, Result};
use crate::header::Header;
use crate::message::Message;
use crate::packet::{LengthDecoder, Payload};
use crate::protocol::MessageType;
use crate::CodecConfig;
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Reads the fixed header, returning the message type, remaining length and flags.
pub async fn read_fixed_header<R: AsyncRead + Unpin>(read_stream: &mut R) -> Result<(MessageType, usize, Header)> {
    let first_byte = read_stream.read_u8().await.map_err(read_error)?;
    let (msg_type, header) = Header::parse_first_byte(first_byte)?;

    let mut decoder = LengthDecoder::new();
    loop {
        let byte = read_stream.read_u8().await.map_err(read_error)?;
        if let Some(remaining_length) = decoder.push(byte)? {
            return Ok((msg_type, remaining_length, header));
        }
    }
}

pub async fn read_bytes<R: AsyncRead + Unpin>(read_stream: &mut R, len: usize) -> Result<Bytes> {
    let mut buf = Vec::new();
    read_stream.take(len as u64).read_to_end(&mut buf).await.map_err(read_error)?;
    if buf.len() < len {
        return Err(MqttError::TruncatedStream);
    }
    Ok(Bytes::from(buf))
}

/// Reads and decodes one complete message.
pub async fn read_message<R: AsyncRead + Unpin>(read_stream: &mut R, config: &CodecConfig) -> Result<Message> {
    let (msg_type, remaining_length, header) = read_fixed_header(read_stream).await?;
    config.check_remaining_length(remaining_length)?;
    let data = read_bytes(read_stream, remaining_length).await?;
    Message::decode_payload(msg_type, header, Payload::new(data))
}

/// Encodes `message` and writes it with a single `write_all`, then flushes.
pub async fn write_message<W: AsyncWrite + Unpin>(
    write_stream: &mut W,
    message: &Message,
    config: &CodecConfig,
) -> Result<()> {
    let mut buf = BytesMut::new();
    message.encode_to_with(&mut buf, config)?;
    write_stream.write_all(&buf).await?;
    write_stream.flush().await?;
    Ok(())
}
