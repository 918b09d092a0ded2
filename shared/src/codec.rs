//! Length-prefixed codec for TCP framing
//!
//! All messages are framed as:
//! ```text
//! [ 4 bytes: length (u32, big-endian) ][ N bytes: protobuf Envelope ]
//! ```
//!
//! This ensures message boundaries are preserved over TCP streams.

use bytes::{BufMut, Bytes, BytesMut};
use prost::Message;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::limits::MAX_FRAME_SIZE;
use crate::Envelope;

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("frame too large: {0} bytes (max: {MAX_FRAME_SIZE})")]
    FrameTooLarge(usize),

    #[error("protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("protobuf encode error: {0}")]
    Encode(#[from] prost::EncodeError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode an Envelope into a single length-prefixed frame
pub fn encode(envelope: &Envelope) -> Result<Bytes, CodecError> {
    let msg_len = envelope.encoded_len();

    if msg_len > MAX_FRAME_SIZE as usize {
        return Err(CodecError::FrameTooLarge(msg_len));
    }

    let mut buf = BytesMut::with_capacity(4 + msg_len);
    buf.put_u32(msg_len as u32);
    envelope.encode(&mut buf)?;

    Ok(buf.freeze())
}

/// Write one envelope to a stream
pub async fn write_envelope<W>(writer: &mut W, envelope: &Envelope) -> Result<(), CodecError>
where
    W: AsyncWrite + Unpin,
{
    let frame = encode(envelope)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one envelope from a stream
///
/// Returns `Ok(None)` on a clean end-of-stream at a frame boundary; EOF in
/// the middle of a frame is an error.
pub async fn read_envelope<R>(reader: &mut R) -> Result<Option<Envelope>, CodecError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let msg_len = u32::from_be_bytes(len_buf);
    if msg_len > MAX_FRAME_SIZE {
        return Err(CodecError::FrameTooLarge(msg_len as usize));
    }

    let mut frame = vec![0u8; msg_len as usize];
    reader.read_exact(&mut frame).await?;

    Ok(Some(Envelope::decode(frame.as_slice())?))
}
