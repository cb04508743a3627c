//! Frame codec for the stream transport.
//!
//! A frame is a big-endian `u32` body length followed by the JSON encoding of
//! one [`Packet`].

use bytes::{Buf, BufMut, BytesMut};

use crate::error::ProtoError;
use crate::packets::Packet;

/// Length prefix size in bytes.
pub const LENGTH_PREFIX: usize = 4;

/// Upper bound for a single frame body.
pub const MAX_FRAME_SIZE: usize = 2 * 1024 * 1024;

/// Append one framed packet to `buf`.
pub fn encode_frame(packet: &Packet, buf: &mut BytesMut) -> Result<(), ProtoError> {
    let body = serde_json::to_vec(packet)?;
    if body.len() > MAX_FRAME_SIZE {
        return Err(ProtoError::FrameTooLarge {
            size: body.len(),
            max: MAX_FRAME_SIZE,
        });
    }
    buf.reserve(LENGTH_PREFIX + body.len());
    buf.put_u32(body.len() as u32);
    buf.put_slice(&body);
    Ok(())
}

/// Take one complete frame off the front of `buf`.
///
/// Returns `Ok(None)` while the frame is still incomplete; `buf` is left
/// untouched in that case.
pub fn decode_frame(buf: &mut BytesMut) -> Result<Option<Packet>, ProtoError> {
    if buf.len() < LENGTH_PREFIX {
        return Ok(None);
    }
    let len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    if len > MAX_FRAME_SIZE {
        return Err(ProtoError::FrameTooLarge {
            size: len,
            max: MAX_FRAME_SIZE,
        });
    }
    if buf.len() < LENGTH_PREFIX + len {
        buf.reserve(LENGTH_PREFIX + len - buf.len());
        return Ok(None);
    }
    buf.advance(LENGTH_PREFIX);
    let body = buf.split_to(len);
    let packet = serde_json::from_slice(&body)?;
    Ok(Some(packet))
}
