//! Wire framing for the sway IPC protocol
//!
//! Every message on the socket, in either direction, is one frame:
//!
//! ```text
//! "i3-ipc" | length (u32) | type (u32) | payload (length bytes)
//! ```
//!
//! The two integers are encoded in the platform's native byte order; this is
//! what the compositor itself does, so both sides must agree. The payload is
//! UTF-8 JSON.

use crate::error::Error;

/// Magic string that opens every frame
pub const MAGIC: &[u8; 6] = b"i3-ipc";

/// Total header size: magic string plus the two u32 fields
pub const HEADER_LEN: usize = MAGIC.len() + 8;

/// Bit set on the message type of every compositor-pushed event frame
pub const EVENT_OFFSET: u32 = 0x8000_0000;

/// Request message types understood by the compositor
///
/// The discriminants are the on-wire `type` values from `sway-ipc(7)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MessageType {
    RunCommand = 0,
    GetWorkspaces = 1,
    Subscribe = 2,
    GetOutputs = 3,
    GetTree = 4,
    GetMarks = 5,
    GetBarConfig = 6,
    GetVersion = 7,
    GetBindingModes = 8,
    GetConfig = 9,
    SendTick = 10,
    Sync = 11,
    GetBindingState = 12,
    GetInputs = 100,
    GetSeats = 101,
}

impl MessageType {
    /// The on-wire `type` field value for this message
    pub fn tag(self) -> u32 {
        self as u32
    }
}

/// Result of attempting to parse one frame out of a receive buffer
#[derive(Debug, PartialEq, Eq)]
pub enum Parsed<'a> {
    /// One complete frame, plus whatever bytes followed it
    Frame {
        tag: u32,
        payload: &'a [u8],
        rest: &'a [u8],
    },
    /// Not enough bytes buffered yet; nothing was consumed
    Incomplete,
}

/// Serialize a message type and payload into one wire frame
pub fn serialize(tag: u32, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(MAGIC);
    frame.extend_from_slice(&(payload.len() as u32).to_ne_bytes());
    frame.extend_from_slice(&tag.to_ne_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// Try to parse one frame from the front of `buf`
///
/// The buffer must begin with the magic string; anything else is a framing
/// error. If the header or the declared payload is not fully buffered yet,
/// the result is [`Parsed::Incomplete`] and the caller should read more bytes
/// and retry. The buffer is never scanned for the magic string beyond
/// position zero: payload bytes are allowed to contain it.
///
/// # Errors
///
/// Returns [`Error::BadMagic`] if the buffered bytes diverge from the magic
/// string.
pub fn try_parse(buf: &[u8]) -> Result<Parsed<'_>, Error> {
    let head = buf.len().min(MAGIC.len());
    if buf[..head] != MAGIC[..head] {
        return Err(Error::BadMagic);
    }
    if buf.len() < HEADER_LEN {
        return Ok(Parsed::Incomplete);
    }

    // Header field offsets follow the magic string.
    let length = u32::from_ne_bytes(buf[6..10].try_into().unwrap()) as usize;
    let tag = u32::from_ne_bytes(buf[10..14].try_into().unwrap());

    let end = HEADER_LEN + length;
    if buf.len() < end {
        return Ok(Parsed::Incomplete);
    }

    Ok(Parsed::Frame {
        tag,
        payload: &buf[HEADER_LEN..end],
        rest: &buf[end..],
    })
}
