//! Dictionary byte codec
//!
//! Wire layout of one message:
//!
//! ```text
//! u8  tuple count
//! per tuple:
//!   u32 LE  key
//!   u8      type (0 = bytes, 1 = cstring, 2 = uint)
//!   u16 LE  payload length
//!   payload (cstrings include their NUL terminator)
//! ```

use thiserror::Error;

use super::{Message, Value};

const TYPE_BYTES: u8 = 0;
const TYPE_CSTRING: u8 = 1;
const TYPE_UINT: u8 = 2;

/// Size of the per-tuple header: key, type and length
const TUPLE_HEADER_LEN: usize = 4 + 1 + 2;

/// Errors from encoding or decoding a dictionary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("message truncated at byte {offset}")]
    Truncated { offset: usize },

    #[error("unknown tuple type {tag} at byte {offset}")]
    UnknownType { tag: u8, offset: usize },

    #[error("unsupported integer width {length} for key {key}")]
    UnsupportedWidth { key: u32, length: usize },

    #[error("{count} trailing bytes after the last tuple")]
    TrailingBytes { count: usize },

    #[error("too many tuples ({count}) for one message")]
    TooManyTuples { count: usize },

    #[error("payload of key {key} is too long ({length} bytes)")]
    PayloadTooLong { key: u32, length: usize },
}

/// Encode a message into its wire form.
pub fn encode(message: &Message) -> Result<Vec<u8>, ProtocolError> {
    let count = u8::try_from(message.len())
        .map_err(|_| ProtocolError::TooManyTuples { count: message.len() })?;

    let mut out = vec![count];
    for (key, value) in message.iter() {
        let (tag, payload): (u8, Vec<u8>) = match value {
            Value::U8(v) => (TYPE_UINT, vec![*v]),
            Value::CString(s) => {
                let mut bytes = s.as_bytes().to_vec();
                bytes.push(0);
                (TYPE_CSTRING, bytes)
            }
            Value::Bytes(b) => (TYPE_BYTES, b.clone()),
        };
        let length = u16::try_from(payload.len()).map_err(|_| ProtocolError::PayloadTooLong {
            key,
            length: payload.len(),
        })?;

        out.extend_from_slice(&key.to_le_bytes());
        out.push(tag);
        out.extend_from_slice(&length.to_le_bytes());
        out.extend_from_slice(&payload);
    }
    Ok(out)
}

/// Decode a message from its wire form.
///
/// C strings end at their first NUL; invalid UTF-8 is replaced rather than
/// rejected, the way the watch copies strings byte for byte.
pub fn decode(bytes: &[u8]) -> Result<Message, ProtocolError> {
    let (&count, mut rest) = bytes
        .split_first()
        .ok_or(ProtocolError::Truncated { offset: 0 })?;
    let mut offset = 1;
    let mut message = Message::new();

    for _ in 0..count {
        if rest.len() < TUPLE_HEADER_LEN {
            return Err(ProtocolError::Truncated {
                offset: offset + rest.len(),
            });
        }
        let key = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);
        let tag = rest[4];
        let length = usize::from(u16::from_le_bytes([rest[5], rest[6]]));
        rest = &rest[TUPLE_HEADER_LEN..];
        offset += TUPLE_HEADER_LEN;

        if rest.len() < length {
            return Err(ProtocolError::Truncated {
                offset: offset + rest.len(),
            });
        }
        let (payload, tail) = rest.split_at(length);

        let value = match tag {
            TYPE_BYTES => Value::Bytes(payload.to_vec()),
            TYPE_CSTRING => {
                let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
                Value::CString(String::from_utf8_lossy(&payload[..end]).into_owned())
            }
            TYPE_UINT => match payload {
                [v] => Value::U8(*v),
                _ => return Err(ProtocolError::UnsupportedWidth { key, length }),
            },
            other => {
                return Err(ProtocolError::UnknownType {
                    tag: other,
                    offset: offset - 3,
                })
            }
        };
        message.insert_raw(key, value);

        rest = tail;
        offset += length;
    }

    if !rest.is_empty() {
        return Err(ProtocolError::TrailingBytes { count: rest.len() });
    }
    Ok(message)
}
