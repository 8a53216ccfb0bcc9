//! Protocol codec
//!
//! Encoding and decoding functions for the RESP2 wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬───────────────┬───────────────┬─────┐
//! │ *<argc>  │ $<len> NAME   │ $<len> arg 1  │ ... │
//! └──────────┴───────────────┴───────────────┴─────┘
//! ```
//! Each element is terminated by CRLF.
//!
//! ### Reply Format
//! ```text
//! ┌──────────┬─────────────────────────────────────┐
//! │ Type (1) │ Line / length prefix + body + CRLF  │
//! └──────────┴─────────────────────────────────────┘
//! ```

use bytes::{BufMut, BytesMut};

use super::{Command, Reply};
use crate::error::{ObjectError, Result};

/// Maximum bulk string length accepted from the store (512 MB)
pub const MAX_BULK_SIZE: usize = 512 * 1024 * 1024;

/// Maximum number of elements in one array reply
pub const MAX_ELEMENTS: usize = 1024 * 1024;

/// Maximum array nesting depth
const MAX_NESTING_DEPTH: usize = 32;

const CRLF: &[u8] = b"\r\n";

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: `*argc` followed by one bulk string per word
pub fn encode_command(command: &Command) -> Vec<u8> {
    let mut buf = BytesMut::new();
    encode_command_into(command, &mut buf);
    buf.to_vec()
}

/// Append an encoded command to `buf`
pub(crate) fn encode_command_into(command: &Command, buf: &mut BytesMut) {
    let args = command.arguments();
    put_line(buf, b'*', &(args.len() + 1).to_string());
    put_bulk(buf, command.command_type().name().as_bytes());
    for arg in args {
        put_bulk(buf, arg.as_bytes());
    }
}

// =============================================================================
// Reply Encoding/Decoding
// =============================================================================

/// Encode a reply to bytes
pub fn encode_reply(reply: &Reply) -> Vec<u8> {
    let mut buf = BytesMut::new();
    encode_reply_into(reply, &mut buf);
    buf.to_vec()
}

fn encode_reply_into(reply: &Reply, buf: &mut BytesMut) {
    match reply {
        Reply::Nil => buf.put_slice(b"$-1\r\n"),
        Reply::Status(s) => put_line(buf, b'+', s),
        Reply::Error(s) => put_line(buf, b'-', s),
        Reply::Integer(n) => put_line(buf, b':', &n.to_string()),
        Reply::Bulk(s) => put_bulk(buf, s.as_bytes()),
        Reply::Array(items) => {
            put_line(buf, b'*', &items.len().to_string());
            for item in items {
                encode_reply_into(item, buf);
            }
        }
    }
}

/// Decode one reply from the front of `bytes`
///
/// Returns the reply and the number of bytes consumed, or `None` when the
/// buffer does not hold a complete reply yet.
pub fn decode_reply(bytes: &[u8]) -> Result<Option<(Reply, usize)>> {
    decode_at(bytes, 0)
}

fn decode_at(bytes: &[u8], depth: usize) -> Result<Option<(Reply, usize)>> {
    if depth > MAX_NESTING_DEPTH {
        return Err(ObjectError::Protocol(
            "maximum nesting depth exceeded".to_string(),
        ));
    }

    let Some(&type_byte) = bytes.first() else {
        return Ok(None);
    };
    let Some(line_end) = find_crlf(&bytes[1..]) else {
        return Ok(None);
    };
    let line = std::str::from_utf8(&bytes[1..1 + line_end])
        .map_err(|_| ObjectError::Protocol("reply line is not valid UTF-8".to_string()))?;
    // type byte + line + CRLF
    let header_len = 1 + line_end + 2;

    match type_byte {
        b'+' => Ok(Some((Reply::Status(line.to_string()), header_len))),
        b'-' => Ok(Some((Reply::Error(line.to_string()), header_len))),
        b':' => {
            let n = parse_length_line(line, "integer")?;
            Ok(Some((Reply::Integer(n), header_len)))
        }
        b'$' => {
            let len = parse_length_line(line, "bulk length")?;
            if len < 0 {
                return Ok(Some((Reply::Nil, header_len)));
            }
            let len = len as usize;
            if len > MAX_BULK_SIZE {
                return Err(ObjectError::Protocol(format!(
                    "Bulk string too large: {} bytes (max {})",
                    len, MAX_BULK_SIZE
                )));
            }

            let total_len = header_len + len + 2;
            if bytes.len() < total_len {
                return Ok(None);
            }
            if &bytes[header_len + len..total_len] != CRLF {
                return Err(ObjectError::Protocol(
                    "missing CRLF after bulk string".to_string(),
                ));
            }

            let body = String::from_utf8(bytes[header_len..header_len + len].to_vec())
                .map_err(|_| ObjectError::Protocol("bulk string is not valid UTF-8".to_string()))?;
            Ok(Some((Reply::Bulk(body), total_len)))
        }
        b'*' => {
            let count = parse_length_line(line, "array length")?;
            if count < 0 {
                return Ok(Some((Reply::Nil, header_len)));
            }
            let count = count as usize;
            if count > MAX_ELEMENTS {
                return Err(ObjectError::Protocol(format!(
                    "Array too large: {} elements (max {})",
                    count, MAX_ELEMENTS
                )));
            }

            let mut items = Vec::with_capacity(count);
            let mut offset = header_len;
            for _ in 0..count {
                match decode_at(&bytes[offset..], depth + 1)? {
                    Some((item, consumed)) => {
                        items.push(item);
                        offset += consumed;
                    }
                    None => return Ok(None),
                }
            }
            Ok(Some((Reply::Array(items), offset)))
        }
        other => Err(ObjectError::Protocol(format!(
            "Unknown reply type: 0x{:02x}",
            other
        ))),
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn put_line(buf: &mut BytesMut, prefix: u8, line: &str) {
    buf.put_u8(prefix);
    buf.put_slice(line.as_bytes());
    buf.put_slice(CRLF);
}

fn put_bulk(buf: &mut BytesMut, body: &[u8]) {
    put_line(buf, b'$', &body.len().to_string());
    buf.put_slice(body);
    buf.put_slice(CRLF);
}

fn find_crlf(bytes: &[u8]) -> Option<usize> {
    bytes.windows(2).position(|w| w == CRLF)
}

fn parse_length_line(line: &str, what: &str) -> Result<i64> {
    line.parse::<i64>()
        .map_err(|_| ObjectError::Protocol(format!("invalid {}: '{}'", what, line)))
}
