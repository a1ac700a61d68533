//! Reply definitions
//!
//! Typed replies written back to clients.

use bytes::{BufMut, Bytes, BytesMut};

/// A typed reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `+<text>`
    Status(String),

    /// `-<text>`, where text normally starts with `ERR `
    Error(String),

    /// `:<n>`
    Integer(i64),

    /// `$<len>` followed by the bytes
    Bulk(Bytes),

    /// `$-1`
    Null,
}

impl Reply {
    pub fn ok() -> Self {
        Reply::Status("OK".to_string())
    }

    pub fn pong() -> Self {
        Reply::Status("PONG".to_string())
    }

    /// Create an error reply; the `ERR ` prefix is added here
    pub fn error(message: &str) -> Self {
        Reply::Error(format!("ERR {}", message))
    }

    /// Booleans travel as integer 1 or 0
    pub fn from_bool(value: bool) -> Self {
        Reply::Integer(value as i64)
    }

    /// Append the wire form of this reply to `dst`
    pub fn encode(&self, dst: &mut BytesMut) {
        match self {
            Reply::Status(text) => put_line(dst, b'+', text),
            Reply::Error(text) => put_line(dst, b'-', text),
            Reply::Integer(n) => {
                dst.put_u8(b':');
                dst.put_slice(n.to_string().as_bytes());
                dst.put_slice(b"\r\n");
            }
            Reply::Bulk(bytes) => {
                dst.put_u8(b'$');
                dst.put_slice(bytes.len().to_string().as_bytes());
                dst.put_slice(b"\r\n");
                dst.put_slice(bytes);
                dst.put_slice(b"\r\n");
            }
            Reply::Null => dst.put_slice(b"$-1\r\n"),
        }
    }
}

/// Write a single-line reply; embedded CR/LF become spaces so the line
/// cannot be split into several replies
fn put_line(dst: &mut BytesMut, tag: u8, text: &str) {
    dst.put_u8(tag);
    dst.extend(text.bytes().map(|b| match b {
        b'\r' | b'\n' => b' ',
        other => other,
    }));
    dst.put_slice(b"\r\n");
}
