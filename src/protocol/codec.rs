//! Protocol codec
//!
//! Blocking readers and encoders for the wire protocol.
//!
//! The server side decodes requests with [`read_request`], which never
//! returns an `Err` for a bad header line: that case is reported as
//! [`Decoded::Rejected`] so the session can reply and resynchronise.
//! Anything that goes wrong after a valid header is an `Err` and ends
//! the connection.
//!
//! The client side uses [`encode_command`] and [`read_reply`].

use std::io::{self, BufRead, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{KacheError, Result};
use super::Reply;

/// Maximum number of arguments in one request
pub const MAX_ARGS: usize = 1024 * 1024;

/// Maximum size of a single argument (512 MB)
pub const MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Maximum length of a header or length line, terminator included
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Initial buffer size when reading an argument body
const READ_CHUNK: usize = 64 * 1024;

/// Outcome of decoding one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A complete request; the verb is the first argument
    Request(Vec<Bytes>),

    /// The header line was malformed; the message goes back to the client
    /// and the stream is still usable
    Rejected(String),

    /// The peer closed the connection between requests
    Closed,
}

// =============================================================================
// Line and Byte Primitives
// =============================================================================

/// Result of reading one bounded line
enum Line {
    /// A terminated line, terminator stripped
    Complete(Vec<u8>),

    /// `MAX_LINE_LEN` bytes were read without finding a terminator
    TooLong,

    /// The stream ended before a terminator
    Eof,
}

fn read_bounded_line<R: BufRead>(reader: &mut R) -> Result<Line> {
    let mut line = Vec::new();
    let read = Read::take(&mut *reader, MAX_LINE_LEN as u64).read_until(b'\n', &mut line)?;

    if line.last() != Some(&b'\n') {
        if read >= MAX_LINE_LEN {
            return Ok(Line::TooLong);
        }
        return Ok(Line::Eof);
    }

    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Ok(Line::Complete(line))
}

/// Discard input up to and including the next `\n`, or to end of stream
fn skip_line<R: BufRead>(reader: &mut R) -> Result<()> {
    loop {
        let (found, used) = {
            let buf = reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(());
            }
            match buf.iter().position(|&b| b == b'\n') {
                Some(pos) => (true, pos + 1),
                None => (false, buf.len()),
            }
        };
        reader.consume(used);
        if found {
            return Ok(());
        }
    }
}

/// Read one line, without its `\r\n` or `\n` terminator
///
/// Returns `None` if the stream ends before a terminator is seen; any
/// partial line is discarded. A line longer than `MAX_LINE_LEN` is an error.
pub fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    match read_bounded_line(reader)? {
        Line::Complete(line) => Ok(Some(line)),
        Line::Eof => Ok(None),
        Line::TooLong => Err(KacheError::Protocol(format!(
            "line exceeds {} bytes",
            MAX_LINE_LEN
        ))),
    }
}

/// Read exactly `len` bytes
///
/// A stream that ends early is a protocol error: the frame can no longer
/// be trusted.
pub fn read_exact_bytes<R: Read>(reader: &mut R, len: usize) -> Result<Bytes> {
    let mut buf = Vec::with_capacity(len.min(READ_CHUNK));
    let read = Read::take(&mut *reader, len as u64).read_to_end(&mut buf)?;

    if read < len {
        return Err(KacheError::Protocol(format!(
            "short read: expected {} bytes, got {}",
            len, read
        )));
    }
    Ok(Bytes::from(buf))
}

// =============================================================================
// Request Decoding
// =============================================================================

/// Read one request from a stream
///
/// Blocks until a full request is received, the peer disconnects, or the
/// frame turns out to be corrupt.
pub fn read_request<R: BufRead>(reader: &mut R) -> Result<Decoded> {
    let header = match read_bounded_line(reader)? {
        Line::Complete(line) => line,
        Line::Eof => return Ok(Decoded::Closed),
        Line::TooLong => {
            // Still a header-level error: drop the rest of the line and resync
            skip_line(reader)?;
            return Ok(Decoded::Rejected(format!(
                "Protocol error: header line exceeds {} bytes",
                MAX_LINE_LEN
            )));
        }
    };

    let count = match parse_header(&header) {
        Ok(count) => count,
        Err(message) => return Ok(Decoded::Rejected(message)),
    };

    let mut args = Vec::with_capacity(count.min(64));
    for index in 0..count {
        let line = read_line(reader)?.ok_or_else(|| {
            KacheError::Protocol(format!(
                "stream ended before argument {} of {}",
                index + 1,
                count
            ))
        })?;
        let len = parse_bulk_len(&line)?;
        let arg = read_exact_bytes(reader, len)?;

        // Trailing terminator: consumed, never validated
        read_line(reader)?;

        args.push(arg);
    }

    Ok(Decoded::Request(args))
}

/// Parse `*<N>` into the argument count, or the message to reject it with
fn parse_header(line: &[u8]) -> std::result::Result<usize, String> {
    match line.first() {
        Some(b'*') => {}
        Some(&other) => {
            return Err(format!(
                "Protocol error: expected '*', got '{}'",
                (other as char).escape_default()
            ))
        }
        None => return Err("Protocol error: expected '*', got empty line".to_string()),
    }

    match parse_decimal(&line[1..]) {
        Some(count) if (1..=MAX_ARGS).contains(&count) => Ok(count),
        _ => Err("Protocol error: invalid multibulk length".to_string()),
    }
}

/// Parse `$<L>` into the argument length
fn parse_bulk_len(line: &[u8]) -> Result<usize> {
    if line.first() != Some(&b'$') {
        return Err(KacheError::Protocol(format!(
            "expected '$', got {:?}",
            String::from_utf8_lossy(line)
        )));
    }

    let len: usize = parse_decimal(&line[1..]).ok_or_else(|| {
        KacheError::Protocol(format!(
            "invalid bulk length {:?}",
            String::from_utf8_lossy(&line[1..])
        ))
    })?;

    if len > MAX_BULK_LEN {
        return Err(KacheError::Protocol(format!(
            "bulk length {} exceeds {} bytes",
            len, MAX_BULK_LEN
        )));
    }
    Ok(len)
}

fn parse_decimal<T: std::str::FromStr>(digits: &[u8]) -> Option<T> {
    std::str::from_utf8(digits).ok()?.parse().ok()
}

// =============================================================================
// Request Encoding (client side)
// =============================================================================

/// Encode a token list as one request
pub fn encode_command<T: AsRef<[u8]>>(tokens: &[T]) -> Bytes {
    let mut dst = BytesMut::new();
    dst.put_u8(b'*');
    dst.put_slice(tokens.len().to_string().as_bytes());
    dst.put_slice(b"\r\n");

    for token in tokens {
        let token = token.as_ref();
        dst.put_u8(b'$');
        dst.put_slice(token.len().to_string().as_bytes());
        dst.put_slice(b"\r\n");
        dst.put_slice(token);
        dst.put_slice(b"\r\n");
    }

    dst.freeze()
}

/// Write a request to a stream
pub fn write_command<W: Write, T: AsRef<[u8]>>(writer: &mut W, tokens: &[T]) -> Result<()> {
    writer.write_all(&encode_command(tokens))?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Reply Encoding/Decoding
// =============================================================================

/// Encode a reply to bytes
pub fn encode_reply(reply: &Reply) -> Bytes {
    let mut dst = BytesMut::new();
    reply.encode(&mut dst);
    dst.freeze()
}

/// Write a reply to a stream
pub fn write_reply<W: Write>(writer: &mut W, reply: &Reply) -> Result<()> {
    writer.write_all(&encode_reply(reply))?;
    writer.flush()?;
    Ok(())
}

/// Read one complete reply from a stream
pub fn read_reply<R: BufRead>(reader: &mut R) -> Result<Reply> {
    let line = read_line(reader)?
        .ok_or_else(|| KacheError::Io(io::Error::from(io::ErrorKind::UnexpectedEof)))?;

    let (tag, rest) = line
        .split_first()
        .ok_or_else(|| KacheError::Protocol("empty reply line".to_string()))?;

    match tag {
        b'+' => Ok(Reply::Status(String::from_utf8_lossy(rest).into_owned())),
        b'-' => Ok(Reply::Error(String::from_utf8_lossy(rest).into_owned())),
        b':' => parse_decimal(rest).map(Reply::Integer).ok_or_else(|| {
            KacheError::Protocol(format!(
                "invalid integer reply {:?}",
                String::from_utf8_lossy(rest)
            ))
        }),
        b'$' if rest == b"-1" => Ok(Reply::Null),
        b'$' => {
            let len = parse_bulk_len(&line)?;
            let bytes = read_exact_bytes(reader, len)?;
            read_line(reader)?;
            Ok(Reply::Bulk(bytes))
        }
        other => Err(KacheError::Protocol(format!(
            "unknown reply type '{}'",
            (*other as char).escape_default()
        ))),
    }
}
