//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Request Format (length-prefixed array)
//! ```text
//! *<N>\r\n            argument count, N >= 1
//! $<L>\r\n            length of argument 1
//! <L raw bytes>\r\n   argument 1 (trailing terminator is discarded)
//! ...                 repeated N times
//! ```
//! A bare `\n` is accepted wherever `\r\n` is expected.
//!
//! ### Commands (verb is case-insensitive)
//! - `SET key value`   -> `+OK`
//! - `GET key`         -> bulk value or null bulk
//! - `DEL key [key..]` -> integer count removed (`DELETE` is an alias)
//! - `EXISTS key`      -> integer 1 or 0
//! - `PING`            -> `+PONG`
//! - `COMMAND`         -> `+OK` (compatibility stub)
//!
//! ### Reply Format
//! ```text
//! +<text>\r\n              simple status
//! -ERR <message>\r\n       error
//! :<n>\r\n                 integer
//! $<len>\r\n<bytes>\r\n    bulk string
//! $-1\r\n                  null bulk
//! ```
//!
//! ### Error Recovery
//! - Malformed header line: one error reply, the session keeps reading
//! - Malformed `$` line or short argument read: the connection is closed

mod command;
mod reply;
mod codec;

pub use command::Command;
pub use reply::Reply;
pub use codec::{
    encode_command, encode_reply, read_exact_bytes, read_line, read_reply, read_request,
    write_command, write_reply, Decoded, MAX_ARGS, MAX_BULK_LEN, MAX_LINE_LEN,
};
