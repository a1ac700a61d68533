//! Session Handler
//!
//! Runs the request/reply loop for a single client connection.

use std::io::{BufReader, BufWriter, Read, Write};
use std::net::TcpStream;
use std::sync::Arc;

use crate::error::Result;
use crate::protocol::{read_request, write_reply, Command, Decoded, Reply};
use crate::store::Table;

/// Handles a single client connection
///
/// Generic over the read and write halves so the loop can be driven by
/// in-memory buffers as well as sockets.
pub struct Session<R: Read, W: Write> {
    /// Read half (buffered for line reads)
    reader: BufReader<R>,

    /// Write half (flushed after every reply)
    writer: BufWriter<W>,

    /// Shared key-value table
    table: Arc<Table>,

    /// Peer address for logging
    peer_addr: String,
}

impl Session<TcpStream, TcpStream> {
    /// Create a session for an accepted socket
    pub fn from_stream(stream: TcpStream, table: Arc<Table>) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm; every reply is a single small write
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        Ok(Self::new(read_stream, stream, table, peer_addr))
    }
}

impl<R: Read, W: Write> Session<R, W> {
    /// Create a session over arbitrary read/write halves
    pub fn new(reader: R, writer: W, table: Arc<Table>, peer_addr: impl Into<String>) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer: BufWriter::new(writer),
            table,
            peer_addr: peer_addr.into(),
        }
    }

    /// Serve requests until the client disconnects (blocking)
    ///
    /// Returns `Ok` on a clean disconnect and `Err` when a frame is
    /// corrupted mid-command; no reply is written in that case and the
    /// caller drops the connection.
    pub fn run(&mut self) -> Result<()> {
        tracing::debug!("Session started for {}", self.peer_addr);

        loop {
            let decoded = match read_request(&mut self.reader) {
                Ok(decoded) => decoded,
                Err(e) if e.is_disconnect() => {
                    tracing::debug!("Client {} went away mid-request", self.peer_addr);
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            let reply = match decoded {
                Decoded::Closed => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Decoded::Rejected(message) => {
                    tracing::debug!("Rejected header from {}: {}", self.peer_addr, message);
                    Reply::error(&message)
                }
                Decoded::Request(args) => {
                    let command = Command::from_args(args);
                    tracing::trace!("{} from {}", command.name(), self.peer_addr);
                    command.execute(&self.table)
                }
            };

            if let Err(e) = write_reply(&mut self.writer, &reply) {
                if e.is_disconnect() {
                    tracing::debug!(
                        "Client {} disconnected before reply could be sent: {}",
                        self.peer_addr,
                        e
                    );
                    return Ok(());
                }
                return Err(e);
            }
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
