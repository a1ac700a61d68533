//! Blocking client
//!
//! Encodes token lists as requests and reads back one reply each.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::Result;
use crate::protocol::{read_reply, write_command, Reply};

/// A connection to a Kache server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Send one command and wait for its reply
    pub fn send<T: AsRef<[u8]>>(&mut self, tokens: &[T]) -> Result<Reply> {
        write_command(&mut self.writer, tokens)?;
        read_reply(&mut self.reader)
    }
}
