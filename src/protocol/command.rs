//! Command definitions
//!
//! Turns a decoded argument list into a command and runs it against the table.

use bytes::Bytes;

use crate::store::Table;
use super::Reply;

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set a key to a value
    Set { key: Bytes, value: Bytes },

    /// Get a value by key
    Get { key: Bytes },

    /// Delete one or more keys
    Del { keys: Vec<Bytes> },

    /// Check whether a key exists
    Exists { key: Bytes },

    /// Ping (health check)
    Ping,

    /// `COMMAND`, answered with a bare OK so stock clients can connect
    CommandInfo,

    /// Unknown verb, or a known verb with the wrong number of arguments
    Unknown { name: String },
}

impl Command {
    /// Build a command from the decoded arguments (verb first)
    ///
    /// The verb is matched case-insensitively. Arity is checked here, so
    /// a wrong argument count yields `Unknown` carrying the verb as sent.
    pub fn from_args(args: Vec<Bytes>) -> Command {
        let mut args = args.into_iter();
        let verb = match args.next() {
            Some(verb) => verb,
            None => return Command::Unknown { name: String::new() },
        };
        let name = String::from_utf8_lossy(&verb).into_owned();
        let rest: Vec<Bytes> = args.collect();

        match name.to_ascii_uppercase().as_str() {
            "SET" => match <[Bytes; 2]>::try_from(rest) {
                Ok([key, value]) => Command::Set { key, value },
                Err(_) => Command::Unknown { name },
            },
            "GET" => match <[Bytes; 1]>::try_from(rest) {
                Ok([key]) => Command::Get { key },
                Err(_) => Command::Unknown { name },
            },
            "DEL" | "DELETE" if !rest.is_empty() => Command::Del { keys: rest },
            "EXISTS" => match <[Bytes; 1]>::try_from(rest) {
                Ok([key]) => Command::Exists { key },
                Err(_) => Command::Unknown { name },
            },
            "PING" if rest.is_empty() => Command::Ping,
            "COMMAND" if rest.is_empty() => Command::CommandInfo,
            _ => Command::Unknown { name },
        }
    }

    /// Run the command against the table and produce exactly one reply
    pub fn execute(self, table: &Table) -> Reply {
        match self {
            Command::Set { key, value } => {
                table.set(key, value);
                Reply::ok()
            }
            Command::Get { key } => match table.get(&key) {
                Some(value) => Reply::Bulk(value),
                None => Reply::Null,
            },
            Command::Del { keys } => {
                // Each key takes the lock on its own; the count is of actual removals
                let removed = keys.iter().filter(|key| table.delete(key)).count();
                Reply::Integer(removed as i64)
            }
            Command::Exists { key } => Reply::from_bool(table.exists(&key)),
            Command::Ping => Reply::pong(),
            Command::CommandInfo => Reply::ok(),
            Command::Unknown { name } => {
                // The verb is client data; it must not end the error line early
                let name = name.replace(['\r', '\n'], " ");
                Reply::error(&format!("unknown command '{}'", name))
            }
        }
    }

    /// Verb name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "SET",
            Command::Get { .. } => "GET",
            Command::Del { .. } => "DEL",
            Command::Exists { .. } => "EXISTS",
            Command::Ping => "PING",
            Command::CommandInfo => "COMMAND",
            Command::Unknown { .. } => "UNKNOWN",
        }
    }
}
