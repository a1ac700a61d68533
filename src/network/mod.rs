//! Network Module
//!
//! TCP server, per-connection sessions and a small blocking client.
//!
//! ## Architecture
//! - Single acceptor thread (the caller of `Server::run`)
//! - Fixed worker pool; each accepted socket becomes one task
//! - A session owns its socket for its whole lifetime and runs
//!   decode -> dispatch -> reply until the peer goes away

mod server;
mod session;
mod client;

pub use server::{Server, ShutdownHandle};
pub use session::Session;
pub use client::Client;
