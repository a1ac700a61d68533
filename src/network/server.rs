//! TCP Server
//!
//! Accepts connections and hands each one to the worker pool.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::pool::ThreadPool;
use crate::store::Table;
use super::Session;

/// TCP server for Kache
pub struct Server {
    /// Bound listening socket
    listener: TcpListener,

    /// Actual bound address (resolves port 0)
    local_addr: SocketAddr,

    /// Shared key-value table, handed to every session
    table: Arc<Table>,

    /// Workers that run sessions
    pool: ThreadPool,

    /// Set by `ShutdownHandle`; checked after every accept
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Bind the listen address and start the worker pool
    ///
    /// Bind and listen failures are returned to the caller; they are fatal
    /// at startup. On Unix, std enables `SO_REUSEADDR` on the listener so a
    /// restarted server can rebind promptly.
    pub fn bind(config: &Config, table: Arc<Table>) -> Result<Self> {
        let pool = ThreadPool::new(config.worker_threads)?;
        let listener = TcpListener::bind(&config.listen_addr)?;
        let local_addr = listener.local_addr()?;

        tracing::info!(
            "Kache server listening on {} with {} workers",
            local_addr,
            pool.size()
        );

        Ok(Self {
            listener,
            local_addr,
            table,
            pool,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address the server is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle that can stop `run` from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            addr: self.local_addr,
        }
    }

    /// Accept connections until shut down (blocking)
    ///
    /// Accept errors are logged and the loop continues. Once the loop
    /// stops, sessions already queued are drained before returning.
    pub fn run(&self) -> Result<()> {
        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::Acquire) {
                break;
            }

            match stream {
                Ok(stream) => self.dispatch(stream),
                Err(e) => tracing::error!("Failed to accept connection: {}", e),
            }
        }

        tracing::info!("Accept loop stopped, waiting for workers");
        self.pool.shutdown();
        Ok(())
    }

    /// Wrap an accepted socket into a session task
    fn dispatch(&self, stream: TcpStream) {
        if let Ok(addr) = stream.peer_addr() {
            tracing::debug!("New client connected from {}", addr);
        }

        let table = Arc::clone(&self.table);
        if let Err(e) = self.pool.enqueue(move || serve(stream, table)) {
            tracing::warn!("Dropping connection: {}", e);
        }
    }
}

/// Task body: run one session to completion
fn serve(stream: TcpStream, table: Arc<Table>) {
    let mut session = match Session::from_stream(stream, table) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("Failed to set up session: {}", e);
            return;
        }
    };

    if let Err(e) = session.run() {
        tracing::warn!("Closing connection from {}: {}", session.peer_addr(), e);
    }
}

/// Stops a running `Server` from another thread
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl ShutdownHandle {
    /// Ask the accept loop to stop
    ///
    /// The loop is blocked in `accept`, so a throwaway connection is made
    /// to wake it up.
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Release);

        let mut addr = self.addr;
        if addr.ip().is_unspecified() {
            let loopback = match addr.ip() {
                IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
            };
            addr.set_ip(loopback);
        }

        if let Err(e) = TcpStream::connect(addr) {
            tracing::debug!("Shutdown wake-up connection failed: {}", e);
        }
    }
}
