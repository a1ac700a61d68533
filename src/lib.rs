//! # Kache
//!
//! A minimal in-memory key-value server with:
//! - A Redis-style length-prefixed request protocol over TCP
//! - A fixed-size worker pool servicing connections
//! - A single shared table guarded by one exclusive lock
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Listener (main thread)                    │
//! │                 accept() -> enqueue(session)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Worker Pool                           │
//! │            (N threads, FIFO queue + Condvar)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ one worker per connection
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Session Handler                         │
//! │          decode request -> dispatch -> write reply          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                ┌──────▼──────┐
//!                │    Table    │
//!                │   (Mutex)   │
//!                └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod pool;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KacheError, Result};
pub use config::Config;
pub use store::Table;
pub use pool::ThreadPool;
pub use network::Server;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Kache
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
