//! Worker Pool Module
//!
//! A fixed-size pool of long-lived worker threads fed from a FIFO queue.
//!
//! ## Architecture
//! ```text
//!   enqueue(task) ──▶ ┌──────────────────────────┐
//!                     │ Mutex<Queue> + Condvar   │
//!                     └────────────┬─────────────┘
//!               ┌──────────────────┼──────────────────┐
//!               ▼                  ▼                  ▼
//!         kache-worker-0     kache-worker-1  ...  kache-worker-N
//! ```
//!
//! - The worker count is fixed at construction; no elastic scaling
//! - Each task runs to completion on a single worker
//! - Shutdown drains tasks already queued, then joins every worker
//! - A panicking task is logged and the worker keeps serving

mod thread_pool;

pub use thread_pool::ThreadPool;

/// A unit of deferred work, consumed at most once
pub type Task = Box<dyn FnOnce() + Send + 'static>;
