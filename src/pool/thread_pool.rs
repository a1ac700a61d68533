//! Thread pool implementation
//!
//! VecDeque queue guarded by a parking_lot Mutex, paired with a Condvar.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};

use crate::error::{KacheError, Result};
use super::Task;

/// Queue state protected by the pool lock
struct Queue {
    /// Pending tasks in FIFO order
    tasks: VecDeque<Task>,

    /// Set once shutdown begins; never cleared
    shutdown: bool,
}

/// State shared between the pool handle and its workers
struct Shared {
    queue: Mutex<Queue>,

    /// Signalled on enqueue (one waiter) and on shutdown (all waiters)
    available: Condvar,
}

/// Fixed-size worker pool
///
/// ## Concurrency:
/// - `shared.queue`: the only state touched by both producers and workers
/// - `workers`: join handles, taken exactly once by `shutdown`
/// - All methods use `&self`, so the pool can be shared behind an `Arc`
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    size: usize,
}

impl ThreadPool {
    /// Spawn a pool with exactly `size` workers
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(KacheError::Config(
                "thread pool needs at least one worker".to_string(),
            ));
        }

        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                tasks: VecDeque::new(),
                shutdown: false,
            }),
            available: Condvar::new(),
        });

        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let worker_shared = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(format!("kache-worker-{}", id))
                .spawn(move || worker_loop(id, worker_shared));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    // Stop whatever was already started before reporting
                    let pool = Self {
                        shared,
                        workers: Mutex::new(workers),
                        size: id,
                    };
                    pool.shutdown();
                    return Err(e.into());
                }
            }
        }

        tracing::debug!("Thread pool started with {} workers", size);

        Ok(Self {
            shared,
            workers: Mutex::new(workers),
            size,
        })
    }

    /// Spawn one worker per available hardware execution context
    pub fn with_available_parallelism() -> Result<Self> {
        Self::new(crate::config::available_parallelism())
    }

    /// Queue a task and wake one idle worker
    ///
    /// Fails with `PoolShutdown` once shutdown has begun.
    pub fn enqueue<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut queue = self.shared.queue.lock();
            if queue.shutdown {
                return Err(KacheError::PoolShutdown);
            }
            queue.tasks.push_back(Box::new(task));
        }
        self.shared.available.notify_one();
        Ok(())
    }

    /// Stop accepting tasks, drain the queue and join every worker
    ///
    /// Safe to call more than once; later calls return immediately.
    pub fn shutdown(&self) {
        {
            let mut queue = self.shared.queue.lock();
            queue.shutdown = true;
        }
        self.shared.available.notify_all();

        let workers = std::mem::take(&mut *self.workers.lock());
        for handle in workers {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() {
                tracing::error!("{} terminated abnormally", name);
            }
        }
    }

    /// Number of workers (fixed at construction)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of tasks waiting for a worker
    pub fn queued(&self) -> usize {
        self.shared.queue.lock().tasks.len()
    }

    /// Whether shutdown has begun
    pub fn is_shutdown(&self) -> bool {
        self.shared.queue.lock().shutdown
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Body of every worker thread
fn worker_loop(id: usize, shared: Arc<Shared>) {
    loop {
        let task = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(task) = queue.tasks.pop_front() {
                    break task;
                }
                if queue.shutdown {
                    tracing::trace!("Worker {} exiting", id);
                    return;
                }
                shared.available.wait(&mut queue);
            }
        };

        // Lock is released; the task runs without holding it
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
            tracing::error!("Worker {} task panicked: {}", id, panic_message(&*payload));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
