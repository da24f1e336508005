//! Fixed worker pool for root-parallel search.
//!
//! Workers block on a FIFO channel of boxed job closures; each submitted
//! job owns everything it needs and publishes its result through its own
//! reply channel. Dropping the pool closes the queue, lets the workers
//! drain, and joins every thread.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Sender};
use log::trace;

use crate::error::EngineError;

type Job = Box<dyn FnOnce() + Send + 'static>;

pub const MAX_POOL_THREADS: usize = 64;

/// Default worker count: one less than the machine's parallelism, at
/// least one.
pub fn default_thread_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn a pool of `threads` workers (None = auto-detect), clamped to
    /// [1, MAX_POOL_THREADS].
    pub fn new(threads: Option<usize>) -> Result<Self, EngineError> {
        let count = threads
            .unwrap_or_else(default_thread_count)
            .clamp(1, MAX_POOL_THREADS);

        let (sender, receiver) = unbounded::<Job>();
        let mut workers = Vec::with_capacity(count);
        for i in 0..count {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("quintet-worker-{i}"))
                .spawn(move || {
                    while let Ok(job) = receiver.recv() {
                        job();
                    }
                    trace!("worker {i} drained");
                })
                .map_err(|_| EngineError::ResourceExhausted)?;
            workers.push(handle);
        }

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Submit a job. Jobs are executed in FIFO order as workers free up.
    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Some(sender) = &self.sender {
            // Send only fails when all receivers are gone, which cannot
            // happen before Drop closes the channel.
            let _ = sender.send(Box::new(job));
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the channel stops the workers once the queue drains.
        self.sender.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}
