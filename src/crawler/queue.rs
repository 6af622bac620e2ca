//! Fixed-size worker pool over an unbounded job queue
//!
//! The producer submits jobs without waiting on them. [`WorkQueue::join`]
//! closes the queue, lets the workers drain whatever is left and returns
//! once every worker has exited. A job that fails or panics is counted and
//! logged; it never stops its worker or the drain.

use crate::CoachError;
use futures_util::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// Job counters after a drain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub completed: u64,
    pub failed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    completed: AtomicU64,
    failed: AtomicU64,
}

/// A pool of `count` workers consuming jobs of type `J`
pub struct WorkQueue<J> {
    label: String,
    sender: mpsc::UnboundedSender<J>,
    workers: JoinSet<()>,
    counters: Arc<Counters>,
}

impl<J: Send + 'static> WorkQueue<J> {
    /// Spawns `count` workers that run `handler` for each submitted job
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<H, Fut>(label: impl Into<String>, count: usize, handler: H) -> Self
    where
        H: Fn(J) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CoachError>> + Send + 'static,
    {
        let label = label.into();
        let (sender, receiver) = mpsc::unbounded_channel();
        let receiver = Arc::new(Mutex::new(receiver));
        let handler = Arc::new(handler);
        let counters = Arc::new(Counters::default());

        let mut workers = JoinSet::new();
        for worker_id in 0..count.max(1) {
            let receiver = Arc::clone(&receiver);
            let handler = Arc::clone(&handler);
            let counters = Arc::clone(&counters);
            let label = label.clone();

            workers.spawn(async move {
                loop {
                    let job = {
                        let mut receiver = receiver.lock().await;
                        receiver.recv().await
                    };
                    let Some(job) = job else {
                        break;
                    };

                    match AssertUnwindSafe(handler(job)).catch_unwind().await {
                        Ok(Ok(())) => {
                            counters.completed.fetch_add(1, Ordering::SeqCst);
                        }
                        Ok(Err(e)) => {
                            counters.failed.fetch_add(1, Ordering::SeqCst);
                            tracing::warn!("{} worker {}: job failed: {}", label, worker_id, e);
                        }
                        Err(_) => {
                            counters.failed.fetch_add(1, Ordering::SeqCst);
                            tracing::error!("{} worker {}: job panicked", label, worker_id);
                        }
                    }
                }
                tracing::trace!("{} worker {} stopped", label, worker_id);
            });
        }

        Self {
            label,
            sender,
            workers,
            counters,
        }
    }

    /// Enqueues a job without waiting for it to run
    pub fn submit(&self, job: J) -> Result<(), CoachError> {
        self.sender
            .send(job)
            .map_err(|_| CoachError::QueueClosed(self.label.clone()))
    }

    /// Closes the queue and waits until every job has run
    pub async fn join(self) -> QueueStats {
        let Self {
            label,
            sender,
            mut workers,
            counters,
        } = self;

        drop(sender);

        while let Some(result) = workers.join_next().await {
            if let Err(e) = result {
                tracing::error!("{} worker exited abnormally: {}", label, e);
            }
        }

        QueueStats {
            completed: counters.completed.load(Ordering::SeqCst),
            failed: counters.failed.load(Ordering::SeqCst),
        }
    }
}
