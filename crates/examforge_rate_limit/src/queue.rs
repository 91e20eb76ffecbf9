//! Serialized rate-limited invocation queue.

use crate::{RateLimitError, RateLimitErrorKind};
use futures_util::future::BoxFuture;
use std::future::Future;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, trace};

type Job = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// FIFO task queue that spaces consecutive invocation starts by a minimum
/// interval.
///
/// A dedicated worker loop receives tasks one at a time, sleeps until the
/// minimum interval since the previous invocation start has passed, then
/// runs the task. Each caller receives exactly its own task's outcome over
/// a reply channel, so one task's failure can never block or poison the
/// next.
///
/// The invocation timestamp is stamped at the moment a task begins
/// executing, not when it was enqueued.
///
/// # Examples
///
/// ```no_run
/// use examforge_rate_limit::SerialQueue;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let queue = SerialQueue::new(Duration::from_secs(2));
///
/// let answer = queue.enqueue(|| async { 42 }).await?;
/// assert_eq!(answer, 42);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SerialQueue {
    jobs: mpsc::UnboundedSender<Job>,
    min_interval: Duration,
}

impl SerialQueue {
    /// Create a queue with the given minimum inter-invocation interval and
    /// spawn its worker loop.
    pub fn new(min_interval: Duration) -> Self {
        let (jobs, rx) = mpsc::unbounded_channel();
        tokio::spawn(worker(rx, min_interval));
        debug!(min_interval_ms = min_interval.as_millis() as u64, "Serial queue started");
        Self { jobs, min_interval }
    }

    /// Enqueue a unit of work and wait for its outcome.
    ///
    /// Tasks run in enqueue order (FIFO). The returned future resolves with
    /// the task's own output once the worker has executed it.
    ///
    /// # Errors
    ///
    /// Returns an error only when the worker loop is gone; task-level
    /// failures are delivered as the task's own output type.
    pub async fn enqueue<T, F, Fut>(&self, task: F) -> Result<T, RateLimitError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job = Box::new(move || {
            Box::pin(async move {
                let outcome = task().await;
                // The caller may have gone away; the worker keeps going.
                let _ = reply_tx.send(outcome);
            })
        });

        self.jobs.send(job).map_err(|_| {
            RateLimitError::new(RateLimitErrorKind::WorkerGone(
                "queue worker task has exited".to_string(),
            ))
        })?;

        reply_rx.await.map_err(|_| {
            RateLimitError::new(RateLimitErrorKind::WorkerGone(
                "worker dropped the task before completion".to_string(),
            ))
        })
    }

    /// The configured minimum inter-invocation interval.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

impl std::fmt::Debug for SerialQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialQueue")
            .field("min_interval", &self.min_interval)
            .finish()
    }
}

/// Worker loop: runs queued jobs in order, spacing invocation starts.
///
/// Exits when every queue handle has been dropped.
async fn worker(mut jobs: mpsc::UnboundedReceiver<Job>, min_interval: Duration) {
    let mut last_started: Option<Instant> = None;

    while let Some(job) = jobs.recv().await {
        if let Some(previous) = last_started {
            let elapsed = previous.elapsed();
            if elapsed < min_interval {
                let wait = min_interval - elapsed;
                trace!(wait_ms = wait.as_millis() as u64, "Spacing before next invocation");
                tokio::time::sleep(wait).await;
            }
        }

        last_started = Some(Instant::now());
        job().await;
    }

    debug!("Serial queue worker exiting");
}
