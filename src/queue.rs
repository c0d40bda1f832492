//! Bounded-concurrency FIFO request queue.
//!
//! [`RequestQueue`] limits how many outbound assistant calls run at once.
//! Admission uses a fair tokio [`Semaphore`], so waiting tasks are admitted
//! in arrival order. When a task finishes (success or failure) its slot is
//! held for a short drain delay before the next waiter is admitted, which
//! spaces out bursts against the upstream API.
//!
//! Completion order is not guaranteed: a later task can finish first if its
//! remote run completes sooner.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::trace;

use crate::{ForgeError, Result, telemetry};

/// Default number of tasks admitted concurrently.
pub const DEFAULT_MAX_CONCURRENT: usize = 2;

/// Default delay between a task finishing and the next one being admitted.
pub const DEFAULT_DRAIN_DELAY: Duration = Duration::from_millis(100);

/// Configuration for the request queue.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Maximum tasks in flight. Default: 2.
    pub max_concurrent: usize,
    /// Delay before a released slot admits the next task. Default: 100ms.
    pub drain_delay: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            drain_delay: DEFAULT_DRAIN_DELAY,
        }
    }
}

impl QueueConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    pub fn drain_delay(mut self, delay: Duration) -> Self {
        self.drain_delay = delay;
        self
    }
}

/// FIFO admission control for outbound calls. See module docs.
pub struct RequestQueue {
    slots: Arc<Semaphore>,
    max_concurrent: usize,
    drain_delay: Duration,
    active: AtomicUsize,
    pending: AtomicUsize,
}

impl RequestQueue {
    /// Create a queue. A `max_concurrent` of zero is treated as one.
    pub fn new(config: &QueueConfig) -> Self {
        let max_concurrent = config.max_concurrent.max(1);
        Self {
            slots: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            drain_delay: config.drain_delay,
            active: AtomicUsize::new(0),
            pending: AtomicUsize::new(0),
        }
    }

    /// Run `task` once a slot is free and return its result.
    ///
    /// The task's error is returned to this caller only; other queued tasks
    /// are unaffected.
    pub async fn enqueue<F, Fut, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let queued_at = Instant::now();
        let waiting = Counted::enter(&self.pending);
        let permit = Arc::clone(&self.slots).acquire_owned().await;
        drop(waiting);
        let permit = permit.map_err(|_| ForgeError::QueueClosed)?;

        metrics::histogram!(telemetry::QUEUE_WAIT_SECONDS)
            .record(queued_at.elapsed().as_secs_f64());

        let running = Counted::enter(&self.active);
        trace!(active = self.active(), pending = self.pending(), "task admitted");

        let result = task().await;

        drop(running);
        if self.drain_delay.is_zero() {
            drop(permit);
        } else {
            let delay = self.drain_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                drop(permit);
            });
        }

        result
    }

    /// Tasks currently running.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Tasks waiting for a slot.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Reject all waiting and future tasks with [`ForgeError::QueueClosed`].
    pub fn close(&self) {
        self.slots.close();
    }
}

/// Increments a counter for as long as it lives, so cancelled tasks are
/// still accounted for.
struct Counted<'a>(&'a AtomicUsize);

impl<'a> Counted<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Counted<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new(&QueueConfig::default())
    }
}
