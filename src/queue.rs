//! # Bounded Sample Queue
//!
//! Fixed-capacity FIFO between the pollers and the export consumer. The
//! overflow policy is drop-oldest-then-insert: a `put` against a full queue
//! evicts the oldest sample and always lands the new one, so the pollers are
//! never blocked by a slow consumer. `get` is a timed receive where expiry
//! is an expected, non-error condition for the polling consumer loop.

use log::{debug, warn};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::time::{timeout, Instant};

use crate::error::QueueError;
use crate::sample::Sample;

struct Inner {
    buf: VecDeque<Sample>,
    closed: bool,
    dropped: u64,
}

/// Clonable handle to one bounded queue. Producers and the consumer share
/// the same handle type.
#[derive(Clone)]
pub struct SampleQueue {
    inner: Arc<Mutex<Inner>>,
    notify: Arc<Notify>,
    capacity: usize,
}

impl SampleQueue {
    /// Creates a queue holding at most `capacity` samples.
    pub fn bounded(capacity: usize) -> Self {
        SampleQueue {
            inner: Arc::new(Mutex::new(Inner {
                buf: VecDeque::with_capacity(capacity),
                closed: false,
                dropped: 0,
            })),
            notify: Arc::new(Notify::new()),
            capacity: capacity.max(1),
        }
    }

    /// Inserts a sample, evicting the oldest entry first when full.
    ///
    /// Capacity pressure never fails an insert; only a closed queue does.
    pub async fn put(&self, sample: Sample) -> Result<(), QueueError> {
        let mut inner = self.inner.lock().await;
        if inner.closed {
            return Err(QueueError::Unavailable);
        }
        if inner.buf.len() >= self.capacity {
            inner.buf.pop_front();
            inner.dropped += 1;
            debug!(
                "sample queue full, dropped oldest ({} dropped so far)",
                inner.dropped
            );
        }
        inner.buf.push_back(sample);
        drop(inner);
        self.notify.notify_one();
        Ok(())
    }

    /// Timed receive. Returns [`QueueError::Empty`] when nothing arrives
    /// before the deadline, [`QueueError::Unavailable`] once the queue is
    /// closed and drained.
    pub async fn get(&self, wait: Duration) -> Result<Sample, QueueError> {
        let deadline = Instant::now() + wait;
        loop {
            {
                let mut inner = self.inner.lock().await;
                if let Some(sample) = inner.buf.pop_front() {
                    return Ok(sample);
                }
                if inner.closed {
                    return Err(QueueError::Unavailable);
                }
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(QueueError::Empty);
            }
            // A permit stored by notify_one between the unlock above and
            // this await wakes us immediately.
            let _ = timeout(remaining, self.notify.notified()).await;
        }
    }

    /// Closes the queue. Later `put` calls fail with `Unavailable`; `get`
    /// drains remaining samples first.
    pub async fn close(&self) {
        let mut inner = self.inner.lock().await;
        if !inner.closed {
            inner.closed = true;
            warn!("sample queue closed");
        }
        drop(inner);
        self.notify.notify_waiters();
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.buf.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.buf.is_empty()
    }

    /// Number of samples evicted by the drop-oldest policy so far.
    pub async fn dropped(&self) -> u64 {
        self.inner.lock().await.dropped
    }
}
