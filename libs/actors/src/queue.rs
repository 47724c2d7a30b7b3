//! Actor Queue
//!
//! Ordered, thread-safe buffer of pending messages for exactly one actor.
//! A [`Queue`] is a cheap handle; clones share the same buffer.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared FIFO message buffer
pub struct Queue<M> {
    inner: Arc<QueueInner<M>>,
}

struct QueueInner<M> {
    name: String,
    buffer: Mutex<VecDeque<M>>,
    available: Condvar,
}

impl<M> Queue<M> {
    /// Create an empty queue labelled `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                name: name.into(),
                buffer: Mutex::new(VecDeque::new()),
                available: Condvar::new(),
            }),
        }
    }

    /// Name of the owning actor, as registered
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Append a message and wake waiters
    pub fn push(&self, msg: M) {
        self.inner.buffer.lock().push_back(msg);
        self.inner.available.notify_all();
    }

    /// Remove the oldest message without blocking
    pub fn try_pop(&self) -> Option<M> {
        self.inner.buffer.lock().pop_front()
    }

    /// Remove the oldest message, waiting up to `timeout` for one to arrive
    pub fn pop_timeout(&self, timeout: Duration) -> Option<M> {
        let deadline = Instant::now() + timeout;
        let mut buffer = self.inner.buffer.lock();
        loop {
            if let Some(msg) = buffer.pop_front() {
                return Some(msg);
            }
            if self
                .inner
                .available
                .wait_until(&mut buffer, deadline)
                .timed_out()
            {
                return buffer.pop_front();
            }
        }
    }

    /// Block until at least one message is pending or `deadline` passes.
    ///
    /// Nothing is consumed; returns whether a message was pending on exit.
    pub fn wait_pending(&self, deadline: Instant) -> bool {
        let mut buffer = self.inner.buffer.lock();
        while buffer.is_empty() {
            if self
                .inner
                .available
                .wait_until(&mut buffer, deadline)
                .timed_out()
            {
                break;
            }
        }
        !buffer.is_empty()
    }

    /// Remove the oldest message satisfying `pred`, leaving the rest in order
    pub fn take_first<F>(&self, mut pred: F) -> Option<M>
    where
        F: FnMut(&M) -> bool,
    {
        let mut buffer = self.inner.buffer.lock();
        let index = buffer.iter().position(|msg| pred(msg))?;
        buffer.remove(index)
    }

    /// Remove and return every pending message, oldest first
    pub fn drain(&self) -> Vec<M> {
        self.inner.buffer.lock().drain(..).collect()
    }

    /// Number of pending messages
    pub fn len(&self) -> usize {
        self.inner.buffer.lock().len()
    }

    /// True when nothing is pending
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when both handles refer to the same buffer
    pub fn same_queue(&self, other: &Queue<M>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<M> Clone for Queue<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M> fmt::Debug for Queue<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("name", &self.inner.name)
            .field("pending", &self.len())
            .finish()
    }
}
