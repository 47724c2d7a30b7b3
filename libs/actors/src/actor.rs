//! Actor Identity and Queue Access
//!
//! An [`Actor`] is a named identity that owns a [`LockRegistry`] and shares
//! the run's [`QueueRegistry`]. Every queue lookup it makes is routed one of
//! two ways:
//!
//! - **self-access** (target answers to the actor's own name, lock not
//!   ignored): the actor's `"queue"` lock is held for the whole lookup
//! - **peer access** (any other target, or lock ignored): the lookup runs
//!   without touching the actor's locks
//!
//! Self-access is serialised because an actor's consumption loop and a
//! reply-wait running in the same actor both read the same queue. Peer
//! access is a metadata lookup and must never block on the owner.
//!
//! Locks are in-process `parking_lot` mutexes. They do not extend across
//! OS process boundaries.

use crate::error::Result;
use crate::lock_registry::{LockRegistry, Locks, NamedLock, QUEUE_LOCK};
use crate::queue::Queue;
use crate::queue_registry::QueueRegistry;
use crate::registry::names_match;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Named unit of concurrent execution owning one queue and its locks
pub struct Actor<M> {
    name: String,
    locks: LockRegistry,
    queue_lock: NamedLock,
    queue: Queue<M>,
    queues: Arc<QueueRegistry<M>>,
}

impl<M> Actor<M> {
    /// Create an actor, add its `"queue"` lock and register its queue
    pub fn new(name: impl Into<String>, queues: Arc<QueueRegistry<M>>) -> Result<Self> {
        Self::with_locks(name, queues, &[])
    }

    /// Like [`Actor::new`], adding `extra_locks` alongside `"queue"`
    pub fn with_locks(
        name: impl Into<String>,
        queues: Arc<QueueRegistry<M>>,
        extra_locks: &[&str],
    ) -> Result<Self> {
        let name = name.into();

        let locks = LockRegistry::new(name.clone());
        locks.add_locks(&[QUEUE_LOCK]);
        locks.add_locks(extra_locks);
        let queue_lock = locks.lock(QUEUE_LOCK)?;

        let queue = queues.register_for(&name, &name)?;

        debug!(actor = %name, locks = locks.all().len(), "Actor created");
        Ok(Self {
            name,
            locks,
            queue_lock,
            queue,
            queues,
        })
    }

    /// The actor's name, as given at construction
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when `target` names this actor (case-insensitive)
    pub fn is_self(&self, target: &str) -> bool {
        names_match(target, &self.name)
    }

    /// The actor's lock registry
    pub fn locks(&self) -> &LockRegistry {
        &self.locks
    }

    /// Add named locks; names already present are left untouched
    #[track_caller]
    pub fn add_locks(&self, names: &[&str]) {
        self.locks.add_locks(names);
    }

    /// See [`LockRegistry::get_locks`]
    #[track_caller]
    pub fn get_locks(&self, names: &[&str]) -> Result<Locks> {
        self.locks.get_locks(names)
    }

    /// The shared queue registry this actor is attached to
    pub fn queues(&self) -> &Arc<QueueRegistry<M>> {
        &self.queues
    }

    /// Run `f` on the queue answering to `target`.
    ///
    /// For self-access without `ignore_lock` the actor's `"queue"` lock is
    /// held while `f` runs. `f` receives `None` when no such queue exists.
    pub fn with_queue<R, F>(&self, target: &str, ignore_lock: bool, f: F) -> R
    where
        F: FnOnce(Option<&Queue<M>>) -> R,
    {
        if self.is_self(target) && !ignore_lock {
            let _guard = self.queue_lock.lock();
            trace!(actor = %self.name, "Locked self-access");
            let queue = self.queues.get_queue(target);
            f(queue.as_ref())
        } else {
            trace!(actor = %self.name, target = %target, "Unlocked lookup");
            let queue = self.queues.get_queue(target);
            f(queue.as_ref())
        }
    }

    /// Look up a queue, taking the `"queue"` lock for self-access
    pub fn get_queue(&self, target: &str) -> Option<Queue<M>> {
        self.with_queue(target, false, |queue| queue.cloned())
    }

    /// Look up a queue without ever taking the actor's lock.
    ///
    /// Only for callers that already hold the `"queue"` lock, or that inspect
    /// a peer.
    pub fn get_queue_unlocked(&self, target: &str) -> Option<Queue<M>> {
        self.with_queue(target, true, |queue| queue.cloned())
    }

    /// Deliver `msg` to the actor named `to`, handing it back if no such actor has a queue
    pub fn send(&self, to: &str, msg: M) -> std::result::Result<(), M> {
        match self.get_queue_unlocked(to) {
            Some(queue) => {
                trace!(from = %self.name, to = %queue.name(), "Message enqueued");
                queue.push(msg);
                Ok(())
            }
            None => {
                debug!(from = %self.name, to = %to, "No queue for recipient");
                Err(msg)
            }
        }
    }

    /// Consume the oldest pending message from the actor's own queue
    pub fn receive(&self) -> Option<M> {
        let name = self.name.as_str();
        self.with_queue(name, false, |queue| queue.and_then(Queue::try_pop))
    }

    /// Consume the oldest pending message matching `pred` from the actor's own queue
    pub fn take_reply<F>(&self, pred: F) -> Option<M>
    where
        F: FnMut(&M) -> bool,
    {
        let name = self.name.as_str();
        self.with_queue(name, false, |queue| queue.and_then(|q| q.take_first(pred)))
    }

    /// Wait up to `timeout` for a message on the actor's own queue.
    ///
    /// The `"queue"` lock is only held while consuming, never while waiting.
    pub fn receive_timeout(&self, timeout: Duration) -> Option<M> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(msg) = self.receive() {
                return Some(msg);
            }
            if !self.queue.wait_pending(deadline) {
                return None;
            }
        }
    }

    /// Number of messages waiting for this actor
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl<M> fmt::Debug for Actor<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("name", &self.name)
            .field("pending", &self.queue.len())
            .finish()
    }
}
