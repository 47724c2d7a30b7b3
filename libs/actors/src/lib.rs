//! Actor Queue Registry and Locking Core
//!
//! Named actors exchange messages through per-actor queues held in one
//! shared [`QueueRegistry`]. Each actor owns a [`LockRegistry`] of named
//! mutexes; its `"queue"` lock serialises every lookup the actor makes of
//! its own queue, while lookups of peers' queues never take a lock.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐      ┌─────────────────────────┐
//! │        Supervisor        │      │      QueueRegistry      │
//! │                          │      │   (one per run, Arc)    │
//! │  instances  live_threads │──────│  alice ─► Queue<M>      │
//! └────────────┬─────────────┘      │  bob   ─► Queue<M>      │
//!              │                    └────────────▲────────────┘
//!     ┌────────┴────────┐                        │
//!     │ Actor "alice"   │  get_queue("alice")    │
//!     │  LockRegistry   │── locked ("queue") ────┤
//!     │   "queue" ...   │  get_queue("bob")      │
//!     │                 │── unlocked ────────────┘
//!     └─────────────────┘
//! ```
//!
//! # Failure Semantics
//!
//! Lookups of actors and queues are soft: a miss is `None`. Asking an
//! actor's [`LockRegistry`] for a lock it never added is a hard
//! [`RegistryError::UnregisteredLock`].
//!
//! # Examples
//!
//! ```rust
//! use actor_registry::{QueueRegistry, Supervisor};
//! use std::sync::Arc;
//!
//! let queues = Arc::new(QueueRegistry::<String>::new());
//! let supervisor = Supervisor::new(Arc::clone(&queues));
//!
//! let alice = supervisor.create_actor("alice").unwrap();
//! let bob = supervisor.create_actor("bob").unwrap();
//!
//! alice.send("BOB", "hello".to_string()).unwrap();
//! assert_eq!(bob.receive().as_deref(), Some("hello"));
//! assert_eq!(queues.get_queue_key("ALICE").as_deref(), Some("alice"));
//! assert!(queues.get_queue("carol").is_none());
//! ```

pub mod actor;
pub mod error;
pub mod lock_registry;
pub mod queue;
pub mod queue_registry;
pub mod registry;
pub mod supervisor;

pub use actor::Actor;
pub use error::{RegistryError, Result};
pub use lock_registry::{LockRegistry, Locks, NamedLock, QUEUE_LOCK};
pub use queue::Queue;
pub use queue_registry::{QueueField, QueueLookup, QueueRegistry};
pub use registry::{fold_name, names_match, Registry};
pub use supervisor::{Supervisor, SupervisorSnapshot};
