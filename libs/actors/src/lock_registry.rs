//! Lock Registry
//!
//! Named mutexes owned by exactly one actor. Locks are added once, at
//! actor start-up, and never removed. Lock names are matched exactly:
//! asking for a lock that was never added is a programming error and
//! surfaces as [`RegistryError::UnregisteredLock`].

use crate::error::{RegistryError, Result};
use crate::registry::Registry;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;
use tracing::debug;

/// Name of the lock guarding an actor's self-access to its own queue
pub const QUEUE_LOCK: &str = "queue";

/// Shared handle to a named mutex
pub type NamedLock = Arc<Mutex<()>>;

/// Answer of [`LockRegistry::get_locks`]: one lock when exactly one name was
/// asked for, otherwise a map
#[derive(Debug, Clone)]
pub enum Locks {
    /// Exactly one name was requested
    Single(NamedLock),
    /// Zero or several names were requested
    Map(HashMap<String, NamedLock>),
}

impl Locks {
    /// The lock, when a single name was requested
    pub fn single(self) -> Option<NamedLock> {
        match self {
            Locks::Single(lock) => Some(lock),
            Locks::Map(_) => None,
        }
    }

    /// The map, when zero or several names were requested
    pub fn into_map(self) -> Option<HashMap<String, NamedLock>> {
        match self {
            Locks::Single(_) => None,
            Locks::Map(map) => Some(map),
        }
    }

    /// Number of locks carried
    pub fn len(&self) -> usize {
        match self {
            Locks::Single(_) => 1,
            Locks::Map(map) => map.len(),
        }
    }

    /// True when no lock is carried
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-actor store of named mutexes
#[derive(Debug)]
pub struct LockRegistry {
    owner: String,
    locks: RwLock<HashMap<String, NamedLock>>,
}

impl LockRegistry {
    /// Create an empty lock registry for actor `owner`
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Name of the owning actor
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Create an unlocked mutex for every name not yet present.
    ///
    /// Names already present keep their existing mutex, so threads parked
    /// on it are never stranded on a replaced lock.
    #[track_caller]
    pub fn add_locks(&self, names: &[&str]) {
        let caller = Location::caller();
        let mut locks = self.locks.write();
        for name in names {
            if locks.contains_key(*name) {
                debug!(owner = %self.owner, lock = %name, %caller, "Lock already present, keeping it");
                continue;
            }
            locks.insert((*name).to_string(), Arc::new(Mutex::new(())));
        }
        debug!(owner = %self.owner, ?names, %caller, total = locks.len(), "Added locks");
    }

    /// Fetch locks by name.
    ///
    /// - no names: every lock, as [`Locks::Map`]
    /// - one name: that lock, as [`Locks::Single`]
    /// - several names: those locks, as [`Locks::Map`]
    ///
    /// Any requested name that was never added fails the whole call.
    #[track_caller]
    pub fn get_locks(&self, names: &[&str]) -> Result<Locks> {
        let caller = Location::caller();
        debug!(owner = %self.owner, ?names, %caller, "get_locks");

        let locks = self.locks.read();
        match names {
            [] => Ok(Locks::Map(locks.clone())),
            [name] => locks
                .get(*name)
                .cloned()
                .map(Locks::Single)
                .ok_or_else(|| RegistryError::unregistered_lock(&self.owner, *name)),
            _ => names
                .iter()
                .map(|name| {
                    locks
                        .get(*name)
                        .map(|lock| ((*name).to_string(), Arc::clone(lock)))
                        .ok_or_else(|| RegistryError::unregistered_lock(&self.owner, *name))
                })
                .collect::<Result<HashMap<_, _>>>()
                .map(Locks::Map),
        }
    }

    /// Single lock by name
    pub fn lock(&self, name: &str) -> Result<NamedLock> {
        self.locks
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::unregistered_lock(&self.owner, name))
    }

    /// Every lock, keyed by name
    pub fn all(&self) -> HashMap<String, NamedLock> {
        self.locks.read().clone()
    }
}

impl Registry<NamedLock> for LockRegistry {
    fn get(&self, name: &str) -> Option<NamedLock> {
        self.locks.read().get(name).cloned()
    }

    fn get_many(&self, names: &[&str]) -> Vec<(String, NamedLock)> {
        let locks = self.locks.read();
        let mut found: Vec<_> = locks
            .iter()
            .filter(|(name, _)| names.is_empty() || names.contains(&name.as_str()))
            .map(|(name, lock)| (name.clone(), Arc::clone(lock)))
            .collect();
        found.sort_by(|a, b| a.0.cmp(&b.0));
        found
    }

    fn list(&self) -> Vec<String> {
        let mut names: Vec<_> = self.locks.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn len(&self) -> usize {
        self.locks.read().len()
    }
}
