//! Queue Registry
//!
//! Process-wide directory of per-actor queues. One instance is shared by
//! every [`Actor`](crate::Actor) and the [`Supervisor`](crate::Supervisor)
//! of a run, passed explicitly as `Arc<QueueRegistry<M>>`.
//!
//! The table is append-only and keeps insertion order. Its own `RwLock`
//! guards table mutation only; it is unrelated to the per-actor `"queue"`
//! lock that serialises self-access.

use crate::error::{RegistryError, Result};
use crate::queue::Queue;
use crate::registry::{names_match, selected, Registry};
use parking_lot::RwLock;
use std::fmt;
use tracing::debug;

/// Which half of a matching entry [`QueueRegistry::lookup`] returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueField {
    /// The registered name
    Key,
    /// The queue handle
    #[default]
    Value,
}

/// Result of [`QueueRegistry::lookup`]
#[derive(Debug, Clone)]
pub enum QueueLookup<M> {
    /// Registered name of the matching queue
    Key(String),
    /// Handle to the matching queue
    Value(Queue<M>),
}

impl<M> QueueLookup<M> {
    /// The registered name, when the key was requested
    pub fn into_key(self) -> Option<String> {
        match self {
            QueueLookup::Key(name) => Some(name),
            QueueLookup::Value(_) => None,
        }
    }

    /// The queue handle, when the value was requested
    pub fn into_queue(self) -> Option<Queue<M>> {
        match self {
            QueueLookup::Key(_) => None,
            QueueLookup::Value(queue) => Some(queue),
        }
    }
}

/// Shared name -> queue table
pub struct QueueRegistry<M> {
    queues: RwLock<Vec<Queue<M>>>,
}

impl<M> QueueRegistry<M> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            queues: RwLock::new(Vec::new()),
        }
    }

    /// Register a queue under `name`, keeping the caller's casing.
    ///
    /// Fails if a queue already answers to `name` in any casing.
    pub fn register(&self, name: &str) -> Result<Queue<M>> {
        let mut queues = self.queues.write();
        if queues.iter().any(|q| names_match(q.name(), name)) {
            return Err(RegistryError::duplicate_queue(name));
        }

        let queue = Queue::new(name);
        queues.push(queue.clone());
        debug!(queue = %name, total = queues.len(), "Registered queue");
        Ok(queue)
    }

    /// Register `name` on behalf of `caller`; only an actor may create its own queue
    pub fn register_for(&self, caller: &str, name: &str) -> Result<Queue<M>> {
        if !names_match(caller, name) {
            return Err(RegistryError::not_owner(caller, name));
        }
        self.register(name)
    }

    /// Queues matching any of `names` (case-insensitive), in insertion order.
    ///
    /// With no names every queue is returned. The result holds handles to the
    /// live queues, not copies of their contents.
    pub fn get_queues(&self, names: &[&str]) -> Vec<(String, Queue<M>)> {
        self.queues
            .read()
            .iter()
            .filter(|q| selected(q.name(), names))
            .map(|q| (q.name().to_string(), q.clone()))
            .collect()
    }

    /// First entry answering to `name`, as key or value
    pub fn lookup(&self, name: &str, field: QueueField) -> Option<QueueLookup<M>> {
        let wanted = name.to_lowercase();
        let (key, queue) = self.get_queues(&[wanted.as_str()]).into_iter().next()?;
        Some(match field {
            QueueField::Key => QueueLookup::Key(key),
            QueueField::Value => QueueLookup::Value(queue),
        })
    }

    /// Queue registered under `name`, `None` when absent
    pub fn get_queue(&self, name: &str) -> Option<Queue<M>> {
        self.lookup(name, QueueField::Value)?.into_queue()
    }

    /// Registered spelling of `name`, `None` when absent
    pub fn get_queue_key(&self, name: &str) -> Option<String> {
        self.lookup(name, QueueField::Key)?.into_key()
    }

    /// All registered queue names, in insertion order
    pub fn list_queues(&self) -> Vec<String> {
        self.queues
            .read()
            .iter()
            .map(|q| q.name().to_string())
            .collect()
    }
}

impl<M> Registry<Queue<M>> for QueueRegistry<M> {
    fn get(&self, name: &str) -> Option<Queue<M>> {
        self.get_queue(name)
    }

    fn get_many(&self, names: &[&str]) -> Vec<(String, Queue<M>)> {
        self.get_queues(names)
    }

    fn list(&self) -> Vec<String> {
        self.list_queues()
    }

    fn len(&self) -> usize {
        self.queues.read().len()
    }
}

impl<M> Default for QueueRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for QueueRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueRegistry")
            .field("queues", &self.list_queues())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(names: &[&str]) -> QueueRegistry<String> {
        let registry = QueueRegistry::new();
        for name in names {
            registry.register(name).unwrap();
        }
        registry
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let registry = registry_with(&["alice", "bob", "Carol"]);
        assert_eq!(registry.list_queues(), vec!["alice", "bob", "Carol"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_duplicate_registration_rejected_in_any_case() {
        let registry = registry_with(&["alice"]);
        let err = registry.register("ALICE").unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateQueue { .. }));
        assert_eq!(registry.list_queues(), vec!["alice"]);
    }

    #[test]
    fn test_non_ascii_names_fold_to_one_queue() {
        let registry = registry_with(&["straße"]);

        assert_eq!(registry.get_queue_key("STRASSE").as_deref(), Some("straße"));
        assert_eq!(registry.get_queue_key("Strasse").as_deref(), Some("straße"));

        let err = registry.register("STRASSE").unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateQueue { .. }));
        assert_eq!(registry.list_queues(), vec!["straße"]);
    }

    #[test]
    fn test_get_queues_filters_case_insensitively() {
        let registry = registry_with(&["alice", "bob", "carol"]);

        let all = registry.get_queues(&[]);
        assert_eq!(all.len(), 3);

        let some = registry.get_queues(&["CAROL", "Alice", "dave"]);
        let names: Vec<_> = some.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["alice", "carol"]);
    }

    #[test]
    fn test_get_queue_returns_live_handle() {
        let registry = registry_with(&["alice"]);
        let queue = registry.get_queue("alice").unwrap();
        queue.push("ping".to_string());

        let again = registry.get_queue("Alice").unwrap();
        assert!(queue.same_queue(&again));
        assert_eq!(again.try_pop().as_deref(), Some("ping"));
    }

    #[test]
    fn test_lookup_key_keeps_registered_case() {
        let registry = registry_with(&["Alice"]);
        assert_eq!(registry.get_queue_key("ALICE").as_deref(), Some("Alice"));
        assert!(matches!(
            registry.lookup("alice", QueueField::Value),
            Some(QueueLookup::Value(_))
        ));
    }

    #[test]
    fn test_miss_is_soft() {
        let registry = registry_with(&["alice"]);
        assert!(registry.get_queue("carol").is_none());
        assert!(registry.get_queue_key("carol").is_none());
        assert!(!registry.contains("carol"));
    }

    #[test]
    fn test_register_for_requires_ownership() {
        let registry: QueueRegistry<String> = QueueRegistry::new();
        assert!(registry.register_for("Alice", "alice").is_ok());

        let err = registry.register_for("bob", "mallory").unwrap_err();
        assert!(matches!(err, RegistryError::NotOwner { .. }));
        assert!(registry.get_queue("mallory").is_none());
    }
}
