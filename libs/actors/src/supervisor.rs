//! Supervisor
//!
//! Tracks every actor instance and the OS thread backing each spawned actor,
//! and exposes read-only introspection over them. Queues and locks are not
//! owned here: queues belong to the shared [`QueueRegistry`], locks to the
//! individual [`Actor`].
//!
//! # Lock Ordering
//!
//! When acquiring both tables, ALWAYS take `instances` before
//! `live_threads`.

use crate::actor::Actor;
use crate::error::{RegistryError, Result};
use crate::queue_registry::QueueRegistry;
use crate::registry::names_match;
use actor_config::SupervisorSettings;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Introspection and lifecycle owner for a population of actors
pub struct Supervisor<M> {
    /// Supervisor ID for debugging
    id: String,

    settings: SupervisorSettings,

    /// Queue registry shared with every actor created here
    queues: Arc<QueueRegistry<M>>,

    /// Every actor ever instantiated, in creation order
    instances: RwLock<Vec<Arc<Actor<M>>>>,

    /// Threads started by [`Supervisor::spawn`] that have not been joined
    live_threads: Mutex<Vec<(String, JoinHandle<()>)>>,
}

/// Point-in-time view of a supervisor for operator tooling
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SupervisorSnapshot {
    /// Supervisor ID
    pub id: String,
    /// Configured supervisor label
    pub name: String,
    /// Every actor ever instantiated
    pub instances: Vec<String>,
    /// Actors whose threads are still running
    pub active: Vec<String>,
    /// Every registered queue
    pub recipients: Vec<String>,
}

impl<M> Supervisor<M> {
    /// Create a supervisor with default settings over `queues`
    pub fn new(queues: Arc<QueueRegistry<M>>) -> Self {
        Self::from_settings(SupervisorSettings::default(), queues)
    }

    /// Create a supervisor configured by `settings` over `queues`
    pub fn from_settings(settings: SupervisorSettings, queues: Arc<QueueRegistry<M>>) -> Self {
        let id = format!("supervisor-{}", Uuid::new_v4());
        info!(supervisor_id = %id, name = %settings.name, "Creating supervisor");

        Self {
            id,
            settings,
            queues,
            instances: RwLock::new(Vec::new()),
            live_threads: Mutex::new(Vec::new()),
        }
    }

    /// Unique supervisor ID, for logs
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Settings the supervisor was built from
    pub fn settings(&self) -> &SupervisorSettings {
        &self.settings
    }

    /// The queue registry shared by this supervisor's actors
    pub fn queues(&self) -> &Arc<QueueRegistry<M>> {
        &self.queues
    }

    /// Instantiate an actor without starting a thread for it.
    ///
    /// The actor gets every lock in `default_locks` and a queue under its
    /// name before it becomes visible through [`Supervisor::get_process`].
    pub fn create_actor(&self, name: &str) -> Result<Arc<Actor<M>>> {
        let mut instances = self.instances.write();
        if instances.iter().any(|a| a.is_self(name)) {
            return Err(RegistryError::duplicate_actor(name));
        }

        let locks: Vec<&str> = self.settings.default_locks.iter().map(String::as_str).collect();
        let actor = Arc::new(Actor::with_locks(name, Arc::clone(&self.queues), &locks)?);
        instances.push(Arc::clone(&actor));

        debug!(supervisor_id = %self.id, actor = %name, "Actor instantiated");
        Ok(actor)
    }

    /// Names of actors whose threads are still running
    pub fn active_actors(&self) -> Vec<String> {
        self.live_threads
            .lock()
            .iter()
            .filter(|(_, handle)| !handle.is_finished())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Names of every actor ever instantiated, alive or not
    pub fn list_instances(&self) -> Vec<String> {
        self.instances
            .read()
            .iter()
            .map(|a| a.name().to_string())
            .collect()
    }

    /// Names of every registered queue
    pub fn list_recipients(&self) -> Vec<String> {
        self.queues.list_queues()
    }

    /// Actor instance answering to `name`, `None` when absent
    pub fn get_process(&self, name: &str) -> Option<Arc<Actor<M>>> {
        self.instances
            .read()
            .iter()
            .find(|a| a.is_self(name))
            .cloned()
    }

    /// Wait for the thread of actor `name` to finish and forget it.
    ///
    /// `None` when no unjoined thread exists for `name`. A panic inside the
    /// actor body is returned as the `Err` payload.
    pub fn join(&self, name: &str) -> Option<thread::Result<()>> {
        let handle = {
            let mut threads = self.live_threads.lock();
            let index = threads.iter().position(|(n, _)| names_match(n, name))?;
            threads.remove(index).1
        };

        let outcome = handle.join();
        if outcome.is_err() {
            warn!(supervisor_id = %self.id, actor = %name, "Actor thread panicked");
        } else {
            debug!(supervisor_id = %self.id, actor = %name, "Actor thread joined");
        }
        Some(outcome)
    }

    /// Join every spawned thread, returning the names of those that panicked
    pub fn join_all(&self) -> Vec<String> {
        let threads: Vec<_> = self.live_threads.lock().drain(..).collect();
        let total = threads.len();

        let panicked: Vec<String> = threads
            .into_iter()
            .filter_map(|(name, handle)| handle.join().err().map(|_| name))
            .collect();

        if panicked.is_empty() {
            info!(supervisor_id = %self.id, joined = total, "All actor threads joined");
        } else {
            warn!(supervisor_id = %self.id, joined = total, ?panicked, "Actor threads panicked");
        }
        panicked
    }

    /// Serializable view of the supervisor's population
    pub fn snapshot(&self) -> SupervisorSnapshot {
        SupervisorSnapshot {
            id: self.id.clone(),
            name: self.settings.name.clone(),
            instances: self.list_instances(),
            active: self.active_actors(),
            recipients: self.list_recipients(),
        }
    }
}

impl<M: Send + 'static> Supervisor<M> {
    /// Instantiate actor `name` and run `body` for it on a dedicated OS thread.
    ///
    /// The thread is named after the actor, so `name` must not contain a NUL
    /// byte; such a name is rejected before anything is registered. If the
    /// OS refuses the thread the actor stays instantiated but never becomes
    /// active.
    pub fn spawn<F>(&self, name: &str, body: F) -> Result<Arc<Actor<M>>>
    where
        F: FnOnce(Arc<Actor<M>>) + Send + 'static,
    {
        if name.contains('\0') {
            return Err(RegistryError::invalid_name(name, "thread names cannot contain NUL"));
        }

        let actor = self.create_actor(name)?;

        let mut builder = thread::Builder::new().name(name.to_string());
        if let Some(size) = self.settings.thread_stack_size {
            builder = builder.stack_size(size);
        }

        let runner = Arc::clone(&actor);
        let handle = builder
            .spawn(move || body(runner))
            .map_err(|e| RegistryError::spawn(name, e))?;

        self.live_threads.lock().push((name.to_string(), handle));
        info!(supervisor_id = %self.id, actor = %name, "Actor thread started");
        Ok(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    fn supervisor() -> Supervisor<String> {
        Supervisor::new(Arc::new(QueueRegistry::new()))
    }

    #[test]
    fn test_create_actor_registers_everything() {
        let sup = supervisor();
        let alice = sup.create_actor("alice").unwrap();

        assert_eq!(sup.list_instances(), vec!["alice"]);
        assert_eq!(sup.list_recipients(), vec!["alice"]);
        assert!(sup.active_actors().is_empty());
        assert!(alice.get_locks(&["queue"]).is_ok());
    }

    #[test]
    fn test_duplicate_actor_rejected() {
        let sup = supervisor();
        sup.create_actor("alice").unwrap();
        let err = sup.create_actor("ALICE").unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateActor { .. }));
        assert_eq!(sup.list_instances().len(), 1);
    }

    #[test]
    fn test_get_process_soft_fails() {
        let sup = supervisor();
        let alice = sup.create_actor("alice").unwrap();

        let found = sup.get_process("Alice").unwrap();
        assert!(Arc::ptr_eq(&alice, &found));
        assert!(sup.get_process("carol").is_none());
    }

    #[test]
    fn test_spawned_actor_is_active_until_it_returns() {
        let sup = supervisor();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        sup.spawn("worker", move |_actor| {
            let _ = release_rx.recv();
        })
        .unwrap();

        assert_eq!(sup.active_actors(), vec!["worker"]);

        release_tx.send(()).unwrap();
        assert!(matches!(sup.join("worker"), Some(Ok(()))));
        assert!(sup.active_actors().is_empty());
        assert_eq!(sup.list_instances(), vec!["worker"]);
        assert!(sup.join("worker").is_none());
    }

    #[test]
    fn test_spawned_actor_consumes_its_queue() {
        let sup = supervisor();
        let (done_tx, done_rx) = mpsc::channel();

        sup.spawn("echo", move |actor| {
            if let Some(msg) = actor.receive_timeout(Duration::from_secs(5)) {
                done_tx.send(msg).unwrap();
            }
        })
        .unwrap();

        let client = sup.create_actor("client").unwrap();
        client.send("echo", "ping".to_string()).unwrap();

        assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)).unwrap(), "ping");
        assert!(sup.join_all().is_empty());
    }

    #[test]
    fn test_spawn_rejects_nul_in_name() {
        let sup = supervisor();
        let err = sup.spawn("a\0b", |_| {}).unwrap_err();

        assert!(matches!(err, RegistryError::InvalidName { .. }));
        assert!(sup.list_instances().is_empty());
        assert!(sup.list_recipients().is_empty());
        assert!(sup.active_actors().is_empty());
    }

    #[test]
    fn test_join_all_reports_panics() {
        let sup = supervisor();
        sup.spawn("fine", |_| {}).unwrap();
        sup.spawn("broken", |_| panic!("actor body failed")).unwrap();

        assert_eq!(sup.join_all(), vec!["broken"]);
        assert!(sup.active_actors().is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let sup = supervisor();
        sup.create_actor("alice").unwrap();
        sup.create_actor("bob").unwrap();

        let snapshot = sup.snapshot();
        assert_eq!(snapshot.instances, vec!["alice", "bob"]);
        assert_eq!(snapshot.recipients, vec!["alice", "bob"]);
        assert!(snapshot.id.starts_with("supervisor-"));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["name"], "actors");
        assert_eq!(json["active"], serde_json::json!([]));
    }

    #[test]
    fn test_settings_locks_applied() {
        let settings = SupervisorSettings {
            default_locks: vec!["queue".to_string(), "state".to_string()],
            ..SupervisorSettings::default()
        };
        let sup: Supervisor<()> = Supervisor::from_settings(settings, Arc::new(QueueRegistry::new()));
        let actor = sup.create_actor("alice").unwrap();
        assert!(actor.get_locks(&["state"]).is_ok());
    }
}
