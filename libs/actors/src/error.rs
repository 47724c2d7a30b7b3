//! Registry Error Types
//!
//! Hard failures of the registry core. Lookups that may legitimately miss
//! (unknown actor, unknown queue) return `Option` instead and never reach
//! this type.

use thiserror::Error;

/// Main registry error type
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A lock was requested that its owner never added
    #[error("Unregistered lock: actor '{owner}' has no lock named '{name}'")]
    UnregisteredLock { owner: String, name: String },

    /// An actor tried to mutate registry state belonging to another actor
    #[error("Actor '{caller}' may not register a queue owned by '{target}'")]
    NotOwner { caller: String, target: String },

    /// A queue already exists under this name (compared case-insensitively)
    #[error("Queue already registered: {name}")]
    DuplicateQueue { name: String },

    /// An actor instance already exists under this name
    #[error("Actor already exists: {name}")]
    DuplicateActor { name: String },

    /// The name cannot be used for this operation
    #[error("Invalid actor name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// The OS refused to start the actor's thread
    #[error("Failed to spawn thread for actor '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

impl RegistryError {
    /// Create an unregistered-lock error
    pub fn unregistered_lock(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnregisteredLock {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Create a not-owner error
    pub fn not_owner(caller: impl Into<String>, target: impl Into<String>) -> Self {
        Self::NotOwner {
            caller: caller.into(),
            target: target.into(),
        }
    }

    /// Create a duplicate-queue error
    pub fn duplicate_queue(name: impl Into<String>) -> Self {
        Self::DuplicateQueue { name: name.into() }
    }

    /// Create a duplicate-actor error
    pub fn duplicate_actor(name: impl Into<String>) -> Self {
        Self::DuplicateActor { name: name.into() }
    }

    /// Create an invalid-name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a spawn error
    pub fn spawn(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            name: name.into(),
            source,
        }
    }

    /// True for errors caused by a programming mistake in the caller
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            RegistryError::UnregisteredLock { .. } | RegistryError::NotOwner { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::unregistered_lock("alice", "queue");
        assert_eq!(
            err.to_string(),
            "Unregistered lock: actor 'alice' has no lock named 'queue'"
        );

        let err = RegistryError::not_owner("bob", "alice");
        assert!(err.to_string().contains("'bob'"));
        assert!(err.to_string().contains("'alice'"));
    }

    #[test]
    fn test_programming_error_classification() {
        assert!(RegistryError::unregistered_lock("a", "b").is_programming_error());
        assert!(RegistryError::not_owner("a", "b").is_programming_error());
        assert!(!RegistryError::duplicate_queue("a").is_programming_error());

        let io = std::io::Error::new(std::io::ErrorKind::Other, "no threads left");
        let err = RegistryError::spawn("worker", io);
        assert!(!err.is_programming_error());
        assert!(std::error::Error::source(&err).is_some());
    }
}
