//! Supervisor Settings
//!
//! Loading and validation of the settings a supervisor is built from.

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Lock every actor registers for guarding self-access to its queue
const QUEUE_LOCK: &str = "queue";

/// Prefix of environment variable overrides, e.g. `ACTORS_NAME`
pub const ENV_PREFIX: &str = "ACTORS";

/// Supervisor configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SupervisorSettings {
    /// Label used in logs and snapshots
    pub name: String,

    /// Locks added to every actor the supervisor creates
    pub default_locks: Vec<String>,

    /// Stack size in bytes for spawned actor threads; platform default when unset
    pub thread_stack_size: Option<usize>,

    pub logging: LoggingSettings,
}

/// Tracing subscriber settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

/// Log line format
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            name: "actors".to_string(),
            default_locks: vec![QUEUE_LOCK.to_string()],
            thread_stack_size: None,
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl SupervisorSettings {
    /// Load settings with file and environment overrides.
    ///
    /// `environment` selects `<dir of path>/environments/<env>.toml`; a
    /// missing environment file is logged and skipped.
    pub fn load(path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));

            if let Some(env) = environment {
                let env_file = path
                    .parent()
                    .unwrap_or_else(|| Path::new("."))
                    .join("environments")
                    .join(format!("{}.toml", env));

                if env_file.exists() {
                    info!("Loading environment config: {:?}", env_file);
                    builder = builder.add_source(File::from(env_file));
                } else {
                    warn!("Environment config not found: {:?}", env_file);
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("default_locks"),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let settings: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        settings.validate()
    }

    /// Reject unusable settings and make sure the queue lock is always added
    pub fn validate(mut self) -> Result<Self> {
        if self.name.trim().is_empty() {
            bail!("Supervisor name must not be empty");
        }
        if self.default_locks.iter().any(|l| l.trim().is_empty()) {
            bail!("Lock names must not be empty");
        }
        if let Some(0) = self.thread_stack_size {
            bail!("thread_stack_size must be greater than zero");
        }
        if !self.default_locks.iter().any(|l| l == QUEUE_LOCK) {
            self.default_locks.insert(0, QUEUE_LOCK.to_string());
        }
        Ok(self)
    }
}

/// Convenience function to load settings
pub fn load_settings(path: Option<&Path>, environment: Option<&str>) -> Result<SupervisorSettings> {
    SupervisorSettings::load(path, environment)
}
