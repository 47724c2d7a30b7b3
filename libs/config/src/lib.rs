//! # Actor Registry Configuration
//!
//! Settings for the supervisor and the tracing subscriber, loaded from an
//! optional TOML file, an optional per-environment override and `ACTORS_*`
//! environment variables, in that order of precedence (last wins).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use actor_config::{init_tracing, load_settings};
//! use std::path::Path;
//!
//! let settings = load_settings(Some(Path::new("config/actors.toml")), Some("dev"))?;
//! init_tracing(&settings.logging)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod logging;
pub mod settings;

pub use logging::init_tracing;
pub use settings::{load_settings, LogFormat, LoggingSettings, SupervisorSettings};
