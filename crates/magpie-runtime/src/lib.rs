//! Runtime for the magpie chat bot.
//!
//! Owns everything around the core pipeline: layered configuration, logging
//! setup, and the orchestration that connects the Slack transport to the
//! classifier and dispatcher.
//!
//! # Example
//!
//! ```rust,ignore
//! use magpie_runtime::{MagpieConfig, MagpieRuntime, logging};
//!
//! let config = MagpieConfig::load()?;
//! logging::init(&config.logging);
//!
//! let runtime = MagpieRuntime::new(config, pipeline);
//! runtime.run().await?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{ConfigError, LogFormat, LoggingConfig, MagpieConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use runtime::MagpieRuntime;
