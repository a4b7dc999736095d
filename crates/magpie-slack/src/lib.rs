//! Slack Events API adapter for the magpie bot.
//!
//! This crate is the transport collaborator the core deliberately excludes:
//! it owns everything Slack-specific and hands the core plain
//! [`magpie_core::Message`] values.
//!
//! - [`server`] — the HTTP webhook listener (axum): signature verification,
//!   URL-verification challenges, event parsing, and the hand-off of parsed
//!   messages to the pipeline over a bounded channel.
//! - [`signature`] — Slack `v0` request signing (HMAC-SHA256 with a replay
//!   window).
//! - [`self_address`] — the lazy, once-compiled "is this message talking to
//!   me?" matcher. The bot's identity is only known after `auth.test`, so the
//!   pattern cannot exist at startup.
//! - [`client`] — the Web API client (`auth.test`, `chat.postMessage`),
//!   implementing the core's [`magpie_core::ReplySink`] seam.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod self_address;
pub mod server;
pub mod signature;

pub use client::SlackClient;
pub use config::SlackConfig;
pub use error::SlackError;
pub use self_address::{BotIdentity, SelfAddress, mention};
pub use server::{EventServer, Inbound};
