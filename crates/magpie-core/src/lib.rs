//! # Magpie Core
//!
//! The classification and dispatch engine of the magpie chat bot.
//!
//! This crate is transport-free: it receives already-parsed [`Message`]
//! values, decides what they mean, and produces [`Reply`] values. Getting
//! bytes on and off the wire is the job of an adapter crate (see
//! `magpie-slack`).
//!
//! ## Pipeline
//!
//! Every inbound message flows through the same three stages:
//!
//! ```text
//! ┌───────────┐     ┌────────────┐     ┌────────────────┐
//! │  Message  │────▶│ Classifier │────▶│ ActionRegistry │────▶ Reply
//! │ (adapter) │     │ (patterns) │     │   (handlers)   │
//! └───────────┘     └────────────┘     └────────────────┘
//! ```
//!
//! - The [`Classifier`] holds two ordered pattern buckets — [`Bucket::Direct`]
//!   for messages addressed to the bot and [`Bucket::Overheard`] for anything
//!   said in a channel — and turns a message body into an [`Intent`] carrying
//!   the named captures of the first matching pattern.
//! - The [`ActionRegistry`] maps intent ids to handler functions and invokes
//!   the matching handler. An intent nobody registered for is answered with
//!   silence, not an error.
//! - [`Pipeline`] composes the two for the runtime and for end-to-end tests.
//!
//! Both registries are populated once at startup, before any traffic, and are
//! read-only afterwards; classification and dispatch are synchronous,
//! bounded-time operations.
//!
//! ## Example
//!
//! ```rust
//! use magpie_core::{ActionRegistry, Bucket, Classifier, Pipeline, Reply};
//!
//! let mut classifier = Classifier::new();
//! classifier.register(Bucket::Direct, r"ping", "core.ping").unwrap();
//!
//! let mut actions = ActionRegistry::new();
//! actions.register("core.ping", |_intent, msg| {
//!     Ok(Some(Reply::to(msg, "pong")))
//! }).unwrap();
//!
//! let pipeline = Pipeline::new(classifier, actions);
//! ```

pub mod classifier;
pub mod dispatch;
pub mod error;
pub mod intent;
pub mod message;

pub use classifier::{Bucket, Classifier, PatternEntry};
pub use dispatch::{ActionRegistry, HandlerResult, Pipeline};
pub use error::{HandlerError, RegistryError};
pub use intent::Intent;
pub use message::{Block, ChannelKind, Delivery, Message, Reply, ReplySink, Sender};

/// Prelude for common imports.
pub mod prelude {
    pub use super::classifier::{Bucket, Classifier};
    pub use super::dispatch::{ActionRegistry, HandlerResult, Pipeline};
    pub use super::error::{HandlerError, RegistryError};
    pub use super::intent::Intent;
    pub use super::message::{Block, ChannelKind, Message, Reply};
}
