//! Intent-to-action dispatch.
//!
//! The [`ActionRegistry`] maps intent ids to handler functions. Dispatching
//! an intent nobody registered for — including the unknown sentinel — is a
//! deliberate no-op: staying quiet is the correct behavior for unrecognized
//! chatter in a shared channel.
//!
//! [`Pipeline`] composes a [`Classifier`] and an [`ActionRegistry`] into the
//! classify-then-dispatch step the runtime runs per message.

use std::collections::HashMap;

use tracing::{Level, debug, span};

use crate::classifier::Classifier;
use crate::error::{HandlerError, RegistryError};
use crate::intent::Intent;
use crate::message::{Message, Reply};

/// Result of one handler invocation. `Ok(None)` means deliberate silence.
pub type HandlerResult = Result<Option<Reply>, HandlerError>;

/// A registered handler function.
type BoxedHandler = Box<dyn Fn(&Intent, &Message) -> HandlerResult + Send + Sync>;

/// Registry mapping intent ids to handler functions.
///
/// Populated once at startup; duplicate registration is a configuration
/// error, not an overwrite. Read-only after registration, so dispatch takes
/// `&self` and needs no locking.
#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<String, BoxedHandler>,
}

impl ActionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for `intent_id`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateAction`] if a handler for this id already
    /// exists; the existing registration is left intact.
    pub fn register<F>(&mut self, intent_id: impl Into<String>, handler: F) -> Result<(), RegistryError>
    where
        F: Fn(&Intent, &Message) -> HandlerResult + Send + Sync + 'static,
    {
        let intent_id = intent_id.into();
        if self.actions.contains_key(&intent_id) {
            return Err(RegistryError::DuplicateAction { intent: intent_id });
        }
        self.actions.insert(intent_id, Box::new(handler));
        Ok(())
    }

    /// Returns the number of registered handlers.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Dispatches an intent to its handler.
    ///
    /// Returns `Ok(None)` when no handler is registered for the intent's id
    /// (the unknown sentinel always lands here). Handler errors propagate to
    /// the caller unchanged — the runtime decides whether to log or surface
    /// them.
    pub fn dispatch(&self, intent: &Intent, msg: &Message) -> HandlerResult {
        let Some(handler) = self.actions.get(&intent.id) else {
            debug!(intent = %intent.id, "no handler registered, staying quiet");
            return Ok(None);
        };

        handler(intent, msg)
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("handler_count", &self.actions.len())
            .finish()
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// The classify-then-dispatch composition.
///
/// Owns both registries; constructed once at startup after module
/// registration and shared read-only with the runtime loop.
#[derive(Debug)]
pub struct Pipeline {
    classifier: Classifier,
    actions: ActionRegistry,
}

impl Pipeline {
    /// Creates a pipeline from populated registries.
    pub fn new(classifier: Classifier, actions: ActionRegistry) -> Self {
        Self { classifier, actions }
    }

    /// Runs one message through classification and dispatch.
    ///
    /// `directed` is the adapter's verdict on whether the message was
    /// addressed to the bot (private session or stripped self-address).
    pub fn handle(&self, msg: &Message, directed: bool) -> HandlerResult {
        let span = span!(Level::DEBUG, "pipeline", channel = %msg.delivery.channel, directed);
        let _enter = span.enter();

        let intent = self.classifier.classify(&msg.body, directed);
        debug!(intent = %intent.id, "classified");
        self.actions.dispatch(&intent, msg)
    }

    /// The underlying classifier.
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// The underlying action registry.
    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }
}
