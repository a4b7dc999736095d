//! Wire types for the Slack Events API and Web API.
//!
//! Only the shapes the bot consumes are modeled; everything else in Slack's
//! payloads is ignored during deserialization, and unrecognized event types
//! collapse into catch-all variants so a new Slack feature never breaks
//! parsing.

use magpie_core::ChannelKind;
use serde::Deserialize;

// =============================================================================
// Events API (inbound)
// =============================================================================

/// The outermost Events API payload, tagged by `type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    /// Slack verifying the webhook endpoint; must be answered with the
    /// challenge string.
    UrlVerification {
        /// Token to echo back.
        challenge: String,
    },

    /// A subscribed event wrapped in a callback envelope.
    EventCallback {
        /// The inner event.
        event: CallbackEvent,
    },

    /// Any envelope type the bot is not subscribed to.
    #[serde(other)]
    Other,
}

/// The inner event of an `event_callback` envelope, tagged by `type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallbackEvent {
    /// A message was posted somewhere the bot can see.
    Message(MessageEvent),

    /// Any other event kind; acknowledged and dropped.
    #[serde(other)]
    Other,
}

/// A `message` event.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEvent {
    /// Sending user id. Absent for some bot/system messages.
    #[serde(default)]
    pub user: Option<String>,

    /// Message text.
    #[serde(default)]
    pub text: String,

    /// Conversation id the message was posted to.
    pub channel: String,

    /// Conversation kind (`im`, `channel`, `group`, `mpim`).
    #[serde(default)]
    pub channel_type: ChannelKind,

    /// Message timestamp (Slack's message id).
    pub ts: String,

    /// Parent thread timestamp, when posted inside a thread.
    #[serde(default)]
    pub thread_ts: Option<String>,

    /// Set when the message was authored by a bot (including this one).
    #[serde(default)]
    pub bot_id: Option<String>,

    /// Set for message edits, deletions, joins, and other non-plain
    /// messages.
    #[serde(default)]
    pub subtype: Option<String>,
}

// =============================================================================
// Web API (outbound)
// =============================================================================

/// Response to `auth.test`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTestResponse {
    /// Whether the call succeeded.
    pub ok: bool,
    /// The authenticated bot user id (`U…`).
    #[serde(default)]
    pub user_id: String,
    /// The authenticated bot's display name.
    #[serde(default)]
    pub user: String,
    /// Error code when `ok` is false.
    #[serde(default)]
    pub error: Option<String>,
}

/// Response to `chat.postMessage`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Error code when `ok` is false.
    #[serde(default)]
    pub error: Option<String>,
}
