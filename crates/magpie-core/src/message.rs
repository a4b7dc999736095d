//! Message and reply types for the magpie bot.
//!
//! A [`Message`] is the adapter's already-verified, already-parsed view of one
//! inbound platform event. The core treats it as read-mostly: the only
//! rewrite that ever happens is the adapter stripping a self-address prefix
//! from `body` before classification.
//!
//! A [`Reply`] is what a handler produces: a text body, optional rich-content
//! [`Block`]s, and routing back to the originating conversation. Delivery is
//! the adapter's job, behind the [`ReplySink`] seam.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

// =============================================================================
// Inbound Message
// =============================================================================

/// The user who sent a message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sender {
    /// Platform user id (e.g. Slack `U…` id).
    pub id: String,
    /// Human-readable display name, if the platform supplied one.
    #[serde(default)]
    pub name: String,
}

/// The kind of conversation a message arrived on.
///
/// Mirrors Slack's `channel_type` values; other adapters map into the same
/// set. Private one-to-one sessions ([`ChannelKind::Im`]) are always treated
/// as directed at the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Direct one-to-one session with the bot.
    Im,
    /// Public channel.
    #[default]
    Channel,
    /// Private channel.
    Group,
    /// Multi-party direct message.
    Mpim,
    /// Anything the adapter did not recognize.
    #[serde(other)]
    Other,
}

/// Where a message came from and where replies should go.
///
/// This replaces the untyped per-platform attribute bag with an explicit
/// struct of known fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Delivery {
    /// Conversation id the message arrived on.
    pub channel: String,
    /// Conversation kind.
    #[serde(default)]
    pub kind: ChannelKind,
    /// Thread timestamp, when the message was posted inside a thread.
    #[serde(default)]
    pub thread: Option<String>,
}

/// One inbound chat message, as handed to the core by an adapter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    /// Message text. If the message was addressed to the bot, the adapter has
    /// already stripped the leading mention/name.
    pub body: String,
    /// Who sent it.
    pub sender: Sender,
    /// Where it came from.
    pub delivery: Delivery,
}

impl Message {
    /// Creates a message with the given body and empty metadata.
    ///
    /// Mostly useful in tests; adapters fill in sender and delivery.
    pub fn from_body(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    /// Returns true if this message arrived on a private one-to-one session.
    pub fn is_im(&self) -> bool {
        self.delivery.kind == ChannelKind::Im
    }
}

// =============================================================================
// Outbound Reply
// =============================================================================

/// A platform-agnostic rich-content block attached to a reply.
///
/// Adapters translate these into their native layout format (Slack Block
/// Kit, etc.); adapters that cannot render a block fall back to the reply's
/// plain-text body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    /// A block of (markdown-ish) text.
    Section {
        /// The text content.
        text: String,
    },
    /// An image with alt text.
    Image {
        /// Image URL.
        url: String,
        /// Alternative text.
        alt: String,
    },
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Block::Section { text } => write!(f, "{text}"),
            Block::Image { url, alt } => write!(f, "[image: {alt}] {url}"),
        }
    }
}

/// One outbound reply produced by a handler.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reply {
    /// Plain-text body. Always set; used as the fallback when blocks cannot
    /// be rendered and as the notification text.
    pub body: String,
    /// Optional rich-content blocks.
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// Destination conversation. `None` means "wherever the adapter was going
    /// to send it anyway" — in practice handlers always route via [`Reply::to`].
    #[serde(default)]
    pub channel: Option<String>,
    /// Thread to reply into, if the originating message was threaded.
    #[serde(default)]
    pub thread: Option<String>,
}

impl Reply {
    /// Creates a reply routed back to the conversation `msg` arrived on.
    pub fn to(msg: &Message, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            blocks: Vec::new(),
            channel: Some(msg.delivery.channel.clone()),
            thread: msg.delivery.thread.clone(),
        }
    }

    /// Creates an unrouted reply with only a text body.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    /// Appends a block (builder pattern).
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Appends a section block (builder pattern).
    pub fn with_section(self, text: impl Into<String>) -> Self {
        self.with_block(Block::Section { text: text.into() })
    }
}

// =============================================================================
// Outbound seam
// =============================================================================

/// The delivery side of the pipeline.
///
/// The runtime hands every non-empty reply to a `ReplySink`; the Slack
/// adapter implements this over `chat.postMessage`. Tests implement it with
/// an in-memory vector.
#[async_trait::async_trait]
pub trait ReplySink: Send + Sync {
    /// Error type reported back to the runtime loop.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Delivers one reply to the platform.
    async fn deliver(&self, reply: &Reply) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_to_routes_back() {
        let msg = Message {
            body: "card me".into(),
            sender: Sender {
                id: "U1".into(),
                name: "alice".into(),
            },
            delivery: Delivery {
                channel: "C42".into(),
                kind: ChannelKind::Channel,
                thread: Some("171717.0001".into()),
            },
        };

        let reply = Reply::to(&msg, "here you go").with_section("here you go");
        assert_eq!(reply.channel.as_deref(), Some("C42"));
        assert_eq!(reply.thread.as_deref(), Some("171717.0001"));
        assert_eq!(reply.blocks.len(), 1);
    }

    #[test]
    fn channel_kind_deserializes_slack_values() {
        assert_eq!(
            serde_json::from_str::<ChannelKind>("\"im\"").unwrap(),
            ChannelKind::Im
        );
        assert_eq!(
            serde_json::from_str::<ChannelKind>("\"mpim\"").unwrap(),
            ChannelKind::Mpim
        );
        // Unrecognized kinds map to Other instead of failing the parse.
        assert_eq!(
            serde_json::from_str::<ChannelKind>("\"app_home\"").unwrap(),
            ChannelKind::Other
        );
    }

    #[test]
    fn block_display_fallback() {
        let block = Block::Image {
            url: "https://example.com/p.jpg".into(),
            alt: "a player".into(),
        };
        assert_eq!(block.to_string(), "[image: a player] https://example.com/p.jpg");
    }
}
