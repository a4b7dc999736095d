//! Slack Web API client.
//!
//! Two calls are all the bot needs: `auth.test` once at startup to learn its
//! own identity, and `chat.postMessage` to deliver replies. The client
//! implements the core's [`ReplySink`] seam so the runtime loop never sees
//! anything Slack-shaped.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use serde_json::{Value, json};
use tracing::{debug, info};

use magpie_core::{Block, Reply, ReplySink};

use crate::error::{SlackError, SlackResult};
use crate::model::{AuthTestResponse, PostMessageResponse};
use crate::self_address::BotIdentity;

/// Client for the Slack Web API.
pub struct SlackClient {
    http: Client,
    token: String,
    api_url: String,
}

impl SlackClient {
    /// Creates a client for the given bot token.
    ///
    /// `api_url` is the API base (normally `https://slack.com/api`; tests
    /// point it at a local server).
    pub fn new(token: impl Into<String>, api_url: impl Into<String>) -> SlackResult<Self> {
        let http = ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .build()?;
        let api_url = api_url.into();
        Ok(Self {
            http,
            token: token.into(),
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Calls `auth.test` and returns the bot's own identity.
    pub async fn auth_test(&self) -> SlackResult<BotIdentity> {
        let resp: AuthTestResponse = self
            .http
            .post(format!("{}/auth.test", self.api_url))
            .bearer_auth(&self.token)
            .send()
            .await?
            .json()
            .await?;

        if !resp.ok {
            return Err(SlackError::Api {
                method: "auth.test",
                error: resp.error.unwrap_or_default(),
            });
        }

        info!(user_id = %resp.user_id, name = %resp.user, "authenticated with slack");
        Ok(BotIdentity {
            user_id: resp.user_id,
            name: resp.user,
        })
    }

    /// Posts a reply via `chat.postMessage`.
    pub async fn post_message(&self, reply: &Reply) -> SlackResult<()> {
        let channel = reply
            .channel
            .as_deref()
            .ok_or(SlackError::MissingDestination)?;

        let mut body = json!({
            "channel": channel,
            "text": reply.body,
        });
        if let Some(thread) = &reply.thread {
            body["thread_ts"] = json!(thread);
        }
        if !reply.blocks.is_empty() {
            body["blocks"] = Value::Array(reply.blocks.iter().map(render_block).collect());
        }

        let resp: PostMessageResponse = self
            .http
            .post(format!("{}/chat.postMessage", self.api_url))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if !resp.ok {
            return Err(SlackError::Api {
                method: "chat.postMessage",
                error: resp.error.unwrap_or_default(),
            });
        }

        debug!(channel = %channel, blocks = reply.blocks.len(), "posted reply");
        Ok(())
    }
}

/// Renders a core block as Slack Block Kit JSON.
fn render_block(block: &Block) -> Value {
    match block {
        Block::Section { text } => json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": text },
        }),
        Block::Image { url, alt } => json!({
            "type": "image",
            "image_url": url,
            "alt_text": alt,
        }),
    }
}

#[async_trait::async_trait]
impl ReplySink for SlackClient {
    type Error = SlackError;

    async fn deliver(&self, reply: &Reply) -> Result<(), Self::Error> {
        self.post_message(reply).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_section_block() {
        let value = render_block(&Block::Section {
            text: "*Name:* Mike Truk".into(),
        });
        assert_eq!(value["type"], "section");
        assert_eq!(value["text"]["type"], "mrkdwn");
        assert_eq!(value["text"]["text"], "*Name:* Mike Truk");
    }

    #[test]
    fn render_image_block() {
        let value = render_block(&Block::Image {
            url: "https://example.com/p.jpg".into(),
            alt: "Mike Truk".into(),
        });
        assert_eq!(value["type"], "image");
        assert_eq!(value["image_url"], "https://example.com/p.jpg");
        assert_eq!(value["alt_text"], "Mike Truk");
    }

    #[test]
    fn api_url_is_normalized() {
        let client = SlackClient::new("xoxb-token", "https://slack.example/api/").unwrap();
        assert_eq!(client.api_url, "https://slack.example/api");
    }
}
