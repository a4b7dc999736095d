//! Webhook listener for the Slack Events API.
//!
//! One axum router with two routes: `GET /health` for liveness probes and a
//! `POST` events path. Every event request is signature-verified against the
//! raw body before parsing; verified message events are turned into core
//! [`Message`] values and handed to the pipeline over a bounded channel.
//!
//! The channel is the single hand-off point between transport and core: the
//! HTTP handler blocks on `send` until the runtime loop takes the message,
//! so the transport never runs ahead of classification.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use magpie_core::{ChannelKind, Delivery, Message, Sender};

use crate::error::SlackResult;
use crate::model::{CallbackEvent, EventEnvelope, MessageEvent};
use crate::self_address::SelfAddress;
use crate::signature;

/// One parsed inbound message plus the transport's directedness verdict.
#[derive(Debug, Clone)]
pub struct Inbound {
    /// The message, with any self-address prefix already stripped.
    pub message: Message,
    /// Whether the message was addressed to the bot: a private one-to-one
    /// session, or a recognized leading mention/name.
    pub directed: bool,
}

/// Shared state for the webhook routes.
struct ServerState {
    signing_secret: String,
    self_address: Arc<SelfAddress>,
    tx: mpsc::Sender<Inbound>,
}

/// The Events API webhook server.
pub struct EventServer {
    state: Arc<ServerState>,
    events_path: String,
}

impl EventServer {
    /// Creates a server that hands verified messages to `tx`.
    pub fn new(
        signing_secret: impl Into<String>,
        events_path: impl Into<String>,
        self_address: Arc<SelfAddress>,
        tx: mpsc::Sender<Inbound>,
    ) -> Self {
        Self {
            state: Arc::new(ServerState {
                signing_secret: signing_secret.into(),
                self_address,
                tx,
            }),
            events_path: events_path.into(),
        }
    }

    /// Builds the axum router. Exposed separately for in-process tests.
    pub fn router(&self) -> Router {
        let path = if self.events_path.starts_with('/') {
            self.events_path.clone()
        } else {
            format!("/{}", self.events_path)
        };

        Router::new()
            .route("/health", get(health_handler))
            .route(&path, post(events_handler))
            .with_state(Arc::clone(&self.state))
    }

    /// Binds `addr` and serves until `cancel` fires.
    pub async fn serve(self, addr: &str, cancel: CancellationToken) -> SlackResult<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let actual_addr = listener.local_addr()?;
        info!(addr = %actual_addr, path = %self.events_path, "webhook server listening");

        let server = axum::serve(listener, self.router());
        tokio::select! {
            result = server => {
                if let Err(e) = &result {
                    error!(error = %e, "webhook server error");
                }
                result.map_err(Into::into)
            }
            _ = cancel.cancelled() => {
                info!("webhook server shutting down");
                Ok(())
            }
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// The events POST handler: verify, parse, convert, hand off.
async fn events_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let timestamp = header_str(&headers, "x-slack-request-timestamp");
    let sig = header_str(&headers, "x-slack-signature");
    if !signature::verify(&state.signing_secret, timestamp, &body, sig) {
        warn!("rejecting webhook request with bad signature");
        return (StatusCode::UNAUTHORIZED, String::new());
    }

    let envelope: EventEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "unable to parse events api payload");
            return (StatusCode::BAD_REQUEST, String::new());
        }
    };

    match envelope {
        EventEnvelope::UrlVerification { challenge } => {
            info!("answering url verification challenge");
            (StatusCode::OK, challenge)
        }
        EventEnvelope::EventCallback {
            event: CallbackEvent::Message(event),
        } => {
            if let Some(inbound) = convert_message(&state.self_address, event) {
                // Block until the pipeline takes it; a closed channel means
                // the runtime is shutting down.
                if state.tx.send(inbound).await.is_err() {
                    debug!("pipeline channel closed, dropping message");
                }
            }
            (StatusCode::OK, String::new())
        }
        EventEnvelope::EventCallback { .. } | EventEnvelope::Other => {
            trace!("ignoring event the bot is not interested in");
            (StatusCode::OK, String::new())
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Turns a Slack message event into a core [`Inbound`], or `None` for
/// messages the bot should not react to.
fn convert_message(self_address: &SelfAddress, event: MessageEvent) -> Option<Inbound> {
    // Edits, joins, and other subtypes are not fresh user messages.
    if event.bot_id.is_some() || event.subtype.is_some() {
        return None;
    }
    let user = event.user.as_deref().filter(|u| !u.is_empty())?;

    // Never talk to ourselves.
    if let Some(identity) = self_address.identity()
        && identity.user_id == user
    {
        return None;
    }

    let (remainder, tagged) = self_address.match_self(&event.text);
    let directed = event.channel_type == ChannelKind::Im || tagged;

    debug!(
        channel = %event.channel,
        kind = ?event.channel_type,
        directed,
        "inbound message"
    );

    Some(Inbound {
        message: Message {
            body: remainder.to_string(),
            sender: Sender {
                id: user.to_string(),
                name: String::new(),
            },
            delivery: Delivery {
                channel: event.channel,
                kind: event.channel_type,
                thread: event.thread_ts,
            },
        },
        directed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::self_address::BotIdentity;

    fn self_address() -> Arc<SelfAddress> {
        Arc::new(SelfAddress::with_identity(BotIdentity {
            user_id: "U123".into(),
            name: "Bot".into(),
        }))
    }

    fn message_event(user: &str, text: &str, channel_type: ChannelKind) -> MessageEvent {
        MessageEvent {
            user: Some(user.into()),
            text: text.into(),
            channel: "C42".into(),
            channel_type,
            ts: "1712000000.000100".into(),
            thread_ts: None,
            bot_id: None,
            subtype: None,
        }
    }

    #[test]
    fn mention_makes_message_directed() {
        let inbound = convert_message(
            &self_address(),
            message_event("U9", "<@U123>: card me", ChannelKind::Channel),
        )
        .unwrap();
        assert!(inbound.directed);
        assert_eq!(inbound.message.body, "card me");
    }

    #[test]
    fn im_is_always_directed() {
        let inbound = convert_message(
            &self_address(),
            message_event("U9", "card me", ChannelKind::Im),
        )
        .unwrap();
        assert!(inbound.directed);
        assert_eq!(inbound.message.body, "card me");
    }

    #[test]
    fn channel_chatter_is_not_directed() {
        let inbound = convert_message(
            &self_address(),
            message_event("U9", "!maul carl", ChannelKind::Channel),
        )
        .unwrap();
        assert!(!inbound.directed);
        assert_eq!(inbound.message.body, "!maul carl");
    }

    #[test]
    fn own_messages_are_dropped() {
        assert!(
            convert_message(
                &self_address(),
                message_event("U123", "hello", ChannelKind::Channel),
            )
            .is_none()
        );
    }

    #[test]
    fn bot_and_subtype_messages_are_dropped() {
        let mut event = message_event("U9", "hello", ChannelKind::Channel);
        event.bot_id = Some("B77".into());
        assert!(convert_message(&self_address(), event).is_none());

        let mut event = message_event("U9", "hello", ChannelKind::Channel);
        event.subtype = Some("message_changed".into());
        assert!(convert_message(&self_address(), event).is_none());
    }

    #[tokio::test]
    async fn events_route_hands_off_verified_messages() {
        use tower::ServiceExt;

        let (tx, mut rx) = mpsc::channel(1);
        let server = EventServer::new("secret", "/events", self_address(), tx);
        let router = server.router();

        let body = serde_json::json!({
            "type": "event_callback",
            "event": {
                "type": "message",
                "user": "U9",
                "text": "<@U123> baseball me",
                "channel": "C42",
                "channel_type": "channel",
                "ts": "1712000000.000100"
            }
        })
        .to_string();

        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs()
            .to_string();
        let sig = format!("v0={}", signature::compute("secret", &ts, body.as_bytes()));

        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/events")
            .header("x-slack-request-timestamp", ts)
            .header("x-slack-signature", sig)
            .body(axum::body::Body::from(body))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let inbound = rx.recv().await.unwrap();
        assert!(inbound.directed);
        assert_eq!(inbound.message.body, "baseball me");
    }

    #[tokio::test]
    async fn events_route_rejects_bad_signature() {
        use tower::ServiceExt;

        let (tx, _rx) = mpsc::channel(1);
        let server = EventServer::new("secret", "/events", self_address(), tx);
        let router = server.router();

        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/events")
            .header("x-slack-request-timestamp", "1712000000")
            .header("x-slack-signature", "v0=deadbeef")
            .body(axum::body::Body::from("{}"))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
