//! Error types for the Slack adapter.

use thiserror::Error;

/// Errors from the Slack transport (webhook server and Web API client).
#[derive(Debug, Error)]
pub enum SlackError {
    /// HTTP request failed (connect, timeout, non-success status).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to bind or run the webhook listener.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The Web API answered with `"ok": false`.
    #[error("slack api '{method}' failed: {error}")]
    Api {
        /// The API method that failed.
        method: &'static str,
        /// Slack's error code (e.g. `invalid_auth`).
        error: String,
    },

    /// A reply had no destination channel to post to.
    #[error("reply has no destination channel")]
    MissingDestination,
}

/// Result type for Slack adapter operations.
pub type SlackResult<T> = Result<T, SlackError>;
