//! Configuration for the Slack adapter.

use serde::{Deserialize, Serialize};

/// Slack adapter configuration.
///
/// Embedded in the runtime's root configuration under the `slack` key; all
/// fields can also be supplied via `MAGPIE_SLACK__*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    /// Bot token (`xoxb-…`) used for Web API calls.
    pub api_token: String,

    /// Signing secret used to verify inbound webhook requests.
    pub signing_secret: String,

    /// Bind address for the webhook listener (default: "0.0.0.0").
    pub host: String,

    /// Listen port (default: 3000).
    pub port: u16,

    /// Path the Events API posts to (default: "/events").
    pub events_path: String,

    /// Web API base URL. Only overridden in tests.
    pub api_url: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            signing_secret: String::new(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            events_path: "/events".to_string(),
            api_url: "https://slack.com/api".to_string(),
        }
    }
}

impl SlackConfig {
    /// Returns the bind address string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns true if both credentials are present.
    pub fn has_credentials(&self) -> bool {
        !self.api_token.is_empty() && !self.signing_secret.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SlackConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.events_path, "/events");
        assert!(!config.has_credentials());
    }
}
