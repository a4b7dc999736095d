//! Slack request signature verification.
//!
//! Slack signs every webhook request with HMAC-SHA256 over the base string
//! `v0:{timestamp}:{raw body}` keyed by the app's signing secret, and sends
//! the result as `X-Slack-Signature: v0=<hex>` alongside
//! `X-Slack-Request-Timestamp`. Requests older than the replay window are
//! rejected even when the signature itself is valid.

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Signature scheme version prefix.
const VERSION: &str = "v0";

/// Maximum accepted age of a request, in seconds (5 minutes).
const MAX_AGE_SECS: i64 = 300;

/// Verifies a webhook request signature against the signing secret.
///
/// `timestamp` and `signature` are the raw header values. Returns `false`
/// for malformed headers, stale timestamps, and signature mismatches alike —
/// the caller answers 401 either way.
pub fn verify(secret: &str, timestamp: &str, body: &[u8], signature: &str) -> bool {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    verify_at(secret, timestamp, body, signature, now)
}

/// [`verify`] with an explicit clock, for tests.
pub fn verify_at(secret: &str, timestamp: &str, body: &[u8], signature: &str, now: i64) -> bool {
    let Ok(ts) = timestamp.parse::<i64>() else {
        warn!("signature check failed: non-numeric timestamp header");
        return false;
    };
    if (now - ts).abs() > MAX_AGE_SECS {
        warn!(age_secs = now - ts, "signature check failed: request outside replay window");
        return false;
    }

    let Some(expected) = signature.strip_prefix("v0=") else {
        warn!("signature check failed: missing v0= prefix");
        return false;
    };

    constant_time_eq(&compute(secret, timestamp, body), expected)
}

/// Computes the hex-encoded signature for a request (without the `v0=`
/// prefix).
pub fn compute(secret: &str, timestamp: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time string comparison, to keep the check timing-independent.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
    const BODY: &[u8] = br#"{"type":"event_callback"}"#;

    #[test]
    fn valid_signature_is_accepted() {
        let ts = "1712000000";
        let sig = format!("v0={}", compute(SECRET, ts, BODY));
        assert!(verify_at(SECRET, ts, BODY, &sig, 1_712_000_010));
    }

    #[test]
    fn tampered_body_is_rejected() {
        let ts = "1712000000";
        let sig = format!("v0={}", compute(SECRET, ts, BODY));
        assert!(!verify_at(SECRET, ts, b"{\"type\":\"evil\"}", &sig, 1_712_000_010));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let ts = "1712000000";
        let sig = format!("v0={}", compute("other-secret", ts, BODY));
        assert!(!verify_at(SECRET, ts, BODY, &sig, 1_712_000_010));
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let ts = "1712000000";
        let sig = format!("v0={}", compute(SECRET, ts, BODY));
        // Six minutes later: outside the replay window.
        assert!(!verify_at(SECRET, ts, BODY, &sig, 1_712_000_360));
        // Timestamps from the future are equally suspect.
        assert!(!verify_at(SECRET, "1712000700", BODY, &sig, 1_712_000_000));
    }

    #[test]
    fn malformed_headers_are_rejected() {
        let ts = "1712000000";
        let hex = compute(SECRET, ts, BODY);
        assert!(!verify_at(SECRET, ts, BODY, &hex, 1_712_000_010)); // no prefix
        assert!(!verify_at(SECRET, "not-a-number", BODY, &format!("v0={hex}"), 1_712_000_010));
    }
}
