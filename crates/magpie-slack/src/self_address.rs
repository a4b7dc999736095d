//! Self-address detection.
//!
//! A message like `"<@U123> card me"` or `"magpie: card me"` is a command
//! even in a public channel. [`SelfAddress`] recognizes a leading mention or
//! display name and strips it before classification.
//!
//! The bot only learns its own user id and name from `auth.test` after the
//! session is up, so the pattern cannot be compiled at startup. It is built
//! once, on first use after the identity is known, and cached for the
//! process lifetime behind a [`OnceLock`] — no per-message compilation, and
//! concurrent first use is safe.

use std::sync::OnceLock;

use parking_lot::RwLock;
use regex::Regex;
use tracing::warn;

/// The bot's own identity, as reported by `auth.test`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    /// The bot's user id (`U…`).
    pub user_id: String,
    /// The bot's display name.
    pub name: String,
}

/// Builds the escape sequence Slack uses to mention a user in message text.
pub fn mention(user_id: &str) -> String {
    format!("<@{user_id}>")
}

/// Mention variant carrying the display name, as some clients render it.
fn mention_with_name(user_id: &str, name: &str) -> String {
    format!("<@{user_id}|{name}>:")
}

/// Matches and strips a leading self-mention or self-name from message text.
///
/// Thread-safe: the identity slot is lock-guarded and the compiled pattern
/// is a one-time initialization.
#[derive(Debug, Default)]
pub struct SelfAddress {
    identity: RwLock<Option<BotIdentity>>,
    pattern: OnceLock<Regex>,
}

impl SelfAddress {
    /// Creates a matcher with no identity yet.
    ///
    /// Until [`set_identity`](Self::set_identity) is called, every message is
    /// treated as not self-addressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a matcher with a known identity.
    pub fn with_identity(identity: BotIdentity) -> Self {
        Self {
            identity: RwLock::new(Some(identity)),
            pattern: OnceLock::new(),
        }
    }

    /// Stores the bot's identity once the session is established.
    ///
    /// Has no effect on an already-compiled pattern; in practice the identity
    /// is set exactly once, before any traffic.
    pub fn set_identity(&self, identity: BotIdentity) {
        if self.pattern.get().is_some() {
            warn!("self-address pattern already compiled; identity update ignored");
            return;
        }
        *self.identity.write() = Some(identity);
    }

    /// Returns the stored identity, if known.
    pub fn identity(&self) -> Option<BotIdentity> {
        self.identity.read().clone()
    }

    /// Checks whether `text` opens by naming the bot.
    ///
    /// Returns the text following the address prefix and `true` when it
    /// does; otherwise the original text unchanged and `false`. If the bot's
    /// identity is not known yet, the message is treated as not addressed —
    /// a safe answer, never a panic.
    pub fn match_self<'a>(&self, text: &'a str) -> (&'a str, bool) {
        let Some(re) = self.pattern_for_identity() else {
            warn!("self-address requested before bot identity is known");
            return (text, false);
        };

        let Some(caps) = re.captures(text) else {
            return (text, false);
        };

        // The prefix group is optional and may match empty; only a non-empty
        // match means the bot was actually named.
        let addressed = caps.name("self").is_some_and(|m| !m.as_str().is_empty());
        if !addressed {
            return (text, false);
        }

        let remainder = caps.name("text").map_or("", |m| m.as_str());
        (remainder, true)
    }

    /// Returns the cached pattern, compiling it on first use once the
    /// identity is available.
    fn pattern_for_identity(&self) -> Option<&Regex> {
        if let Some(re) = self.pattern.get() {
            return Some(re);
        }

        let identity = self.identity.read().clone()?;
        let source = Self::pattern_source(&identity);
        // Losing the get_or_init race is fine: both sides compile the same
        // pattern from the same identity.
        Some(self.pattern.get_or_init(|| {
            Regex::new(&source).expect("self-address pattern built from escaped literals")
        }))
    }

    /// Builds the anchored, case-insensitive pattern recognizing a leading
    /// `<@Uxxx>` mention, a `<@Uxxx|name>:` mention, or the plain display
    /// name, optionally followed by a colon or comma.
    fn pattern_source(identity: &BotIdentity) -> String {
        let prefixes = [
            regex::escape(&mention(&identity.user_id)),
            regex::escape(&mention_with_name(&identity.user_id, &identity.name)),
            regex::escape(&identity.name),
        ];
        format!(
            r"(?i)^(?:(?P<self>{})[:,]?)?\s*(?P<text>.*)$",
            prefixes.join("|")
        )
    }
}
