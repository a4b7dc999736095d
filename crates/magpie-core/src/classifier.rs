//! Regex-based intent classification.
//!
//! The [`Classifier`] holds an ordered list of `(pattern, intent id)` pairs
//! split into two buckets:
//!
//! - [`Bucket::Direct`] — patterns for messages explicitly addressed to the
//!   bot (a private session, or a leading mention/name the adapter stripped).
//! - [`Bucket::Overheard`] — patterns matched against anything said where the
//!   bot can hear it.
//!
//! Registration order is match priority: the first registered pattern that
//! matches wins, so a broad pattern registered early shadows a narrower one
//! registered later. That makes module registration order a visible part of
//! the contract.
//!
//! Classification never fails. A message matching nothing in either bucket
//! yields the [`Intent::unknown`] sentinel with an empty context.

use regex::Regex;
use tracing::trace;

use crate::error::RegistryError;
use crate::intent::Intent;

/// Which pattern list an entry belongs to.
///
/// The two buckets are independent indices: the same intent id may appear in
/// both, and duplicate detection is per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Patterns for messages addressed to the bot.
    Direct,
    /// Patterns for messages merely overheard.
    Overheard,
}

impl Bucket {
    /// Lowercase bucket name for error messages and log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Bucket::Direct => "direct",
            Bucket::Overheard => "overheard",
        }
    }
}

/// One registered pattern.
///
/// Immutable after registration; the registry is append-only for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct PatternEntry {
    regex: Regex,
    intent_id: String,
}

impl PatternEntry {
    /// The intent id produced when this pattern matches.
    pub fn intent_id(&self) -> &str {
        &self.intent_id
    }

    /// The pattern text as registered.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// A simple regex-based intent classifier.
///
/// Populated once at startup, read-only afterwards; `classify` takes `&self`
/// and is safe to call from concurrent tasks once registration is sequenced
/// before traffic starts.
#[derive(Debug, Default)]
pub struct Classifier {
    direct: Vec<PatternEntry>,
    overheard: Vec<PatternEntry>,
}

impl Classifier {
    /// Creates an empty classifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `pattern` in `bucket`, producing `intent_id` on match.
    ///
    /// Patterns may contain named capture groups; their values end up in the
    /// intent context. Unnamed groups still participate in matching but their
    /// captures are discarded.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidPattern`] if the pattern does not compile,
    /// [`RegistryError::DuplicatePattern`] if the same `(bucket, pattern)`
    /// pair was registered before.
    pub fn register(
        &mut self,
        bucket: Bucket,
        pattern: &str,
        intent_id: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let regex = Regex::new(pattern).map_err(|source| RegistryError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let entries = self.bucket_mut(bucket);
        if entries.iter().any(|e| e.regex.as_str() == pattern) {
            return Err(RegistryError::DuplicatePattern {
                bucket: bucket.as_str(),
                pattern: pattern.to_string(),
            });
        }

        entries.push(PatternEntry {
            regex,
            intent_id: intent_id.into(),
        });
        Ok(())
    }

    /// Registers an overheard pattern. Shorthand for
    /// [`register`](Self::register) with [`Bucket::Overheard`].
    pub fn hear(&mut self, pattern: &str, intent_id: impl Into<String>) -> Result<(), RegistryError> {
        self.register(Bucket::Overheard, pattern, intent_id)
    }

    /// Registers a direct pattern. Shorthand for
    /// [`register`](Self::register) with [`Bucket::Direct`].
    pub fn direct(&mut self, pattern: &str, intent_id: impl Into<String>) -> Result<(), RegistryError> {
        self.register(Bucket::Direct, pattern, intent_id)
    }

    /// Classifies a message body.
    ///
    /// When `directed` is true the direct bucket is scanned first; whatever
    /// the flag, the overheard bucket is the fallback. Returns the unknown
    /// sentinel when nothing matches — never an error.
    pub fn classify(&self, body: &str, directed: bool) -> Intent {
        if directed {
            let intent = Self::scan(&self.direct, body);
            if !intent.is_unknown() {
                trace!(intent = %intent.id, bucket = "direct", "pattern matched");
                return intent;
            }
        }

        let intent = Self::scan(&self.overheard, body);
        if !intent.is_unknown() {
            trace!(intent = %intent.id, bucket = "overheard", "pattern matched");
        }
        intent
    }

    /// Returns the entries of a bucket, in registration (priority) order.
    pub fn entries(&self, bucket: Bucket) -> &[PatternEntry] {
        match bucket {
            Bucket::Direct => &self.direct,
            Bucket::Overheard => &self.overheard,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<PatternEntry> {
        match bucket {
            Bucket::Direct => &mut self.direct,
            Bucket::Overheard => &mut self.overheard,
        }
    }

    /// Scans one bucket in registration order and builds the intent for the
    /// first matching entry.
    fn scan(entries: &[PatternEntry], body: &str) -> Intent {
        for entry in entries {
            if let Some(caps) = entry.regex.captures(body) {
                let mut intent = Intent::new(entry.intent_id.clone());
                for name in entry.regex.capture_names().flatten() {
                    if let Some(m) = caps.name(name) {
                        intent.context.insert(name.to_string(), m.as_str().to_string());
                    }
                }
                return intent;
            }
        }
        Intent::unknown()
    }
}
