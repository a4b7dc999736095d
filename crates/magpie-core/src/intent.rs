//! Classified intents.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The classified purpose of a message: a string id plus the named capture
/// values extracted by the matching pattern.
///
/// Intents are created fresh per classification and consumed immediately by
/// the dispatcher; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Intent identifier, or [`Intent::UNKNOWN`] when nothing matched.
    pub id: String,
    /// Named capture group values from the matched pattern. Empty for the
    /// unknown intent and for patterns without named groups.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl Intent {
    /// Reserved id for messages no pattern matched.
    ///
    /// Dispatching this intent is a defined no-op, not an error.
    pub const UNKNOWN: &'static str = "sys.unknown";

    /// Creates an intent with an empty context.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            context: HashMap::new(),
        }
    }

    /// Creates the unknown sentinel intent.
    pub fn unknown() -> Self {
        Self::new(Self::UNKNOWN)
    }

    /// Returns true if this is the unknown sentinel.
    pub fn is_unknown(&self) -> bool {
        self.id == Self::UNKNOWN
    }

    /// Looks up a capture value by group name.
    ///
    /// Returns `None` both when the group did not participate in the match
    /// and when the pattern had no such group.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.context.get(name).map(String::as_str)
    }

    /// Looks up a capture value, treating an absent or empty capture as
    /// "not given".
    ///
    /// Optional trailing groups like `(?P<count>\d*)?` match the empty
    /// string; handlers usually want to fall back to a default in that case.
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sentinel() {
        let intent = Intent::unknown();
        assert!(intent.is_unknown());
        assert!(intent.context.is_empty());
        assert!(!Intent::new("cards.white").is_unknown());
    }

    #[test]
    fn empty_capture_is_not_given() {
        let mut intent = Intent::new("cards.white");
        intent.context.insert("count".into(), String::new());
        assert_eq!(intent.get("count"), Some(""));
        assert_eq!(intent.get_non_empty("count"), None);
    }
}
