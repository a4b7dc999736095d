//! Error types for the magpie core engine.
//!
//! Registration errors are startup-time configuration mistakes and should
//! abort process initialization; handler errors surface from dispatch and are
//! the caller's to log or suppress.

use thiserror::Error;

// =============================================================================
// Registration Errors
// =============================================================================

/// Errors raised while populating the pattern or action registries.
///
/// All of these indicate a misconfigured module, so the process should refuse
/// to start rather than run with a partial registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The pattern did not compile as a regular expression.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern text as given at registration.
        pattern: String,
        /// The underlying compile error.
        source: regex::Error,
    },

    /// The same `(bucket, pattern)` pair was registered twice.
    #[error("pattern '{pattern}' already registered in the {bucket} bucket")]
    DuplicatePattern {
        /// The bucket name ("direct" or "overheard").
        bucket: &'static str,
        /// The duplicate pattern text.
        pattern: String,
    },

    /// A handler was already registered for this intent id.
    ///
    /// Registration is not an overwrite; the existing handler stays in place.
    #[error("handler for intent '{intent}' already registered")]
    DuplicateAction {
        /// The duplicate intent id.
        intent: String,
    },
}

// =============================================================================
// Handler Errors
// =============================================================================

/// Errors produced by a dispatched handler.
///
/// These propagate out of [`ActionRegistry::dispatch`](crate::ActionRegistry::dispatch)
/// unchanged; the runtime decides user-visible behavior (typically log and
/// stay silent, never crash).
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A capture value could not be interpreted (e.g. a non-numeric count).
    #[error("invalid value '{value}' for capture '{name}': {reason}")]
    InvalidArgument {
        /// The capture group name.
        name: &'static str,
        /// The offending captured text.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A capture the handler depends on was absent from the intent context.
    #[error("missing capture '{name}' in intent context")]
    MissingCapture {
        /// The capture group name.
        name: &'static str,
    },

    /// Any other handler failure.
    #[error("{0}")]
    Other(String),
}

impl HandlerError {
    /// Creates an [`HandlerError::Other`] from anything printable.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_display() {
        let err = RegistryError::DuplicateAction {
            intent: "cards.white".into(),
        };
        assert_eq!(
            err.to_string(),
            "handler for intent 'cards.white' already registered"
        );
    }

    #[test]
    fn handler_error_display() {
        let err = HandlerError::InvalidArgument {
            name: "count",
            value: "many".into(),
            reason: "invalid digit found in string".into(),
        };
        assert!(err.to_string().contains("count"));
        assert!(err.to_string().contains("many"));
    }
}
