//! Feature modules for the magpie bot.
//!
//! Each module contributes a pattern (or several) and the paired handler to
//! the core registries. Nothing here talks to Slack directly; handlers only
//! see core [`magpie_core::Message`] values and produce core
//! [`magpie_core::Reply`] values.
//!
//! # Registration order matters
//!
//! The classifier is first-match-wins in registration order, so the order
//! modules register in — and the order of patterns within a module — is part
//! of the bot's observable behavior. [`register_all`] is the one place that
//! order is defined.

use magpie_core::{ActionRegistry, Classifier, RegistryError};
use thiserror::Error;

pub mod antisocial;
pub mod baseball;
pub mod cards;
pub mod eastwest;

/// Errors raised while wiring modules into the registries.
///
/// Fatal at startup: a bot with a partial module set should not come up.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// Pattern or handler registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Embedded module data did not parse.
    #[error("invalid embedded module data: {0}")]
    Data(#[from] serde_json::Error),
}

/// Registers every feature module.
pub fn register_all(
    classifier: &mut Classifier,
    actions: &mut ActionRegistry,
) -> Result<(), ModuleError> {
    antisocial::register(classifier, actions)?;
    baseball::register(classifier, actions)?;
    cards::register(classifier, actions)?;
    eastwest::register(classifier, actions)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use magpie_core::Pipeline;

    /// All modules register cleanly into fresh registries.
    #[test]
    fn register_all_succeeds() {
        let mut classifier = Classifier::new();
        let mut actions = ActionRegistry::new();
        register_all(&mut classifier, &mut actions).unwrap();
        assert!(!actions.is_empty());
    }

    /// Registering twice trips the duplicate checks rather than silently
    /// doubling patterns.
    #[test]
    fn double_registration_fails() {
        let mut classifier = Classifier::new();
        let mut actions = ActionRegistry::new();
        register_all(&mut classifier, &mut actions).unwrap();
        assert!(register_all(&mut classifier, &mut actions).is_err());
    }

    /// Routing smoke test across module boundaries.
    #[test]
    fn intents_route_to_the_right_module() {
        let mut classifier = Classifier::new();
        let mut actions = ActionRegistry::new();
        register_all(&mut classifier, &mut actions).unwrap();
        let pipeline = Pipeline::new(classifier, actions);

        let classify = |body: &str, directed: bool| {
            pipeline.classifier().classify(body, directed).id
        };

        assert_eq!(classify("question card", true), "cards.black");
        assert_eq!(classify("q card me", true), "cards.black");
        assert_eq!(classify("card me 3", true), "cards.white");
        assert_eq!(classify("baseball me", true), "baseball.player");
        assert_eq!(classify("east me", true), "eastwest.player");
        assert_eq!(classify("eastwest url 2", true), "eastwest.url");
        assert_eq!(classify("!maul carl", false), "antisocial");
        assert_eq!(classify("card me 3", false), magpie_core::Intent::UNKNOWN);
    }
}
