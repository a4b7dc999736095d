//! Trivia card draws.
//!
//! The deck ships embedded in the binary: white cards are plain strings,
//! black cards carry a text and a pick count. Both commands are direct —
//! you have to ask the bot for a card.
//!
//! - `card me 3` → three random white cards (`cards.white`)
//! - `question card` / `q card me` → one random black card (`cards.black`)

use std::sync::Arc;

use rand::seq::IndexedRandom;
use serde::Deserialize;

use magpie_core::{ActionRegistry, Classifier, HandlerError, Intent, Message, Reply};

use crate::ModuleError;

const RAW_DECK: &str = include_str!("data/cards.json");

/// A question card.
#[derive(Debug, Clone, Deserialize)]
struct BlackCard {
    text: String,
    pick: u32,
}

/// The embedded deck, split into white (answer) and black (question) cards.
#[derive(Debug, Deserialize)]
struct Deck {
    white: Vec<String>,
    black: Vec<BlackCard>,
}

impl Deck {
    fn draw_white(&self, count: usize) -> Vec<String> {
        let mut rng = rand::rng();
        (0..count)
            .filter_map(|_| self.white.choose(&mut rng).cloned())
            .collect()
    }

    fn draw_black(&self) -> Option<&BlackCard> {
        self.black.choose(&mut rand::rng())
    }
}

/// Formats a black card: the text alone, or prefixed with the pick count
/// when the card asks for more than one answer.
fn black_body(card: &BlackCard) -> String {
    if card.pick > 1 {
        format!("(Pick {}) {}", card.pick, card.text)
    } else {
        card.text.clone()
    }
}

/// Registers the card patterns and handlers.
///
/// The black-card pattern goes first: `card me` must not swallow
/// `question card me`.
pub fn register(
    classifier: &mut Classifier,
    actions: &mut ActionRegistry,
) -> Result<(), ModuleError> {
    let deck: Arc<Deck> = Arc::new(serde_json::from_str(RAW_DECK)?);

    classifier.direct(r"q(?:uestion)? card(?: me)?", "cards.black")?;
    let black_deck = Arc::clone(&deck);
    actions.register("cards.black", move |_intent: &Intent, msg: &Message| {
        let Some(card) = black_deck.draw_black() else {
            return Ok(None);
        };
        let body = black_body(card);
        Ok(Some(Reply::to(msg, body.clone()).with_section(body)))
    })?;

    classifier.direct(r"card(?: me)? (?P<count>\d*)?", "cards.white")?;
    let white_deck = Arc::clone(&deck);
    actions.register("cards.white", move |intent: &Intent, msg: &Message| {
        let count: usize = match intent.get_non_empty("count") {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| {
                HandlerError::InvalidArgument {
                    name: "count",
                    value: raw.to_string(),
                    reason: e.to_string(),
                }
            })?,
            None => 1,
        };

        let cards = white_deck.draw_white(count);
        let mut reply = Reply::to(msg, cards.join("\n"));
        for (idx, card) in cards.iter().enumerate() {
            let text = if cards.len() > 1 {
                format!("*{}.* {}", idx + 1, card)
            } else {
                card.clone()
            };
            reply = reply.with_section(text);
        }
        Ok(Some(reply))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use magpie_core::Pipeline;

    fn pipeline() -> Pipeline {
        let mut classifier = Classifier::new();
        let mut actions = ActionRegistry::new();
        register(&mut classifier, &mut actions).unwrap();
        Pipeline::new(classifier, actions)
    }

    #[test]
    fn deck_parses() {
        let deck: Deck = serde_json::from_str(RAW_DECK).unwrap();
        assert!(!deck.white.is_empty());
        assert!(!deck.black.is_empty());
        assert!(deck.black.iter().all(|c| c.pick >= 1));
    }

    #[test]
    fn white_draw_honors_count() {
        let p = pipeline();
        let reply = p
            .handle(&Message::from_body("card me 4"), true)
            .unwrap()
            .unwrap();
        assert_eq!(reply.body.lines().count(), 4);
        assert_eq!(reply.blocks.len(), 4);
    }

    #[test]
    fn white_draw_defaults_to_one() {
        let p = pipeline();
        let reply = p
            .handle(&Message::from_body("card me "), true)
            .unwrap()
            .unwrap();
        assert_eq!(reply.body.lines().count(), 1);
        // A single card gets no numbering prefix.
        assert!(!reply.body.starts_with("*1.*"));
    }

    #[test]
    fn question_card_is_black() {
        let p = pipeline();
        let reply = p
            .handle(&Message::from_body("question card"), true)
            .unwrap()
            .unwrap();
        assert!(!reply.body.is_empty());
        assert_eq!(reply.blocks.len(), 1);
    }

    #[test]
    fn black_pick_prefix() {
        let single = BlackCard {
            text: "What never fails to cheer me up?".into(),
            pick: 1,
        };
        assert_eq!(black_body(&single), "What never fails to cheer me up?");

        let multi = BlackCard {
            text: "_ plus _ equals trouble.".into(),
            pick: 2,
        };
        assert_eq!(black_body(&multi), "(Pick 2) _ plus _ equals trouble.");
    }
}
