//! East/West Bowl rosters.
//!
//! Two direct commands backed by an embedded roster file:
//!
//! - `east me` / `west me` / `eastwest` → a random player from that
//!   conference (`eastwest.player`), with their college and head shot
//! - `eastwest url 2` → one of three fixed highlight-reel links
//!   (`eastwest.url`)

use std::sync::Arc;

use rand::seq::IndexedRandom;
use serde::Deserialize;

use magpie_core::{ActionRegistry, Classifier, HandlerError, Intent, Message, Reply};

use crate::ModuleError;

const URLS: [&str; 3] = [
    "http://www.youtube.com/watch?v=gODZzSOelss",
    "http://www.youtube.com/watch?v=rT1nGjGM2p8",
    "https://www.youtube.com/watch?v=mDp-ABzpRX8",
];

const RAW_ROSTER: &str = include_str!("data/eastwest.json");

#[derive(Debug, Clone, Deserialize)]
struct Player {
    name: String,
    college: String,
    image: String,
}

/// Both conference rosters.
#[derive(Debug, Deserialize)]
struct Bowl {
    east: Vec<Player>,
    west: Vec<Player>,
}

impl Bowl {
    fn rand_east(&self) -> Option<&Player> {
        self.east.choose(&mut rand::rng())
    }

    fn rand_west(&self) -> Option<&Player> {
        self.west.choose(&mut rand::rng())
    }

    fn rand_player(&self) -> Option<&Player> {
        let mut rng = rand::rng();
        let total = self.east.len() + self.west.len();
        if total == 0 {
            return None;
        }
        // Weight by roster size rather than flipping a coin per conference.
        let all: Vec<&Player> = self.east.iter().chain(self.west.iter()).collect();
        all.choose(&mut rng).copied()
    }
}

fn player_reply(msg: &Message, player: &Player) -> Reply {
    let body = format!(
        "*Name:* {}\n*College:* {}\n {}",
        player.name, player.college, player.image
    );
    Reply::to(msg, body)
        .with_block(magpie_core::Block::Image {
            url: player.image.clone(),
            alt: player.name.clone(),
        })
        .with_section(format!(">>>*Name:*\n{}", player.name))
        .with_section(format!(">>>*College:*\n{}", player.college))
}

/// Registers the roster patterns and handlers.
///
/// The player pattern is anchored, so `eastwest url ...` falls through to
/// the url pattern even though both start with `eastwest`.
pub fn register(
    classifier: &mut Classifier,
    actions: &mut ActionRegistry,
) -> Result<(), ModuleError> {
    let bowl: Arc<Bowl> = Arc::new(serde_json::from_str(RAW_ROSTER)?);

    classifier.direct(
        r"(?P<conference>east|west|eastwest)(?: me)?$",
        "eastwest.player",
    )?;
    actions.register("eastwest.player", move |intent: &Intent, msg: &Message| {
        let conference = intent
            .get_non_empty("conference")
            .ok_or(HandlerError::MissingCapture { name: "conference" })?;
        let player = match conference.to_lowercase().as_str() {
            "east" => bowl.rand_east(),
            "west" => bowl.rand_west(),
            _ => bowl.rand_player(),
        };
        Ok(player.map(|p| player_reply(msg, p)))
    })?;

    classifier.direct(r"eastwest(?: me)? url\s*(?P<url>[123])?$", "eastwest.url")?;
    actions.register("eastwest.url", |intent: &Intent, msg: &Message| {
        let raw = intent.get_non_empty("url").unwrap_or("1");
        let index: usize = raw.parse().map_err(|e: std::num::ParseIntError| {
            HandlerError::InvalidArgument {
                name: "url",
                value: raw.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Some(Reply::to(msg, URLS[index - 1].to_string())))
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
    fn roster_parses() {
        let bowl: Bowl = serde_json::from_str(RAW_ROSTER).unwrap();
        assert!(!bowl.east.is_empty());
        assert!(!bowl.west.is_empty());
    }

    #[test]
    fn east_draws_from_east() {
        let bowl: Bowl = serde_json::from_str(RAW_ROSTER).unwrap();
        for _ in 0..20 {
            let p = bowl.rand_east().unwrap();
            assert!(bowl.east.iter().any(|e| e.name == p.name));
        }
    }

    #[test]
    fn player_reply_shape() {
        let p = pipeline();
        let reply = p
            .handle(&Message::from_body("west me"), true)
            .unwrap()
            .unwrap();
        assert!(reply.body.starts_with("*Name:* "));
        assert!(reply.body.contains("*College:* "));
        // Image block plus two section blocks.
        assert_eq!(reply.blocks.len(), 3);
    }

    #[test]
    fn url_defaults_to_first() {
        let p = pipeline();
        let reply = p
            .handle(&Message::from_body("eastwest url"), true)
            .unwrap()
            .unwrap();
        assert_eq!(reply.body, URLS[0]);
    }

    #[test]
    fn url_picks_by_number() {
        let p = pipeline();
        let reply = p
            .handle(&Message::from_body("eastwest me url 3"), true)
            .unwrap()
            .unwrap();
        assert_eq!(reply.body, URLS[2]);
    }

    #[test]
    fn url_not_shadowed_by_player() {
        let p = pipeline();
        let intent = p.classifier().classify("eastwest url 2", true);
        assert_eq!(intent.id, "eastwest.url");
    }

    #[test]
    fn direct_only() {
        let p = pipeline();
        assert!(p.handle(&Message::from_body("east me"), false).unwrap().is_none());
    }
}
