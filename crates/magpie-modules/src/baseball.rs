//! Baseball player cards.
//!
//! `baseball me` (direct) answers with a random player name and a random
//! baseball-card image from a fixed gallery.

use rand::Rng;
use rand::seq::IndexedRandom;

use magpie_core::{ActionRegistry, Classifier, Intent, Message, Reply};

use crate::ModuleError;

const PLAYER_URL_BASE: &str = "http://www.mcs.anl.gov/~acherry/bb-images";

/// The gallery holds images 1.jpg through 860.jpg.
const IMAGE_COUNT: u32 = 860;

const PLAYER_NAMES: &[&str] = &[
    "Sleve McDichael",
    "Onson Sweemey",
    "Darryl Archideld",
    "Anatoli Smorin",
    "Rey McSriff",
    "Glenallen Mixon",
    "Mario McRlwain",
    "Raul Chamgerlain",
    "Kevin Nogilny",
    "Tony Smehrik",
    "Bobson Dugnutt",
    "Willie Dustice",
    "Jeromy Gride",
    "Scott Dourque",
    "Shown Furcotte",
    "Dean Wesrey",
    "Mike Truk",
    "Dwigt Rortugal",
    "Tim Sandaele",
    "Karl Dandleton",
    "Mike Sernandez",
    "Todd Bonzalez",
    "Wilson Chul Lee",
    "Nert Bisels",
    "Kenn Nitvarn",
    "Fergit Hote",
    "Coll Bitzron",
    "Lood Janglosti",
    "Taenis Tellron",
    "Marnel Hary",
    "Dony Olerberz",
    "Gin Ginlons",
    "Wob Wonkoz",
    "Tanny Mlitnirt",
    "Hudgyn Sasdarl",
    "Fraven Pooth",
    "Rarr Dick",
    "Dorse Hintline",
    "Roy Gamo",
    "Tenpe Laob",
    "Varlin Genmist",
    "Pott Korhil",
    "Am O'Erson",
    "Snarry Shitwon",
    "Bobs Peare",
    "Renly Mlynren",
    "Ceynei Doober",
    "Hom Wapko",
    "Odood Jorgeudey",
    "Gary Banps",
    "Jaris Forta",
    "Erl Jivlitz",
    "Lenn Wobses",
    "Dan Boyo",
    "Yans Loovensan",
    "Mob Welronz",
    "Bannoe Rodylar",
    "Al Swermirstz",
    "Jinneil Robenko",
    "Bobson Allcock Dugnut",
    "Chicken Nutlugget",
];

fn rand_player() -> &'static str {
    PLAYER_NAMES
        .choose(&mut rand::rng())
        .expect("roster is not empty")
}

fn rand_image() -> String {
    let n = rand::rng().random_range(1..=IMAGE_COUNT);
    format!("{PLAYER_URL_BASE}/{n}.jpg")
}

/// Registers the baseball pattern and handler.
pub fn register(
    classifier: &mut Classifier,
    actions: &mut ActionRegistry,
) -> Result<(), ModuleError> {
    classifier.direct(r"baseball(?: me)?", "baseball.player")?;
    actions.register("baseball.player", |_intent: &Intent, msg: &Message| {
        let body = format!(">*Player*: {}\n{}", rand_player(), rand_image());
        Ok(Some(Reply::to(msg, body)))
    })?;
    Ok(())
}
