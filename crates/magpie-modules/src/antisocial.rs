//! Antisocial one-liners.
//!
//! Overheard module: anyone saying `!maul carl` (or any other trigger) in a
//! channel gets a canned bit of theater back, with the speaker as the
//! subject. `!rand` picks a trigger at random. Each trigger has two
//! templates — one used when a target was named, one when not.

use rand::seq::IndexedRandom;

use magpie_core::{ActionRegistry, Classifier, HandlerError, Intent, Message, Reply};

use crate::ModuleError;

/// One trigger: name, with-target template, no-target template.
///
/// Templates are minijinja; `subject` is the speaker's mention and `target`
/// is whatever followed the trigger word.
struct Trigger {
    name: &'static str,
    with_target: &'static str,
    no_target: &'static str,
}

const TRIGGERS: &[Trigger] = &[
    Trigger {
        name: "maul",
        with_target: "{{ subject }} mauls {{ target }} in angry bear-like fashion.",
        no_target: "{{ subject }} RAAAHR!!",
    },
    Trigger {
        name: "charades",
        with_target: "{{ subject }}, with finger on nose, points to {{ target }}.",
        no_target: "{{ subject }} Sounds like...",
    },
    Trigger {
        name: "nelson",
        with_target: "{{ subject }} [to {{ target }}]: HAW HAW!",
        no_target: "{{ subject }} I *said* HAW HAW!",
    },
    Trigger {
        name: "flame",
        with_target: "{{ subject }} sets {{ target }} on fire.",
        no_target: "{{ subject }} YOU MORON!",
    },
    Trigger {
        name: "cheese",
        with_target: "{{ subject }} [to {{ target }}]: I like cheese.",
        no_target: "{{ subject }} Behold the power of cheese!",
    },
    Trigger {
        name: "fire",
        with_target: "{{ target }}: You're fired.",
        no_target: "EVACUATE THE BUILDING!",
    },
    Trigger {
        name: "pound",
        with_target: "{{ subject }} pounds and pounds {{ target }} with a shovel.",
        no_target: "{{ subject }} I'll take 'Things you just want to pound with a shovel' for $300, Alex.",
    },
    Trigger {
        name: "eye",
        with_target: "{{ subject }} eyes {{ target }} warily.",
        no_target: "{{ subject }} nay.",
    },
    Trigger {
        name: "thank",
        with_target: "{{ subject }} [to {{ target }}]: Thanks {{ target }}! BOK BOK!",
        no_target: "{{ subject }} I DON'T KNOW WHAT TO SAY WHEN YOU SAY THAT.",
    },
    Trigger {
        name: "back",
        with_target: "{{ subject }} slowly backs away from {{ target }}, careful not to make eye contact.",
        no_target: "{{ subject }} Little in the middle but ya got much...",
    },
    Trigger {
        name: "peer",
        with_target: "{{ subject }} peers at {{ target }} suspiciously.",
        no_target: "{{ subject }} peers at nothing in particular for no good reason.",
    },
];

/// Builds the overheard trigger expression, `rand` included.
fn trigger_expr() -> String {
    let names: Vec<&str> = TRIGGERS.iter().map(|t| t.name).collect();
    format!(r"!(?P<trigger>rand|{})\s*(?P<target>.*)?$", names.join("|"))
}

fn find_trigger(name: &str) -> Option<&'static Trigger> {
    TRIGGERS.iter().find(|t| t.name == name)
}

fn rand_trigger() -> &'static Trigger {
    TRIGGERS
        .choose(&mut rand::rng())
        .expect("trigger table is not empty")
}

/// The Slack escape sequence mentioning a user in message text.
fn mention(user_id: &str) -> String {
    format!("<@{user_id}>")
}

fn perform(intent: &Intent, msg: &Message) -> Result<Option<Reply>, HandlerError> {
    let name = intent
        .get("trigger")
        .ok_or(HandlerError::MissingCapture { name: "trigger" })?;

    let trigger = if name == "rand" {
        rand_trigger()
    } else {
        find_trigger(name).ok_or_else(|| HandlerError::InvalidArgument {
            name: "trigger",
            value: name.to_string(),
            reason: "no such trigger".to_string(),
        })?
    };

    let target = intent.get_non_empty("target");
    let template = if target.is_some() {
        trigger.with_target
    } else {
        trigger.no_target
    };

    let body = minijinja::Environment::new()
        .render_str(
            template,
            minijinja::context! {
                subject => mention(&msg.sender.id),
                target => target.unwrap_or_default(),
            },
        )
        .map_err(|e| HandlerError::other(e.to_string()))?;

    Ok(Some(Reply::to(msg, body)))
}

/// Registers the antisocial pattern and handler.
pub fn register(
    classifier: &mut Classifier,
    actions: &mut ActionRegistry,
) -> Result<(), ModuleError> {
    classifier.hear(&trigger_expr(), "antisocial")?;
    actions.register("antisocial", perform)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use magpie_core::{Pipeline, Sender};

    fn pipeline() -> Pipeline {
        let mut classifier = Classifier::new();
        let mut actions = ActionRegistry::new();
        register(&mut classifier, &mut actions).unwrap();
        Pipeline::new(classifier, actions)
    }

    fn msg_from(user: &str, body: &str) -> Message {
        Message {
            body: body.into(),
            sender: Sender {
                id: user.into(),
                name: String::new(),
            },
            ..Message::default()
        }
    }

    #[test]
    fn with_target_template() {
        let p = pipeline();
        let reply = p
            .handle(&msg_from("U9", "!maul carl"), false)
            .unwrap()
            .unwrap();
        assert_eq!(reply.body, "<@U9> mauls carl in angry bear-like fashion.");
    }

    #[test]
    fn no_target_template() {
        let p = pipeline();
        let reply = p.handle(&msg_from("U9", "!maul"), false).unwrap().unwrap();
        assert_eq!(reply.body, "<@U9> RAAAHR!!");
    }

    #[test]
    fn rand_picks_some_trigger() {
        let p = pipeline();
        let reply = p.handle(&msg_from("U9", "!rand"), false).unwrap().unwrap();
        assert!(!reply.body.is_empty());
    }

    #[test]
    fn overheard_in_any_channel() {
        // Works without the directed flag; this is an overheard pattern.
        let p = pipeline();
        assert!(p.handle(&msg_from("U9", "!peer bob"), true).unwrap().is_some());
        assert!(p.handle(&msg_from("U9", "!peer bob"), false).unwrap().is_some());
    }

    #[test]
    fn plain_chatter_is_ignored() {
        let p = pipeline();
        assert!(p.handle(&msg_from("U9", "maul carl"), false).unwrap().is_none());
    }
}
