//! The magpie Slack bot.
//!
//! Wires the feature modules into a pipeline and hands it to the runtime.
//! Configuration comes from `magpie.toml` and `MAGPIE_*` environment
//! variables; at minimum `slack.api_token` and `slack.signing_secret`
//! must be set.
//!
//! ```bash
//! MAGPIE_SLACK__API_TOKEN=xoxb-... \
//! MAGPIE_SLACK__SIGNING_SECRET=... \
//! cargo run --package magpie-bot
//! ```

use anyhow::{Context, Result};
use tracing::info;

use magpie_core::{ActionRegistry, Bucket, Classifier, Pipeline};
use magpie_runtime::{MagpieConfig, MagpieRuntime, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let config = MagpieConfig::load().context("loading configuration")?;
    logging::init(&config.logging);

    let mut classifier = Classifier::new();
    let mut actions = ActionRegistry::new();
    magpie_modules::register_all(&mut classifier, &mut actions)
        .context("registering feature modules")?;

    info!(
        direct = classifier.entries(Bucket::Direct).len(),
        overheard = classifier.entries(Bucket::Overheard).len(),
        actions = actions.len(),
        "modules registered"
    );

    let pipeline = Pipeline::new(classifier, actions);
    let runtime = MagpieRuntime::new(config, pipeline);
    runtime.run().await.context("running bot")?;

    Ok(())
}
