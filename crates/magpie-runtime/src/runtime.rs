//! Runtime orchestration.
//!
//! Wires the Slack transport to the core pipeline and runs until a shutdown
//! signal arrives:
//!
//! ```text
//! EventServer ──mpsc──▶ dispatch loop ──▶ Pipeline ──▶ SlackClient
//! ```
//!
//! Startup order matters: the bot's own identity is resolved via `auth.test`
//! before the webhook server binds, so self-address matching never sees a
//! message while the identity is still unknown.

use std::sync::Arc;

use tokio::signal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use magpie_core::{Pipeline, ReplySink};
use magpie_slack::{EventServer, Inbound, SelfAddress, SlackClient};

use crate::config::MagpieConfig;
use crate::error::RuntimeResult;

/// The bot runtime: one Slack transport, one pipeline.
pub struct MagpieRuntime {
    config: MagpieConfig,
    pipeline: Arc<Pipeline>,
}

impl MagpieRuntime {
    /// Creates a runtime from loaded configuration and a populated pipeline.
    pub fn new(config: MagpieConfig, pipeline: Pipeline) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
        }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &MagpieConfig {
        &self.config
    }

    /// Runs the bot until Ctrl+C or SIGTERM.
    pub async fn run(self) -> RuntimeResult<()> {
        self.run_until(wait_for_shutdown()).await
    }

    /// Runs the bot until the given future resolves.
    pub async fn run_until<F>(self, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        self.config.ensure_credentials()?;

        let client = SlackClient::new(&self.config.slack.api_token, &self.config.slack.api_url)?;
        let identity = client.auth_test().await?;
        info!(
            bot = %self.config.bot.name,
            user_id = %identity.user_id,
            "bot identity resolved"
        );
        let self_address = Arc::new(SelfAddress::with_identity(identity));

        // Capacity 1: the webhook handler waits for the pipeline to take
        // each message, so Slack's retries provide the only queueing.
        let (tx, rx) = mpsc::channel::<Inbound>(1);
        let cancel = CancellationToken::new();

        let server = EventServer::new(
            &self.config.slack.signing_secret,
            &self.config.slack.events_path,
            self_address,
            tx,
        );
        let addr = self.config.slack.bind_addr();
        let server_cancel = cancel.child_token();
        let mut server_task =
            tokio::spawn(async move { server.serve(&addr, server_cancel).await });

        let dispatch_task = tokio::spawn(dispatch_loop(
            Arc::clone(&self.pipeline),
            rx,
            Arc::new(client),
        ));

        tokio::select! {
            () = shutdown => {
                info!("shutdown requested");
            }
            result = &mut server_task => {
                match result {
                    Ok(Ok(())) => warn!("webhook server exited early"),
                    Ok(Err(e)) => {
                        error!(error = %e, "webhook server failed");
                        return Err(e.into());
                    }
                    Err(e) => error!(error = %e, "webhook server task panicked"),
                }
            }
        }

        cancel.cancel();
        if !server_task.is_finished() {
            let _ = server_task.await;
        }
        // The server owned the only sender, so the loop drains and exits.
        let _ = dispatch_task.await;

        info!("runtime stopped");
        Ok(())
    }
}

/// Receives inbound messages and runs each through the pipeline, delivering
/// any reply to the sink. Exits when every sender is gone.
async fn dispatch_loop<S>(pipeline: Arc<Pipeline>, mut rx: mpsc::Receiver<Inbound>, sink: Arc<S>)
where
    S: ReplySink + Send + Sync + 'static,
{
    while let Some(inbound) = rx.recv().await {
        match pipeline.handle(&inbound.message, inbound.directed) {
            Ok(Some(reply)) => {
                if reply.body.is_empty() && reply.blocks.is_empty() {
                    debug!("skipping empty reply");
                    continue;
                }
                if let Err(e) = sink.deliver(&reply).await {
                    error!(error = %e, "failed to deliver reply");
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, body = %inbound.message.body, "handler error");
            }
        }
    }
    debug!("message channel closed, dispatch loop exiting");
}

/// Waits for Ctrl+C or SIGTERM.
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");

        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("received Ctrl+C, shutting down");
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await.expect("failed to listen for Ctrl+C");
        info!("received Ctrl+C, shutting down");
    }
}

// =============================================================================
// Tests
// =============================================================================
