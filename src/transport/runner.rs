use anyhow::Result;
use std::{sync::Arc, time::Duration};
use tokio::{signal, time::sleep};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::pipeline::{Command, PipelineController};
use crate::transport::TelegramClient;

/// Long-polls Telegram and feeds commands to the controller one at a time.
pub struct BotRunner {
    client: Arc<TelegramClient>,
    controller: Arc<PipelineController>,
    poll_timeout: Duration,
    /// Wait after a failed poll before asking again.
    poll_backoff: Duration,
    shutdown_token: CancellationToken,
}

impl BotRunner {
    pub fn new(
        client: Arc<TelegramClient>,
        controller: Arc<PipelineController>,
        poll_timeout: Duration,
        shutdown_token: CancellationToken,
    ) -> Self {
        Self {
            client,
            controller,
            poll_timeout,
            poll_backoff: Duration::from_secs(5),
            shutdown_token,
        }
    }

    pub fn with_poll_backoff(mut self, backoff: Duration) -> Self {
        self.poll_backoff = backoff;
        self
    }

    /// Cancels the token on Ctrl-C, then polls until it is cancelled.
    pub async fn run(self) -> Result<()> {
        let shutdown_token = self.shutdown_token.clone();
        tokio::spawn(async move {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                return;
            }
            info!("Received shutdown signal, stopping bot...");
            shutdown_token.cancel();
        });

        self.poll_loop().await
    }

    /// The polling loop without the signal handler.
    pub async fn poll_loop(self) -> Result<()> {
        info!(
            "Bot polling started (poll timeout: {}s)",
            self.poll_timeout.as_secs()
        );
        let mut offset: Option<i64> = None;

        loop {
            let updates = tokio::select! {
                _ = self.shutdown_token.cancelled() => break,
                result = self.client.get_updates(offset, self.poll_timeout) => result,
            };

            let updates = match updates {
                Ok(updates) => updates,
                Err(e) => {
                    warn!("Polling for updates failed: {}", e);
                    tokio::select! {
                        _ = self.shutdown_token.cancelled() => break,
                        _ = sleep(self.poll_backoff) => continue,
                    }
                }
            };

            for update in updates {
                offset = Some(update.update_id + 1);

                let Some((destination, text)) = update.text_message() else {
                    debug!(update_id = update.update_id, "skipping non-text update");
                    continue;
                };

                let command = Command::parse(text);
                let span = info_span!("command", update_id = update.update_id, chat = %destination);
                let handled = self.controller.handle(destination, command).instrument(span);

                tokio::select! {
                    _ = self.shutdown_token.cancelled() => {
                        info!("Shutdown requested while handling a command");
                        return Ok(());
                    }
                    report = handled => {
                        debug!(?report, "command handled");
                    }
                }
            }
        }

        info!("Bot polling stopped");
        Ok(())
    }
}
