use anyhow::Result;
use jobscout::{
    aggregator::Aggregator,
    config::Config,
    dedup::SeenLinkSet,
    fetcher::Fetcher,
    pipeline::PipelineController,
    providers,
    transport::{BotRunner, TELEGRAM_API_BASE, TelegramClient},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    // A missing BOT_TOKEN ends the process here.
    let config = Config::from_env()?;

    let shutdown_token = CancellationToken::new();
    let fetcher = Fetcher::new(config.fetch_settings(), shutdown_token.clone())?;
    let aggregator = Aggregator::new(Arc::new(fetcher), config.detail_delay());

    let telegram = Arc::new(TelegramClient::new(config.bot_token(), TELEGRAM_API_BASE)?);
    let seen = Arc::new(SeenLinkSet::new());
    let providers = providers::builtin();
    info!(
        keyword = config.search_keyword(),
        limit = config.search_limit(),
        providers = providers.len(),
        "Starting job bot"
    );

    let controller = Arc::new(PipelineController::new(
        aggregator,
        providers,
        seen,
        telegram.clone(),
        config.pipeline_settings(),
    ));

    BotRunner::new(telegram, controller, config.poll_timeout(), shutdown_token)
        .run()
        .await
}

/// `RUST_LOG` picks the level; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}
