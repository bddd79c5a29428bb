use std::{fmt, sync::Arc, time::Duration};
use tokio::{sync::Mutex, time::sleep};
use tracing::{debug, info, instrument, warn};

use crate::aggregator::Aggregator;
use crate::dedup::SeenLinkSet;
use crate::entities::Posting;
use crate::formatter::format_posting;
use crate::pipeline::{Command, Destination, Notifier, OutboundMessage};
use crate::providers::ProviderConfig;

pub const NO_RESULTS_MESSAGE: &str = "No postings found.";

/// Phase of a single search. Nothing branches on it; each transition is
/// logged at debug level to trace where a search stalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Searching,
    Delivering,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Searching => "searching",
            PipelineState::Delivering => "delivering",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub keyword: String,
    pub limit: usize,
    /// Gap between two delivered postings.
    pub delivery_delay: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            keyword: "motion designer".to_string(),
            limit: 5,
            delivery_delay: Duration::from_secs(1),
        }
    }
}

/// What one command did, for logs and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
    pub warnings: Vec<String>,
    pub no_results: bool,
}

/// Runs one search per `/search` command and delivers the results.
///
/// Searches are serialized: the filter in the aggregator and the commit after
/// delivery must see the same [`SeenLinkSet`] state.
pub struct PipelineController {
    aggregator: Aggregator,
    providers: Vec<ProviderConfig>,
    seen: Arc<SeenLinkSet>,
    notifier: Arc<dyn Notifier>,
    settings: PipelineSettings,
    search_gate: Mutex<()>,
}

impl PipelineController {
    pub fn new(
        aggregator: Aggregator,
        providers: Vec<ProviderConfig>,
        seen: Arc<SeenLinkSet>,
        notifier: Arc<dyn Notifier>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            aggregator,
            providers,
            seen,
            notifier,
            settings,
            search_gate: Mutex::new(()),
        }
    }

    pub fn seen(&self) -> &Arc<SeenLinkSet> {
        &self.seen
    }

    pub fn greeting(&self) -> String {
        format!(
            "Hi! I look for {} jobs in Germany.\nSend /search to get new postings.",
            self.settings.keyword
        )
    }

    fn searching_notice(&self) -> String {
        let names: Vec<String> = self.providers.iter().map(ProviderConfig::name).collect();
        format!(
            "Searching {}... This may take a few seconds.",
            names.join(" and ")
        )
    }

    #[instrument(skip(self, destination), fields(destination = %destination))]
    pub async fn handle(&self, destination: Destination, command: Command) -> DeliveryReport {
        match command {
            Command::Start => {
                self.send(destination, OutboundMessage::plain(self.greeting()))
                    .await;
                DeliveryReport::default()
            }
            Command::Search => self.search(destination).await,
            Command::Unknown(text) => {
                debug!(text = %text, "ignoring unknown command");
                DeliveryReport::default()
            }
        }
    }

    /// Idle → Searching → Delivering → Idle.
    pub async fn search(&self, destination: Destination) -> DeliveryReport {
        let _gate = self.search_gate.lock().await;
        let mut state = PipelineState::Idle;
        let mut report = DeliveryReport::default();

        self.send(destination, OutboundMessage::plain(self.searching_notice()))
            .await;

        transition(&mut state, PipelineState::Searching);
        let outcome = self
            .aggregator
            .run_search(
                &self.providers,
                &self.settings.keyword,
                &self.seen,
                self.settings.limit,
            )
            .await;

        report.warnings = outcome.warnings();
        for warning in &report.warnings {
            self.send(destination, OutboundMessage::plain(warning.clone()))
                .await;
        }

        if outcome.is_empty() {
            if outcome.all_failed() {
                warn!("every provider failed");
            }
            self.send(destination, OutboundMessage::plain(NO_RESULTS_MESSAGE))
                .await;
            report.no_results = true;
            transition(&mut state, PipelineState::Idle);
            return report;
        }

        transition(&mut state, PipelineState::Delivering);
        let delivered = self.deliver(destination, outcome.postings, &mut report).await;
        let newly_seen = self.seen.commit(&delivered);
        info!(
            delivered = report.delivered,
            failed = report.failed,
            newly_seen,
            "search finished"
        );

        transition(&mut state, PipelineState::Idle);
        report
    }

    /// Send postings one by one, returning those the transport accepted.
    async fn deliver(
        &self,
        destination: Destination,
        postings: Vec<Posting>,
        report: &mut DeliveryReport,
    ) -> Vec<Posting> {
        let mut delivered = Vec::with_capacity(postings.len());

        for (index, posting) in postings.into_iter().enumerate() {
            if index > 0 {
                sleep(self.settings.delivery_delay).await;
            }

            let message = OutboundMessage::markdown(format_posting(&posting));
            match self.notifier.notify(destination, message).await {
                Ok(()) => {
                    report.delivered += 1;
                    delivered.push(posting);
                }
                Err(e) => {
                    // Left out of the commit so a later search can offer it again.
                    warn!(link = %posting.link(), error = %e, "delivery failed");
                    report.failed += 1;
                }
            }
        }

        delivered
    }

    async fn send(&self, destination: Destination, message: OutboundMessage) {
        if let Err(e) = self.notifier.notify(destination, message).await {
            warn!(error = %e, "failed to send status message");
        }
    }
}

fn transition(state: &mut PipelineState, next: PipelineState) {
    debug!(from = %state, to = %next, "pipeline transition");
    *state = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{FetchError, PageSource, RawDocument};
    use crate::pipeline::{MessageFormat, MockNotifier, NotifyError};
    use crate::providers::{ProviderId, SelectorContract};
    use async_trait::async_trait;
    use mockall::predicate::eq;
    use url::Url;

    struct StaticSource;

    #[async_trait]
    impl PageSource for StaticSource {
        async fn fetch(&self, url: &str) -> Result<RawDocument, FetchError> {
            let html = if url.contains("/search") {
                r#"<ul><li class="job"><a href="/1">Motion Designer</a></li><li class="job"><a href="/2">Motion Artist</a></li></ul>"#
            } else {
                r#"<div id="desc">Animation</div>"#
            };
            Ok(RawDocument::from_html(Url::parse(url)?, html))
        }
    }

    fn controller(notifier: MockNotifier) -> PipelineController {
        let provider = ProviderConfig {
            id: ProviderId::Custom("Fixture".into()),
            search_url_template: "https://fixture.test/search?q={keyword}".into(),
            selectors: SelectorContract {
                card: "li.job".into(),
                title: "a".into(),
                link: None,
                company: None,
                location: None,
                description: "#desc".into(),
            },
            keyword_filter: false,
        };
        PipelineController::new(
            Aggregator::new(Arc::new(StaticSource), Duration::from_millis(300)),
            vec![provider],
            Arc::new(SeenLinkSet::new()),
            Arc::new(notifier),
            PipelineSettings::default(),
        )
    }

    #[tokio::test]
    async fn start_sends_greeting_only() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|_, m| m.format == MessageFormat::Plain && m.text.contains("/search"))
            .times(1)
            .returning(|_, _| Ok(()));

        let report = controller(notifier)
            .handle(Destination(42), Command::Start)
            .await;
        assert_eq!(report, DeliveryReport::default());
    }

    #[tokio::test]
    async fn unknown_command_sends_nothing() {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();

        controller(notifier)
            .handle(Destination(42), Command::Unknown("hello".into()))
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_delivery_is_not_committed() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .with(eq(Destination(7)), mockall::predicate::function(|m: &OutboundMessage| {
                m.format == MessageFormat::Plain
            }))
            .returning(|_, _| Ok(()));
        notifier
            .expect_notify()
            .withf(|_, m| m.format == MessageFormat::Markdown && m.text.contains("Motion Designer"))
            .times(1)
            .returning(|_, _| Err(NotifyError::Transport("connection reset".into())));
        notifier
            .expect_notify()
            .withf(|_, m| m.format == MessageFormat::Markdown && m.text.contains("Motion Artist"))
            .times(1)
            .returning(|_, _| Ok(()));

        let controller = controller(notifier);
        let report = controller.handle(Destination(7), Command::Search).await;

        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 1);
        let seen = controller.seen();
        assert!(!seen.contains(&Url::parse("https://fixture.test/1").unwrap()));
        assert!(seen.contains(&Url::parse("https://fixture.test/2").unwrap()));
    }
}
