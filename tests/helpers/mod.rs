#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use jobscout::{
    aggregator::{Aggregator, MIN_DETAIL_DELAY},
    fetcher::{FetchSettings, Fetcher},
    pipeline::{Destination, MessageFormat, Notifier, NotifyError, OutboundMessage},
    providers::{ProviderConfig, ProviderId, SelectorContract},
};

/// Notifier that keeps every message it is handed.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(Destination, OutboundMessage)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(Destination, OutboundMessage)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn texts(&self, format: MessageFormat) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(_, m)| m.format == format)
            .map(|(_, m)| m.text)
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        destination: Destination,
        message: OutboundMessage,
    ) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push((destination, message));
        Ok(())
    }
}

/// A provider whose pages live under `/{name}/` on the mock server.
pub fn provider(server: &MockServer, name: &str) -> ProviderConfig {
    ProviderConfig {
        id: ProviderId::Custom(name.to_string()),
        search_url_template: format!("{}/{}/search?q={{keyword}}", server.uri(), name),
        selectors: SelectorContract {
            card: "li.job".to_string(),
            title: "h3".to_string(),
            link: Some("a.apply".to_string()),
            company: Some(".company".to_string()),
            location: Some(".location".to_string()),
            description: "#description".to_string(),
        },
        keyword_filter: false,
    }
}

/// Serve a listing with `count` cards and a detail page for each.
pub async fn mount_provider(server: &MockServer, name: &str, count: usize) {
    let cards: String = (1..=count)
        .map(|n| {
            format!(
                r#"<li class="job">
                    <h3>Motion Designer {n}</h3>
                    <span class="company">Studio {n}</span>
                    <a class="apply" href="/{name}/jobs/{n}">Details</a>
                </li>"#
            )
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/{name}/search")))
        .respond_with(html(format!("<html><body><ul>{cards}</ul></body></html>")))
        .mount(server)
        .await;

    for n in 1..=count {
        Mock::given(method("GET"))
            .and(path(format!("/{name}/jobs/{n}")))
            .respond_with(html(format!(
                r#"<html><body><div id="description">{}</div></body></html>"#,
                "Animation für Marken und Kampagnen. ".repeat(n * 3)
            )))
            .mount(server)
            .await;
    }
}

pub fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(body.into().into_bytes())
        .insert_header("Content-Type", "text/html; charset=utf-8")
}

pub fn fetcher() -> Fetcher {
    let settings = FetchSettings {
        request_timeout: Duration::from_secs(5),
        ..FetchSettings::default()
    };
    Fetcher::new(settings, CancellationToken::new()).unwrap()
}

pub fn aggregator() -> Aggregator {
    Aggregator::new(Arc::new(fetcher()), MIN_DETAIL_DELAY)
}
