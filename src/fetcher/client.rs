use crate::fetcher::{
    decode::{decode_body, detect_encoding},
    errors::FetchError,
    types::RawDocument,
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{
    Client, ClientBuilder,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Job boards reject requests carrying reqwest's default identity.
pub const USER_AGENT: &str = "Mozilla/5.0";

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Anything that can turn a URL into a page. The aggregator only sees this.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawDocument, FetchError>;
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Hard deadline for the whole request, body included.
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_body_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 10,
            max_body_bytes: 5 * 1024 * 1024, // 5MB
        }
    }
}

/// Single-shot HTML fetcher. Never retries; every call is bounded by
/// `request_timeout` and aborted when the cancellation token fires.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    settings: FetchSettings,
    cancel: CancellationToken,
}

impl Fetcher {
    pub fn new(settings: FetchSettings, cancel: CancellationToken) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(HTML_ACCEPT));

        let client = ClientBuilder::new()
            .connect_timeout(settings.connect_timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            settings,
            cancel,
        })
    }

    async fn fetch_once(&self, url: url::Url) -> Result<RawDocument, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        if let Some(content_length) = response.content_length()
            && content_length > self.settings.max_body_bytes
        {
            return Err(FetchError::BodyTooLarge(content_length));
        }

        let final_url = response.url().clone();
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Http { status });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
            return Err(FetchError::UnsupportedContentType(content_type));
        }

        let body_bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;

        // Content-Length is optional, so check again once the body is in hand.
        if body_bytes.len() as u64 > self.settings.max_body_bytes {
            return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
        }

        let encoding = detect_encoding(&content_type, &body_bytes);
        debug!(
            status = %status,
            encoding = encoding.name(),
            bytes = body_bytes.len(),
            "page fetched"
        );

        Ok(RawDocument {
            url: final_url,
            status,
            encoding: encoding.name(),
            body: decode_body(&body_bytes, encoding),
            fetched_at: Utc::now(),
        })
    }
}

#[async_trait]
impl PageSource for Fetcher {
    #[instrument(skip_all, fields(url = %url))]
    async fn fetch(&self, url: &str) -> Result<RawDocument, FetchError> {
        let parsed_url = url::Url::parse(url)?;

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(FetchError::Cancelled),
            outcome = tokio::time::timeout(self.settings.request_timeout, self.fetch_once(parsed_url)) => {
                outcome.unwrap_or(Err(FetchError::RequestTimeout))
            }
        }
    }
}
