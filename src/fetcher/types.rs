use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use url::Url;

/// A fetched page, decoded to UTF-8 and ready for selector matching.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Final URL after redirects. Relative links on the page resolve against it.
    pub url: Url,
    pub status: StatusCode,
    /// Name of the encoding the body was decoded from.
    pub encoding: &'static str,
    pub body: String,
    pub fetched_at: DateTime<Utc>,
}

impl RawDocument {
    /// Wrap already-decoded HTML, e.g. a stored fixture.
    pub fn from_html(url: Url, body: impl Into<String>) -> Self {
        Self {
            url,
            status: StatusCode::OK,
            encoding: encoding_rs::UTF_8.name(),
            body: body.into(),
            fetched_at: Utc::now(),
        }
    }
}
