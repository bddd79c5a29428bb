//! Listing sources described as data.
//!
//! A provider is a search URL template plus a selector contract. Adding a
//! source means adding a [`ProviderConfig`], not new control flow.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::fmt::{Display, Formatter};
use url::Url;

/// Placeholder replaced by the form-encoded keyword (`motion+designer`).
pub const KEYWORD_PLACEHOLDER: &str = "{keyword}";
/// Placeholder replaced by a lowercase hyphenated path slug (`motion-designer`).
pub const SLUG_PLACEHOLDER: &str = "{slug}";

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderId {
    StepStone,
    Bundesagentur,
    Custom(String),
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderId::StepStone => write!(f, "StepStone"),
            ProviderId::Bundesagentur => write!(f, "Bundesagentur für Arbeit"),
            ProviderId::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// CSS selectors locating the fields of a listing card and its detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorContract {
    /// One match per listing card.
    pub card: String,
    /// Within a card.
    pub title: String,
    /// Within a card. When absent the title element carries the href.
    pub link: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    /// Container on the detail page.
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub id: ProviderId,
    pub search_url_template: String,
    pub selectors: SelectorContract,
    /// Drop postings that mention the keyword in neither title nor
    /// description. For sources whose search matches loosely.
    pub keyword_filter: bool,
}

impl ProviderConfig {
    pub fn name(&self) -> String {
        self.id.to_string()
    }

    /// Expand the URL template for `keyword`.
    pub fn search_url(&self, keyword: &str) -> Result<Url, url::ParseError> {
        let query: String = url::form_urlencoded::byte_serialize(keyword.trim().as_bytes()).collect();
        let slug = slugify(keyword);
        let expanded = self
            .search_url_template
            .replace(KEYWORD_PLACEHOLDER, &query)
            .replace(SLUG_PLACEHOLDER, &utf8_percent_encode(&slug, PATH_SEGMENT).to_string());
        Url::parse(&expanded)
    }
}

fn slugify(keyword: &str) -> String {
    keyword
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

pub fn stepstone() -> ProviderConfig {
    ProviderConfig {
        id: ProviderId::StepStone,
        search_url_template: "https://www.stepstone.de/jobs/{slug}/in-deutschland".to_string(),
        selectors: SelectorContract {
            card: "article.job-card".to_string(),
            title: "h2".to_string(),
            link: Some("a[href]".to_string()),
            company: Some("div.job-company".to_string()),
            location: Some("div.job-location".to_string()),
            description: "div.job-description".to_string(),
        },
        keyword_filter: false,
    }
}

pub fn bundesagentur() -> ProviderConfig {
    ProviderConfig {
        id: ProviderId::Bundesagentur,
        search_url_template:
            "https://www.arbeitsagentur.de/jobsuche/suche?was={keyword}&wo=Deutschland".to_string(),
        selectors: SelectorContract {
            card: "div.job-card".to_string(),
            title: "a.job-title".to_string(),
            link: None,
            company: None,
            location: Some("span.job-location".to_string()),
            description: "div.job-description".to_string(),
        },
        keyword_filter: false,
    }
}

/// The sources searched by the `/search` command, in delivery order.
pub fn builtin() -> Vec<ProviderConfig> {
    vec![stepstone(), bundesagentur()]
}
