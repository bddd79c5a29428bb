use thiserror::Error;
use url::Url;

/// Stand-in for an optional field the listing did not carry.
pub const NOT_AVAILABLE: &str = "N/A";

/// Stand-in for a description we could not fetch or find.
pub const NO_DESCRIPTION: &str = "No description available";

/// Descriptions are cut to this many characters.
pub const DESCRIPTION_MAX_CHARS: usize = 300;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PostingError {
    #[error("posting title is empty")]
    EmptyTitle,

    #[error("posting link is not absolute: {0}")]
    RelativeLink(String),
}

/// A normalized job listing. Immutable once built; the link is its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    title: String,
    company: String,
    location: String,
    description: String,
    link: Url,
}

impl Posting {
    /// Builds a posting, collapsing blank optional fields to their sentinels
    /// and enforcing the description length limit.
    pub fn new(
        title: impl Into<String>,
        company: Option<String>,
        location: Option<String>,
        description: Option<String>,
        link: Url,
    ) -> Result<Self, PostingError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(PostingError::EmptyTitle);
        }
        if link.cannot_be_a_base() || link.host_str().is_none() {
            return Err(PostingError::RelativeLink(link.to_string()));
        }

        Ok(Self {
            title,
            company: or_sentinel(company, NOT_AVAILABLE),
            location: or_sentinel(location, NOT_AVAILABLE),
            description: description
                .map(|d| truncate_chars(d.trim(), DESCRIPTION_MAX_CHARS))
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            link,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn company(&self) -> &str {
        &self.company
    }
    pub fn location(&self) -> &str {
        &self.location
    }
    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn link(&self) -> &Url {
        &self.link
    }

    pub fn has_description(&self) -> bool {
        self.description != NO_DESCRIPTION
    }
}

fn or_sentinel(value: Option<String>, sentinel: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| sentinel.to_string())
}

/// Cut at a char boundary; byte slicing would panic on umlauts. Whitespace
/// left dangling at the cut is dropped, so the result may be shorter than
/// `max_chars`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].trim_end().to_string(),
        None => text.to_string(),
    }
}
