use thiserror::Error;
use url::Url;

use crate::entities::{Posting, PostingError};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("invalid {field} selector `{selector}`: {reason}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        reason: String,
    },
}

/// A listing card before its detail page has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRef {
    pub title: String,
    pub link: Url,
    pub company: Option<String>,
    pub location: Option<String>,
}

impl CandidateRef {
    /// Attach the detail-page description and seal the posting.
    pub fn into_posting(self, description: Option<String>) -> Result<Posting, PostingError> {
        Posting::new(self.title, self.company, self.location, description, self.link)
    }
}
