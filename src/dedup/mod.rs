//! Delivered-link bookkeeping.
//!
//! Identity is the posting link and nothing else. A site that rotates
//! tracking parameters will show the same job twice.

use dashmap::DashSet;
use url::Url;

use crate::entities::Posting;
use crate::extractor::CandidateRef;

/// Anything carrying a link identity.
pub trait HasLink {
    fn link(&self) -> &Url;
}

impl HasLink for Posting {
    fn link(&self) -> &Url {
        Posting::link(self)
    }
}

impl HasLink for CandidateRef {
    fn link(&self) -> &Url {
        &self.link
    }
}

/// Links already delivered during this process's lifetime.
///
/// Shared behind an `Arc`. Concurrent reads are safe, but the filter/commit
/// pair of one search must not interleave with another search's; the
/// pipeline controller serializes searches for that.
#[derive(Debug, Default)]
pub struct SeenLinkSet {
    links: DashSet<String>,
}

impl SeenLinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, link: &Url) -> bool {
        self.links.contains(link.as_str())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Keep the candidates not yet delivered, in their original order.
    pub fn filter_unseen<T: HasLink>(&self, candidates: Vec<T>) -> Vec<T> {
        candidates
            .into_iter()
            .filter(|c| !self.contains(c.link()))
            .collect()
    }

    /// Record delivered postings. Re-committing a link is a no-op.
    /// Returns how many links were new.
    pub fn commit<'a, T, I>(&self, delivered: I) -> usize
    where
        T: HasLink + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        delivered
            .into_iter()
            .filter(|p| self.links.insert(p.link().to_string()))
            .count()
    }
}
