//! One search across several providers.
//!
//! Providers run one after another in declaration order. Each provider run
//! yields a [`ProviderReport`]; a failing provider never stops its siblings.

use std::{collections::HashSet, fmt, sync::Arc, time::Duration};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::dedup::SeenLinkSet;
use crate::entities::Posting;
use crate::extractor::{self, CandidateRef, CompiledSelectors, ExtractError, reject};
use crate::fetcher::{FetchError, PageSource};
use crate::providers::ProviderConfig;

/// Sites start blocking below this spacing between detail requests.
pub const MIN_DETAIL_DELAY: Duration = Duration::from_millis(300);

#[derive(Error, Debug)]
pub enum ProviderFailure {
    #[error("could not build search url: {0}")]
    SearchUrl(#[from] url::ParseError),

    #[error("listing fetch failed: {0}")]
    Listing(#[from] FetchError),

    #[error("selector contract rejected: {0}")]
    Selectors(#[from] ExtractError),
}

#[derive(Debug)]
pub enum ProviderStatus {
    Completed {
        postings: usize,
    },
    /// Some detail pages could not be fetched; their postings carry the
    /// description sentinel.
    Partial {
        postings: usize,
        detail_failures: usize,
    },
    Failed(ProviderFailure),
}

#[derive(Debug)]
pub struct ProviderReport {
    pub provider: String,
    pub status: ProviderStatus,
}

impl ProviderReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, ProviderStatus::Failed(_))
    }

    /// User-facing line for a failed provider.
    pub fn warning(&self) -> Option<String> {
        match &self.status {
            ProviderStatus::Failed(failure) => {
                Some(format!("Error while searching {}: {}", self.provider, failure))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ProviderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            ProviderStatus::Completed { postings } => {
                write!(f, "{}: {} postings", self.provider, postings)
            }
            ProviderStatus::Partial {
                postings,
                detail_failures,
            } => write!(
                f,
                "{}: {} postings, {} without description",
                self.provider, postings, detail_failures
            ),
            ProviderStatus::Failed(failure) => write!(f, "{}: failed ({})", self.provider, failure),
        }
    }
}

/// Postings of one search, capped, in provider order.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub postings: Vec<Posting>,
    pub reports: Vec<ProviderReport>,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn all_failed(&self) -> bool {
        !self.reports.is_empty() && self.reports.iter().all(ProviderReport::is_failure)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.reports.iter().filter_map(ProviderReport::warning).collect()
    }
}

#[derive(Clone)]
pub struct Aggregator {
    source: Arc<dyn PageSource>,
    detail_delay: Duration,
}

impl Aggregator {
    /// `detail_delay` is raised to [`MIN_DETAIL_DELAY`] if set lower.
    pub fn new(source: Arc<dyn PageSource>, detail_delay: Duration) -> Self {
        Self {
            source,
            detail_delay: detail_delay.max(MIN_DETAIL_DELAY),
        }
    }

    pub fn detail_delay(&self) -> Duration {
        self.detail_delay
    }

    /// Search every provider and return at most `limit` unseen postings.
    ///
    /// Only reads `seen`: committing is the caller's job, and only for what
    /// it actually delivered.
    #[instrument(skip(self, providers, seen), fields(providers = providers.len()))]
    pub async fn run_search(
        &self,
        providers: &[ProviderConfig],
        keyword: &str,
        seen: &SeenLinkSet,
        limit: usize,
    ) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();
        let mut taken: HashSet<String> = HashSet::new();

        for provider in providers {
            let budget = limit.saturating_sub(outcome.postings.len());
            let status = match self
                .run_provider(provider, keyword, seen, &mut taken, budget)
                .await
            {
                Ok((postings, detail_failures)) => {
                    let count = postings.len();
                    outcome.postings.extend(postings);
                    if detail_failures > 0 {
                        ProviderStatus::Partial {
                            postings: count,
                            detail_failures,
                        }
                    } else {
                        ProviderStatus::Completed { postings: count }
                    }
                }
                Err(failure) => {
                    warn!(provider = %provider.id, error = %failure, "provider run failed");
                    ProviderStatus::Failed(failure)
                }
            };

            let report = ProviderReport {
                provider: provider.name(),
                status,
            };
            info!("{}", report);
            outcome.reports.push(report);
        }

        outcome.postings.truncate(limit);
        outcome
    }

    #[instrument(skip_all, fields(provider = %provider.id))]
    async fn run_provider(
        &self,
        provider: &ProviderConfig,
        keyword: &str,
        seen: &SeenLinkSet,
        taken: &mut HashSet<String>,
        budget: usize,
    ) -> Result<(Vec<Posting>, usize), ProviderFailure> {
        let selectors = CompiledSelectors::compile(&provider.selectors)?;
        let search_url = provider.search_url(keyword)?;

        let listing = self.source.fetch(search_url.as_str()).await?;
        let candidates = extractor::listing_candidates(&listing, &selectors);
        let found = candidates.len();

        let candidates: Vec<CandidateRef> = seen
            .filter_unseen(candidates)
            .into_iter()
            .filter(|c| !taken.contains(c.link.as_str()))
            .collect();
        debug!(found, unseen = candidates.len(), budget, "listing parsed");

        let mut postings = Vec::new();
        let mut detail_failures = 0;
        let mut first_detail = true;

        for candidate in candidates {
            if postings.len() >= budget {
                break;
            }
            // A duplicate card within this listing.
            if taken.contains(candidate.link.as_str()) {
                continue;
            }

            if !first_detail {
                sleep(self.detail_delay).await;
            }
            first_detail = false;

            let description = match self.source.fetch(candidate.link.as_str()).await {
                Ok(detail) => extractor::detail_description(&detail, &selectors),
                Err(e) => {
                    warn!(link = %candidate.link, error = %e, "detail fetch failed, keeping posting without description");
                    detail_failures += 1;
                    None
                }
            };

            if provider.keyword_filter
                && reject::should_reject(keyword, &candidate.title, description.as_deref())
            {
                debug!(title = %candidate.title, "dropped by keyword filter");
                continue;
            }

            let link = candidate.link.to_string();
            match candidate.into_posting(description) {
                Ok(posting) => {
                    taken.insert(link);
                    postings.push(posting);
                }
                Err(e) => warn!(link = %link, error = %e, "skipping candidate"),
            }
        }

        Ok((postings, detail_failures))
    }
}
