pub mod model;
pub mod reject;
pub mod selectors;
pub mod text;

#[cfg(test)]
mod tests;

pub use model::{CandidateRef, ExtractError};
pub use selectors::CompiledSelectors;

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use crate::entities::{DESCRIPTION_MAX_CHARS, NO_DESCRIPTION, truncate_chars};
use crate::fetcher::RawDocument;
use crate::providers::ProviderConfig;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Read every well-formed card from a listing page.
pub fn extract_listing(
    doc: &RawDocument,
    config: &ProviderConfig,
) -> Result<Vec<CandidateRef>, ExtractError> {
    let selectors = CompiledSelectors::compile(&config.selectors)?;
    Ok(listing_candidates(doc, &selectors))
}

/// Read the description container from a detail page.
pub fn extract_detail(
    doc: &RawDocument,
    config: &ProviderConfig,
) -> Result<Option<String>, ExtractError> {
    let selectors = CompiledSelectors::compile(&config.selectors)?;
    Ok(detail_description(doc, &selectors))
}

/// Description text for a posting, with the sentinel for a missing one.
pub fn describe(detail: Option<String>) -> String {
    detail.unwrap_or_else(|| NO_DESCRIPTION.to_string())
}

/// Cards without a title or a resolvable link are skipped: scraped listings
/// are full of ads and placeholder tiles.
pub fn listing_candidates(doc: &RawDocument, selectors: &CompiledSelectors) -> Vec<CandidateRef> {
    let document = Html::parse_document(&doc.body);
    let mut candidates = Vec::new();

    for (index, card) in document.select(&selectors.card).enumerate() {
        let Some(title_el) = card.select(&selectors.title).next() else {
            debug!(card = index, "skipping card without title");
            continue;
        };
        let Some(title) = text::non_empty_text(title_el) else {
            debug!(card = index, "skipping card with blank title");
            continue;
        };
        let Some(link) = card_link(card, title_el, selectors.link.as_ref(), &doc.url) else {
            debug!(card = index, title = %title, "skipping card without usable link");
            continue;
        };

        candidates.push(CandidateRef {
            title,
            link,
            company: optional_field(card, selectors.company.as_ref()),
            location: optional_field(card, selectors.location.as_ref()),
        });
    }

    candidates
}

pub fn detail_description(doc: &RawDocument, selectors: &CompiledSelectors) -> Option<String> {
    let document = Html::parse_document(&doc.body);
    let container = document.select(&selectors.description).next()?;
    let text = text::non_empty_text(container)?;
    Some(truncate_chars(&text, DESCRIPTION_MAX_CHARS))
}

fn optional_field(card: ElementRef<'_>, selector: Option<&Selector>) -> Option<String> {
    card.select(selector?).next().and_then(text::non_empty_text)
}

fn card_link(
    card: ElementRef<'_>,
    title_el: ElementRef<'_>,
    selector: Option<&Selector>,
    base: &Url,
) -> Option<Url> {
    let href = match selector {
        Some(selector) => card
            .select(selector)
            .find_map(|el| el.value().attr("href"))?,
        None => title_el.value().attr("href").or_else(|| {
            title_el
                .select(&ANCHOR_SELECTOR)
                .find_map(|el| el.value().attr("href"))
        })?,
    };
    resolve_link(base, href)
}

/// Join `href` against the page URL; only http(s) targets are postings.
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let url = base.join(href).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}
