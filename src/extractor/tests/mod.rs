use std::fs;
use url::Url;

use crate::entities::{DESCRIPTION_MAX_CHARS, NO_DESCRIPTION, NOT_AVAILABLE};
use crate::extractor::{describe, extract_detail, extract_listing};
use crate::fetcher::RawDocument;
use crate::providers::{self, ProviderConfig, ProviderId, SelectorContract};

fn fixture(name: &str, url: &str) -> RawDocument {
    let html = fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture");
    RawDocument::from_html(Url::parse(url).unwrap(), html)
}

#[test]
fn test_stepstone_listing_skips_card_without_title() {
    let doc = fixture(
        "stepstone_listing.html",
        "https://www.stepstone.de/jobs/motion-designer/in-deutschland",
    );
    let candidates = extract_listing(&doc, &providers::stepstone()).unwrap();

    assert_eq!(candidates.len(), 1);
    let candidate = &candidates[0];
    assert_eq!(candidate.title, "Motion Designer (m/w/d)");
    assert_eq!(candidate.company.as_deref(), Some("Pixelwerk GmbH"));
    assert_eq!(candidate.location.as_deref(), Some("Berlin"));
    assert_eq!(
        candidate.link.as_str(),
        "https://www.stepstone.de/stellenangebote--Motion-Designer-m-w-d-Berlin-Pixelwerk-GmbH--1001.html"
    );
}

#[test]
fn test_bundesagentur_listing_uses_title_href() {
    let doc = fixture(
        "bundesagentur_listing.html",
        "https://www.arbeitsagentur.de/jobsuche/suche?was=motion+designer&wo=Deutschland",
    );
    let candidates = extract_listing(&doc, &providers::bundesagentur()).unwrap();

    // the third card has no href and is dropped
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].title, "Motion Designer / Animator (m/w/d)");
    assert_eq!(
        candidates[0].link.as_str(),
        "https://www.arbeitsagentur.de/jobsuche/jobdetail/10000-1234567890-S"
    );
    assert_eq!(candidates[0].location.as_deref(), Some("Hamburg"));
    assert_eq!(candidates[0].company, None);
    assert_eq!(candidates[1].location, None);
}

#[test]
fn test_missing_optionals_resolve_to_sentinel() {
    let doc = fixture(
        "bundesagentur_listing.html",
        "https://www.arbeitsagentur.de/jobsuche/suche",
    );
    let candidates = extract_listing(&doc, &providers::bundesagentur()).unwrap();
    let posting = candidates[1].clone().into_posting(None).unwrap();

    assert_eq!(posting.company(), NOT_AVAILABLE);
    assert_eq!(posting.location(), NOT_AVAILABLE);
    assert_eq!(posting.description(), NO_DESCRIPTION);
}

#[test]
fn test_detail_description_is_flattened_and_truncated() {
    let doc = fixture("detail.html", "https://www.stepstone.de/stellenangebote--1001.html");
    let description = extract_detail(&doc, &providers::stepstone())
        .unwrap()
        .expect("description container present");

    assert_eq!(description.chars().count(), DESCRIPTION_MAX_CHARS);
    assert!(description.starts_with("Deine Aufgaben Konzeption und Umsetzung"));
    assert!(!description.contains('\n'));
    assert!(!description.contains("  "));
    assert!(!description.contains("<li>"));
}

#[test]
fn test_detail_without_container_yields_sentinel() {
    let doc = fixture(
        "detail_without_description.html",
        "https://www.stepstone.de/stellenangebote--1002.html",
    );
    let detail = extract_detail(&doc, &providers::stepstone()).unwrap();
    assert_eq!(detail, None);
    assert_eq!(describe(detail), "No description available");

    let candidate = crate::extractor::CandidateRef {
        title: "Motion Designer (m/w/d)".to_string(),
        link: doc.url.clone(),
        company: None,
        location: None,
    };
    let posting = candidate.into_posting(None).unwrap();
    assert_eq!(posting.description(), "No description available");
}

#[test]
fn test_empty_description_container_counts_as_missing() {
    let doc = RawDocument::from_html(
        Url::parse("https://example.com/job/1").unwrap(),
        r#"<html><body><div class="job-description">   </div></body></html>"#,
    );
    assert_eq!(extract_detail(&doc, &providers::stepstone()).unwrap(), None);
}

#[test]
fn test_malformed_html() {
    let doc = RawDocument::from_html(
        Url::parse("https://example.com/jobs").unwrap(),
        r#"<html><body><article class="job-card"><h2>Broken <b>card<a href="/job/1">open"#,
    );
    let candidates = extract_listing(&doc, &providers::stepstone()).unwrap();

    // html5ever repairs the tree; we only care that nothing panics and the
    // card is either read or skipped
    assert!(candidates.len() <= 1);
}

#[test]
fn test_empty_page_yields_no_candidates() {
    let doc = RawDocument::from_html(Url::parse("https://example.com/").unwrap(), "");
    assert!(extract_listing(&doc, &providers::stepstone()).unwrap().is_empty());
}

#[test]
fn test_invalid_contract_is_an_error_not_an_empty_result() {
    let config = ProviderConfig {
        id: ProviderId::Custom("Broken".into()),
        search_url_template: "https://example.com/?q={keyword}".into(),
        selectors: SelectorContract {
            card: "div[".into(),
            title: "h2".into(),
            link: None,
            company: None,
            location: None,
            description: ".desc".into(),
        },
        keyword_filter: false,
    };
    let doc = RawDocument::from_html(Url::parse("https://example.com/").unwrap(), "<html></html>");
    assert!(extract_listing(&doc, &config).is_err());
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_listing_never_panics(html in ".*", path in "/[a-z/]*") {
            let url = Url::parse(&format!("https://example.com{path}")).unwrap();
            let doc = RawDocument::from_html(url, html);
            let _ = extract_listing(&doc, &providers::stepstone());
        }

        #[test]
        fn test_description_respects_limit(body in ".{0,2000}") {
            let html = format!(r#"<div class="job-description">{body}</div>"#);
            let doc = RawDocument::from_html(Url::parse("https://example.com/").unwrap(), html);
            let description = describe(extract_detail(&doc, &providers::stepstone()).unwrap());
            prop_assert!(
                description.chars().count() <= DESCRIPTION_MAX_CHARS || description == NO_DESCRIPTION
            );
        }
    }
}
