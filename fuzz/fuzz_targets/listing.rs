#![no_main]

use libfuzzer_sys::fuzz_target;
use url::Url;

use jobscout::extractor::{extract_detail, extract_listing};
use jobscout::fetcher::RawDocument;
use jobscout::providers;

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data).to_string();
    let doc = RawDocument::from_html(Url::parse("https://example.com/jobs").unwrap(), html);

    // Arbitrary markup must never panic either extractor, for any provider.
    for provider in providers::builtin() {
        if let Ok(candidates) = extract_listing(&doc, &provider) {
            for candidate in candidates {
                assert!(candidate.link.has_host());
            }
        }
        if let Ok(Some(description)) = extract_detail(&doc, &provider) {
            assert!(description.chars().count() <= 300);
        }
    }
});
