//! Scrape job boards for a role keyword and deliver unseen postings to chat.
//!
//! Data flows fetcher → extractor → dedup → formatter → notifier, orchestrated
//! per provider by the [`aggregator`] and per command by the [`pipeline`].

pub mod aggregator;
pub mod config;
pub mod dedup;
pub mod entities;
pub mod extractor;
pub mod fetcher;
pub mod formatter;
pub mod pipeline;
pub mod providers;
pub mod transport;
