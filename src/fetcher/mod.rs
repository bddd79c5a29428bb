pub mod client;
pub mod decode;
pub mod errors;
pub mod types;

pub use client::{FetchSettings, Fetcher, PageSource, USER_AGENT};
pub use errors::FetchError;
pub use types::RawDocument;
