pub mod normalize;
pub mod quotes_toscrape;

use thiserror::Error;

pub use quotes_toscrape::{
    fetch_page, parse_quotes_page, scrape_quotes, scrape_quotes_from, QUOTES_URL,
};

/// Failure of the fetch step. Extraction itself never fails.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("Failed to retrieve data from website: {reason}")]
    RetrievalFailed { reason: String },
}

impl AcquireError {
    pub(crate) fn retrieval(reason: impl Into<String>) -> Self {
        Self::RetrievalFailed {
            reason: reason.into(),
        }
    }
}
