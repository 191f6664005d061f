use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("quote field '{0}' is empty")]
    EmptyField(&'static str),
}

/// A single quote scraped from one `div.quote` block.
///
/// Field names match the JSON served by the API: `quote` is the body text,
/// `author` the attribution, and `tags` the labels in document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    pub quote: String,
    pub author: String,
    /// Zero or more tags. Duplicates are kept.
    pub tags: Vec<String>,
}

impl Quote {
    /// Build a quote once all three fields have been extracted.
    ///
    /// The body and author must both be non-empty.
    pub fn new(
        quote: impl Into<String>,
        author: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<Self, ModelError> {
        let quote = quote.into();
        let author = author.into();

        if quote.is_empty() {
            return Err(ModelError::EmptyField("quote"));
        }
        if author.is_empty() {
            return Err(ModelError::EmptyField("author"));
        }

        Ok(Self { quote, author, tags })
    }
}
