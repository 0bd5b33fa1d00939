//! Extraction failures.

/// Fatal extraction error for one scrape attempt.
///
/// Anything row-shaped that fails to parse is skipped, not raised; the only
/// hard failure is a page without the expected table at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    /// The scraped page lacks a recognizable table of the given kind.
    #[error("no recognizable {page} table found on the scraped page")]
    NoTableFound { page: &'static str },
}
