//! Result and error types for harness-kit.

use thiserror::Error;

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors that can occur while locating or driving harnesses
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A required lookup found nothing
    #[error(
        "Failed to find element matching one of the following queries:\n{}",
        .queries.join(",\n")
    )]
    NotFound {
        /// Descriptions of the queries that could not be satisfied
        queries: Vec<String>,
    },

    /// A strict lookup found more than one candidate
    #[error("Expected exactly one match for {query} but found {count}")]
    AmbiguousMatch {
        /// Description of the query
        query: String,
        /// Number of candidates that matched
        count: usize,
    },

    /// The backing node was removed from the tree after it was located
    #[error("Element {element} is no longer attached to the tree")]
    DetachedElement {
        /// Identity of the detached element
        element: String,
    },

    /// Selector could not be parsed or combined
    #[error("Invalid selector {selector:?}: {message}")]
    InvalidSelector {
        /// The offending selector
        selector: String,
        /// What went wrong
        message: String,
    },

    /// Indexed lookup past the end of the match list
    #[error("No harness at index {index}: {count} matched {query}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of matches
        count: usize,
        /// Description of the query
        query: String,
    },

    /// The host rejected a simulated interaction
    #[error("Interaction failed on {element}: {message}")]
    Interaction {
        /// Identity of the target element
        element: String,
        /// Error message
        message: String,
    },

    /// The host could not bring the tree to a stable state
    #[error("Tree did not stabilize after {rounds} rounds")]
    Unstable {
        /// Rounds of pending work that were flushed before giving up
        rounds: usize,
    },

    /// Fixture markup could not be parsed
    #[error("Invalid markup at byte {offset}: {message}")]
    InvalidMarkup {
        /// Byte offset of the problem
        offset: usize,
        /// Error message
        message: String,
    },

    /// Regular expression criterion failed to compile
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarnessError {
    /// Build a `NotFound` error for a single query description
    #[must_use]
    pub fn not_found(query: impl Into<String>) -> Self {
        Self::NotFound {
            queries: vec![query.into()],
        }
    }

    /// Whether this error reports a missing element rather than a broken one
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this error reports a node that left the tree
    #[must_use]
    pub const fn is_detached(&self) -> bool {
        matches!(self, Self::DetachedElement { .. })
    }
}
