//! Search backends
//!
//! The page only depends on [`SearchBackend`]. Ranking, matching and span
//! computation belong to the backend.
//!
//! - [`HostedSearchClient`] talks to a hosted, Algolia-compatible index
//! - [`InMemoryBackend`] serves records loaded from a JSONL file

mod hosted;
mod memory;

pub use hosted::{HostedSearchClient, SaveReceipt, HIGHLIGHT_POST_TAG, HIGHLIGHT_PRE_TAG};
pub use memory::InMemoryBackend;

use async_trait::async_trait;
use thiserror::Error;

use crate::record::ResultSet;

/// Backend failures
///
/// Every variant leaves the page in its "unavailable" state; none is retried.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection failed, timed out, etc.
    #[error("Network error: {0}")]
    Network(String),

    /// Rejected credentials
    #[error("Invalid or missing API key")]
    Unauthorized,

    /// Error status from the service
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The query task panicked or was cancelled
    #[error("Search task failed: {0}")]
    Task(String),

    /// The operation needs credentials the configuration does not provide
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Network(err.to_string())
    }
}

/// One query against an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub index: String,
    pub query: String,
    pub max_results: usize,
}

impl SearchRequest {
    pub fn new(index: impl Into<String>, query: impl Into<String>, max_results: usize) -> Self {
        Self {
            index: index.into(),
            query: query.into(),
            max_results,
        }
    }
}

/// A source of ranked, span-annotated records
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Run one query
    ///
    /// Returns at most `request.max_results` records, in the backend's order.
    async fn query(&self, request: &SearchRequest) -> Result<ResultSet, BackendError>;
}
