//! sitehits: instant search over scraped company contacts
//!
//! This library binds a query input to a hosted full-text search index and
//! renders each hit with its matched fragments emphasized. Results of
//! superseded queries are discarded, so the page always shows the answer to
//! the latest query.
//!
//! # Features
//!
//! - Hosted search client (Algolia REST) with highlight span extraction
//! - In-memory backend over JSONL records for offline use
//! - Out-of-order response handling with per-query request ids
//! - HTML and terminal rendering of result items
//! - Contact scraper that builds and uploads the searched records
//! - MCP server for AI assistant integration
//!
//! # Modules
//!
//! - `config`: Application settings and displayed field list
//! - `record`: Result records, field values and match spans
//! - `highlight`: Span normalization and emphasis segmentation
//! - `render`: Result item rendering (HTML and text)
//! - `backend`: Search backends (hosted and in-memory)
//! - `page`: The search page state machine
//! - `loader`: JSONL record loading
//! - `scrape`: Contact scraper and index feeder

pub mod backend;
pub mod config;
pub mod highlight;
pub mod loader;
pub mod page;
pub mod record;
pub mod render;
pub mod scrape;

// Re-export commonly used types
pub use backend::{BackendError, HostedSearchClient, InMemoryBackend, SearchBackend, SearchRequest};
pub use config::{AppConfig, FieldSpec};
pub use page::{PageConfig, PageStatus, SearchPage, Update};
pub use record::{FieldValue, MatchSpan, ResultRecord, ResultSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
