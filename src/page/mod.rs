//! Search page
//!
//! Binds query input to a [`SearchBackend`] and keeps the result list of the
//! most recently issued query.
//!
//! Every query change spawns a fetch and returns at once. Finished fetches
//! come back over a channel tagged with the id they were issued under; only
//! the completion carrying the latest id may touch the displayed results.
//! Anything older is dropped on arrival.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::backend::{BackendError, SearchBackend, SearchRequest};
use crate::config::FieldSpec;
use crate::record::ResultSet;
use crate::render::html::{escape_html, item_html};
use crate::render::text::item_text;
use crate::render::{render_item, RenderedItem};

/// Id assigned to each issued query, strictly increasing per page
pub type RequestId = u64;

/// Static page settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    index_name: String,
    page_size: usize,
    fields: FieldSpec,
}

impl PageConfig {
    pub fn new(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            page_size: 5,
            fields: FieldSpec::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_fields(mut self, fields: FieldSpec) -> Self {
        self.fields = fields;
        self
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn fields(&self) -> &FieldSpec {
        &self.fields
    }
}

/// What the page is currently showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    /// No query issued yet
    Idle,
    /// Latest query in flight; previous results still shown
    Loading,
    /// Results of the latest query are shown
    Ready,
    /// Latest query failed; results cleared
    Unavailable(String),
}

/// Effect of one completed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// Latest query answered; results replaced
    Accepted { id: RequestId, hits: usize },
    /// Latest query failed
    Failed { id: RequestId },
    /// Superseded query answered; discarded
    Stale { id: RequestId },
}

impl Update {
    pub fn id(&self) -> RequestId {
        match self {
            Update::Accepted { id, .. } | Update::Failed { id } | Update::Stale { id } => *id,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Update::Stale { .. })
    }
}

struct Completion {
    id: RequestId,
    outcome: Result<ResultSet, BackendError>,
}

pub struct SearchPage {
    backend: Arc<dyn SearchBackend>,
    config: PageConfig,
    query: String,
    results: ResultSet,
    status: PageStatus,
    latest: RequestId,
    pending: usize,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl SearchPage {
    pub fn new(backend: Arc<dyn SearchBackend>, config: PageConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            backend,
            config,
            query: String::new(),
            results: ResultSet::empty(),
            status: PageStatus::Idle,
            latest: 0,
            pending: 0,
            tx,
            rx,
        }
    }

    /// Replace the query and start fetching its results
    ///
    /// Must be called inside a tokio runtime. Returns without waiting for
    /// the backend.
    pub fn on_query_change(&mut self, text: impl Into<String>) -> RequestId {
        self.query = text.into();
        self.latest += 1;
        self.pending += 1;
        self.status = PageStatus::Loading;

        let id = self.latest;
        let request = SearchRequest::new(
            self.config.index_name(),
            self.query.clone(),
            self.config.page_size(),
        );
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tracing::debug!("query #{} '{}' -> {}", id, self.query, backend.name());

        tokio::spawn(async move {
            let fetch = tokio::spawn(async move { backend.query(&request).await });
            let outcome = match fetch.await {
                Ok(outcome) => outcome,
                Err(e) => Err(BackendError::Task(e.to_string())),
            };
            let _ = tx.send(Completion { id, outcome });
        });
        id
    }

    /// Apply the next finished fetch, waiting for one if needed
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_update(&mut self) -> Option<Update> {
        if self.pending == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        self.pending -= 1;
        Some(self.apply(completion))
    }

    /// Wait until the latest issued query has been applied
    pub async fn settle(&mut self) -> Option<Update> {
        while let Some(update) = self.next_update().await {
            if !update.is_stale() {
                return Some(update);
            }
        }
        None
    }

    fn apply(&mut self, completion: Completion) -> Update {
        let id = completion.id;
        if id != self.latest {
            tracing::debug!("discarding stale response #{} (latest #{})", id, self.latest);
            return Update::Stale { id };
        }

        match completion.outcome {
            Ok(set) => {
                self.results = set.truncated(self.config.page_size());
                self.status = PageStatus::Ready;
                Update::Accepted {
                    id,
                    hits: self.results.len(),
                }
            }
            Err(e) => {
                tracing::warn!("search for '{}' failed: {}", self.query, e);
                self.results = ResultSet::empty();
                self.status = PageStatus::Unavailable(e.to_string());
                Update::Failed { id }
            }
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn status(&self) -> &PageStatus {
        &self.status
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Id of the most recent query, 0 before the first one
    pub fn latest_request(&self) -> RequestId {
        self.latest
    }

    pub fn has_pending(&self) -> bool {
        self.pending > 0
    }

    /// One rendered item per displayed record
    pub fn items(&self) -> Vec<RenderedItem> {
        self.results
            .iter()
            .map(|record| render_item(record, self.config.fields()))
            .collect()
    }

    /// Full HTML document for the current state
    pub fn render_html(&self) -> String {
        let query = escape_html(&self.query);
        let body = match &self.status {
            PageStatus::Unavailable(_) => {
                "<p class=\"ais-Hits-error\" role=\"alert\">Search is unavailable right now.</p>".to_string()
            }
            PageStatus::Ready if self.results.is_empty() => {
                format!("<p class=\"ais-Hits-empty\">No results for &quot;{}&quot;</p>", query)
            }
            _ => {
                let mut list = String::from("<ol class=\"ais-Hits-list\">");
                for item in self.items() {
                    list.push_str("<li class=\"ais-Hits-item\">");
                    list.push_str(&item_html(&item));
                    list.push_str("</li>");
                }
                list.push_str("</ol>");
                list
            }
        };

        format!(
            "<!DOCTYPE html>
<html>
<head><meta charset=\"utf-8\"/><title>Search - {query}</title></head>
<body>
<div class=\"ais-InstantSearch\">
<form class=\"ais-SearchBox\"><input class=\"ais-SearchBox-input\" type=\"search\" name=\"q\" value=\"{query}\" autocomplete=\"off\"/></form>
{body}
</div>
</body>
</html>
"
        )
    }

    /// Terminal rendering for the current state
    pub fn render_text(&self) -> String {
        match &self.status {
            PageStatus::Unavailable(reason) => format!("Search is unavailable: {}", reason),
            PageStatus::Ready if self.results.is_empty() => {
                format!("No results for '{}'", self.query)
            }
            _ => self
                .items()
                .iter()
                .map(item_text)
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}
