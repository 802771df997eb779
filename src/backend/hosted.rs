//! Hosted search API client
//!
//! Speaks the Algolia REST protocol:
//! - application id / API key header authentication
//! - `POST /1/indexes/{index}/query` for searches
//! - `POST /1/indexes/{index}/batch` for record uploads
//! - match spans recovered from `_highlightResult` tagged values

use async_trait::async_trait;
use reqwest::Url;
use serde_json::{json, Map, Value};
use std::time::Duration;

use super::{BackendError, SearchBackend, SearchRequest};
use crate::config::AppConfig;
use crate::highlight::spans_from_tagged;
use crate::record::{MatchSpan, ResultRecord, ResultSet, LIST_SEPARATOR};

/// Tag the service is asked to open matches with
pub const HIGHLIGHT_PRE_TAG: &str = "<em>";
/// Tag the service is asked to close matches with
pub const HIGHLIGHT_POST_TAG: &str = "</em>";

const APPLICATION_ID_HEADER: &str = "X-Algolia-Application-Id";
const API_KEY_HEADER: &str = "X-Algolia-API-Key";

/// Acknowledgement of a batch upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    pub task_id: Option<u64>,
    pub object_ids: Vec<String>,
}

/// Hosted search API client
pub struct HostedSearchClient {
    client: reqwest::Client,
    app_id: String,
    api_key: String,
    admin_api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl HostedSearchClient {
    /// Default request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a new client for the given application
    pub fn new(app_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        let app_id = app_id.into();
        Self {
            client: reqwest::Client::new(),
            base_url: Self::default_base_url(&app_id),
            app_id,
            api_key: api_key.into(),
            admin_api_key: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Create client with custom configuration
    pub fn with_config(
        app_id: impl Into<String>,
        api_key: impl Into<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Self {
        let app_id = app_id.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.unwrap_or_else(|| Self::default_base_url(&app_id)),
            app_id,
            api_key: api_key.into(),
            admin_api_key: None,
            timeout: timeout.unwrap_or(Self::DEFAULT_TIMEOUT),
        }
    }

    /// Build a client from application settings
    pub fn from_app_config(config: &AppConfig) -> Result<Self, BackendError> {
        let app_id = config
            .app_id()
            .ok_or_else(|| BackendError::MissingCredentials("app_id is not set".to_string()))?;
        let api_key = config.search_api_key().ok_or_else(|| {
            BackendError::MissingCredentials("search_api_key is not set".to_string())
        })?;

        let mut client = Self::with_config(
            app_id,
            api_key,
            config.base_url().map(str::to_string),
            Some(Duration::from_secs(config.timeout_secs())),
        );
        if let Some(admin) = config.admin_api_key() {
            client = client.with_admin_key(admin);
        }
        Ok(client)
    }

    /// Attach the write-capable key used by [`save_objects`](Self::save_objects)
    pub fn with_admin_key(mut self, key: impl Into<String>) -> Self {
        self.admin_api_key = Some(key.into());
        self
    }

    /// `https://{app_id}-dsn.algolia.net`
    pub fn default_base_url(app_id: &str) -> String {
        format!("https://{}-dsn.algolia.net", app_id.to_ascii_lowercase())
    }

    /// Build request body for a query
    pub fn build_query_body(&self, request: &SearchRequest) -> Value {
        json!({
            "query": request.query,
            "hitsPerPage": request.max_results,
            "highlightPreTag": HIGHLIGHT_PRE_TAG,
            "highlightPostTag": HIGHLIGHT_POST_TAG,
        })
    }

    /// Upload records, replacing existing ones with the same `objectID`
    pub async fn save_objects(
        &self,
        index: &str,
        objects: &[Value],
    ) -> Result<SaveReceipt, BackendError> {
        let key = self.admin_api_key.as_deref().ok_or_else(|| {
            BackendError::MissingCredentials("admin_api_key is required to upload records".to_string())
        })?;

        let requests: Vec<Value> = objects
            .iter()
            .map(|object| json!({ "action": "updateObject", "body": object }))
            .collect();
        let url = self.index_url(index, "batch")?;
        tracing::debug!("uploading {} records to index '{}'", objects.len(), index);

        let response = self.post_json(url, key, &json!({ "requests": requests })).await?;

        let object_ids = response
            .get("objectIDs")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(SaveReceipt {
            task_id: response.get("taskID").and_then(Value::as_u64),
            object_ids,
        })
    }

    fn index_url(&self, index: &str, action: &str) -> Result<Url, BackendError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| BackendError::Network(format!("invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::Network(format!("base URL {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(["1", "indexes", index, action]);
        Ok(url)
    }

    async fn post_json(&self, url: Url, key: &str, body: &Value) -> Result<Value, BackendError> {
        let response = self
            .client
            .post(url)
            .header(APPLICATION_ID_HEADER, &self.app_id)
            .header(API_KEY_HEADER, key)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(BackendError::Unauthorized);
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&response_text)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(response_text);
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&response_text)
            .map_err(|e| BackendError::Parse(format!("{}: {}", e, response_text)))
    }

    /// Get application id
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SearchBackend for HostedSearchClient {
    fn name(&self) -> &str {
        "hosted"
    }

    async fn query(&self, request: &SearchRequest) -> Result<ResultSet, BackendError> {
        let url = self.index_url(&request.index, "query")?;
        let body = self.build_query_body(request);
        let response = self.post_json(url, &self.api_key, &body).await?;

        let hits = response
            .get("hits")
            .and_then(Value::as_array)
            .ok_or_else(|| BackendError::Parse("response has no hits array".to_string()))?;

        let records = hits
            .iter()
            .filter_map(Value::as_object)
            .map(record_from_hit)
            .collect();
        Ok(ResultSet::new(records, request.max_results))
    }
}

/// Convert one hit, taking spans from its `_highlightResult`
pub fn record_from_hit(hit: &Map<String, Value>) -> ResultRecord {
    let mut record = ResultRecord::from_object(hit);

    let Some(Value::Object(highlights)) = hit.get("_highlightResult") else {
        return record;
    };

    for (key, highlight) in highlights {
        let Some(expected) = record.field(key).map(|v| v.display_text()) else {
            continue;
        };
        let Some((plain, spans)) = tagged_field(highlight) else {
            continue;
        };
        if plain != expected {
            tracing::debug!("highlight text for field '{}' does not match record; spans dropped", key);
            continue;
        }
        if !spans.is_empty() {
            record.set_spans(key.clone(), spans);
        }
    }
    record
}

/// Plain text and spans of a highlight entry; list entries are joined like list fields
fn tagged_field(highlight: &Value) -> Option<(String, Vec<MatchSpan>)> {
    match highlight {
        Value::Object(entry) => entry
            .get("value")
            .and_then(Value::as_str)
            .map(|tagged| spans_from_tagged(tagged, HIGHLIGHT_PRE_TAG, HIGHLIGHT_POST_TAG)),
        Value::Array(entries) => {
            let separator_len = LIST_SEPARATOR.chars().count();
            let mut text = String::new();
            let mut spans = Vec::new();
            let mut offset = 0;
            for (i, entry) in entries.iter().enumerate() {
                let (plain, entry_spans) = tagged_field(entry)?;
                if i > 0 {
                    text.push_str(LIST_SEPARATOR);
                    offset += separator_len;
                }
                spans.extend(
                    entry_spans
                        .into_iter()
                        .map(|s| MatchSpan::new(s.start + offset, s.len)),
                );
                offset += plain.chars().count();
                text.push_str(&plain);
            }
            Some((text, spans))
        }
        _ => None,
    }
}
