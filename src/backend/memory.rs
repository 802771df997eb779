//! In-memory backend
//!
//! Serves a fixed list of records with case-insensitive substring matching.
//! Records keep their load order; there is no scoring.

use async_trait::async_trait;
use std::path::Path;

use super::{BackendError, SearchBackend, SearchRequest};
use crate::loader::JsonlLoader;
use crate::record::{MatchSpan, ResultRecord, ResultSet};

pub struct InMemoryBackend {
    records: Vec<ResultRecord>,
}

impl InMemoryBackend {
    pub fn new(records: Vec<ResultRecord>) -> Self {
        Self { records }
    }

    /// Load records from a JSONL file of flat objects
    pub fn from_jsonl_file(path: &Path) -> anyhow::Result<Self> {
        let records = JsonlLoader::load_from_file(path)?;
        tracing::info!("loaded {} records from {}", records.len(), path.display());
        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Match every query word against every field of `record`
    ///
    /// Returns `None` when no word matched anywhere.
    fn annotate(record: &ResultRecord, words: &[String]) -> Option<ResultRecord> {
        let mut annotated = record.clone();
        annotated.matches.clear();
        let mut matched = false;

        for (key, value) in &record.fields {
            let folded = FoldedText::new(&value.display_text());
            let mut spans = Vec::new();
            for word in words {
                spans.extend(folded.find_all(word));
            }
            if !spans.is_empty() {
                spans.sort();
                matched = true;
                annotated.set_spans(key.clone(), spans);
            }
        }
        matched.then_some(annotated)
    }
}

/// Lowercased text that remembers which original character each of its
/// characters came from
///
/// Lowercasing can expand one character into several (`İ` becomes `i̇`), so
/// offsets found in the folded text are mapped back before use.
struct FoldedText {
    lowered: String,
    /// Original character index of each lowered character
    origin: Vec<usize>,
}

impl FoldedText {
    fn new(text: &str) -> Self {
        let mut lowered = String::with_capacity(text.len());
        let mut origin = Vec::with_capacity(text.len());
        for (index, c) in text.chars().enumerate() {
            for lower in c.to_lowercase() {
                lowered.push(lower);
                origin.push(index);
            }
        }
        Self { lowered, origin }
    }

    /// Character spans, in original text offsets, of non-overlapping
    /// occurrences of `needle`
    fn find_all(&self, needle: &str) -> Vec<MatchSpan> {
        let needle_chars = needle.chars().count();
        if needle_chars == 0 {
            return Vec::new();
        }
        self.lowered
            .match_indices(needle)
            .map(|(byte_start, _)| {
                let first = self.lowered[..byte_start].chars().count();
                let start = self.origin[first];
                let end = self.origin[first + needle_chars - 1] + 1;
                MatchSpan::new(start, end - start)
            })
            .collect()
    }
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn query(&self, request: &SearchRequest) -> Result<ResultSet, BackendError> {
        let words: Vec<String> = request
            .query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        let hits: Vec<ResultRecord> = if words.is_empty() {
            self.records
                .iter()
                .take(request.max_results)
                .cloned()
                .collect()
        } else {
            self.records
                .iter()
                .filter_map(|record| Self::annotate(record, &words))
                .take(request.max_results)
                .collect()
        };
        Ok(ResultSet::new(hits, request.max_results))
    }
}
