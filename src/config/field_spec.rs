//! Field layout for rendered results
//!
//! A field spec lists which record fields are shown, under which label and
//! in what order.

use serde::{Deserialize, Serialize};

/// One displayed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    /// Label shown before the value
    pub label: String,
    /// Record field key
    pub key: String,
}

impl FieldEntry {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
        }
    }
}

/// Ordered list of displayed fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSpec {
    entries: Vec<FieldEntry>,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self::from_pairs(&[
            ("Domain", "domain"),
            ("Available Names", "Company All Available Names"),
            ("Commercial Name", "Company Commercial Name"),
            ("Legal Name", "Company Legal Name"),
            ("Address", "addresses"),
            ("Facebook", "facebook_links"),
            ("Phone", "phone_numbers"),
        ])
    }
}

impl FieldSpec {
    pub fn new(entries: Vec<FieldEntry>) -> Self {
        Self { entries }
    }

    /// Build a spec from `(label, key)` pairs
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(label, key)| FieldEntry::new(*label, *key))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in display order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// First key listed more than once, if any
    pub fn duplicate_key(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::new();
        self.keys().find(|key| !seen.insert(*key))
    }
}
