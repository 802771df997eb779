//! Result item rendering
//!
//! `render_item` lays out one record according to a field spec. The
//! resulting [`RenderedItem`] is format-neutral; [`html`] and [`text`] turn it
//! into markup or terminal output.

pub mod html;
pub mod text;

use crate::config::FieldSpec;
use crate::highlight::{segments, Segment};
use crate::record::ResultRecord;

/// One labeled field of a rendered item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedField {
    pub label: String,
    /// Empty when the record lacks the field
    pub segments: Vec<Segment>,
}

impl RenderedField {
    /// Field text without emphasis
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    /// Emphasized substrings, left to right
    pub fn emphasized(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter(|s| s.is_emphasized())
            .map(Segment::text)
            .collect()
    }
}

/// A record laid out for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    pub fields: Vec<RenderedField>,
}

/// Lay out `record` field by field, in field spec order
pub fn render_item(record: &ResultRecord, spec: &FieldSpec) -> RenderedItem {
    let fields = spec
        .entries()
        .iter()
        .map(|entry| {
            let segments = match record.field(&entry.key) {
                Some(value) => segments(&value.display_text(), record.spans(&entry.key)),
                None => Vec::new(),
            };
            RenderedField {
                label: entry.label.clone(),
                segments,
            }
        })
        .collect();
    RenderedItem { fields }
}
