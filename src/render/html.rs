//! HTML output for rendered items

use super::RenderedItem;
use crate::highlight::Segment;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Markup for one item: `article > div.hit > div.hit-field*`
pub fn item_html(item: &RenderedItem) -> String {
    let mut out = String::from("<article><div class=\"hit\">");
    for field in &item.fields {
        out.push_str("<div class=\"hit-field\"><strong>");
        out.push_str(&escape_html(&field.label));
        out.push_str(":</strong> ");
        for segment in &field.segments {
            match segment {
                Segment::Plain(text) => out.push_str(&escape_html(text)),
                Segment::Emphasized(text) => {
                    out.push_str("<em>");
                    out.push_str(&escape_html(text));
                    out.push_str("</em>");
                }
            }
        }
        out.push_str("</div>");
    }
    out.push_str("</div></article>");
    out
}
