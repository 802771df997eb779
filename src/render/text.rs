//! Terminal output for rendered items
//!
//! Each field becomes a `Label: value` line with matches wrapped in `**`.

use super::RenderedItem;
use crate::highlight::Segment;

pub const EMPHASIS_MARK: &str = "**";

pub fn item_text(item: &RenderedItem) -> String {
    item.fields
        .iter()
        .map(|field| {
            let mut line = format!("{}: ", field.label);
            for segment in &field.segments {
                match segment {
                    Segment::Plain(text) => line.push_str(text),
                    Segment::Emphasized(text) => {
                        line.push_str(EMPHASIS_MARK);
                        line.push_str(text);
                        line.push_str(EMPHASIS_MARK);
                    }
                }
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldSpec;
    use crate::record::ResultRecord;
    use crate::render::render_item;

    #[test]
    fn test_item_text_example() {
        let spec = FieldSpec::from_pairs(&[("Domain", "domain"), ("Phone", "phone_numbers")]);
        let record = ResultRecord::new()
            .with_field("domain", "example.com")
            .with_matches("domain", [(0, 7)]);
        let text = item_text(&render_item(&record, &spec));
        assert_eq!(text, "Domain: **example**.com\nPhone: ");
    }

    #[test]
    fn test_missing_facebook_renders_empty() {
        let record = ResultRecord::new().with_field("domain", "acme.com");
        let text = item_text(&render_item(&record, &FieldSpec::default()));
        assert!(text.lines().any(|line| line == "Facebook: "));
    }
}
