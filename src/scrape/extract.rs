//! Contact extraction from page content
//!
//! Phone numbers and addresses are taken from page text; Facebook links
//! from raw HTML so that links inside attributes are found too.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

/// US state and territory abbreviations recognised in addresses
pub const STATES: &str = "AL|AK|AZ|AR|AS|CA|CO|CT|DE|D.C.|FL|GA|GU|HI|ID|IL|IN|IA|KS|KY|LA|ME|MD|MA|MI|MN|MS|MO|MT|NE|NV|NH|NJ|NM|NY|NC|ND|MP|OH|OK|OR|PA|PR|RI|SC|SD|TN|TX|TT|UT|VT|VA|VI|WA|WV|WI|WY";

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(\d{3}\)\s?\d{3}[-\s]?\d{4}|\d{3}-\d{3}-\d{4}|\d{3}\.\d{3}\.\d{4}")
        .expect("phone regex")
});

static FACEBOOK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://www\.facebook\.com/[^\s"]+"#).expect("facebook regex"));

static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(.{{1,36}})?\b({})\s(\d{{5}})\b", STATES)).expect("address regex")
});

/// Contacts found on one site
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub phone_numbers: BTreeSet<String>,
    pub facebook_links: BTreeSet<String>,
    pub addresses: BTreeSet<String>,
    /// Whether the site root answered 200
    pub main_page_success: bool,
}

impl ContactInfo {
    /// Merge what one page yields
    pub fn absorb_page(&mut self, text: &str, html: &str) {
        self.phone_numbers.extend(extract_phone_numbers(text));
        self.facebook_links.extend(extract_facebook_links(html));
        self.addresses.extend(extract_addresses(text));
    }
}

pub fn extract_phone_numbers(text: &str) -> Vec<String> {
    PHONE_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn extract_facebook_links(html: &str) -> Vec<String> {
    FACEBOOK_RE
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Addresses ending in `STATE ZIP`, with up to 36 leading characters
pub fn extract_addresses(text: &str) -> Vec<String> {
    ADDRESS_RE
        .captures_iter(text)
        .map(|caps| {
            let prefix = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            let full = format!("{} {} {}", prefix, &caps[2], &caps[3]);
            deduplicate_address(full.trim())
        })
        .collect()
}

/// Drop words whose alphanumeric core already appeared
pub fn deduplicate_address(address: &str) -> String {
    let mut seen = HashSet::new();
    address
        .split_whitespace()
        .filter(|word| {
            let core: String = word
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            seen.insert(core)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_formats() {
        let text = "Call (555) 123-4567 or 555-987-6543, fax 555.222.3333. Ref 12345.";
        assert_eq!(
            extract_phone_numbers(text),
            vec!["(555) 123-4567", "555-987-6543", "555.222.3333"]
        );
    }

    #[test]
    fn test_facebook_links_from_html() {
        let html = r#"<a href="https://www.facebook.com/acmewidgets">FB</a> http://www.facebook.com/acme.page more"#;
        assert_eq!(
            extract_facebook_links(html),
            vec![
                "https://www.facebook.com/acmewidgets",
                "http://www.facebook.com/acme.page"
            ]
        );
    }

    #[test]
    fn test_address_with_prefix() {
        let addresses = extract_addresses("Visit us at 12 Main Street, Springfield, IL 62701 today");
        assert_eq!(addresses, vec!["us at 12 Main Street, Springfield, IL 62701"]);
    }

    #[test]
    fn test_address_without_prefix() {
        assert_eq!(extract_addresses("TX 75001"), vec!["TX 75001"]);
    }

    #[test]
    fn test_deduplicate_address() {
        assert_eq!(
            deduplicate_address("100 Oak Ave Oak Ave, Austin TX 78701"),
            "100 Oak Ave Austin TX 78701"
        );
    }

    #[test]
    fn test_absorb_page_dedups_across_pages() {
        let mut info = ContactInfo::default();
        info.absorb_page("Phone 555-987-6543", "");
        info.absorb_page("Phone again 555-987-6543", "");
        assert_eq!(info.phone_numbers.len(), 1);
    }
}
