//! Site fetching
//!
//! Visits a domain's root and its usual about/contact pages and collects
//! contacts from every page that answers 200.

use scraper::Html;
use std::time::Duration;

use super::extract::ContactInfo;

/// Paths visited on every domain, root first
pub const SUBPAGES: [&str; 5] = ["", "about", "about-us", "contact", "contact-us"];

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Visible text of an HTML document, text nodes trimmed and joined by a space
pub fn page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// HTTP fetcher for contact pages
#[derive(Clone)]
pub struct SiteFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl SiteFetcher {
    /// Default per-page timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Build the URL of one page of `domain`
    pub fn page_url(&self, domain: &str, subpage: &str) -> String {
        format!("http://{}/{}", domain, subpage)
    }

    /// Visit every subpage of `domain`
    ///
    /// A transport error ends the visit; pages answering anything but 200
    /// are skipped.
    pub async fn fetch_contacts(&self, domain: &str) -> ContactInfo {
        let mut info = ContactInfo::default();

        for subpage in SUBPAGES {
            let url = self.page_url(domain, subpage);
            let response = match self
                .client
                .get(&url)
                .header("User-Agent", USER_AGENT)
                .header("Accept", "*/*")
                .timeout(self.timeout)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    if subpage.is_empty() {
                        tracing::warn!("Error accessing {}: {}", url, e);
                    }
                    break;
                }
            };

            if response.status().as_u16() != 200 {
                tracing::debug!("{} answered {}", url, response.status());
                continue;
            }

            let html = match response.text().await {
                Ok(html) => html,
                Err(e) => {
                    if subpage.is_empty() {
                        tracing::warn!("Error reading {}: {}", url, e);
                    }
                    break;
                }
            };

            info.absorb_page(&page_text(&html), &html);
            if subpage.is_empty() {
                info.main_page_success = true;
            }
        }
        info
    }
}

impl Default for SiteFetcher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT)
    }
}
