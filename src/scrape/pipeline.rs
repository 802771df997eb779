//! Concurrent crawl of a domain list and conversion to index records

use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::companies::{CompanyNames, ALL_NAMES_KEY, COMMERCIAL_NAME_KEY, LEGAL_NAME_KEY};
use super::extract::ContactInfo;
use super::fetch::SiteFetcher;
use crate::record::LIST_SEPARATOR;

/// Default number of domains crawled at once
pub const DEFAULT_CONCURRENCY: usize = 15;

/// Result of crawling a domain list
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub contacts: HashMap<String, ContactInfo>,
    /// Domains whose root page answered 200
    pub succeeded: usize,
    pub failed: usize,
}

pub struct ScrapePipeline {
    fetcher: SiteFetcher,
    concurrency: usize,
}

impl ScrapePipeline {
    pub fn new(fetcher: SiteFetcher, concurrency: usize) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Crawl every domain, at most `concurrency` at a time
    pub async fn run(&self, domains: &[String]) -> ScrapeOutcome {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for domain in domains {
            let fetcher = self.fetcher.clone();
            let semaphore = Arc::clone(&semaphore);
            let domain = domain.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let info = fetcher.fetch_contacts(&domain).await;
                (domain, info)
            });
        }

        let mut outcome = ScrapeOutcome::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((domain, info)) => {
                    if info.main_page_success {
                        outcome.succeeded += 1;
                    } else {
                        outcome.failed += 1;
                    }
                    tracing::debug!(
                        "{}: {} phones, {} links, {} addresses",
                        domain,
                        info.phone_numbers.len(),
                        info.facebook_links.len(),
                        info.addresses.len()
                    );
                    outcome.contacts.insert(domain, info);
                }
                Err(e) => {
                    tracing::warn!("crawl task failed: {}", e);
                    outcome.failed += 1;
                }
            }
        }
        outcome
    }
}

fn join_set<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    values
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// One index record per crawled domain, in input order
///
/// `objectID` is the domain so re-uploads replace earlier records.
pub fn build_records(
    domains: &[String],
    contacts: &HashMap<String, ContactInfo>,
    companies: &HashMap<String, CompanyNames>,
) -> Vec<Value> {
    domains
        .iter()
        .filter_map(|domain| {
            let info = contacts.get(domain)?;
            let mut object = Map::new();
            object.insert("objectID".to_string(), json!(domain));
            object.insert("domain".to_string(), json!(domain));
            object.insert("phone_numbers".to_string(), json!(join_set(&info.phone_numbers)));
            object.insert("facebook_links".to_string(), json!(join_set(&info.facebook_links)));
            object.insert("addresses".to_string(), json!(join_set(&info.addresses)));

            if let Some(names) = companies.get(domain) {
                object.insert(COMMERCIAL_NAME_KEY.to_string(), json!(names.commercial_name));
                object.insert(LEGAL_NAME_KEY.to_string(), json!(names.legal_name));
                object.insert(ALL_NAMES_KEY.to_string(), json!(names.all_available_names));
            }
            Some(Value::Object(object))
        })
        .collect()
}
