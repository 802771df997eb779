//! Contact scraper feeding the search index
//!
//! Crawls company sites for phone numbers, Facebook links and US postal
//! addresses, writes a CSV report and builds the records the search page
//! queries.

pub mod companies;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod report;

pub use companies::{read_company_names_from_file, read_domains_from_file, CompanyNames};
pub use extract::ContactInfo;
pub use fetch::SiteFetcher;
pub use pipeline::{build_records, ScrapeOutcome, ScrapePipeline, DEFAULT_CONCURRENCY};
pub use report::{write_report_to_file, DEFAULT_REPORT_PATH};
