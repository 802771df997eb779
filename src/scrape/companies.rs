//! Scraper input lists
//!
//! - domain list: one domain per row in the first column, header row first
//! - company names: `domain, company_commercial_name, company_legal_name,
//!   company_all_available_names`

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Record keys of the company name fields
pub const COMMERCIAL_NAME_KEY: &str = "Company Commercial Name";
pub const LEGAL_NAME_KEY: &str = "Company Legal Name";
pub const ALL_NAMES_KEY: &str = "Company All Available Names";

/// Known names of one company
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyNames {
    pub commercial_name: String,
    pub legal_name: String,
    pub all_available_names: String,
}

#[derive(Deserialize)]
struct CompanyRow {
    domain: String,
    #[serde(default)]
    company_commercial_name: String,
    #[serde(default)]
    company_legal_name: String,
    #[serde(default)]
    company_all_available_names: String,
}

/// Read domains from the first column, skipping the header row
pub fn read_domains<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut domains = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        let row = row.with_context(|| format!("Failed to read domain row {}", index + 2))?;
        if let Some(domain) = row.get(0).map(str::trim).filter(|d| !d.is_empty()) {
            domains.push(domain.to_string());
        }
    }
    Ok(domains)
}

pub fn read_domains_from_file(path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open domain list {}", path.display()))?;
    read_domains(file)
}

/// Read company names keyed by domain
pub fn read_company_names<R: Read>(reader: R) -> Result<HashMap<String, CompanyNames>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut companies = HashMap::new();
    for (index, row) in csv_reader.deserialize::<CompanyRow>().enumerate() {
        let row = row.with_context(|| format!("Failed to parse company row {}", index + 2))?;
        companies.insert(
            row.domain,
            CompanyNames {
                commercial_name: row.company_commercial_name,
                legal_name: row.company_legal_name,
                all_available_names: row.company_all_available_names,
            },
        );
    }
    Ok(companies)
}

pub fn read_company_names_from_file(path: &Path) -> Result<HashMap<String, CompanyNames>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open company names {}", path.display()))?;
    read_company_names(file)
}
