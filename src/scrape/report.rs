//! CSV report of scraped contacts

use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::Path;

use super::companies::CompanyNames;
use super::extract::{deduplicate_address, ContactInfo};
use crate::record::LIST_SEPARATOR;

/// Placeholder for a domain or company with no data at all
pub const NOT_AVAILABLE: &str = "N/A";

pub const REPORT_HEADERS: [&str; 7] = [
    "Domain",
    "Phone Numbers",
    "Facebook Links",
    "Addresses",
    "Company Commercial Name",
    "Company Legal Name",
    "Company All Available Names",
];

/// Default report file name
pub const DEFAULT_REPORT_PATH: &str = "PhoneNumber_FacebookLink_Addresses_CompanyNames.csv";

fn joined(values: &BTreeSet<String>) -> String {
    values
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

fn addresses_cell(addresses: &BTreeSet<String>) -> String {
    addresses
        .iter()
        .map(|a| deduplicate_address(a))
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

fn or_na(cell: Option<String>) -> String {
    cell.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Write one row per input domain, in input order
///
/// A crawled domain with no contacts of a kind gets an empty cell; `N/A`
/// marks a domain that was never crawled or a company missing from the
/// names list.
pub fn write_report<W: Write>(
    writer: W,
    domains: &[String],
    contacts: &HashMap<String, ContactInfo>,
    companies: &HashMap<String, CompanyNames>,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(REPORT_HEADERS)?;

    for domain in domains {
        let info = contacts.get(domain);
        let names = companies.get(domain);
        let row = [
            domain.clone(),
            or_na(info.map(|i| joined(&i.phone_numbers))),
            or_na(info.map(|i| joined(&i.facebook_links))),
            or_na(info.map(|i| addresses_cell(&i.addresses))),
            or_na(names.map(|n| n.commercial_name.clone())),
            or_na(names.map(|n| n.legal_name.clone())),
            or_na(names.map(|n| n.all_available_names.clone())),
        ];
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_report_to_file(
    path: &Path,
    domains: &[String],
    contacts: &HashMap<String, ContactInfo>,
    companies: &HashMap<String, CompanyNames>,
) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;
    write_report(file, domains, contacts, companies)
}
