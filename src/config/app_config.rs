//! Application configuration module for sitehits
//!
//! Provides TOML-based configuration with environment variable override support.
//! Priority: CLI args > Environment variables > Config file > Defaults

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::FieldSpec;
use crate::page::PageConfig;
use crate::scrape::DEFAULT_CONCURRENCY;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Hosted search application id
    #[serde(default)]
    app_id: Option<String>,

    /// Search-only API key, used by the page
    #[serde(default)]
    search_api_key: Option<String>,

    /// Write-capable API key, used to upload scraped records
    #[serde(default)]
    admin_api_key: Option<String>,

    /// Index queried by the page and fed by the scraper
    #[serde(default = "default_index_name")]
    index_name: String,

    /// Maximum number of results shown per query
    #[serde(default = "default_hits_per_page")]
    hits_per_page: usize,

    /// Override for the hosted API base URL
    #[serde(default)]
    base_url: Option<String>,

    /// Hosted API request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,

    /// Number of domains crawled at once
    #[serde(default = "default_scrape_concurrency")]
    scrape_concurrency: usize,

    /// Per-page timeout while scraping, in seconds
    #[serde(default = "default_scrape_timeout_secs")]
    scrape_timeout_secs: u64,

    /// Displayed fields, in order
    #[serde(default)]
    fields: FieldSpec,
}

fn default_index_name() -> String {
    "company_contacts".to_string()
}

fn default_hits_per_page() -> usize {
    5
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_scrape_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_scrape_timeout_secs() -> u64 {
    3
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            search_api_key: None,
            admin_api_key: None,
            index_name: default_index_name(),
            hits_per_page: default_hits_per_page(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
            scrape_concurrency: default_scrape_concurrency(),
            scrape_timeout_secs: default_scrape_timeout_secs(),
            fields: FieldSpec::default(),
        }
    }
}

impl AppConfig {
    /// Create config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file: {}", e))?;
        Ok(config)
    }

    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(app_id) = std::env::var("SITEHITS_APP_ID") {
            config.app_id = Some(app_id);
        }

        if let Ok(key) = std::env::var("SITEHITS_API_KEY") {
            config.search_api_key = Some(key);
        }

        if let Ok(key) = std::env::var("SITEHITS_ADMIN_API_KEY") {
            config.admin_api_key = Some(key);
        }

        if let Ok(index) = std::env::var("SITEHITS_INDEX") {
            config.index_name = index;
        }

        if let Ok(hits) = std::env::var("SITEHITS_HITS_PER_PAGE") {
            if let Ok(n) = hits.parse() {
                config.hits_per_page = n;
            }
        }

        if let Ok(url) = std::env::var("SITEHITS_BASE_URL") {
            config.base_url = Some(url);
        }

        config
    }

    /// Merge with another config (other takes priority for non-default values)
    pub fn merge_with(&self, other: &Self) -> Self {
        Self {
            app_id: other.app_id.clone().or_else(|| self.app_id.clone()),
            search_api_key: other
                .search_api_key
                .clone()
                .or_else(|| self.search_api_key.clone()),
            admin_api_key: other
                .admin_api_key
                .clone()
                .or_else(|| self.admin_api_key.clone()),
            index_name: if other.index_name != default_index_name() {
                other.index_name.clone()
            } else {
                self.index_name.clone()
            },
            hits_per_page: if other.hits_per_page != default_hits_per_page() {
                other.hits_per_page
            } else {
                self.hits_per_page
            },
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
            timeout_secs: if other.timeout_secs != default_timeout_secs() {
                other.timeout_secs
            } else {
                self.timeout_secs
            },
            scrape_concurrency: if other.scrape_concurrency != default_scrape_concurrency() {
                other.scrape_concurrency
            } else {
                self.scrape_concurrency
            },
            scrape_timeout_secs: if other.scrape_timeout_secs != default_scrape_timeout_secs() {
                other.scrape_timeout_secs
            } else {
                self.scrape_timeout_secs
            },
            fields: if other.fields != FieldSpec::default() {
                other.fields.clone()
            } else {
                self.fields.clone()
            },
        }
    }

    /// Override index_name
    pub fn with_index_name(mut self, name: &str) -> Self {
        self.index_name = name.to_string();
        self
    }

    /// Override hits_per_page
    pub fn with_hits_per_page(mut self, n: usize) -> Self {
        self.hits_per_page = n;
        self
    }

    /// Override base_url
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Override credentials
    pub fn with_credentials(mut self, app_id: &str, search_api_key: &str) -> Self {
        self.app_id = Some(app_id.to_string());
        self.search_api_key = Some(search_api_key.to_string());
        self
    }

    /// Override displayed fields
    pub fn with_fields(mut self, fields: FieldSpec) -> Self {
        self.fields = fields;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.hits_per_page == 0 {
            return Err(anyhow!("hits_per_page must be greater than 0"));
        }

        if self.scrape_concurrency == 0 {
            return Err(anyhow!("scrape_concurrency must be greater than 0"));
        }

        if self.index_name.trim().is_empty() {
            return Err(anyhow!("index_name must not be empty"));
        }

        if self.fields.is_empty() {
            return Err(anyhow!("at least one field must be configured"));
        }

        if let Some(key) = self.fields.duplicate_key() {
            return Err(anyhow!("field '{}' is listed more than once", key));
        }

        Ok(())
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| anyhow!("Failed to serialize config: {}", e))
    }

    /// Settings the search page needs
    pub fn page_config(&self) -> PageConfig {
        PageConfig::new(&self.index_name)
            .with_page_size(self.hits_per_page)
            .with_fields(self.fields.clone())
    }

    // Getters
    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    pub fn search_api_key(&self) -> Option<&str> {
        self.search_api_key.as_deref()
    }

    pub fn admin_api_key(&self) -> Option<&str> {
        self.admin_api_key.as_deref()
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn hits_per_page(&self) -> usize {
        self.hits_per_page
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn scrape_concurrency(&self) -> usize {
        self.scrape_concurrency
    }

    pub fn scrape_timeout_secs(&self) -> u64 {
        self.scrape_timeout_secs
    }

    pub fn fields(&self) -> &FieldSpec {
        &self.fields
    }
}
