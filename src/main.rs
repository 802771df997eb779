//! sitehits: Command-line interface for the contact search page

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use rmcp::{
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use sitehits::backend::{HostedSearchClient, InMemoryBackend, SearchBackend};
use sitehits::config::{app_config::AppConfig, path_resolver};
use sitehits::page::{PageConfig, SearchPage, Update};
use sitehits::scrape::{self, ScrapePipeline, SiteFetcher};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{stdin, stdout, AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ============================================================================
// Configuration and Backend Helpers
// ============================================================================

/// Command-line overrides of config values
#[derive(Debug, Default)]
struct ConfigOverrides {
    index: Option<String>,
    hits_per_page: Option<usize>,
}

/// Load settings: defaults < config file < environment < command line
fn load_config(config_path: Option<&str>, overrides: &ConfigOverrides) -> Result<AppConfig> {
    let path = match config_path {
        Some(path) => path_resolver::resolve_path(path)?,
        None => path_resolver::get_default_config_path(),
    };

    let file_config = if path.exists() {
        tracing::debug!("Loading config from {}", path.display());
        AppConfig::from_file(&path)?
    } else if config_path.is_some() {
        return Err(anyhow!("Config file not found: {}", path.display()));
    } else {
        AppConfig::default()
    };

    let mut config = file_config.merge_with(&AppConfig::from_env());
    if let Some(index) = &overrides.index {
        config = config.with_index_name(index);
    }
    if let Some(n) = overrides.hits_per_page {
        config = config.with_hits_per_page(n);
    }
    config.validate()?;
    Ok(config)
}

/// In-memory backend when a records file is given, hosted otherwise
fn open_backend(records: Option<&str>, config: &AppConfig) -> Result<Arc<dyn SearchBackend>> {
    match records {
        Some(path) => {
            let path = path_resolver::resolve_path(path)?;
            Ok(Arc::new(InMemoryBackend::from_jsonl_file(&path)?))
        }
        None => {
            let client = HostedSearchClient::from_app_config(config)?;
            tracing::info!("Using hosted index '{}' at {}", config.index_name(), client.base_url());
            Ok(Arc::new(client))
        }
    }
}

/// Client for uploading scraped records, keyed with the admin key
fn upload_client(config: &AppConfig) -> Result<HostedSearchClient> {
    let app_id = config
        .app_id()
        .ok_or_else(|| anyhow!("app_id is not set"))?;
    let admin_key = config
        .admin_api_key()
        .ok_or_else(|| anyhow!("admin_api_key is not set"))?;
    Ok(HostedSearchClient::with_config(
        app_id,
        admin_key,
        config.base_url().map(str::to_string),
        Some(Duration::from_secs(config.timeout_secs())),
    )
    .with_admin_key(admin_key))
}

// ============================================================================
// MCP Server Implementation
// ============================================================================

/// MCP Server for contact search
#[derive(Clone)]
struct SitehitsMcpServer {
    backend: Arc<dyn SearchBackend>,
    page_config: PageConfig,
}

/// Request parameters for search_contacts tool
#[derive(Debug, Deserialize, JsonSchema)]
struct SearchContactsParams {
    /// Search query string
    #[serde(default)]
    query: String,
}

#[tool(tool_box)]
impl SitehitsMcpServer {
    fn new(backend: Arc<dyn SearchBackend>, page_config: PageConfig) -> Self {
        Self {
            backend,
            page_config,
        }
    }

    /// Search company contacts
    #[tool(description = "Search scraped company contacts by domain, name, address, phone or Facebook page")]
    async fn search_contacts(
        &self,
        #[tool(aggr)] params: SearchContactsParams,
    ) -> Result<CallToolResult, rmcp::Error> {
        let mut page = SearchPage::new(Arc::clone(&self.backend), self.page_config.clone());
        page.on_query_change(params.query);
        page.settle().await;

        Ok(CallToolResult::success(vec![Content::text(page.render_text())]))
    }
}

#[tool(tool_box)]
impl ServerHandler for SitehitsMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Company contact search over the scraped contacts index".into()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// CLI Implementation
// ============================================================================

/// sitehits: instant search over scraped company contacts
#[derive(Parser)]
#[command(name = "sitehits")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (default: $XDG_CONFIG_HOME/sitehits/config.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Index to query and feed, overriding config and environment
    #[arg(long, global = true)]
    index: Option<String>,

    /// Maximum results shown per query, overriding config and environment
    #[arg(long, global = true)]
    hits_per_page: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize sitehits configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
    /// Run one query and print the rendered page
    Search {
        /// Search query
        query: String,

        /// Search a JSONL records file instead of the hosted index
        #[arg(short, long)]
        records: Option<String>,

        /// Print the full HTML page instead of text
        #[arg(long)]
        html: bool,
    },
    /// Read queries from stdin, one update per line
    Interactive {
        /// Search a JSONL records file instead of the hosted index
        #[arg(short, long)]
        records: Option<String>,
    },
    /// Start the MCP server
    Serve {
        /// Search a JSONL records file instead of the hosted index
        #[arg(short, long)]
        records: Option<String>,
    },
    /// Crawl company sites for contacts and feed the index
    Scrape {
        /// CSV of domains, one per row
        #[arg(short, long)]
        domains: String,

        /// CSV of company names keyed by domain
        #[arg(long)]
        companies: String,

        /// Report output path
        #[arg(short, long, default_value = scrape::DEFAULT_REPORT_PATH)]
        output: String,

        /// Skip uploading records to the index
        #[arg(long)]
        no_upload: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (to stderr to not interfere with MCP stdio)
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let overrides = ConfigOverrides {
        index: cli.index.clone(),
        hits_per_page: cli.hits_per_page,
    };

    match cli.command {
        Commands::Init { force } => {
            let config_path = match &cli.config {
                Some(path) => path_resolver::resolve_path(path)?,
                None => path_resolver::get_default_config_path(),
            };
            let config_dir = config_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(path_resolver::get_config_dir);

            eprintln!("Initializing sitehits configuration...");
            eprintln!("Config directory: {}", config_dir.display());

            if !config_dir.exists() {
                std::fs::create_dir_all(&config_dir)?;
                eprintln!("Created config directory");
            }

            if config_path.exists() && !force {
                eprintln!("Configuration file already exists: {}", config_path.display());
                eprintln!("Use --force to overwrite");
                return Ok(());
            }

            let toml_content = AppConfig::default().to_toml()?;
            std::fs::write(&config_path, &toml_content)?;

            eprintln!("Created configuration file: {}", config_path.display());
            eprintln!("\nConfiguration initialized successfully!");
            eprintln!("Set app_id and search_api_key in {} (or SITEHITS_APP_ID / SITEHITS_API_KEY).", config_path.display());

            Ok(())
        }
        Commands::Search {
            query,
            records,
            html,
        } => {
            let config = load_config(cli.config.as_deref(), &overrides)?;
            let backend = open_backend(records.as_deref(), &config)?;
            let mut page = SearchPage::new(backend, config.page_config());

            page.on_query_change(query);
            page.settle().await;

            if html {
                print!("{}", page.render_html());
            } else {
                println!("{}", page.render_text());
            }
            Ok(())
        }
        Commands::Interactive { records } => {
            let config = load_config(cli.config.as_deref(), &overrides)?;
            let backend = open_backend(records.as_deref(), &config)?;
            let mut page = SearchPage::new(backend, config.page_config());
            let mut lines = BufReader::new(stdin()).lines();

            eprintln!("Type to search; each line replaces the query. Ctrl-D to quit.");
            loop {
                tokio::select! {
                    line = lines.next_line() => {
                        match line? {
                            Some(text) => {
                                page.on_query_change(text);
                            }
                            None => break,
                        }
                    }
                    Some(update) = page.next_update(), if page.has_pending() => {
                        print_update(&page, update);
                    }
                }
            }

            // Show the answer to the last query before exiting
            if let Some(update) = page.settle().await {
                print_update(&page, update);
            }
            Ok(())
        }
        Commands::Serve { records } => {
            let config = load_config(cli.config.as_deref(), &overrides)?;
            let backend = open_backend(records.as_deref(), &config)?;
            tracing::info!("Starting MCP server with backend: {}", backend.name());
            eprintln!("sitehits MCP server starting... (backend: {})", backend.name());

            let server = SitehitsMcpServer::new(backend, config.page_config());

            let transport = (stdin(), stdout());
            let service = server.serve(transport).await?;

            let _quit_reason = service.waiting().await?;
            Ok(())
        }
        Commands::Scrape {
            domains,
            companies,
            output,
            no_upload,
        } => {
            let config = load_config(cli.config.as_deref(), &overrides)?;
            let start = Instant::now();

            let domains = scrape::read_domains_from_file(&path_resolver::resolve_path(&domains)?)?;
            let companies =
                scrape::read_company_names_from_file(&path_resolver::resolve_path(&companies)?)?;
            eprintln!("Crawling {} domains...", domains.len());

            let fetcher = SiteFetcher::new(Duration::from_secs(config.scrape_timeout_secs()));
            let pipeline = ScrapePipeline::new(fetcher, config.scrape_concurrency());
            let outcome = pipeline.run(&domains).await;

            let records = scrape::build_records(&domains, &outcome.contacts, &companies);
            if no_upload {
                eprintln!("Skipping upload of {} records", records.len());
            } else if !records.is_empty() {
                match upload_client(&config) {
                    Ok(client) => match client.save_objects(config.index_name(), &records).await {
                        Ok(receipt) => eprintln!(
                            "Indexed {} records to '{}'",
                            receipt.object_ids.len(),
                            config.index_name()
                        ),
                        Err(e) => tracing::error!("Index upload failed: {}", e),
                    },
                    Err(e) => tracing::error!("Index upload skipped: {}", e),
                }
            }

            let output = path_resolver::expand_home(&output);
            scrape::write_report_to_file(&output, &domains, &outcome.contacts, &companies)?;

            let elapsed = start.elapsed().as_secs();
            println!("Data has been written to {}", output.display());
            println!("Successfully accessed {} websites.", outcome.succeeded);
            println!("Failed to access {} websites.", outcome.failed);
            println!("Time taken: {} minutes and {} seconds.", elapsed / 60, elapsed % 60);
            Ok(())
        }
    }
}

fn print_update(page: &SearchPage, update: Update) {
    if update.is_stale() {
        tracing::debug!("dropped stale response #{}", update.id());
        return;
    }
    tracing::debug!("applied response #{}", update.id());
    println!("\n> {}\n{}", page.query(), page.render_text());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["sitehits", "serve", "--records", "contacts.jsonl"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_search_command() {
        let cli = Cli::try_parse_from(["sitehits", "search", "acme", "--html"]).unwrap();
        let overrides = ConfigOverrides {
        index: cli.index.clone(),
        hits_per_page: cli.hits_per_page,
    };

    match cli.command {
            Commands::Search { query, records, html } => {
                assert_eq!(query, "acme");
                assert!(records.is_none());
                assert!(html);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_cli_scrape_defaults() {
        let cli = Cli::try_parse_from([
            "sitehits",
            "scrape",
            "--domains",
            "sites.csv",
            "--companies",
            "names.csv",
        ])
        .unwrap();
        let overrides = ConfigOverrides {
        index: cli.index.clone(),
        hits_per_page: cli.hits_per_page,
    };

    match cli.command {
            Commands::Scrape { output, no_upload, .. } => {
                assert_eq!(output, scrape::DEFAULT_REPORT_PATH);
                assert!(!no_upload);
            }
            _ => panic!("expected scrape command"),
        }
    }

    #[test]
    fn test_cli_global_config_flag() {
        let cli = Cli::try_parse_from(["sitehits", "interactive", "--config", "/tmp/c.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/c.toml"));
    }

    #[test]
    fn test_search_contacts_params_empty() {
        let params: SearchContactsParams = serde_json::from_str("{}").expect("Empty params should work");
        assert_eq!(params.query, "");
    }

    #[test]
    fn test_load_config_missing_explicit_file() {
        assert!(load_config(Some("/nonexistent/sitehits.toml"), &ConfigOverrides::default()).is_err());
    }

    #[test]
    fn test_cli_overrides_beat_config_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "index_name = \"contacts_file\"\nhits_per_page = 8\n").unwrap();

        let cli = Cli::try_parse_from([
            "sitehits",
            "search",
            "acme",
            "--index",
            "contacts_cli",
            "--hits-per-page",
            "3",
        ])
        .unwrap();
        let overrides = ConfigOverrides {
            index: cli.index.clone(),
            hits_per_page: cli.hits_per_page,
        };

        let config = load_config(config_path.to_str(), &overrides).unwrap();
        assert_eq!(config.index_name(), "contacts_cli");
        assert_eq!(config.hits_per_page(), 3);
    }

    #[test]
    fn test_config_file_kept_without_overrides() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "hits_per_page = 8\n").unwrap();

        let config = load_config(config_path.to_str(), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.hits_per_page(), 8);
    }
}
