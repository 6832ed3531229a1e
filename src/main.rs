//! Page-Scribe main entry point
//!
//! This is the command-line interface for the Page-Scribe website scraper.

use clap::Parser;
use page_scribe::config::{load_config_with_hash, load_env_files, validate, Config};
use page_scribe::crawler::ScrapeResult;
use page_scribe::output::{print_summary, select_formats, OutputFormat};
use page_scribe::{Scraper, Strategy};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Page-Scribe: website scraping into markdown, JSON and raw formats
///
/// Page-Scribe fetches each URL, converts it to markdown and, for the llm and
/// comprehensive strategies, asks an OpenAI-compatible model to extract a
/// structured JSON description. Results are written to the output directory.
#[derive(Parser, Debug)]
#[command(name = "page-scribe")]
#[command(version)]
#[command(about = "Scrape websites into markdown, JSON and raw formats", long_about = None)]
struct Cli {
    /// URLs to scrape
    #[arg(value_name = "URL", required_unless_present = "input")]
    urls: Vec<String>,

    /// File with additional URLs, one per line (`#` starts a comment)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Scraping strategy: simple, llm or comprehensive
    #[arg(short, long, default_value = "comprehensive")]
    strategy: String,

    /// Output formats: markdown, json, html, raw (repeat or comma-separate)
    #[arg(short, long = "format", value_delimiter = ',')]
    formats: Vec<String>,

    /// File containing a custom extraction prompt
    #[arg(short, long, value_name = "FILE")]
    prompt_file: Option<PathBuf>,

    /// Seconds to wait between URLs
    #[arg(short, long)]
    delay: Option<u64>,

    /// Directory for output files
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);
    load_env_files();

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path).map_err(|e| {
                tracing::error!("Failed to load configuration: {}", e);
                e
            })?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    config.apply_env();
    if let Some(dir) = &cli.output_dir {
        config.output.output_dir = dir.clone();
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay_secs = delay;
    }
    validate(&config)?;

    let strategy: Strategy = cli.strategy.parse()?;
    let formats = if cli.formats.is_empty() {
        select_formats(&config.output.formats)
    } else {
        select_formats(&cli.formats)
    };
    let custom_prompt = cli
        .prompt_file
        .as_deref()
        .map(std::fs::read_to_string)
        .transpose()?;

    let mut urls = cli.urls.clone();
    if let Some(input) = &cli.input {
        urls.extend(read_url_list(input)?);
    }

    if cli.dry_run {
        handle_dry_run(&config, strategy, &formats, &urls, custom_prompt.is_some());
        return Ok(());
    }

    let mut scraper = Scraper::new(config)?;
    if let Some(hash) = config_hash {
        scraper = scraper.with_config_hash(hash);
    }

    if urls.len() == 1 {
        handle_single(&scraper, &urls[0], strategy, &formats, custom_prompt.as_deref()).await
    } else {
        handle_batch(&scraper, &urls, strategy, &formats, custom_prompt.as_deref()).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_scribe=info,warn"),
            1 => EnvFilter::new("page_scribe=debug,info"),
            2 => EnvFilter::new("page_scribe=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Reads a URL list file: one URL per line, blank lines and `#` comments skipped
fn read_url_list(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Handles the --dry-run mode: shows the effective configuration and targets
fn handle_dry_run(
    config: &Config,
    strategy: Strategy,
    formats: &[OutputFormat],
    urls: &[String],
    custom_prompt: bool,
) {
    println!("=== Page-Scribe Dry Run ===\n");

    println!("LLM Configuration:");
    println!("  Base URL: {}", config.llm.base_url);
    println!("  Model: {}", config.llm.model);
    println!(
        "  API key: {}",
        if config.llm.api_key.is_some() { "set" } else { "not set" }
    );
    println!("  Temperature: {}", config.llm.temperature);
    println!("  Max tokens: {}", config.llm.max_tokens);

    println!("\nCrawler Configuration:");
    println!("  User agent: {}", config.crawler.user_agent);
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    println!("  Max retries: {}", config.crawler.max_retries);
    println!("  Delay between URLs: {}s", config.crawler.delay_secs);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.output_dir);
    println!(
        "  Formats: {}",
        formats.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", ")
    );

    println!("\nStrategy: {}", strategy);
    println!(
        "Prompt: {}",
        if custom_prompt { "custom" } else { "built-in" }
    );

    println!("\nURLs ({}):", urls.len());
    for (i, url) in urls.iter().enumerate() {
        println!("  {}. {}", i + 1, url);
    }

    if strategy.uses_llm() && config.llm.api_key.is_none() {
        println!("\n✗ The {} strategy needs OPENROUTER_API_KEY", strategy);
    } else {
        println!("\n✓ Configuration is valid");
    }
}

/// Scrapes a single URL and reports the files written
async fn handle_single(
    scraper: &Scraper,
    url: &str,
    strategy: Strategy,
    formats: &[OutputFormat],
    custom_prompt: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    match scraper
        .scrape_website(url, strategy, formats, custom_prompt)
        .await
    {
        ScrapeResult::Success(success) => {
            println!("✓ Scraped {}", success.url);
            for (format, path) in &success.saved_files {
                println!("  {}: {}", format.as_str().to_uppercase(), path.display());
            }
            println!(
                "  Content length: {} characters, {} links, model: {}",
                success.metadata.raw_content_length,
                success.metadata.links_found,
                success.metadata.model_used
            );
            Ok(())
        }
        ScrapeResult::Failure(failure) => {
            Err(format!("{} ({})", failure.error.message, failure.error.kind).into())
        }
    }
}

/// Scrapes a list of URLs and prints the batch summary
async fn handle_batch(
    scraper: &Scraper,
    urls: &[String],
    strategy: Strategy,
    formats: &[OutputFormat],
    custom_prompt: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let delay = Duration::from_secs(scraper.config().crawler.delay_secs);
    let outcome = scraper
        .scrape_multiple_websites(urls, strategy, formats, custom_prompt, delay)
        .await?;

    print_summary(&outcome.summary);
    println!("Results saved to: {}", scraper.output_dir().display());
    println!("Summary saved to: {}", outcome.summary_path.display());

    Ok(())
}
