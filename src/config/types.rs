use serde::Deserialize;

/// Main configuration structure for Page-Scribe
///
/// Every section is optional in the TOML file; missing values fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// LLM endpoint configuration (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key; only ever populated from the environment
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Base URL of the API (without the `/chat/completions` suffix)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens in the model's reply
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Value of the `HTTP-Referer` header
    pub referer: String,

    /// Value of the `X-Title` header
    pub title: String,

    /// Page content sent to the model is cut to this many characters
    #[serde(rename = "max-input-chars")]
    pub max_input_chars: usize,

    /// Request timeout for LLM calls (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "meta-llama/llama-3.3-70b-instruct:free".to_string(),
            temperature: 0.1,
            max_tokens: 4000,
            referer: "https://github.com/crawl4ai-integration".to_string(),
            title: "Comprehensive Website Scraper".to_string(),
            max_input_chars: 24_000,
            timeout_secs: 120,
        }
    }
}

/// Page fetching configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// User agent sent with page requests
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Retries for 5xx responses and timeouts
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Pause between retries (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Pause between URLs in a batch (seconds)
    #[serde(rename = "delay-secs")]
    pub delay_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("PageScribe/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            max_retries: 3,
            retry_delay_ms: 2000,
            delay_secs: 2,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving all output files
    #[serde(rename = "output-dir")]
    pub output_dir: String,

    /// Default output formats ("markdown", "json", "html", "raw")
    pub formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: "scraped_data".to_string(),
            formats: vec!["markdown".to_string(), "json".to_string()],
        }
    }
}
